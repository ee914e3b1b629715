#![no_main]

use hexpool::HexError;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|text: Vec<u8>| {
    let lenient = hexpool::decode(&text);
    let strict = hexpool::decode_strict(&text);

    if text.len() % 2 != 0 {
        assert_eq!(lenient, Err(HexError::InvalidLength { len: text.len() }));
        assert_eq!(strict, Err(HexError::InvalidLength { len: text.len() }));
        return;
    }

    // Lenient decoding never fails on even input
    let bytes = lenient.unwrap();
    assert_eq!(bytes.len(), text.len() / 2);

    match strict {
        Ok(strict) => {
            assert_eq!(strict, bytes);
            assert_eq!(hexpool::encode(&bytes), String::from_utf8_lossy(&text).to_lowercase());
        }
        Err(HexError::InvalidCharacter { index, byte }) => {
            assert_eq!(text[index], byte);
            assert!(!byte.is_ascii_hexdigit());
            assert!(text[..index].iter().all(u8::is_ascii_hexdigit));
        }
        Err(e) => panic!("unexpected error: {}", e),
    }

    // An undersized buffer is rejected and left untouched
    if !bytes.is_empty() {
        let mut buf = vec![0xA5u8; bytes.len() - 1];
        assert!(matches!(
            hexpool::decode_into(&text, &mut buf),
            Err(HexError::BufferTooSmall { .. })
        ));
        assert!(buf.iter().all(|&b| b == 0xA5));
    }
});
