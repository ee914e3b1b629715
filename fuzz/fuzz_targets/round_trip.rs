#![no_main]

use hexpool::{BufferPool, HexCodec};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: Vec<u8>| {
    let pool = BufferPool::default();
    let codec = HexCodec::new(&pool);

    let hex = codec.encode(&data);
    assert_eq!(hex.len(), data.len() * 2);
    assert!(hex.bytes().all(|c| c.is_ascii_digit() || (b'a'..=b'f').contains(&c)));
    assert_eq!(hexpool::decode(&hex).unwrap(), data);
    assert_eq!(hexpool::decode_strict(&hex).unwrap(), data);

    // Pooled variants agree and hand their rentals back
    if !data.is_empty() {
        let pooled = codec.encode_pooled(&data).unwrap();
        assert_eq!(pooled.as_str().unwrap(), hex);

        let bytes = codec.decode_pooled(&hex).unwrap();
        assert_eq!(&bytes[..], &data[..]);
    }
    assert_eq!(pool.outstanding(), 0);
});
