//! Hex text to bytes.

use bytes::Bytes;

use super::{HexCodec, required_byte_count};
use crate::buffer::PooledBuffer;
use crate::error::HexError;

/// Maps one hex character to its nibble value.
///
/// Anything outside `0-9a-fA-F` maps to 0. Use the strict decoders to reject it.
#[inline]
const fn nibble(c: u8) -> u8 {
    match c {
        b'0'..=b'9' => c - b'0',
        b'a'..=b'f' => c - b'a' + 10,
        b'A'..=b'F' => c - b'A' + 10,
        _ => 0,
    }
}

/// Checks parity and capacity, returning the byte count to write.
fn check(hex: &[u8], capacity: usize) -> Result<usize, HexError> {
    if hex.len() % 2 != 0 {
        return Err(HexError::InvalidLength { len: hex.len() });
    }

    let required = required_byte_count(hex.len());
    if capacity < required {
        return Err(HexError::BufferTooSmall {
            required,
            actual: capacity,
        });
    }

    Ok(required)
}

/// Writes `hex.len() / 2` bytes. Preconditions already checked.
#[inline]
fn decode_pairs(hex: &[u8], out: &mut [u8]) {
    for (dst, pair) in out.iter_mut().zip(hex.chunks_exact(2)) {
        *dst = (nibble(pair[0]) << 4) | nibble(pair[1]);
    }
}

/// Decodes hex text into a new vector.
///
/// Upper and lower case are both accepted. Characters outside `0-9a-fA-F`
/// decode as nibble 0; see [`decode_strict`] for a rejecting variant.
///
/// # Errors
///
/// [`HexError::InvalidLength`] if the input has odd length.
///
/// # Example
///
/// ```
/// assert_eq!(hexpool::decode("4AFE")?, vec![0x4A, 0xFE]);
/// assert!(hexpool::decode("4af").is_err());
/// # Ok::<(), hexpool::HexError>(())
/// ```
pub fn decode<H: AsRef<[u8]>>(hex: H) -> Result<Vec<u8>, HexError> {
    let hex = hex.as_ref();
    let len = check(hex, usize::MAX)?;
    let mut out = vec![0u8; len];
    decode_pairs(hex, &mut out);
    Ok(out)
}

/// Decodes hex text into `buf`, returning the number of bytes written.
///
/// `buf` may be larger than needed; bytes past the returned count are left
/// untouched. Empty input writes nothing and returns 0.
///
/// # Errors
///
/// - [`HexError::InvalidLength`] if the input has odd length.
/// - [`HexError::BufferTooSmall`] if `buf` is shorter than `hex.len() / 2`.
///
/// Both are reported before `buf` is written.
///
/// # Example
///
/// ```
/// let mut buf = [0u8; 8];
/// let n = hexpool::decode_into("4afe", &mut buf)?;
/// assert_eq!(&buf[..n], &[0x4A, 0xFE]);
/// # Ok::<(), hexpool::HexError>(())
/// ```
pub fn decode_into<H: AsRef<[u8]>>(hex: H, buf: &mut [u8]) -> Result<usize, HexError> {
    let hex = hex.as_ref();
    let len = check(hex, buf.len())?;
    decode_pairs(hex, &mut buf[..len]);
    Ok(len)
}

/// Decodes hex text into a rental from the shared pool.
///
/// See [`HexCodec::decode_pooled`].
pub fn decode_pooled<H: AsRef<[u8]>>(hex: H) -> Result<PooledBuffer<'static, u8>, HexError> {
    HexCodec::shared().decode_pooled(hex)
}

/// Decodes hex text into a [`Bytes`].
pub fn decode_to_bytes<H: AsRef<[u8]>>(hex: H) -> Result<Bytes, HexError> {
    decode(hex).map(Bytes::from)
}

/// Decodes hex text, rejecting characters outside `0-9a-fA-F`.
///
/// # Errors
///
/// - [`HexError::InvalidLength`] if the input has odd length.
/// - [`HexError::InvalidCharacter`] for the first non-hex character.
///
/// # Example
///
/// ```
/// use hexpool::HexError;
///
/// assert_eq!(hexpool::decode_strict("ff00")?, vec![0xFF, 0x00]);
/// assert_eq!(
///     hexpool::decode_strict("fg"),
///     Err(HexError::InvalidCharacter { index: 1, byte: b'g' })
/// );
/// # Ok::<(), hexpool::HexError>(())
/// ```
pub fn decode_strict<H: AsRef<[u8]>>(hex: H) -> Result<Vec<u8>, HexError> {
    let hex = hex.as_ref();
    let len = check(hex, usize::MAX)?;
    validate(hex)?;
    let mut out = vec![0u8; len];
    decode_pairs(hex, &mut out);
    Ok(out)
}

/// Strict counterpart of [`decode_into`].
///
/// All checks, character validation included, happen before `buf` is written.
pub fn decode_strict_into<H: AsRef<[u8]>>(hex: H, buf: &mut [u8]) -> Result<usize, HexError> {
    let hex = hex.as_ref();
    let len = check(hex, buf.len())?;
    validate(hex)?;
    decode_pairs(hex, &mut buf[..len]);
    Ok(len)
}

fn validate(hex: &[u8]) -> Result<(), HexError> {
    match hex.iter().position(|c| !c.is_ascii_hexdigit()) {
        Some(index) => Err(HexError::InvalidCharacter {
            index,
            byte: hex[index],
        }),
        None => Ok(()),
    }
}

impl<'p> HexCodec<'p> {
    /// Decodes hex text into a rental from this codec's pool.
    ///
    /// The rental holds exactly `hex.len() / 2` used bytes and goes back to
    /// the pool when the returned buffer is dropped. If decoding fails after
    /// the rent, the array is returned before the error propagates.
    ///
    /// # Errors
    ///
    /// [`HexError::InvalidLength`] if the input is empty or has odd length.
    ///
    /// # Example
    ///
    /// ```
    /// use hexpool::{BufferPool, HexCodec};
    ///
    /// let pool = BufferPool::default();
    /// let bytes = HexCodec::new(&pool).decode_pooled("4afe")?;
    /// assert_eq!(&bytes[..], &[0x4A, 0xFE]);
    /// # Ok::<(), hexpool::HexError>(())
    /// ```
    pub fn decode_pooled<H: AsRef<[u8]>>(&self, hex: H) -> Result<PooledBuffer<'p, u8>, HexError> {
        let hex = hex.as_ref();
        if hex.is_empty() {
            return Err(HexError::InvalidLength { len: 0 });
        }

        let mut buf = PooledBuffer::acquire(self.pool, required_byte_count(hex.len()));
        let count = decode_into(hex, &mut buf)?;
        buf.truncate(count);
        Ok(buf)
    }
}
