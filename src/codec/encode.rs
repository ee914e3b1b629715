//! Bytes to lowercase hex text.

use bytes::BufMut;

use super::{HexCodec, required_char_count};
use crate::buffer::PooledBuffer;
use crate::error::HexError;

/// Outputs up to this many characters are built on the stack by [`encode`].
const STACK_LIMIT: usize = 128;

/// Maps a nibble (0..=15) to its lowercase hex character.
#[inline]
const fn hex_char(n: u8) -> u8 {
    if n > 9 { n + 0x57 } else { n + 0x30 }
}

/// Writes two characters per byte. Preconditions already checked.
#[inline]
fn encode_pairs(bytes: &[u8], out: &mut [u8]) {
    for (pair, &b) in out.chunks_exact_mut(2).zip(bytes) {
        pair[0] = hex_char(b >> 4);
        pair[1] = hex_char(b & 0x0F);
    }
}

fn ascii_to_string(ascii: &[u8]) -> String {
    ascii.iter().copied().map(char::from).collect()
}

/// Encodes bytes as a lowercase hex string.
///
/// Empty input gives an empty string.
///
/// # Example
///
/// ```
/// assert_eq!(hexpool::encode(&[0x4A, 0xFE]), "4afe");
/// assert_eq!(hexpool::encode(&[]), "");
/// ```
pub fn encode(bytes: &[u8]) -> String {
    HexCodec::shared().encode(bytes)
}

/// Encodes bytes into `buf`, returning the number of characters written.
///
/// # Errors
///
/// - [`HexError::InvalidLength`] if `bytes` is empty.
/// - [`HexError::BufferTooSmall`] if `buf` is shorter than `bytes.len() * 2`.
///
/// Both are reported before `buf` is written.
///
/// # Example
///
/// ```
/// let mut buf = [0u8; 4];
/// let n = hexpool::encode_into(&[0x4A, 0xFE], &mut buf)?;
/// assert_eq!(&buf[..n], b"4afe");
/// # Ok::<(), hexpool::HexError>(())
/// ```
pub fn encode_into(bytes: &[u8], buf: &mut [u8]) -> Result<usize, HexError> {
    if bytes.is_empty() {
        return Err(HexError::InvalidLength { len: 0 });
    }

    let required = required_char_count(bytes.len());
    if buf.len() < required {
        return Err(HexError::BufferTooSmall {
            required,
            actual: buf.len(),
        });
    }

    encode_pairs(bytes, &mut buf[..required]);
    Ok(required)
}

/// Encodes bytes into a rental from the shared pool.
///
/// See [`HexCodec::encode_pooled`].
pub fn encode_pooled(bytes: &[u8]) -> Result<PooledBuffer<'static, u8>, HexError> {
    HexCodec::shared().encode_pooled(bytes)
}

/// Appends the lowercase hex text of `bytes` to `buf`.
///
/// # Panics
///
/// If `buf` runs out of room, as [`BufMut::put_slice`] does.
///
/// # Example
///
/// ```
/// use bytes::BytesMut;
///
/// let mut buf = BytesMut::from(&b"id="[..]);
/// hexpool::encode_to_buf(&[0x01, 0xAB], &mut buf);
/// assert_eq!(&buf[..], b"id=01ab");
/// ```
pub fn encode_to_buf<B: BufMut>(bytes: &[u8], buf: &mut B) {
    let mut scratch = [0u8; STACK_LIMIT];
    for chunk in bytes.chunks(STACK_LIMIT / 2) {
        let len = required_char_count(chunk.len());
        encode_pairs(chunk, &mut scratch[..len]);
        buf.put_slice(&scratch[..len]);
    }
}

impl<'p> HexCodec<'p> {
    /// Encodes bytes as a lowercase hex string.
    ///
    /// Short outputs are built on the stack; longer ones in a rental from
    /// this codec's pool that is returned before this call ends.
    pub fn encode(&self, bytes: &[u8]) -> String {
        let required = required_char_count(bytes.len());

        if required <= STACK_LIMIT {
            let mut scratch = [0u8; STACK_LIMIT];
            encode_pairs(bytes, &mut scratch[..required]);
            ascii_to_string(&scratch[..required])
        } else {
            let mut scratch = PooledBuffer::acquire(self.pool, required);
            encode_pairs(bytes, &mut scratch);
            ascii_to_string(&scratch)
        }
    }

    /// Encodes bytes into a rental from this codec's pool.
    ///
    /// The rental holds exactly `bytes.len() * 2` used characters, readable
    /// with [`PooledBuffer::as_str`], and goes back to the pool on drop.
    ///
    /// # Errors
    ///
    /// [`HexError::InvalidLength`] if `bytes` is empty.
    pub fn encode_pooled(&self, bytes: &[u8]) -> Result<PooledBuffer<'p, u8>, HexError> {
        if bytes.is_empty() {
            return Err(HexError::InvalidLength { len: 0 });
        }

        let mut buf = PooledBuffer::acquire(self.pool, required_char_count(bytes.len()));
        let count = encode_into(bytes, &mut buf)?;
        buf.truncate(count);
        Ok(buf)
    }
}
