//! Hex conversion.
//!
//! - [`required_byte_count`] / [`required_char_count`] - Output sizing
//! - [`decode`], [`decode_into`], [`decode_pooled`] - Hex text to bytes
//! - [`encode`], [`encode_into`], [`encode_pooled`] - Bytes to lowercase hex text
//! - [`HexCodec`] - The pooled operations bound to an explicit pool
//!
//! Every buffer-writing call checks its preconditions before touching the
//! output, so a failed call leaves the caller's buffer as it was.

mod decode;
mod encode;

pub use decode::{
    decode, decode_into, decode_pooled, decode_strict, decode_strict_into, decode_to_bytes,
};
pub use encode::{encode, encode_into, encode_pooled, encode_to_buf};

use crate::buffer::{BufferPool, shared_pool};

/// Number of bytes `hex_len` characters of hex text decode to.
///
/// Integer division; parity is not checked here.
///
/// ```
/// assert_eq!(hexpool::required_byte_count(8), 4);
/// assert_eq!(hexpool::required_byte_count(7), 3);
/// ```
pub const fn required_byte_count(hex_len: usize) -> usize {
    hex_len / 2
}

/// Number of hex characters `byte_len` bytes encode to.
///
/// ```
/// assert_eq!(hexpool::required_char_count(4), 8);
/// ```
pub const fn required_char_count(byte_len: usize) -> usize {
    byte_len * 2
}

/// Hex conversion bound to a [`BufferPool`].
///
/// The free functions of this crate use [`HexCodec::shared`]. Build one with
/// [`HexCodec::new`] to route pooled rentals through a pool you own, for
/// example to watch its occupancy in tests.
///
/// # Example
///
/// ```
/// use hexpool::{BufferPool, HexCodec};
///
/// let pool = BufferPool::default();
/// let codec = HexCodec::new(&pool);
///
/// {
///     let hex = codec.encode_pooled(&[0x4A, 0xFE])?;
///     assert_eq!(hex.as_str().unwrap(), "4afe");
///     assert_eq!(pool.outstanding(), 1);
/// }
/// assert_eq!(pool.outstanding(), 0);
/// # Ok::<(), hexpool::HexError>(())
/// ```
#[derive(Debug, Clone, Copy)]
pub struct HexCodec<'p> {
    pool: &'p BufferPool<u8>,
}

impl<'p> HexCodec<'p> {
    /// Creates a codec renting from `pool`.
    pub const fn new(pool: &'p BufferPool<u8>) -> Self {
        Self { pool }
    }

    /// Returns the pool this codec rents from.
    pub fn pool(&self) -> &'p BufferPool<u8> {
        self.pool
    }
}

impl HexCodec<'static> {
    /// Codec backed by the process-wide [`shared_pool`].
    pub fn shared() -> Self {
        Self::new(shared_pool())
    }
}

impl Default for HexCodec<'static> {
    fn default() -> Self {
        Self::shared()
    }
}
