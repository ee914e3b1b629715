//! hexpool
//!
//! Allocation-aware hex encoding and decoding for Rust.
//!
//! `hexpool` converts bytes to lowercase hex text and back. Each direction
//! comes in three calling conventions, sharing one core:
//!
//! - allocate and return (`decode`, `encode`)
//! - write into a caller-supplied buffer (`decode_into`, `encode_into`)
//! - write into a pooled rental that goes back to its pool on drop
//!   (`decode_pooled`, `encode_pooled`)
//!
//! The crate intentionally:
//! - does NOT emit uppercase, prefixes (`0x`) or separators
//! - does NOT parse incrementally
//! - does NOT reject non-hex characters unless asked (`decode_strict`)
//!
//! Decoding accepts both cases. Encoding always produces lowercase.
//!
//! # Owned
//!
//! ```
//! let hex = hexpool::encode(&[0x4A, 0xFE]);
//! assert_eq!(hex, "4afe");
//! assert_eq!(hexpool::decode("4AFE")?, vec![0x4A, 0xFE]);
//! # Ok::<(), hexpool::HexError>(())
//! ```
//!
//! # Caller buffer
//!
//! ```
//! let mut buf = [0u8; 16];
//! let n = hexpool::decode_into("deadbeef", &mut buf)?;
//! assert_eq!(&buf[..n], &[0xDE, 0xAD, 0xBE, 0xEF]);
//! # Ok::<(), hexpool::HexError>(())
//! ```
//!
//! # Pooled
//!
//! ```
//! use hexpool::{BufferPool, HexCodec};
//!
//! let pool = BufferPool::default();
//! let codec = HexCodec::new(&pool);
//!
//! {
//!     let bytes = codec.decode_pooled("cafe")?;
//!     assert_eq!(&bytes[..], &[0xCA, 0xFE]);
//! } // rental handed back here
//!
//! assert_eq!(pool.outstanding(), 0);
//! # Ok::<(), hexpool::HexError>(())
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod buffer;
mod codec;
mod config;
mod error;

//
// Public surface
//

pub use buffer::{BufferPool, PoolStats, PooledBuffer, shared_pool};
pub use codec::{
    HexCodec, decode, decode_into, decode_pooled, decode_strict, decode_strict_into,
    decode_to_bytes, encode, encode_into, encode_pooled, encode_to_buf, required_byte_count,
    required_char_count,
};
pub use config::PoolConfig;
pub use error::HexError;
