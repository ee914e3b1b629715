//! Error types for hexpool.

use std::fmt;

/// Errors that can occur during hex conversion or pool configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HexError {
    /// The input length violates a precondition of the call.
    ///
    /// Raised for odd-length hex text, and for empty input on the calling
    /// conventions that reject it.
    InvalidLength {
        /// Length of the offending input.
        len: usize,
    },

    /// The caller-supplied output buffer cannot hold the full result.
    BufferTooSmall {
        /// Number of elements the conversion needs.
        required: usize,
        /// Number of elements the buffer provides.
        actual: usize,
    },

    /// A character outside `0-9a-fA-F` was found by a strict decode.
    InvalidCharacter {
        /// Position of the character in the input.
        index: usize,
        /// The offending character.
        byte: u8,
    },

    /// Invalid pool configuration parameter.
    InvalidConfig {
        /// Description of what was invalid.
        message: &'static str,
    },
}

impl fmt::Display for HexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HexError::InvalidLength { len } => write!(f, "invalid input length: {}", len),
            HexError::BufferTooSmall { required, actual } => {
                write!(f, "buffer too small: need {} (have {})", required, actual)
            }
            HexError::InvalidCharacter { index, byte } => {
                write!(f, "invalid hex character {:?} at index {}", *byte as char, index)
            }
            HexError::InvalidConfig { message } => {
                write!(f, "invalid config: {}", message)
            }
        }
    }
}

impl std::error::Error for HexError {}
