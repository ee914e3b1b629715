//! Configuration for buffer pools.
//!
//! - [`PoolConfig`] - Array length limit and per-bucket retention
//!
//! # Example
//!
//! ```
//! use hexpool::PoolConfig;
//!
//! // Custom limits
//! let config = PoolConfig::new(64 * 1024, 8)?;
//!
//! // Builder pattern
//! let config = PoolConfig::default()
//!     .with_max_array_length(4096)
//!     .with_max_buffers_per_bucket(4);
//! config.validate()?;
//!
//! # Ok::<(), hexpool::HexError>(())
//! ```

use crate::error::HexError;

/// Smallest array length a pool hands out.
pub const MIN_ARRAY_LENGTH: usize = 16;

/// Default largest array length kept by a pool (1 MiB elements).
pub const DEFAULT_MAX_ARRAY_LENGTH: usize = 1024 * 1024;

/// Default number of arrays retained per bucket.
pub const DEFAULT_MAX_BUFFERS_PER_BUCKET: usize = 50;

/// Configuration for a [`BufferPool`](crate::BufferPool).
///
/// Rentals are rounded up to power-of-two buckets between 16 and
/// `max_array_length`. Requests above `max_array_length` are still served,
/// but those arrays are never retained.
///
/// Constraints:
/// - `max_array_length` is a power of two and at least 16
/// - `max_buffers_per_bucket` is non-zero
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PoolConfig {
    max_array_length: usize,
    max_buffers_per_bucket: usize,
}

impl PoolConfig {
    /// Creates a new configuration.
    ///
    /// # Errors
    ///
    /// Returns [`HexError::InvalidConfig`] if `max_array_length` is not a
    /// power of two or is below 16, or if `max_buffers_per_bucket` is zero.
    ///
    /// # Example
    ///
    /// ```
    /// use hexpool::PoolConfig;
    ///
    /// let config = PoolConfig::new(4096, 16)?;
    /// assert_eq!(config.max_array_length(), 4096);
    /// assert!(PoolConfig::new(1000, 16).is_err());
    /// # Ok::<(), hexpool::HexError>(())
    /// ```
    pub fn new(max_array_length: usize, max_buffers_per_bucket: usize) -> Result<Self, HexError> {
        if max_array_length < MIN_ARRAY_LENGTH {
            return Err(HexError::InvalidConfig {
                message: "max_array_length must be at least 16",
            });
        }

        if !max_array_length.is_power_of_two() {
            return Err(HexError::InvalidConfig {
                message: "max_array_length must be a power of 2",
            });
        }

        if max_buffers_per_bucket == 0 {
            return Err(HexError::InvalidConfig {
                message: "max_buffers_per_bucket must be non-zero",
            });
        }

        Ok(Self {
            max_array_length,
            max_buffers_per_bucket,
        })
    }

    /// Sets the largest retained array length.
    ///
    /// Note: This does not validate the configuration. Use [`PoolConfig::validate`].
    pub fn with_max_array_length(mut self, len: usize) -> Self {
        self.max_array_length = len;
        self
    }

    /// Sets how many arrays each bucket retains.
    ///
    /// Note: This does not validate the configuration. Use [`PoolConfig::validate`].
    pub fn with_max_buffers_per_bucket(mut self, count: usize) -> Self {
        self.max_buffers_per_bucket = count;
        self
    }

    /// Returns the largest retained array length.
    pub fn max_array_length(&self) -> usize {
        self.max_array_length
    }

    /// Returns how many arrays each bucket retains.
    pub fn max_buffers_per_bucket(&self) -> usize {
        self.max_buffers_per_bucket
    }

    /// Number of power-of-two buckets this configuration produces.
    ///
    /// Lengths below 16 still give one bucket.
    pub(crate) fn bucket_count(&self) -> usize {
        let bits = self.max_array_length.max(MIN_ARRAY_LENGTH).ilog2();
        (bits - MIN_ARRAY_LENGTH.ilog2()) as usize + 1
    }

    /// Closest valid configuration: `max_array_length` rounded down to a
    /// power of two and at least 16, `max_buffers_per_bucket` at least 1.
    pub(crate) fn normalized(self) -> Self {
        let max_array_length = 1usize << self.max_array_length.max(MIN_ARRAY_LENGTH).ilog2();
        Self {
            max_array_length,
            max_buffers_per_bucket: self.max_buffers_per_bucket.max(1),
        }
    }

    /// Validates the current configuration.
    ///
    /// # Example
    ///
    /// ```
    /// use hexpool::PoolConfig;
    ///
    /// let config = PoolConfig::default().with_max_buffers_per_bucket(0);
    /// assert!(config.validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<(), HexError> {
        Self::new(self.max_array_length, self.max_buffers_per_bucket).map(|_| ())
    }
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_array_length: DEFAULT_MAX_ARRAY_LENGTH,
            max_buffers_per_bucket: DEFAULT_MAX_BUFFERS_PER_BUCKET,
        }
    }
}
