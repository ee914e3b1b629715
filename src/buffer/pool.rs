//! Thread-safe, bucketed array pool.

use std::sync::OnceLock;
use std::sync::atomic::{AtomicUsize, Ordering};

use crossbeam::queue::ArrayQueue;

use crate::config::{MIN_ARRAY_LENGTH, PoolConfig};
use crate::error::HexError;

/// Process-wide pool behind the free `*_pooled` functions.
static SHARED_POOL: OnceLock<BufferPool<u8>> = OnceLock::new();

/// Returns the process-wide byte pool.
///
/// Created with [`PoolConfig::default`] on first use and never torn down.
pub fn shared_pool() -> &'static BufferPool<u8> {
    SHARED_POOL.get_or_init(|| BufferPool::new(PoolConfig::default()))
}

/// A pool of reusable arrays, safe for concurrent rent and return.
///
/// Arrays are grouped into power-of-two buckets. A rental is served from
/// the smallest bucket that fits, so the array handed out may be longer
/// than requested. Contents of a fresh rental are unspecified (whatever
/// the previous renter left behind, or `T::default()`).
///
/// Most callers go through [`PooledBuffer`](crate::PooledBuffer), which
/// returns its array on drop. [`rent`](Self::rent) and
/// [`give_back`](Self::give_back) are the raw operations underneath.
pub struct BufferPool<T> {
    buckets: Vec<ArrayQueue<Vec<T>>>,
    config: PoolConfig,
    hits: AtomicUsize,
    misses: AtomicUsize,
    returns: AtomicUsize,
    drops: AtomicUsize,
    strays: AtomicUsize,
    outstanding: AtomicUsize,
}

impl<T: Copy + Default> BufferPool<T> {
    /// Creates a pool.
    ///
    /// An unvalidated configuration is normalized rather than trusted:
    /// `max_array_length` is rounded down to a power of two (at least 16) and
    /// `max_buffers_per_bucket` is raised to at least 1. Use
    /// [`BufferPool::try_new`] to reject such configurations instead.
    pub fn new(config: PoolConfig) -> Self {
        let config = config.normalized();
        let buckets = (0..config.bucket_count())
            .map(|_| ArrayQueue::new(config.max_buffers_per_bucket()))
            .collect();

        tracing::debug!(
            max_array_length = config.max_array_length(),
            max_buffers_per_bucket = config.max_buffers_per_bucket(),
            "buffer pool created"
        );

        Self {
            buckets,
            config,
            hits: AtomicUsize::new(0),
            misses: AtomicUsize::new(0),
            returns: AtomicUsize::new(0),
            drops: AtomicUsize::new(0),
            strays: AtomicUsize::new(0),
            outstanding: AtomicUsize::new(0),
        }
    }

    /// Validates `config`, then creates a pool.
    pub fn try_new(config: PoolConfig) -> Result<Self, HexError> {
        config.validate()?;
        Ok(Self::new(config))
    }

    /// Rents an array of at least `min_len` elements.
    ///
    /// Every rental must be handed back exactly once with
    /// [`give_back`](Self::give_back).
    pub fn rent(&self, min_len: usize) -> Vec<T> {
        self.outstanding.fetch_add(1, Ordering::Relaxed);

        if min_len == 0 {
            return Vec::new();
        }

        let Some(index) = self.bucket_index(min_len) else {
            tracing::debug!(len = min_len, "oversized rental, not pooled");
            self.misses.fetch_add(1, Ordering::Relaxed);
            return vec![T::default(); min_len];
        };

        if let Some(array) = self.buckets[index].pop() {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return array;
        }

        let bucket_len = bucket_length(index);
        tracing::trace!(len = min_len, bucket_len, "pool miss, allocating");
        self.misses.fetch_add(1, Ordering::Relaxed);
        vec![T::default(); bucket_len]
    }

    /// Returns a rented array to the pool.
    ///
    /// Only arrays obtained from [`rent`](Self::rent) on this pool may be
    /// handed back, each exactly once. The pool cannot tell a foreign array
    /// from a rental while rentals are outstanding; a return with nothing
    /// outstanding is counted in [`PoolStats::strays`] and dropped.
    ///
    /// Arrays whose length matches no bucket (oversized or empty rentals),
    /// or whose bucket is already full, are dropped.
    pub fn give_back(&self, array: Vec<T>) {
        if !self.settle() {
            tracing::warn!(len = array.len(), "array returned with no rental outstanding");
            self.strays.fetch_add(1, Ordering::Relaxed);
            return;
        }

        let index = self
            .bucket_index(array.len())
            .filter(|&i| bucket_length(i) == array.len());

        match index {
            Some(i) => match self.buckets[i].push(array) {
                Ok(()) => {
                    self.returns.fetch_add(1, Ordering::Relaxed);
                }
                Err(array) => {
                    tracing::trace!(len = array.len(), "bucket full, dropping array");
                    self.drops.fetch_add(1, Ordering::Relaxed);
                }
            },
            None => {
                if !array.is_empty() {
                    tracing::trace!(len = array.len(), "unpooled length, dropping array");
                    self.drops.fetch_add(1, Ordering::Relaxed);
                }
            }
        }
    }

    /// Records that a rental will never come back.
    pub(crate) fn forget(&self) {
        self.settle();
    }

    /// Decrements `outstanding`. False if nothing was outstanding.
    fn settle(&self) -> bool {
        self.outstanding
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |n| n.checked_sub(1))
            .is_ok()
    }

    fn bucket_index(&self, len: usize) -> Option<usize> {
        if len == 0 || len > self.config.max_array_length() {
            return None;
        }
        let len = len.max(MIN_ARRAY_LENGTH).next_power_of_two();
        let index = (len.trailing_zeros() - MIN_ARRAY_LENGTH.trailing_zeros()) as usize;
        (index < self.buckets.len()).then_some(index)
    }
}

impl<T> BufferPool<T> {
    /// Returns the pool configuration.
    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    /// Number of rentals not yet handed back.
    pub fn outstanding(&self) -> usize {
        self.outstanding.load(Ordering::Relaxed)
    }

    /// Number of arrays currently cached across all buckets.
    pub fn pooled(&self) -> usize {
        self.buckets.iter().map(ArrayQueue::len).sum()
    }

    /// Snapshot of the pool counters.
    pub fn stats(&self) -> PoolStats {
        PoolStats {
            pooled: self.pooled(),
            outstanding: self.outstanding(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            returns: self.returns.load(Ordering::Relaxed),
            drops: self.drops.load(Ordering::Relaxed),
            strays: self.strays.load(Ordering::Relaxed),
        }
    }
}

impl<T: Copy + Default> Default for BufferPool<T> {
    fn default() -> Self {
        Self::new(PoolConfig::default())
    }
}

impl<T> std::fmt::Debug for BufferPool<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BufferPool")
            .field("config", &self.config)
            .field("stats", &self.stats())
            .finish()
    }
}

fn bucket_length(index: usize) -> usize {
    MIN_ARRAY_LENGTH << index
}

/// Pool counters, for tests and monitoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolStats {
    /// Arrays currently cached.
    pub pooled: usize,
    /// Rentals not yet handed back.
    pub outstanding: usize,
    /// Rentals served from a bucket.
    pub hits: usize,
    /// Rentals that allocated.
    pub misses: usize,
    /// Arrays accepted back into a bucket.
    pub returns: usize,
    /// Arrays dropped on return.
    pub drops: usize,
    /// Returns that arrived with no rental outstanding.
    pub strays: usize,
}

impl PoolStats {
    /// Fraction of rentals served without allocating (0.0 to 1.0).
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_pool() -> BufferPool<u8> {
        BufferPool::new(PoolConfig::new(256, 2).unwrap())
    }

    #[test]
    fn test_rent_rounds_up_to_bucket() {
        let pool = small_pool();
        assert_eq!(pool.rent(1).len(), 16);
        assert_eq!(pool.rent(16).len(), 16);
        assert_eq!(pool.rent(17).len(), 32);
        assert_eq!(pool.rent(200).len(), 256);
    }

    #[test]
    fn test_rent_oversized_is_exact() {
        let pool = small_pool();
        let array = pool.rent(300);
        assert_eq!(array.len(), 300);

        pool.give_back(array);
        assert_eq!(pool.pooled(), 0);
        assert_eq!(pool.stats().drops, 1);
        assert_eq!(pool.outstanding(), 0);
    }

    #[test]
    fn test_rent_zero() {
        let pool = small_pool();
        let array = pool.rent(0);
        assert!(array.is_empty());
        assert_eq!(pool.outstanding(), 1);

        pool.give_back(array);
        assert_eq!(pool.outstanding(), 0);
        assert_eq!(pool.stats().drops, 0);
    }

    #[test]
    fn test_reuse() {
        let pool = small_pool();

        let mut array = pool.rent(20);
        array[0] = 0xAB;
        pool.give_back(array);
        assert_eq!(pool.pooled(), 1);

        let array = pool.rent(30);
        assert_eq!(array.len(), 32);
        assert_eq!(array[0], 0xAB);

        let stats = pool.stats();
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.outstanding, 1);
    }

    #[test]
    fn test_bucket_full_drops() {
        let pool = small_pool();
        let arrays: Vec<_> = (0..3).map(|_| pool.rent(64)).collect();
        for array in arrays {
            pool.give_back(array);
        }

        let stats = pool.stats();
        assert_eq!(stats.pooled, 2);
        assert_eq!(stats.returns, 2);
        assert_eq!(stats.drops, 1);
        assert_eq!(stats.outstanding, 0);
    }

    #[test]
    fn test_unpooled_length_dropped() {
        let pool = small_pool();
        let mut array = pool.rent(10);
        array.truncate(12);
        pool.give_back(array);
        assert_eq!(pool.pooled(), 0);
        assert_eq!(pool.stats().drops, 1);
        assert_eq!(pool.outstanding(), 0);
    }

    #[test]
    fn test_stray_return_is_counted_not_pooled() {
        let pool = small_pool();
        pool.give_back(vec![0u8; 16]);

        let stats = pool.stats();
        assert_eq!(stats.outstanding, 0);
        assert_eq!(stats.strays, 1);
        assert_eq!(stats.pooled, 0);
        assert_eq!(stats.returns, 0);
    }

    #[test]
    fn test_double_return_shows_as_stray() {
        let pool = small_pool();
        let array = pool.rent(16);
        let copy = array.clone();
        pool.give_back(array);
        pool.give_back(copy);

        let stats = pool.stats();
        assert_eq!(stats.outstanding, 0);
        assert_eq!(stats.returns, 1);
        assert_eq!(stats.strays, 1);
        assert_eq!(stats.pooled, 1);
    }

    #[test]
    fn test_unvalidated_length_not_power_of_two() {
        // 48 rounds down to 32: buckets of 16 and 32
        let pool: BufferPool<u8> =
            BufferPool::new(PoolConfig::default().with_max_array_length(48));
        assert_eq!(pool.config().max_array_length(), 32);

        let array = pool.rent(20);
        assert_eq!(array.len(), 32);
        pool.give_back(array);
        assert_eq!(pool.pooled(), 1);

        // Above the rounded limit: served exactly, never pooled
        let array = pool.rent(40);
        assert_eq!(array.len(), 40);
        pool.give_back(array);
        assert_eq!(pool.pooled(), 1);
        assert_eq!(pool.outstanding(), 0);
    }

    #[test]
    fn test_unvalidated_length_too_small() {
        let pool: BufferPool<u8> = BufferPool::new(PoolConfig::default().with_max_array_length(8));
        assert_eq!(pool.config().max_array_length(), MIN_ARRAY_LENGTH);

        let array = pool.rent(10);
        assert_eq!(array.len(), 16);
        pool.give_back(array);

        let array = pool.rent(20);
        assert_eq!(array.len(), 20);
        pool.give_back(array);
        assert_eq!(pool.outstanding(), 0);
    }

    #[test]
    fn test_unvalidated_zero_buffers_per_bucket() {
        let pool: BufferPool<u8> =
            BufferPool::new(PoolConfig::default().with_max_buffers_per_bucket(0));
        assert_eq!(pool.config().max_buffers_per_bucket(), 1);

        let a = pool.rent(16);
        let b = pool.rent(16);
        pool.give_back(a);
        pool.give_back(b);
        assert_eq!(pool.pooled(), 1);
        assert_eq!(pool.stats().drops, 1);
    }

    #[test]
    fn test_unvalidated_config_decode_pooled() {
        use crate::codec::HexCodec;

        let pool = BufferPool::new(PoolConfig::default().with_max_array_length(48));
        let codec = HexCodec::new(&pool);

        let bytes = codec.decode_pooled("00".repeat(20)).unwrap();
        assert_eq!(&bytes[..], &[0u8; 20]);
        drop(bytes);

        let bytes = codec.decode_pooled("ab".repeat(40)).unwrap();
        assert_eq!(bytes.len(), 40);
        drop(bytes);
        assert_eq!(pool.outstanding(), 0);
    }

    #[test]
    fn test_try_new_rejects_invalid() {
        let config = PoolConfig::default().with_max_array_length(100);
        assert!(BufferPool::<u8>::try_new(config).is_err());
    }

    #[test]
    fn test_generic_element_type() {
        let pool: BufferPool<u32> = BufferPool::new(PoolConfig::new(64, 1).unwrap());
        let array = pool.rent(5);
        assert_eq!(array.len(), 16);
        assert!(array.iter().all(|&v| v == 0));
        pool.give_back(array);
        assert_eq!(pool.pooled(), 1);
    }

    #[test]
    fn test_hit_rate() {
        let pool = small_pool();
        assert_eq!(pool.stats().hit_rate(), 0.0);

        let array = pool.rent(16);
        pool.give_back(array);
        let array = pool.rent(16);
        pool.give_back(array);
        assert_eq!(pool.stats().hit_rate(), 0.5);
    }

    #[test]
    fn test_shared_pool_is_singleton() {
        assert!(std::ptr::eq(shared_pool(), shared_pool()));
    }

    #[test]
    fn test_concurrent_rent_and_return() {
        let pool = BufferPool::<u8>::default();

        std::thread::scope(|s| {
            for t in 0..4u8 {
                let pool = &pool;
                s.spawn(move || {
                    for i in 0..500usize {
                        let mut array = pool.rent(1 + (i % 300));
                        array[0] = t;
                        pool.give_back(array);
                    }
                });
            }
        });

        assert_eq!(pool.outstanding(), 0);
    }
}
