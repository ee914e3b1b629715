//! Scoped pool rental.

use std::fmt;
use std::ops::{Deref, DerefMut};

use bytes::Bytes;

use super::BufferPool;

/// An array rented from a [`BufferPool`], handed back when dropped.
///
/// Only the first [`len`](Self::len) elements are in use; the rented array
/// may be longer ([`capacity`](Self::capacity)). Dropping the wrapper, or
/// calling [`release`](Self::release), returns the whole array to its pool.
/// Both consume the wrapper, so a rental cannot be returned twice or used
/// after it went back.
///
/// # Example
///
/// ```
/// use hexpool::{BufferPool, PooledBuffer};
///
/// let pool = BufferPool::<u8>::default();
/// {
///     let mut buf = PooledBuffer::acquire(&pool, 3);
///     buf.copy_from_slice(b"abc");
///     assert_eq!(&buf[..], b"abc");
///     assert_eq!(pool.outstanding(), 1);
/// }
/// assert_eq!(pool.outstanding(), 0);
/// ```
pub struct PooledBuffer<'p, T: Copy + Default> {
    pool: &'p BufferPool<T>,
    array: Option<Vec<T>>,
    len: usize,
}

impl<'p, T: Copy + Default> PooledBuffer<'p, T> {
    /// Rents at least `len` elements from `pool`.
    pub fn acquire(pool: &'p BufferPool<T>, len: usize) -> Self {
        Self {
            pool,
            array: Some(pool.rent(len)),
            len,
        }
    }

    /// Shrinks the used length. Larger values are clamped to the current length.
    pub fn truncate(&mut self, len: usize) {
        self.len = self.len.min(len);
    }

    /// Number of elements in use.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if no element is in use.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Length of the underlying rented array.
    pub fn capacity(&self) -> usize {
        self.array.as_ref().map_or(0, Vec::len)
    }

    /// The used elements.
    pub fn as_slice(&self) -> &[T] {
        match &self.array {
            Some(array) => &array[..self.len],
            None => &[],
        }
    }

    /// The used elements, mutably.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        match &mut self.array {
            Some(array) => &mut array[..self.len],
            None => &mut [],
        }
    }

    /// Returns the rental to its pool now.
    pub fn release(self) {
        drop(self);
    }

    /// Detaches the array from the pool, truncated to the used length.
    ///
    /// The pool stops counting it as outstanding and never sees it again.
    pub fn into_vec(mut self) -> Vec<T> {
        let mut array = self.array.take().unwrap_or_default();
        array.truncate(self.len);
        self.pool.forget();
        array
    }
}

impl PooledBuffer<'_, u8> {
    /// The used bytes as text.
    ///
    /// Buffers produced by the encoders are always ASCII.
    pub fn as_str(&self) -> Result<&str, std::str::Utf8Error> {
        std::str::from_utf8(self.as_slice())
    }

    /// Copies the used bytes into a [`Bytes`] that outlives the rental.
    pub fn to_bytes(&self) -> Bytes {
        Bytes::copy_from_slice(self.as_slice())
    }
}

impl<T: Copy + Default> Deref for PooledBuffer<'_, T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T: Copy + Default> DerefMut for PooledBuffer<'_, T> {
    fn deref_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T: Copy + Default> AsRef<[T]> for PooledBuffer<'_, T> {
    fn as_ref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T: Copy + Default + fmt::Debug> fmt::Debug for PooledBuffer<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PooledBuffer")
            .field("data", &self.as_slice())
            .field("capacity", &self.capacity())
            .finish()
    }
}

impl<T: Copy + Default> Drop for PooledBuffer<'_, T> {
    fn drop(&mut self) {
        if let Some(array) = self.array.take() {
            self.pool.give_back(array);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PoolConfig;

    fn small_pool() -> BufferPool<u8> {
        BufferPool::new(PoolConfig::new(1024, 4).unwrap())
    }

    #[test]
    fn test_acquire_tracks_used_length() {
        let pool = small_pool();
        let buf = PooledBuffer::acquire(&pool, 10);
        assert_eq!(buf.len(), 10);
        assert_eq!(buf.capacity(), 16);
        assert_eq!(buf.as_slice().len(), 10);
    }

    #[test]
    fn test_drop_returns_to_pool() {
        let pool = small_pool();
        {
            let _buf = PooledBuffer::acquire(&pool, 100);
            assert_eq!(pool.outstanding(), 1);
            assert_eq!(pool.pooled(), 0);
        }
        assert_eq!(pool.outstanding(), 0);
        assert_eq!(pool.pooled(), 1);
    }

    #[test]
    fn test_release() {
        let pool = small_pool();
        let buf = PooledBuffer::acquire(&pool, 100);
        buf.release();
        assert_eq!(pool.outstanding(), 0);
        assert_eq!(pool.stats().returns, 1);
    }

    #[test]
    fn test_release_on_early_return() {
        fn fill(pool: &BufferPool<u8>, fail: bool) -> Result<PooledBuffer<'_, u8>, ()> {
            let mut buf = PooledBuffer::acquire(pool, 8);
            if fail {
                return Err(());
            }
            buf.fill(1);
            Ok(buf)
        }

        let pool = small_pool();
        assert!(fill(&pool, true).is_err());
        assert_eq!(pool.outstanding(), 0);

        let buf = fill(&pool, false).unwrap();
        assert_eq!(pool.outstanding(), 1);
        drop(buf);
        assert_eq!(pool.outstanding(), 0);
    }

    #[test]
    fn test_into_vec_detaches() {
        let pool = small_pool();
        let mut buf = PooledBuffer::acquire(&pool, 3);
        buf.copy_from_slice(&[1, 2, 3]);

        let v = buf.into_vec();
        assert_eq!(v, vec![1, 2, 3]);
        assert_eq!(pool.outstanding(), 0);
        assert_eq!(pool.pooled(), 0);
    }

    #[test]
    fn test_truncate() {
        let pool = small_pool();
        let mut buf = PooledBuffer::acquire(&pool, 8);
        buf.truncate(4);
        assert_eq!(buf.len(), 4);
        buf.truncate(100);
        assert_eq!(buf.len(), 4);
    }

    #[test]
    fn test_as_str_and_to_bytes() {
        let pool = small_pool();
        let mut buf = PooledBuffer::acquire(&pool, 4);
        buf.copy_from_slice(b"4afe");

        assert_eq!(buf.as_str().unwrap(), "4afe");
        let bytes = buf.to_bytes();
        drop(buf);
        assert_eq!(&bytes[..], b"4afe");
    }
}
