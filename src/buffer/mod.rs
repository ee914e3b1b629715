//! Buffer pooling.
//!
//! - [`BufferPool`] - Thread-safe, bucketed array pool
//! - [`PooledBuffer`] - One rental, handed back on drop
//! - [`shared_pool`] - Process-wide byte pool, created on first use

mod pool;
mod pooled;

pub use pool::{BufferPool, PoolStats, shared_pool};
pub use pooled::PooledBuffer;
