//! Worker pool for per-chunk codec calls.
//!
//! Responsibilities:
//! - Bound concurrency to `worker_count` threads
//! - Apply one codec operation per chunk
//! - Return results in index order
//!
//! Non-responsibilities:
//! - Container format
//! - I/O

pub mod types;
pub mod worker;
pub mod pool;

pub use types::{CodecResult, InFlightGauge, PoolStats};
pub use pool::WorkerPool;
