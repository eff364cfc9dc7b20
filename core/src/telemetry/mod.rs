//! telemetry/mod.rs
//! Counters, stage timers and immutable snapshots for pipeline runs.
//!
//! Notes:
//! - Counters are owned by the calling thread; workers never touch them.
//! - A snapshot is taken once per run and never mutated afterwards.

pub mod counters;
pub mod timers;
pub mod snapshot;

pub use counters::*;
pub use timers::*;
pub use snapshot::*;
