//! telemetry/counters.rs
//! Mutable counters used during a pipeline run.
//!
//! Summary: Collects chunk counts and byte counts during compress/decompress.
//! Converted into an immutable TelemetrySnapshot at pipeline end.
use std::ops::AddAssign;
use serde::{Deserialize, Serialize};

/// Counters collected during one run.
/// `bytes_in` is what the caller handed us, `bytes_out` what we wrote.
#[derive(Default, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelemetryCounters {
    pub chunks: u64,
    pub chunks_failed: u64,
    pub bytes_in: u64,
    pub bytes_out: u64,
    pub bytes_overhead: u64,
}

impl TelemetryCounters {
    /// Record the container header + index as overhead.
    pub fn add_overhead(&mut self, len: u64) {
        self.bytes_overhead += len;
    }

    /// Record one chunk processed by a worker.
    pub fn add_chunk(&mut self, ok: bool) {
        self.chunks += 1;
        if !ok {
            self.chunks_failed += 1;
        }
    }

    pub fn add_input(&mut self, len: usize) {
        self.bytes_in += len as u64;
    }

    pub fn add_output(&mut self, len: usize) {
        self.bytes_out += len as u64;
    }

    pub fn merge(&mut self, other: &TelemetryCounters) {
        self.chunks += other.chunks;
        self.chunks_failed += other.chunks_failed;
        self.bytes_in += other.bytes_in;
        self.bytes_out += other.bytes_out;
        self.bytes_overhead += other.bytes_overhead;
    }
}

impl AddAssign for TelemetryCounters {
    fn add_assign(&mut self, rhs: Self) {
        self.merge(&rhs);
    }
}
