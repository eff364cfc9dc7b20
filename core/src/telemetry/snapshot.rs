//! src/telemetry/snapshot.rs
//!
//! Immutable summary of one pipeline run.

use std::time::Duration;
use serde::{Deserialize, Serialize};

use crate::telemetry::counters::TelemetryCounters;
use crate::telemetry::timers::{Stage, StageTimes, TelemetryTimer};

/// Captures counters, ratio, throughput, stage timings and pool figures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetrySnapshot {
    pub chunks: u64,
    pub chunks_failed: u64,
    pub bytes_in: u64,
    pub bytes_out: u64,
    pub bytes_overhead: u64,
    /// `bytes_out / bytes_in`; below 1.0 means the data shrank.
    pub compression_ratio: f64,
    pub throughput_bytes_per_sec: f64,
    pub elapsed: Duration,
    pub stage_times: StageTimes,
    pub worker_count: usize,
    pub peak_in_flight: usize,
}

impl TelemetrySnapshot {
    pub fn from(
        counters: &TelemetryCounters,
        timer: &TelemetryTimer,
        worker_count: usize,
        peak_in_flight: usize,
    ) -> Self {
        let elapsed = timer.elapsed();

        let compression_ratio = if counters.bytes_in > 0 {
            counters.bytes_out as f64 / counters.bytes_in as f64
        } else {
            0.0
        };

        let throughput = if elapsed.as_secs_f64() > 0.0 {
            counters.bytes_in as f64 / elapsed.as_secs_f64()
        } else {
            0.0
        };

        Self {
            chunks: counters.chunks,
            chunks_failed: counters.chunks_failed,
            bytes_in: counters.bytes_in,
            bytes_out: counters.bytes_out,
            bytes_overhead: counters.bytes_overhead,
            compression_ratio,
            throughput_bytes_per_sec: throughput,
            elapsed,
            stage_times: timer.stages.clone(),
            worker_count,
            peak_in_flight,
        }
    }

    pub fn total_stage_time(&self) -> Duration {
        self.stage_times.total()
    }

    pub fn has_all_stages(&self, expected: &[Stage]) -> bool {
        self.stage_times.has_all(expected)
    }

    /// Internal consistency: stage time fits inside elapsed, in-flight never exceeds the pool.
    pub fn sanity_check(&self) -> bool {
        self.total_stage_time() <= self.elapsed
            && self.peak_in_flight <= self.worker_count
            && self.chunks_failed <= self.chunks
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
