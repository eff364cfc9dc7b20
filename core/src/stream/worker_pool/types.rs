use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::compression::CompressionError;

/// Outcome of one codec call, tagged with the chunk it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodecResult {
    pub index: u64,
    pub outcome: Result<Vec<u8>, CompressionError>,
}

impl CodecResult {
    pub fn ok(index: u64, payload: Vec<u8>) -> Self {
        Self { index, outcome: Ok(payload) }
    }

    pub fn failed(index: u64, reason: CompressionError) -> Self {
        Self { index, outcome: Err(reason) }
    }

    pub fn is_ok(&self) -> bool {
        self.outcome.is_ok()
    }
}

/// Figures from one pool run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolStats {
    /// Chunks handed to workers.
    pub dispatched: u64,
    /// Highest number of chunks inside a codec call at the same time.
    pub peak_in_flight: usize,
    pub worker_count: usize,
    /// Time the calling thread spent putting results back in order.
    pub reorder_time: Duration,
}

/// Tracks how many codec calls are running right now and the highest count seen.
#[derive(Debug, Default)]
pub struct InFlightGauge {
    current: AtomicUsize,
    peak: AtomicUsize,
}

impl InFlightGauge {
    pub fn enter(&self) -> InFlightGuard<'_> {
        let now = self.current.fetch_add(1, Ordering::AcqRel) + 1;
        self.peak.fetch_max(now, Ordering::AcqRel);
        InFlightGuard { gauge: self }
    }

    pub fn current(&self) -> usize {
        self.current.load(Ordering::Acquire)
    }

    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::Acquire)
    }
}

/// Decrements the gauge when dropped, including during a panic unwind.
pub struct InFlightGuard<'a> {
    gauge: &'a InFlightGauge,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.gauge.current.fetch_sub(1, Ordering::AcqRel);
    }
}
