//! telemetry/timers.rs
//!
//! Wall-clock accounting per pipeline stage. Stages are kept in a `BTreeMap`
//! so snapshots and logs list them in pipeline order.

use std::collections::BTreeMap;
use std::fmt;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

/// Pipeline stages, declared in the order a run visits them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Stage {
    Read,
    ContainerRead,
    Chunk,
    Dispatch,
    Reorder,
    ContainerWrite,
    Concatenate,
    Write,
}

impl Stage {
    /// Stages every successful compress run records.
    pub const COMPRESS: [Stage; 6] = [
        Stage::Read,
        Stage::Chunk,
        Stage::Dispatch,
        Stage::Reorder,
        Stage::ContainerWrite,
        Stage::Write,
    ];

    /// Stages every successful decompress run records.
    pub const DECOMPRESS: [Stage; 7] = [
        Stage::Read,
        Stage::ContainerRead,
        Stage::Chunk,
        Stage::Dispatch,
        Stage::Reorder,
        Stage::Concatenate,
        Stage::Write,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Stage::Read           => "read",
            Stage::ContainerRead  => "container_read",
            Stage::Chunk          => "chunk",
            Stage::Dispatch       => "dispatch",
            Stage::Reorder        => "reorder",
            Stage::ContainerWrite => "container_write",
            Stage::Concatenate    => "concatenate",
            Stage::Write          => "write",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Accumulated time per stage. A stage recorded with a zero duration still counts as present.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StageTimes {
    times: BTreeMap<Stage, Duration>,
}

impl StageTimes {
    pub fn record(&mut self, stage: Stage, dur: Duration) {
        *self.times.entry(stage).or_default() += dur;
    }

    pub fn get(&self, stage: Stage) -> Duration {
        self.times.get(&stage).copied().unwrap_or_default()
    }

    pub fn millis(&self, stage: Stage) -> f64 {
        self.get(stage).as_secs_f64() * 1e3
    }

    pub fn total(&self) -> Duration {
        self.times.values().sum()
    }

    pub fn has_all(&self, expected: &[Stage]) -> bool {
        expected.iter().all(|s| self.times.contains_key(s))
    }

    /// Stage that took longest, if any were recorded.
    pub fn slowest(&self) -> Option<(Stage, Duration)> {
        self.times.iter().max_by_key(|(_, d)| **d).map(|(s, d)| (*s, *d))
    }

    /// Stages in pipeline order.
    pub fn iter(&self) -> impl Iterator<Item = (Stage, Duration)> + '_ {
        self.times.iter().map(|(s, d)| (*s, *d))
    }
}

/// Run clock plus per-stage accumulation for one pipeline invocation.
#[derive(Clone, Debug)]
pub struct TelemetryTimer {
    started: Instant,
    finished: Option<Instant>,
    pub stages: StageTimes,
}

impl Default for TelemetryTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl TelemetryTimer {
    pub fn new() -> Self {
        Self { started: Instant::now(), finished: None, stages: StageTimes::default() }
    }

    /// Stop the run clock. Later calls move the end point.
    pub fn finish(&mut self) {
        self.finished = Some(Instant::now());
    }

    pub fn record(&mut self, stage: Stage, dur: Duration) {
        self.stages.record(stage, dur);
    }

    /// Run `f`, charging its wall time to `stage`.
    pub fn time<T>(&mut self, stage: Stage, f: impl FnOnce() -> T) -> T {
        let start = Instant::now();
        let out = f();
        self.stages.record(stage, start.elapsed());
        out
    }

    /// Time since `new`, up to `finish` if it was called.
    pub fn elapsed(&self) -> Duration {
        self.finished.unwrap_or_else(Instant::now).duration_since(self.started)
    }
}
