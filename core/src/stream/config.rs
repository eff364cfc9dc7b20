//! Pipeline configuration.
//!
//! Every field has a default, so a partial JSON document (or `{}`) is valid.

use serde::{Deserialize, Serialize};

use crate::compression::CompressionCodec;
use crate::constants::{DEFAULT_CHUNK_SIZE, FALLBACK_WORKERS};
use crate::types::PipelineError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Bytes per chunk when compressing. Ignored by decompression beyond validation.
    pub chunk_size: usize,
    /// Worker threads. Defaults to the number of logical CPUs.
    pub worker_count: usize,
    /// Codec used when compressing. Decompression reads it from the container.
    pub codec: CompressionCodec,
    /// Codec level. None = codec default.
    pub level: Option<i32>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            worker_count: default_worker_count(),
            codec: CompressionCodec::default(),
            level: None,
        }
    }
}

fn default_worker_count() -> usize {
    match num_cpus::get() {
        0 => FALLBACK_WORKERS,
        n => n,
    }
}

impl PipelineConfig {
    pub fn new(chunk_size: usize, worker_count: usize) -> Self {
        Self { chunk_size, worker_count, ..Default::default() }
    }

    pub fn with_codec(mut self, codec: CompressionCodec) -> Self {
        self.codec = codec;
        self
    }

    pub fn with_level(mut self, level: i32) -> Self {
        self.level = Some(level);
        self
    }

    pub fn from_json(s: &str) -> Result<Self, PipelineError> {
        serde_json::from_str(s)
            .map_err(|e| PipelineError::InvalidConfiguration(format!("config parse failed: {e}")))
    }

    pub fn to_json(&self) -> Result<String, PipelineError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| PipelineError::Internal(format!("config serialize failed: {e}")))
    }

    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.chunk_size == 0 {
            return Err(PipelineError::InvalidConfiguration("chunk_size must be greater than zero".into()));
        }
        if self.worker_count == 0 {
            return Err(PipelineError::InvalidConfiguration("worker_count must be greater than zero".into()));
        }
        Ok(())
    }
}
