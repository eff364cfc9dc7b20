use std::{fmt, io};

use thiserror::Error;

use crate::{compression::CompressionError, container::ContainerError};

/// A chunk that failed to decompress, tagged with its position.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("chunk {index} corrupt: {reason}")]
pub struct CorruptChunk {
    pub index: u64,
    pub reason: CompressionError,
}

/// Unified pipeline error.
/// - `From<T>` impls let `?` carry container and I/O errors upward.
/// - Messages are stable enough to log and match on in tests.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// chunk_size or worker_count was zero (or otherwise unusable).
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Container bytes failed structural validation.
    #[error("malformed container: {0}")]
    MalformedContainer(#[from] ContainerError),

    /// One or more chunks failed to decompress. No output was written.
    #[error("partial decompression: {} corrupt chunk(s) at {}", .failures.len(), FailedIndices(.failures))]
    PartialDecompression { failures: Vec<CorruptChunk> },

    /// A codec failed while compressing chunk `index`.
    #[error("compression failed at chunk {index}: {source}")]
    CompressionFailure {
        index: u64,
        #[source]
        source: CompressionError,
    },

    /// One or more worker threads panicked.
    #[error("{count} worker thread(s) panicked")]
    WorkerPanicked { count: usize },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Broken internal invariant (ordering, channel teardown).
    #[error("internal error: {0}")]
    Internal(String),
}

impl PipelineError {
    /// Indices of failed chunks, if this is a `PartialDecompression`.
    pub fn failed_indices(&self) -> Vec<u64> {
        match self {
            PipelineError::PartialDecompression { failures } => failures.iter().map(|f| f.index).collect(),
            PipelineError::CompressionFailure { index, .. } => vec![*index],
            _ => Vec::new(),
        }
    }

    pub fn is_invalid_configuration(&self) -> bool {
        matches!(self, PipelineError::InvalidConfiguration(_))
    }

    pub fn is_malformed_container(&self) -> bool {
        matches!(self, PipelineError::MalformedContainer(_))
    }
}

struct FailedIndices<'a>(&'a [CorruptChunk]);

impl fmt::Display for FailedIndices<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, c) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", c.index)?;
        }
        write!(f, "]")
    }
}
