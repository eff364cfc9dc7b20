//! chunkpress-core
//!
//! Chunk-parallel compression engine.
//! Splits input into fixed-size chunks, runs a codec on each across a bounded
//! worker pool and reassembles the results, in order, into a self-describing
//! container. No CLI, no file discovery: callers hand in a reader and a writer.

#![forbid(unsafe_code)]

// Shared and top level
pub mod constants;
pub mod types;
pub mod utils;

// Codec and wire format
pub mod compression;
pub mod container;
pub mod telemetry;

// Stream layers
pub mod stream;

pub use stream::{compress, compress_bytes, compress_with, decompress, decompress_bytes, decompress_with};
pub use stream::PipelineConfig;
pub use types::{CorruptChunk, PipelineError};

// -----------------------------------------------------------------------------
// Prelude
// -----------------------------------------------------------------------------
pub mod prelude {
    pub use crate::compression::{ChunkCodec, CompressionCodec, CompressionError};
    pub use crate::container::{Container, ContainerError, ContainerHeader};
    pub use crate::stream::{
        compress, compress_bytes, compress_with, decompress, decompress_bytes, decompress_with,
        Chunk, ChunkReader, CodecResult, PipelineConfig, PoolStats, WorkerPool,
    };
    pub use crate::telemetry::{Stage, TelemetrySnapshot};
    pub use crate::types::{CorruptChunk, PipelineError};
}
