//! stream: chunk-parallel compression and decompression.
//!
//! This module exposes the stable public API. Internals are layered:
//! chunker → worker pool (+ fan-in) → assembler, wired by `pipeline`.

pub mod assembler;
pub mod chunker;
pub mod config;
pub mod core;
pub mod fan_in;
pub mod io;
pub mod pipeline;
pub mod worker_pool;

pub use self::assembler::{assemble_container, assemble_output, ContainerParams};
pub use self::chunker::{split, split_bytes, Chunk, ChunkReader};
pub use self::config::PipelineConfig;
pub use self::core::{compress, compress_bytes, compress_with, decompress, decompress_bytes, decompress_with};
pub use self::fan_in::ReorderBuffer;
pub use self::worker_pool::{CodecResult, PoolStats, WorkerPool};
