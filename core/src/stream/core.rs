//! Public entry points.
//!
//! `compress`/`decompress` take the two run parameters directly;
//! the `_with` variants take a full [`PipelineConfig`] and return telemetry.

use std::io::{Read, Write};

use crate::stream::config::PipelineConfig;
use crate::stream::pipeline::{run_compress_pipeline, run_decompress_pipeline};
use crate::telemetry::TelemetrySnapshot;
use crate::types::PipelineError;

/// Compress `input` into a container written to `output`, using the default codec.
pub fn compress<R, W>(input: R, output: W, chunk_size: usize, worker_count: usize) -> Result<(), PipelineError>
where
    R: Read + Send,
    W: Write,
{
    compress_with(input, output, &PipelineConfig::new(chunk_size, worker_count)).map(|_| ())
}

/// Decompress a container from `input` into `output`.
///
/// `chunk_size` must be positive but is otherwise informational: chunk
/// boundaries come from the container's own index.
pub fn decompress<R, W>(input: R, output: W, chunk_size: usize, worker_count: usize) -> Result<(), PipelineError>
where
    R: Read,
    W: Write,
{
    decompress_with(input, output, &PipelineConfig::new(chunk_size, worker_count)).map(|_| ())
}

pub fn compress_with<R, W>(input: R, output: W, config: &PipelineConfig) -> Result<TelemetrySnapshot, PipelineError>
where
    R: Read + Send,
    W: Write,
{
    run_compress_pipeline(input, output, config)
}

/// The codec comes from the container header; `config.codec` and `config.level` are ignored.
pub fn decompress_with<R, W>(input: R, output: W, config: &PipelineConfig) -> Result<TelemetrySnapshot, PipelineError>
where
    R: Read,
    W: Write,
{
    run_decompress_pipeline(input, output, config)
}

pub fn compress_bytes(input: &[u8], config: &PipelineConfig) -> Result<Vec<u8>, PipelineError> {
    let mut out = Vec::new();
    compress_with(input, &mut out, config)?;
    Ok(out)
}

pub fn decompress_bytes(input: &[u8], config: &PipelineConfig) -> Result<Vec<u8>, PipelineError> {
    let mut out = Vec::new();
    decompress_with(input, &mut out, config)?;
    Ok(out)
}
