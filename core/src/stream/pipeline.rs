//! stream/pipeline.rs
//! Pure pipeline wiring: reader → chunks → worker pool → fan-in → assembler → writer.
//!
//! Compress:   Chunking → Dispatching → Reordering → ContainerWrite → Done
//! Decompress: ContainerRead → Dispatching → Reordering → Concatenating → Done
//!
//! Nothing reaches the writer until the whole result is known, so a failed run
//! leaves the sink untouched.

use std::io::{Read, Write};
use std::time::Instant;

use crate::compression::ChunkCodec;
use crate::container::{decode_container, write_container, ContainerError};
use crate::stream::assembler::{assemble_container, assemble_output, ContainerParams};
use crate::stream::chunker::{Chunk, ChunkReader};
use crate::stream::config::PipelineConfig;
use crate::stream::io::read_all;
use crate::stream::worker_pool::{CodecResult, WorkerPool};
use crate::telemetry::{Stage, TelemetryCounters, TelemetrySnapshot, TelemetryTimer};
use crate::types::PipelineError;

fn count_results(counters: &mut TelemetryCounters, results: &[CodecResult]) {
    for r in results {
        counters.add_chunk(r.is_ok());
    }
}

// ============================================================
// Compress pipeline
// ============================================================
pub fn run_compress_pipeline<R, W>(
    reader: R,
    mut writer: W,
    config: &PipelineConfig,
) -> Result<TelemetrySnapshot, PipelineError>
where
    R: Read + Send,
    W: Write,
{
    config.validate()?;
    let pool = WorkerPool::new(config.worker_count)?;
    let codec = ChunkCodec::new(config.codec, config.level)
        .map_err(|e| PipelineError::InvalidConfiguration(e.to_string()))?;

    let mut counters = TelemetryCounters::default();
    let mut timer = TelemetryTimer::new();

    tracing::debug!(
        codec = config.codec.name(),
        chunk_size = config.chunk_size,
        workers = config.worker_count,
        "compress: chunking"
    );
    let mut chunks = timer.time(Stage::Chunk, || ChunkReader::new(reader, config.chunk_size))?;

    // ---- Dispatching + Reordering ----
    tracing::debug!("compress: dispatching");
    let start = Instant::now();
    let (results, stats) = pool.run_with_stats(chunks.by_ref(), |raw| codec.compress(raw))?;
    let pool_time = start.elapsed();

    // Reads (dispatcher thread) and reordering (this thread) overlap; clamp so
    // the three stages partition the pool's wall time.
    let read_time = chunks.read_time().min(pool_time);
    let reorder_time = stats.reorder_time.min(pool_time - read_time);
    timer.record(Stage::Read, read_time);
    timer.record(Stage::Reorder, reorder_time);
    timer.record(Stage::Dispatch, pool_time - read_time - reorder_time);

    let original_size = chunks.finish()?;
    counters.bytes_in = original_size;
    count_results(&mut counters, &results);

    // ---- ContainerWrite ----
    tracing::debug!(chunks = results.len(), bytes_in = original_size, "compress: container write");
    let params = ContainerParams {
        codec: config.codec,
        nominal_chunk_size: config.chunk_size as u64,
        original_size,
    };
    let container = timer.time(Stage::ContainerWrite, || assemble_container(results, &params))?;
    counters.add_overhead(container.header.overhead_len());

    // ---- Write ----
    timer.time(Stage::Write, || -> std::io::Result<()> {
        write_container(&mut writer, &container)?;
        writer.flush()
    })?;
    counters.add_output(container.encoded_len());
    timer.finish();

    tracing::debug!(
        chunks = counters.chunks,
        bytes_in = counters.bytes_in,
        bytes_out = counters.bytes_out,
        workers = stats.worker_count,
        peak_in_flight = stats.peak_in_flight,
        slowest = ?timer.stages.slowest().map(|(stage, _)| stage),
        "compress: done"
    );
    Ok(TelemetrySnapshot::from(&counters, &timer, stats.worker_count, stats.peak_in_flight))
}

// ============================================================
// Decompress pipeline
// ============================================================
pub fn run_decompress_pipeline<R, W>(
    mut reader: R,
    mut writer: W,
    config: &PipelineConfig,
) -> Result<TelemetrySnapshot, PipelineError>
where
    R: Read,
    W: Write,
{
    config.validate()?;
    let pool = WorkerPool::new(config.worker_count)?;

    let mut counters = TelemetryCounters::default();
    let mut timer = TelemetryTimer::new();

    // ---- Read ----
    let buf = timer.time(Stage::Read, || read_all(&mut reader))?;
    counters.add_input(buf.len());

    // ---- ContainerRead ----
    tracing::debug!(bytes_in = buf.len(), "decompress: container read");
    let container = timer.time(Stage::ContainerRead, || decode_container(buf))?;
    let header = &container.header;
    counters.add_overhead(header.overhead_len());

    if config.chunk_size as u64 != header.nominal_chunk_size {
        tracing::warn!(
            requested = config.chunk_size,
            container = header.nominal_chunk_size,
            "chunk size differs from container; using container index"
        );
    }

    let codec = ChunkCodec::from_id(header.codec)
        .map_err(|_| ContainerError::UnknownCodec { raw: header.codec })?
        .with_max_chunk_len(header.nominal_chunk_size);

    let spans: Vec<Chunk> = timer.time(Stage::Chunk, || {
        container.spans().map(|(index, data)| Chunk { index, data }).collect()
    });

    // ---- Dispatching + Reordering ----
    tracing::debug!(
        chunks = spans.len(),
        codec = codec.codec().name(),
        workers = config.worker_count,
        "decompress: dispatching"
    );
    let start = Instant::now();
    let (results, stats) = pool.run_with_stats(spans, |wire| codec.decompress(wire))?;
    timer.record(Stage::Reorder, stats.reorder_time);
    timer.record(Stage::Dispatch, start.elapsed().saturating_sub(stats.reorder_time));
    count_results(&mut counters, &results);

    // ---- Concatenating ----
    tracing::debug!(chunks = results.len(), failed = counters.chunks_failed, "decompress: concatenating");
    let original_size = header.original_size;
    let output = timer.time(Stage::Concatenate, || assemble_output(results, original_size))?;

    // ---- Write ----
    timer.time(Stage::Write, || -> std::io::Result<()> {
        writer.write_all(&output)?;
        writer.flush()
    })?;
    counters.add_output(output.len());
    timer.finish();

    tracing::debug!(
        chunks = counters.chunks,
        bytes_in = counters.bytes_in,
        bytes_out = counters.bytes_out,
        workers = stats.worker_count,
        slowest = ?timer.stages.slowest().map(|(stage, _)| stage),
        "decompress: done"
    );
    Ok(TelemetrySnapshot::from(&counters, &timer, stats.worker_count, stats.peak_in_flight))
}
