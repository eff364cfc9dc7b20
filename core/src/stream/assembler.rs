//! stream/assembler.rs
//! Turns ordered codec results into either a container (compress) or the
//! original byte stream (decompress).

use bytes::Bytes;

use crate::compression::CompressionCodec;
use crate::container::{ChunkDescriptor, Container, ContainerError, ContainerHeader};
use crate::stream::worker_pool::CodecResult;
use crate::types::{CorruptChunk, PipelineError};
use crate::utils::chunk_count_for;

/// Header fields the assembler cannot derive from the results themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContainerParams {
    pub codec: CompressionCodec,
    pub nominal_chunk_size: u64,
    pub original_size: u64,
}

fn check_contiguous(results: &[CodecResult]) -> Result<(), PipelineError> {
    for (i, r) in results.iter().enumerate() {
        if r.index != i as u64 {
            return Err(PipelineError::Internal(format!(
                "result at position {i} carries index {}", r.index
            )));
        }
    }
    Ok(())
}

/// Build a container from ordered compression results.
/// The first failed result aborts with `CompressionFailure`.
pub fn assemble_container(results: Vec<CodecResult>, params: &ContainerParams) -> Result<Container, PipelineError> {
    check_contiguous(&results)?;

    let chunk_count = results.len() as u64;
    let expected = chunk_count_for(params.original_size, params.nominal_chunk_size);
    if chunk_count != expected {
        return Err(PipelineError::Internal(format!(
            "{chunk_count} chunk result(s) for {} bytes at chunk size {} (expected {expected})",
            params.original_size, params.nominal_chunk_size
        )));
    }

    let mut index = Vec::with_capacity(results.len());
    let mut payloads = Vec::with_capacity(results.len());
    let mut blocks_len = 0usize;

    for r in results {
        match r.outcome {
            Ok(sealed) => {
                index.push(ChunkDescriptor { index: r.index, compressed_length: sealed.len() as u64 });
                blocks_len += sealed.len();
                payloads.push(sealed);
            }
            Err(source) => {
                tracing::warn!(index = r.index, error = %source, "chunk compression failed");
                return Err(PipelineError::CompressionFailure { index: r.index, source });
            }
        }
    }

    let mut blocks = Vec::with_capacity(blocks_len);
    for p in &payloads {
        blocks.extend_from_slice(p);
    }

    let header = ContainerHeader::new(params.codec, chunk_count, params.nominal_chunk_size, params.original_size);
    Ok(Container { header, index, blocks: Bytes::from(blocks) })
}

/// Concatenate ordered decompression results.
///
/// Any failed chunk withholds all output: the error lists every failed index
/// with its reason. A total length different from `expected_len` means the
/// header lied about `original_size`.
pub fn assemble_output(results: Vec<CodecResult>, expected_len: u64) -> Result<Vec<u8>, PipelineError> {
    check_contiguous(&results)?;

    let failures: Vec<CorruptChunk> = results
        .iter()
        .filter_map(|r| match &r.outcome {
            Err(reason) => Some(CorruptChunk { index: r.index, reason: reason.clone() }),
            Ok(_) => None,
        })
        .collect();

    if !failures.is_empty() {
        for f in &failures {
            tracing::warn!(index = f.index, reason = %f.reason, "corrupt chunk");
        }
        return Err(PipelineError::PartialDecompression { failures });
    }

    let total: u64 = results
        .iter()
        .map(|r| r.outcome.as_ref().map_or(0, |p| p.len() as u64))
        .sum();
    if total != expected_len {
        return Err(ContainerError::OriginalSizeMismatch { have: total, expected: expected_len }.into());
    }

    let mut out = Vec::with_capacity(total as usize);
    for r in results {
        if let Ok(payload) = r.outcome {
            out.extend_from_slice(&payload);
        }
    }
    Ok(out)
}
