//! codecs/lz4.rs
//! LZ4 block compressor/decompressor (lz4_flex, pure Rust).
//!
//! Block mode has no levels. The decoded size is carried by the chunk
//! envelope, so the block itself is stored without a size prefix.
use lz4_flex::block::{compress, decompress};

use crate::compression::types::{CompressionError, Compressor, Decompressor};

/// Upper bound on decoded bytes per block byte. A length extension byte adds at
/// most 255 output bytes, so no valid block expands further than this.
const LZ4_MAX_EXPANSION: u64 = 256;

/// Slack for the token and trailing literals of very small blocks.
const LZ4_EXPANSION_SLACK: u64 = 64;

pub struct Lz4Compressor;

pub struct Lz4Decompressor;

impl Compressor for Lz4Compressor {
    fn compress_block(&self, input: &[u8]) -> Result<Vec<u8>, CompressionError> {
        Ok(compress(input))
    }
}

impl Decompressor for Lz4Decompressor {
    fn decompress_block(&self, input: &[u8], raw_len: usize) -> Result<Vec<u8>, CompressionError> {
        // The block decoder reserves raw_len in one go; refuse sizes the payload cannot produce.
        let max = (input.len() as u64).saturating_mul(LZ4_MAX_EXPANSION) + LZ4_EXPANSION_SLACK;
        if raw_len as u64 > max {
            return Err(CompressionError::ChunkTooLarge { have: raw_len as u64, max });
        }

        let out = decompress(input, raw_len)
            .map_err(|e| CompressionError::CodecProcessFailed { codec: "lz4", msg: e.to_string() })?;

        if out.len() != raw_len {
            return Err(CompressionError::LengthMismatch {
                codec: "lz4",
                expected: raw_len as u64,
                actual: out.len() as u64,
            });
        }
        Ok(out)
    }
}
