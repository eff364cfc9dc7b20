//! src/compression/codecs/zstd.rs
//!
//! Zstd block compressor/decompressor.
//!
//! Design notes:
//! - Compression uses the bulk API (`zstd::bulk`): every block is a standalone
//!   frame that decodes on its own, so blocks can be handled by any worker in any order.
//! - Decompression streams the frame through `take(raw_len + 1)`. `raw_len` comes
//!   from the input, so it only bounds how far we read, never how much we reserve.

use std::io::Read;

use crate::compression::types::{CompressionError, Compressor, Decompressor};
use crate::constants::PREALLOC_LIMIT;

pub struct ZstdCompressor {
    level: i32,
}

impl ZstdCompressor {
    pub fn new(level: i32) -> Self {
        let range = ::zstd::compression_level_range();
        let level = if range.contains(&level) { level } else { crate::compression::DEFAULT_LEVEL_ZSTD };
        Self { level }
    }
}

impl Compressor for ZstdCompressor {
    fn compress_block(&self, input: &[u8]) -> Result<Vec<u8>, CompressionError> {
        ::zstd::bulk::compress(input, self.level)
            .map_err(|e| CompressionError::CodecProcessFailed { codec: "zstd", msg: e.to_string() })
    }
}

pub struct ZstdDecompressor;

impl Decompressor for ZstdDecompressor {
    fn decompress_block(&self, input: &[u8], raw_len: usize) -> Result<Vec<u8>, CompressionError> {
        let map_err = |e: std::io::Error| CompressionError::CodecProcessFailed { codec: "zstd", msg: e.to_string() };

        let dec = ::zstd::stream::read::Decoder::with_buffer(input).map_err(map_err)?;
        let mut out = Vec::with_capacity(raw_len.min(PREALLOC_LIMIT));
        dec.take(raw_len as u64 + 1).read_to_end(&mut out).map_err(map_err)?;

        if out.len() != raw_len {
            return Err(CompressionError::LengthMismatch {
                codec: "zstd",
                expected: raw_len as u64,
                actual: out.len() as u64,
            });
        }
        Ok(out)
    }
}
