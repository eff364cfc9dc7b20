//! Deflate (zlib wrapper) via flate2.

use std::io::{Read, Write};
use flate2::{Compression, read::ZlibDecoder, write::ZlibEncoder};

use crate::constants::PREALLOC_LIMIT;
use crate::compression::types::{CompressionError, Compressor, Decompressor};

pub struct DeflateCompressor {
    level: Compression,
}

impl DeflateCompressor {
    pub fn new(level: i32) -> Self {
        let level = match level {
            0..=9 => Compression::new(level as u32),
            _ => Compression::default(),
        };
        Self { level }
    }
}

impl Compressor for DeflateCompressor {
    fn compress_block(&self, input: &[u8]) -> Result<Vec<u8>, CompressionError> {
        // Each block is its own zlib stream
        let mut enc = ZlibEncoder::new(Vec::with_capacity(input.len() / 2), self.level);
        enc.write_all(input)
            .map_err(|e| CompressionError::CodecProcessFailed { codec: "deflate", msg: e.to_string() })?;
        enc.finish()
            .map_err(|e| CompressionError::CodecProcessFailed { codec: "deflate", msg: e.to_string() })
    }
}

pub struct DeflateDecompressor;

impl Decompressor for DeflateDecompressor {
    fn decompress_block(&self, input: &[u8], raw_len: usize) -> Result<Vec<u8>, CompressionError> {
        // Read at most one byte past the declared size so an inflated bomb is caught
        // without decoding all of it.
        let mut dec = ZlibDecoder::new(input).take(raw_len as u64 + 1);
        let mut out = Vec::with_capacity(raw_len.min(PREALLOC_LIMIT));
        dec.read_to_end(&mut out)
            .map_err(|e| CompressionError::CodecProcessFailed { codec: "deflate", msg: e.to_string() })?;

        if out.len() != raw_len {
            return Err(CompressionError::LengthMismatch {
                codec: "deflate",
                expected: raw_len as u64,
                actual: out.len() as u64,
            });
        }
        Ok(out)
    }
}
