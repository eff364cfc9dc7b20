//! codecs/stored.rs
//! Pass-through codec.

use crate::compression::types::{CompressionError, Compressor, Decompressor};

pub struct StoredCompressor;
pub struct StoredDecompressor;

impl Compressor for StoredCompressor {
    fn compress_block(&self, input: &[u8]) -> Result<Vec<u8>, CompressionError> {
        Ok(input.to_vec())
    }
}

impl Decompressor for StoredDecompressor {
    fn decompress_block(&self, input: &[u8], raw_len: usize) -> Result<Vec<u8>, CompressionError> {
        if input.len() != raw_len {
            return Err(CompressionError::LengthMismatch {
                codec: "stored",
                expected: raw_len as u64,
                actual: input.len() as u64,
            });
        }
        Ok(input.to_vec())
    }
}
