//! compression/backend.rs
//! `ChunkCodec`: one codec bound to its compressor/decompressor pair plus
//! envelope handling. Shared by reference across every worker.

use std::fmt;

use crate::compression::envelope;
use crate::compression::registry::{create_compressor, create_decompressor};
use crate::compression::types::{CompressionCodec, CompressionError, Compressor, Decompressor};

pub struct ChunkCodec {
    codec: CompressionCodec,
    compressor: Box<dyn Compressor>,
    decompressor: Box<dyn Decompressor>,
    /// Upper bound on `raw_len` accepted when opening an envelope.
    max_chunk_len: u64,
}

impl fmt::Debug for ChunkCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChunkCodec")
            .field("codec", &self.codec)
            .field("max_chunk_len", &self.max_chunk_len)
            .finish()
    }
}

impl ChunkCodec {
    pub fn new(codec: CompressionCodec, level: Option<i32>) -> Result<Self, CompressionError> {
        Ok(Self {
            codec,
            compressor: create_compressor(codec.id(), level)?,
            decompressor: create_decompressor(codec.id())?,
            max_chunk_len: u64::MAX,
        })
    }

    /// Build from a raw codec id, as read from a container header.
    pub fn from_id(codec_id: u16) -> Result<Self, CompressionError> {
        Self::new(CompressionCodec::verify(codec_id)?, None)
    }

    pub fn with_max_chunk_len(mut self, max_chunk_len: u64) -> Self {
        self.max_chunk_len = max_chunk_len;
        self
    }

    pub fn codec(&self) -> CompressionCodec {
        self.codec
    }

    pub fn max_chunk_len(&self) -> u64 {
        self.max_chunk_len
    }

    /// Compress one raw chunk into a sealed envelope.
    pub fn compress(&self, raw: &[u8]) -> Result<Vec<u8>, CompressionError> {
        let payload = if raw.is_empty() {
            Vec::new()
        } else {
            self.compressor.compress_block(raw)?
        };
        Ok(envelope::seal(raw, &payload))
    }

    /// Open a sealed envelope and return the verified raw chunk.
    pub fn decompress(&self, wire: &[u8]) -> Result<Vec<u8>, CompressionError> {
        let view = envelope::open(wire)?;

        if view.raw_len > self.max_chunk_len {
            return Err(CompressionError::ChunkTooLarge { have: view.raw_len, max: self.max_chunk_len });
        }
        let raw_len = usize::try_from(view.raw_len)
            .map_err(|_| CompressionError::ChunkTooLarge { have: view.raw_len, max: usize::MAX as u64 })?;

        let decoded = if raw_len == 0 {
            if !view.payload.is_empty() {
                return Err(CompressionError::LengthMismatch {
                    codec: self.codec.name(),
                    expected: 0,
                    actual: view.payload.len() as u64,
                });
            }
            Vec::new()
        } else {
            self.decompressor.decompress_block(view.payload, raw_len)?
        };

        envelope::verify(&view, self.codec.name(), &decoded)?;
        Ok(decoded)
    }
}
