//! compression/types.rs
//! Stable codec IDs, FFI-safe enum mapping and the codec traits.
use num_enum::TryFromPrimitive;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::compression::constants::codec_ids;
use crate::utils::enum_name_or_hex;

/// Compression codec identifiers, as recorded in the container header.
#[repr(u16)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, TryFromPrimitive, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompressionCodec {
    Stored  = codec_ids::STORED,
    Zstd    = codec_ids::ZSTD,
    Lz4     = codec_ids::LZ4,
    #[default]
    Deflate = codec_ids::DEFLATE,
}

impl CompressionCodec {
    pub fn verify(raw: u16) -> Result<Self, CompressionError> {
        Self::try_from_primitive(raw).map_err(|_| CompressionError::UnsupportedCodec { codec_id: raw })
    }

    pub fn id(self) -> u16 {
        self as u16
    }

    pub fn name(self) -> &'static str {
        match self {
            CompressionCodec::Stored  => "stored",
            CompressionCodec::Zstd    => "zstd",
            CompressionCodec::Lz4     => "lz4",
            CompressionCodec::Deflate => "deflate",
        }
    }
}

/// Codec-layer failure. Decompression failures are data faults;
/// compression failures are environment faults.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompressionError {
    #[error("unsupported compression codec: {}", codec_label(.codec_id))]
    UnsupportedCodec { codec_id: u16 },

    #[error("codec {codec} process failed: {msg}")]
    CodecProcessFailed { codec: &'static str, msg: String },

    #[error("chunk envelope truncated: {have} bytes, need at least {need}")]
    EnvelopeTruncated { have: usize, need: usize },

    #[error("chunk too large: {have} > {max}")]
    ChunkTooLarge { have: u64, max: u64 },

    #[error("codec {codec} decoded {actual} bytes, envelope declares {expected}")]
    LengthMismatch { codec: &'static str, expected: u64, actual: u64 },

    #[error("codec {codec} checksum mismatch: expected {expected:#010x}, got {actual:#010x}")]
    ChecksumMismatch { codec: &'static str, expected: u32, actual: u32 },
}

fn codec_label(raw: &u16) -> String {
    enum_name_or_hex::<CompressionCodec>(*raw)
}

/// Compresses one block of bytes. Implementations hold no mutable state,
/// so a single instance is shared by every worker.
pub trait Compressor: Send + Sync {
    fn compress_block(&self, input: &[u8]) -> Result<Vec<u8>, CompressionError>;
}

/// Decompresses one block produced by the matching `Compressor`.
/// `raw_len` is the exact decoded size declared by the chunk envelope.
pub trait Decompressor: Send + Sync {
    fn decompress_block(&self, input: &[u8], raw_len: usize) -> Result<Vec<u8>, CompressionError>;
}
