//! compression/registry.rs
//! Codec registry and factory functions.

use crate::compression::codecs::{deflate, lz4, stored, zstd};
use crate::compression::constants::{DEFAULT_LEVEL_DEFLATE, DEFAULT_LEVEL_LZ4, DEFAULT_LEVEL_ZSTD};
use crate::compression::types::{CompressionCodec, CompressionError, Compressor, Decompressor};

pub struct CodecInfo {
    pub name: &'static str,
    pub default_level: i32,
}

pub fn resolve(codec_id: u16) -> Result<CodecInfo, CompressionError> {
    let codec = CompressionCodec::verify(codec_id)?;
    let default_level = match codec {
        CompressionCodec::Stored  => 0,
        CompressionCodec::Zstd    => DEFAULT_LEVEL_ZSTD,
        CompressionCodec::Lz4     => DEFAULT_LEVEL_LZ4,
        CompressionCodec::Deflate => DEFAULT_LEVEL_DEFLATE,
    };
    Ok(CodecInfo { name: codec.name(), default_level })
}

pub fn create_compressor(codec_id: u16, level: Option<i32>)
    -> Result<Box<dyn Compressor>, CompressionError>
{
    let info = resolve(codec_id)?;
    let level = level.unwrap_or(info.default_level);
    match CompressionCodec::verify(codec_id)? {
        CompressionCodec::Stored  => Ok(Box::new(stored::StoredCompressor)),
        CompressionCodec::Zstd    => Ok(Box::new(zstd::ZstdCompressor::new(level))),
        CompressionCodec::Lz4     => Ok(Box::new(lz4::Lz4Compressor)),
        CompressionCodec::Deflate => Ok(Box::new(deflate::DeflateCompressor::new(level))),
    }
}

pub fn create_decompressor(codec_id: u16)
    -> Result<Box<dyn Decompressor>, CompressionError>
{
    match CompressionCodec::verify(codec_id)? {
        CompressionCodec::Stored  => Ok(Box::new(stored::StoredDecompressor)),
        CompressionCodec::Zstd    => Ok(Box::new(zstd::ZstdDecompressor)),
        CompressionCodec::Lz4     => Ok(Box::new(lz4::Lz4Decompressor)),
        CompressionCodec::Deflate => Ok(Box::new(deflate::DeflateDecompressor)),
    }
}
