//! container/types.rs
//! Container header, chunk index and the parsed container.
//!
//! Notes:
//! - Little-endian for every multi-byte integer.
//! - Header is 40 bytes, fixed length, CRC-protected over its first 36 bytes.
//! - Reserved bytes allow future fields without changing size; always zero them.

use std::fmt;

use bytes::Bytes;

use crate::compression::CompressionCodec;
use crate::constants::{CONTAINER_V1, MAGIC_CHP1};
use crate::utils::{chunk_count_for, enum_name_or_hex, fmt_bytes};

/// Fixed header size in bytes.
pub const CONTAINER_HEADER_LEN: usize = 40;

/// Bytes covered by the header CRC.
pub const HEADER_CRC_SPAN: usize = 36;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerHeader {
    pub magic: [u8; 4],          // "CHP1"
    pub version: u16,            // format version
    pub codec: u16,              // compression codec id
    pub chunk_count: u64,        // number of index entries and blocks
    pub nominal_chunk_size: u64, // chunk size used when splitting
    pub original_size: u64,      // total uncompressed bytes
    pub reserved: [u8; 4],       // must be zero
    pub crc32: u32,              // CRC-32 of bytes 0..36, filled on encode
}

impl ContainerHeader {
    pub const LEN: usize = CONTAINER_HEADER_LEN;

    pub fn new(codec: CompressionCodec, chunk_count: u64, nominal_chunk_size: u64, original_size: u64) -> Self {
        Self {
            magic: MAGIC_CHP1,
            version: CONTAINER_V1,
            codec: codec.id(),
            chunk_count,
            nominal_chunk_size,
            original_size,
            reserved: [0u8; 4],
            crc32: 0,
        }
    }

    pub fn validate(&self) -> Result<(), ContainerError> {
        if self.magic != MAGIC_CHP1 {
            return Err(ContainerError::InvalidMagic { have: self.magic, need: MAGIC_CHP1 });
        }

        if self.version != CONTAINER_V1 {
            return Err(ContainerError::UnsupportedVersion { have: self.version });
        }

        if CompressionCodec::verify(self.codec).is_err() {
            return Err(ContainerError::UnknownCodec { raw: self.codec });
        }

        if self.reserved.iter().any(|&b| b != 0) {
            return Err(ContainerError::ReservedBytesNonZero { reserved: self.reserved });
        }

        if self.nominal_chunk_size == 0 {
            return Err(ContainerError::ZeroChunkSize);
        }

        let expected = chunk_count_for(self.original_size, self.nominal_chunk_size);
        if self.chunk_count != expected {
            return Err(ContainerError::InconsistentChunkCount { have: self.chunk_count, expected });
        }

        Ok(())
    }

    /// Codec recorded in the header. Only valid after `validate()`.
    pub fn codec(&self) -> Result<CompressionCodec, ContainerError> {
        CompressionCodec::verify(self.codec).map_err(|_| ContainerError::UnknownCodec { raw: self.codec })
    }

    /// Bytes taken by header + index.
    pub fn overhead_len(&self) -> u64 {
        Self::LEN as u64 + self.chunk_count.saturating_mul(crate::constants::INDEX_ENTRY_LEN as u64)
    }
}

/// One index entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkDescriptor {
    pub index: u64,
    pub compressed_length: u64,
}

/// A fully built or fully parsed container.
/// `blocks` is the concatenation of every sealed chunk in index order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Container {
    pub header: ContainerHeader,
    pub index: Vec<ChunkDescriptor>,
    pub blocks: Bytes,
}

impl Container {
    /// Slice `blocks` into per-chunk spans using the index.
    /// Offsets come only from `compressed_length`; `nominal_chunk_size` is never used.
    pub fn spans(&self) -> impl Iterator<Item = (u64, Bytes)> + '_ {
        let mut offset = 0usize;
        self.index.iter().map(move |d| {
            let start = offset;
            offset += d.compressed_length as usize;
            (d.index, self.blocks.slice(start..offset))
        })
    }

    pub fn encoded_len(&self) -> usize {
        self.header.overhead_len() as usize + self.blocks.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContainerError {
    /// Buffer too short to contain the header.
    BufferTooShort { have: usize, need: usize },

    /// Invalid magic marker (expected "CHP1").
    InvalidMagic { have: [u8; 4], need: [u8; 4] },

    /// Version this build cannot read.
    UnsupportedVersion { have: u16 },

    /// Header CRC does not match its contents.
    InvalidCrc32 { have: u32, need: u32 },

    /// Unknown compression codec id.
    UnknownCodec { raw: u16 },

    /// Reserved bytes must be zero.
    ReservedBytesNonZero { reserved: [u8; 4] },

    /// nominal_chunk_size of zero.
    ZeroChunkSize,

    /// chunk_count disagrees with original_size / nominal_chunk_size.
    InconsistentChunkCount { have: u64, expected: u64 },

    /// Fewer index entries than chunk_count.
    IndexTruncated { have: usize, need: u64 },

    /// Index claims more block bytes than the buffer holds.
    BlocksOverrun { claimed: u64, available: usize },

    /// Bytes left after the last block.
    TrailingBytes { extra: usize },

    /// Decoded chunks do not add up to original_size.
    OriginalSizeMismatch { have: u64, expected: u64 },
}

impl fmt::Display for ContainerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use ContainerError::*;
        match self {
            BufferTooShort { have, need } =>
                write!(f, "container buffer too short: {} < {}", have, need),
            InvalidMagic { have, need } =>
                write!(f, "invalid magic: expected {}, got {}", fmt_bytes(need), fmt_bytes(have)),
            UnsupportedVersion { have } =>
                write!(f, "unsupported container version: {}", have),
            InvalidCrc32 { have, need } =>
                write!(f, "header crc32 mismatch: stored {:#010x}, computed {:#010x}", have, need),
            UnknownCodec { raw } =>
                write!(f, "unknown compression codec: {}", enum_name_or_hex::<CompressionCodec>(*raw)),
            ReservedBytesNonZero { reserved } =>
                write!(f, "reserved bytes not zero: {}", fmt_bytes(reserved)),
            ZeroChunkSize =>
                write!(f, "nominal chunk size is zero"),
            InconsistentChunkCount { have, expected } =>
                write!(f, "chunk count {} inconsistent with original size (expected {})", have, expected),
            IndexTruncated { have, need } =>
                write!(f, "chunk index truncated: {} entries present, {} declared", have, need),
            BlocksOverrun { claimed, available } =>
                write!(f, "index claims {} block bytes, only {} available", claimed, available),
            TrailingBytes { extra } =>
                write!(f, "{} trailing bytes after last block", extra),
            OriginalSizeMismatch { have, expected } =>
                write!(f, "decoded {} bytes, header declares {}", have, expected),
        }
    }
}

impl std::error::Error for ContainerError {}
