//! src/container/decode.rs
//!
//! Container decoding.
//!
//! Design notes:
//! - Header first, then the index, then blocks sliced by cumulative `compressed_length`.
//! - Magic and version are checked before the CRC so foreign files report as such.
//! - The whole buffer must be accounted for: no overrun, no trailing bytes.

use byteorder::{ByteOrder, LittleEndian};
use bytes::Bytes;

use crate::constants::INDEX_ENTRY_LEN;
use crate::container::types::{
    ChunkDescriptor, Container, ContainerError, ContainerHeader, HEADER_CRC_SPAN,
};
use crate::constants::{CONTAINER_V1, MAGIC_CHP1};
use crate::utils::crc32;

/// Deserialize and validate a 40-byte little-endian header.
pub fn decode_header_le(buf: &[u8]) -> Result<ContainerHeader, ContainerError> {
    if buf.len() < ContainerHeader::LEN {
        return Err(ContainerError::BufferTooShort { have: buf.len(), need: ContainerHeader::LEN });
    }

    let mut magic = [0u8; 4];
    magic.copy_from_slice(&buf[0..4]);
    let mut reserved = [0u8; 4];
    reserved.copy_from_slice(&buf[32..36]);

    let h = ContainerHeader {
        magic,                                                   // 0..4
        version: LittleEndian::read_u16(&buf[4..6]),             // 4..6
        codec: LittleEndian::read_u16(&buf[6..8]),               // 6..8
        chunk_count: LittleEndian::read_u64(&buf[8..16]),        // 8..16
        nominal_chunk_size: LittleEndian::read_u64(&buf[16..24]), // 16..24
        original_size: LittleEndian::read_u64(&buf[24..32]),     // 24..32
        reserved,                                                // 32..36
        crc32: LittleEndian::read_u32(&buf[36..40]),             // 36..40
    };

    if h.magic != MAGIC_CHP1 {
        return Err(ContainerError::InvalidMagic { have: h.magic, need: MAGIC_CHP1 });
    }
    if h.version != CONTAINER_V1 {
        return Err(ContainerError::UnsupportedVersion { have: h.version });
    }

    let computed = crc32(&buf[..HEADER_CRC_SPAN]);
    if h.crc32 != computed {
        return Err(ContainerError::InvalidCrc32 { have: h.crc32, need: computed });
    }

    h.validate()?;
    Ok(h)
}

/// Parse a full container. `blocks` in the result shares `buf`'s storage.
pub fn decode_container(buf: Bytes) -> Result<Container, ContainerError> {
    let header = decode_header_le(&buf)?;

    let body = &buf[ContainerHeader::LEN..];
    let available_entries = (body.len() / INDEX_ENTRY_LEN) as u64;
    if header.chunk_count > available_entries {
        return Err(ContainerError::IndexTruncated {
            have: available_entries as usize,
            need: header.chunk_count,
        });
    }

    let count = header.chunk_count as usize;
    let index_len = count * INDEX_ENTRY_LEN;
    let mut index = Vec::with_capacity(count);
    let mut claimed: u64 = 0;

    for (i, entry) in body[..index_len].chunks_exact(INDEX_ENTRY_LEN).enumerate() {
        let compressed_length = LittleEndian::read_u64(entry);
        claimed = claimed.checked_add(compressed_length).ok_or(ContainerError::BlocksOverrun {
            claimed: u64::MAX,
            available: body.len() - index_len,
        })?;
        index.push(ChunkDescriptor { index: i as u64, compressed_length });
    }

    let blocks_start = ContainerHeader::LEN + index_len;
    let available = buf.len() - blocks_start;
    if claimed > available as u64 {
        return Err(ContainerError::BlocksOverrun { claimed, available });
    }
    if claimed < available as u64 {
        return Err(ContainerError::TrailingBytes { extra: available - claimed as usize });
    }

    let blocks = buf.slice(blocks_start..);
    Ok(Container { header, index, blocks })
}
