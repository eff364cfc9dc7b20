//! src/container/encode.rs
//!
//! Container encoding.
//!
//! Design notes:
//! - Header is written field by field into a fixed 40-byte buffer, little-endian.
//! - The header CRC is computed here; callers never fill `crc32` themselves.
//! - Serialization is total: a `Container` built by the assembler always encodes.

use std::io::Write;

use byteorder::{ByteOrder, LittleEndian, WriteBytesExt};

use crate::constants::INDEX_ENTRY_LEN;

use crate::container::types::{Container, ContainerHeader, CONTAINER_HEADER_LEN, HEADER_CRC_SPAN};
use crate::utils::crc32;

/// Serialize a header into its 40-byte wire form, CRC included.
#[inline]
pub fn encode_header_le(h: &ContainerHeader) -> [u8; CONTAINER_HEADER_LEN] {
    let mut out = [0u8; CONTAINER_HEADER_LEN];
    let mut i = 0usize;

    fn put_u16(out: &mut [u8], i: &mut usize, v: u16) {
        out[*i..*i + 2].copy_from_slice(&v.to_le_bytes());
        *i += 2;
    }
    fn put_u64(out: &mut [u8], i: &mut usize, v: u64) {
        out[*i..*i + 8].copy_from_slice(&v.to_le_bytes());
        *i += 8;
    }
    fn put_bytes(out: &mut [u8], i: &mut usize, b: &[u8]) {
        out[*i..*i + b.len()].copy_from_slice(b);
        *i += b.len();
    }

    put_bytes(&mut out, &mut i, &h.magic);           // 0..4   magic
    put_u16(&mut out, &mut i, h.version);            // 4..6   version
    put_u16(&mut out, &mut i, h.codec);              // 6..8   codec id
    put_u64(&mut out, &mut i, h.chunk_count);        // 8..16  chunk count
    put_u64(&mut out, &mut i, h.nominal_chunk_size); // 16..24 nominal chunk size
    put_u64(&mut out, &mut i, h.original_size);      // 24..32 original size
    put_bytes(&mut out, &mut i, &h.reserved);        // 32..36 reserved

    debug_assert_eq!(i, HEADER_CRC_SPAN);
    let crc = crc32(&out[..HEADER_CRC_SPAN]);
    out[HEADER_CRC_SPAN..].copy_from_slice(&crc.to_le_bytes()); // 36..40 crc32

    out
}

/// Write header, index and blocks to `w`.
pub fn write_container<W: Write>(w: &mut W, c: &Container) -> std::io::Result<()> {
    w.write_all(&encode_header_le(&c.header))?;
    for d in &c.index {
        w.write_u64::<LittleEndian>(d.compressed_length)?;
    }
    w.write_all(&c.blocks)?;
    Ok(())
}

/// Serialize a whole container into one buffer.
pub fn encode_container(c: &Container) -> Vec<u8> {
    let mut out = Vec::with_capacity(c.encoded_len());
    out.extend_from_slice(&encode_header_le(&c.header));

    let mut entry = [0u8; INDEX_ENTRY_LEN];
    for d in &c.index {
        LittleEndian::write_u64(&mut entry, d.compressed_length);
        out.extend_from_slice(&entry);
    }
    out.extend_from_slice(&c.blocks);
    out
}
