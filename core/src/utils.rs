use std::fmt;
use num_enum::TryFromPrimitive;

/// CRC-32 (IEEE) used by both the container header and chunk envelopes.
pub fn crc32(data: &[u8]) -> u32 {
    crc32fast::hash(data)
}

/// Variant name for a known discriminant, `0x..` otherwise.
pub fn enum_name_or_hex<T>(raw: T::Primitive) -> String
where
    T: TryFromPrimitive + fmt::Debug,
    T::Primitive: fmt::LowerHex,
{
    match T::try_from_primitive(raw) {
        Ok(variant) => format!("{:?}", variant),
        Err(_) => format!("0x{:x}", raw),
    }
}

/// Render a byte field as `b"..."` when printable, hex otherwise.
pub fn fmt_bytes(b: &[u8]) -> String {
    if b.iter().all(|&c| c.is_ascii_graphic() || c == b' ') {
        format!("b\"{}\"", String::from_utf8_lossy(b))
    } else {
        format!("0x{}", hex::encode(b))
    }
}

/// Number of chunks `len` bytes split into at `chunk_size`.
pub fn chunk_count_for(len: u64, chunk_size: u64) -> u64 {
    if chunk_size == 0 {
        return 0;
    }
    len.div_ceil(chunk_size)
}
