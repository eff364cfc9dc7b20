//! stream/io.rs
//! Reader helpers shared by the chunker and the decompress path.

use std::io::Read;

use bytes::Bytes;

use crate::constants::PREALLOC_LIMIT;

/// Read up to `len` bytes, stopping early only at EOF.
///
/// Tolerates short reads from the source: keeps reading until `len` bytes
/// arrived or the source reports EOF. An empty result means EOF.
pub fn read_exact_or_eof<R: Read>(r: &mut R, len: usize) -> std::io::Result<Bytes> {
    let mut buf = Vec::with_capacity(len.min(PREALLOC_LIMIT));
    r.by_ref().take(len as u64).read_to_end(&mut buf)?;
    Ok(Bytes::from(buf))
}

/// Read a whole source into memory.
pub fn read_all<R: Read>(r: &mut R) -> std::io::Result<Bytes> {
    let mut buf = Vec::new();
    r.read_to_end(&mut buf)?;
    Ok(Bytes::from(buf))
}
