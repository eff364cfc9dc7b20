//! compression/envelope.rs
//! Per-chunk envelope framing.
//!
//! ```text
//! [ raw_len (8) ]  uncompressed length, u64 LE
//! [ payload     ]  codec output; empty when raw_len == 0
//! [ crc32   (4) ]  CRC-32 of the uncompressed bytes, u32 LE
//! ```

use byteorder::{ByteOrder, LittleEndian};

use crate::compression::types::CompressionError;
use crate::constants::{ENVELOPE_OVERHEAD, ENVELOPE_PREFIX_LEN, ENVELOPE_SUFFIX_LEN};
use crate::utils::crc32;

/// Envelope fields borrowed from a sealed chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnvelopeView<'a> {
    pub raw_len: u64,
    pub payload: &'a [u8],
    pub crc32: u32,
}

/// Wrap a codec payload with the raw length and checksum of `raw`.
pub fn seal(raw: &[u8], payload: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(ENVELOPE_OVERHEAD + payload.len());

    let mut prefix = [0u8; ENVELOPE_PREFIX_LEN];
    LittleEndian::write_u64(&mut prefix, raw.len() as u64);
    out.extend_from_slice(&prefix);

    out.extend_from_slice(payload);

    let mut suffix = [0u8; ENVELOPE_SUFFIX_LEN];
    LittleEndian::write_u32(&mut suffix, crc32(raw));
    out.extend_from_slice(&suffix);

    out
}

/// Split a sealed chunk into its fields without decoding the payload.
pub fn open(wire: &[u8]) -> Result<EnvelopeView<'_>, CompressionError> {
    if wire.len() < ENVELOPE_OVERHEAD {
        return Err(CompressionError::EnvelopeTruncated { have: wire.len(), need: ENVELOPE_OVERHEAD });
    }

    let raw_len = LittleEndian::read_u64(&wire[..ENVELOPE_PREFIX_LEN]);
    let body_end = wire.len() - ENVELOPE_SUFFIX_LEN;
    let crc32 = LittleEndian::read_u32(&wire[body_end..]);

    Ok(EnvelopeView { raw_len, payload: &wire[ENVELOPE_PREFIX_LEN..body_end], crc32 })
}

/// Check decoded bytes against the envelope's declared length and checksum.
pub fn verify(view: &EnvelopeView<'_>, codec: &'static str, decoded: &[u8]) -> Result<(), CompressionError> {
    if decoded.len() as u64 != view.raw_len {
        return Err(CompressionError::LengthMismatch {
            codec,
            expected: view.raw_len,
            actual: decoded.len() as u64,
        });
    }

    let actual = crc32(decoded);
    if actual != view.crc32 {
        return Err(CompressionError::ChecksumMismatch { codec, expected: view.crc32, actual });
    }
    Ok(())
}
