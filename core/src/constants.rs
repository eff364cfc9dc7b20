/// Magic number for the container format.
/// "CHP1" = chunkpress container v1
pub const MAGIC_CHP1: [u8; 4] = *b"CHP1";
pub const CONTAINER_V1: u16 = 1;

/// Defaults when a config field is left out.
/// 1 MiB matches the chunk size the folder tools have always used.
pub const DEFAULT_CHUNK_SIZE: usize = 1024 * 1024;

/// Per-chunk envelope: raw length prefix + CRC32 suffix.
pub const ENVELOPE_PREFIX_LEN: usize = 8;
pub const ENVELOPE_SUFFIX_LEN: usize = 4;
pub const ENVELOPE_OVERHEAD: usize = ENVELOPE_PREFIX_LEN + ENVELOPE_SUFFIX_LEN;

/// Size of one index entry (compressed_length: u64).
pub const INDEX_ENTRY_LEN: usize = 8;

/// Worker count used when the host reports zero CPUs.
pub const FALLBACK_WORKERS: usize = 1;

/// Capacity of the result channel per worker.
/// Results are small once compressed; a few per worker keeps workers from stalling on fan-in.
pub const RESULT_QUEUE_PER_WORKER: usize = 2;

/// Largest buffer reserved up front for a single read or decoded chunk.
/// Sizes taken from input (chunk_size, envelope raw_len) grow past this only as data arrives.
pub const PREALLOC_LIMIT: usize = 8 * 1024 * 1024;
