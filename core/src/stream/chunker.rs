//! stream/chunker.rs
//! Splits input into fixed-size, indexed chunks.
//!
//! Every chunk except possibly the last is exactly `chunk_size` bytes.
//! Chunk `i` covers `[i * chunk_size, min((i + 1) * chunk_size, len))`.

use std::io::{self, Read};
use std::time::{Duration, Instant};

use bytes::Bytes;

use crate::stream::io::read_exact_or_eof;
use crate::types::PipelineError;

/// One chunk of input, tagged with its position in splitting order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    pub index: u64,
    pub data: Bytes,
}

impl Chunk {
    pub fn new(index: u64, data: impl Into<Bytes>) -> Self {
        Self { index, data: data.into() }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

fn check_chunk_size(chunk_size: usize) -> Result<(), PipelineError> {
    if chunk_size == 0 {
        return Err(PipelineError::InvalidConfiguration("chunk_size must be greater than zero".into()));
    }
    Ok(())
}

/// Split a borrowed buffer. Copies `input` once; chunks share that copy.
pub fn split(input: &[u8], chunk_size: usize) -> Result<Vec<Chunk>, PipelineError> {
    check_chunk_size(chunk_size)?;
    split_bytes(Bytes::copy_from_slice(input), chunk_size)
}

/// Split an owned buffer without copying: each chunk is a slice of `input`.
pub fn split_bytes(input: Bytes, chunk_size: usize) -> Result<Vec<Chunk>, PipelineError> {
    check_chunk_size(chunk_size)?;

    let mut chunks = Vec::with_capacity(input.len().div_ceil(chunk_size));
    let mut start = 0usize;
    let mut index = 0u64;
    while start < input.len() {
        let end = (start + chunk_size).min(input.len());
        chunks.push(Chunk { index, data: input.slice(start..end) });
        start = end;
        index += 1;
    }
    Ok(chunks)
}

/// Lazy chunker over a byte source.
///
/// Yields the same sequence `split` would produce over the whole stream while
/// holding at most one chunk in memory. A read error ends iteration; the error
/// is returned by [`ChunkReader::finish`].
#[derive(Debug)]
pub struct ChunkReader<R: Read> {
    inner: R,
    chunk_size: usize,
    next_index: u64,
    bytes_read: u64,
    read_time: Duration,
    error: Option<io::Error>,
    done: bool,
}

impl<R: Read> ChunkReader<R> {
    pub fn new(inner: R, chunk_size: usize) -> Result<Self, PipelineError> {
        check_chunk_size(chunk_size)?;
        Ok(Self {
            inner,
            chunk_size,
            next_index: 0,
            bytes_read: 0,
            read_time: Duration::ZERO,
            error: None,
            done: false,
        })
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn chunks_read(&self) -> u64 {
        self.next_index
    }

    pub fn bytes_read(&self) -> u64 {
        self.bytes_read
    }

    /// Wall time spent blocked on the source.
    pub fn read_time(&self) -> Duration {
        self.read_time
    }

    /// Total bytes read, or the I/O error that stopped iteration.
    pub fn finish(self) -> Result<u64, PipelineError> {
        match self.error {
            Some(e) => Err(PipelineError::Io(e)),
            None => Ok(self.bytes_read),
        }
    }
}

impl<R: Read> Iterator for ChunkReader<R> {
    type Item = Chunk;

    fn next(&mut self) -> Option<Chunk> {
        if self.done {
            return None;
        }

        let start = Instant::now();
        let read = read_exact_or_eof(&mut self.inner, self.chunk_size);
        self.read_time += start.elapsed();

        match read {
            Ok(data) if data.is_empty() => {
                self.done = true;
                None
            }
            Ok(data) => {
                // A short chunk can only come from EOF.
                if data.len() < self.chunk_size {
                    self.done = true;
                }
                let chunk = Chunk { index: self.next_index, data };
                self.next_index += 1;
                self.bytes_read += chunk.data.len() as u64;
                tracing::trace!(index = chunk.index, len = chunk.data.len(), "chunk read");
                Some(chunk)
            }
            Err(e) => {
                tracing::warn!(error = %e, index = self.next_index, "input read failed");
                self.error = Some(e);
                self.done = true;
                None
            }
        }
    }
}
