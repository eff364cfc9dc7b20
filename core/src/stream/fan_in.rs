//! stream/fan_in.rs
//! Reorder buffer: turns results arriving in completion order back into index order.

use std::collections::BTreeMap;

use crate::stream::worker_pool::CodecResult;
use crate::types::PipelineError;

#[derive(Debug, Default)]
pub struct ReorderBuffer {
    next: u64,
    pending: BTreeMap<u64, CodecResult>,
    peak_pending: usize,
}

impl ReorderBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index of the next result to be released.
    pub fn next_index(&self) -> u64 {
        self.next
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Most results held back at once during this buffer's life.
    pub fn peak_pending(&self) -> usize {
        self.peak_pending
    }

    /// Accept one result; return every result that is now contiguous from `next`.
    pub fn push(&mut self, result: CodecResult) -> Result<Vec<CodecResult>, PipelineError> {
        let index = result.index;
        if index < self.next {
            return Err(PipelineError::Internal(format!("chunk {index} already released")));
        }
        if self.pending.contains_key(&index) {
            return Err(PipelineError::Internal(format!("duplicate result for chunk {index}")));
        }

        self.pending.insert(index, result);
        self.peak_pending = self.peak_pending.max(self.pending.len());

        let mut ready = Vec::new();
        while let Some(r) = self.pending.remove(&self.next) {
            ready.push(r);
            self.next += 1;
        }
        Ok(ready)
    }

    /// Confirm that exactly `expected` results were released.
    pub fn finish(&self, expected: u64) -> Result<(), PipelineError> {
        if let Some((&first_held, _)) = self.pending.iter().next() {
            return Err(PipelineError::Internal(format!(
                "missing chunk {} ({} later result(s) held, first {first_held})",
                self.next,
                self.pending.len()
            )));
        }
        if self.next != expected {
            return Err(PipelineError::Internal(format!(
                "released {} chunk(s), expected {expected}",
                self.next
            )));
        }
        Ok(())
    }
}
