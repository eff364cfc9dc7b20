use crossbeam::channel::{Receiver, Sender};

use crate::compression::CompressionError;
use crate::stream::chunker::Chunk;
use crate::stream::worker_pool::types::{CodecResult, InFlightGauge};

/// Single worker loop.
///
/// Takes one chunk at a time, runs the codec call to completion and sends the
/// tagged result. Exits when the task channel closes or the result side hangs up.
pub fn run_worker<F>(
    id: usize,
    rx: Receiver<Chunk>,
    tx: Sender<CodecResult>,
    op: &F,
    gauge: &InFlightGauge,
) where
    F: Fn(&[u8]) -> Result<Vec<u8>, CompressionError> + Sync,
{
    tracing::trace!(worker = id, "worker started");
    let mut handled = 0u64;

    while let Ok(chunk) = rx.recv() {
        let outcome = {
            let _in_flight = gauge.enter();
            op(&chunk.data)
        };

        match &outcome {
            Ok(out) => tracing::trace!(worker = id, index = chunk.index, len_in = chunk.data.len(), len_out = out.len(), "chunk done"),
            Err(e) => tracing::trace!(worker = id, index = chunk.index, error = %e, "chunk failed"),
        }

        handled += 1;
        if tx.send(CodecResult { index: chunk.index, outcome }).is_err() {
            tracing::debug!(worker = id, "result channel closed, worker exiting");
            break;
        }
    }

    tracing::trace!(worker = id, handled, "worker finished");
}
