//! stream/worker_pool/pool.rs
//!
//! Bounded pool of scoped worker threads.
//!
//! Layout of one run:
//! - a dispatcher thread pulls chunks from the task source and hands each to a
//!   free worker over a zero-capacity channel, so a chunk only leaves the source
//!   when some worker is ready to take it;
//! - `worker_count` workers run the codec call, one chunk at a time;
//! - the calling thread drains the result channel into a reorder buffer.

use std::thread;
use std::time::{Duration, Instant};

use crossbeam::channel::bounded;

use crate::compression::CompressionError;
use crate::constants::RESULT_QUEUE_PER_WORKER;
use crate::stream::chunker::Chunk;
use crate::stream::fan_in::ReorderBuffer;
use crate::stream::worker_pool::types::{CodecResult, InFlightGauge, PoolStats};
use crate::stream::worker_pool::worker::run_worker;
use crate::types::PipelineError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerPool {
    worker_count: usize,
}

impl WorkerPool {
    pub fn new(worker_count: usize) -> Result<Self, PipelineError> {
        if worker_count == 0 {
            return Err(PipelineError::InvalidConfiguration("worker_count must be greater than zero".into()));
        }
        Ok(Self { worker_count })
    }

    pub fn worker_count(&self) -> usize {
        self.worker_count
    }

    /// Apply `op` to every chunk; results come back in index order.
    pub fn run<I, F>(&self, tasks: I, op: F) -> Result<Vec<CodecResult>, PipelineError>
    where
        I: IntoIterator<Item = Chunk>,
        I::IntoIter: Send,
        F: Fn(&[u8]) -> Result<Vec<u8>, CompressionError> + Sync,
    {
        self.run_with_stats(tasks, op).map(|(results, _)| results)
    }

    /// Like [`WorkerPool::run`], also returning dispatch figures.
    pub fn run_with_stats<I, F>(&self, tasks: I, op: F) -> Result<(Vec<CodecResult>, PoolStats), PipelineError>
    where
        I: IntoIterator<Item = Chunk>,
        I::IntoIter: Send,
        F: Fn(&[u8]) -> Result<Vec<u8>, CompressionError> + Sync,
    {
        let tasks = tasks.into_iter();
        let workers = self.worker_count;

        let (task_tx, task_rx) = bounded::<Chunk>(0);
        let (result_tx, result_rx) = bounded::<CodecResult>(workers * RESULT_QUEUE_PER_WORKER);

        let gauge = InFlightGauge::default();
        let mut reorder = ReorderBuffer::new();
        let mut ordered = Vec::new();
        let mut reorder_time = Duration::ZERO;

        tracing::debug!(workers, "pool run started");

        let (dispatched, panicked, order_err) = thread::scope(|scope| {
            // ---- Dispatcher ----
            let dispatcher = scope.spawn(move || {
                let mut dispatched = 0u64;
                for chunk in tasks {
                    let index = chunk.index;
                    if task_tx.send(chunk).is_err() {
                        tracing::warn!(index, "no workers left, stopping dispatch");
                        break;
                    }
                    dispatched += 1;
                }
                dispatched
            });

            // ---- Workers ----
            let mut handles = Vec::with_capacity(workers);
            for id in 0..workers {
                let rx = task_rx.clone();
                let tx = result_tx.clone();
                let op = &op;
                let gauge = &gauge;
                handles.push(scope.spawn(move || run_worker(id, rx, tx, op, gauge)));
            }
            drop(task_rx);
            drop(result_tx);

            // ---- Fan-in ----
            let mut order_err = None;
            for result in result_rx.iter() {
                if order_err.is_some() {
                    // Keep draining so no worker blocks on a full channel.
                    continue;
                }
                let start = Instant::now();
                match reorder.push(result) {
                    Ok(ready) => ordered.extend(ready),
                    Err(e) => order_err = Some(e),
                }
                reorder_time += start.elapsed();
            }

            let mut panicked = handles.into_iter().map(|h| h.join()).filter(Result::is_err).count();
            let dispatched = match dispatcher.join() {
                Ok(n) => n,
                Err(_) => {
                    panicked += 1;
                    0
                }
            };
            (dispatched, panicked, order_err)
        });

        if panicked > 0 {
            tracing::warn!(panicked, "worker thread(s) panicked, discarding results");
            return Err(PipelineError::WorkerPanicked { count: panicked });
        }
        if let Some(e) = order_err {
            return Err(e);
        }
        reorder.finish(dispatched)?;

        let stats = PoolStats { dispatched, peak_in_flight: gauge.peak(), worker_count: workers, reorder_time };
        tracing::debug!(
            dispatched,
            peak_in_flight = stats.peak_in_flight,
            peak_reorder = reorder.peak_pending(),
            "pool run finished"
        );
        Ok((ordered, stats))
    }
}
