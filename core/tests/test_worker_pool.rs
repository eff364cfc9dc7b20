// Worker pool tests
//
// * results always come back in index order, whatever the completion order
// * concurrency never exceeds worker_count
// * a failed codec call is recorded, the rest still run
// * panicking workers are reported, not propagated
// * lazy task sources

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;
    use std::time::Duration;

    use chunkpress_core::compression::CompressionError;
    use chunkpress_core::stream::chunker::Chunk;
    use chunkpress_core::stream::worker_pool::{InFlightGauge, WorkerPool};
    use chunkpress_core::types::PipelineError;

    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("chunkpress_core=debug")
            .with_test_writer()
            .try_init();
    }

    /// Chunk `i` carries `[i as u8; 4]` so the op can tell chunks apart.
    fn tagged_chunks(n: u64) -> Vec<Chunk> {
        (0..n).map(|i| Chunk::new(i, vec![i as u8; 4])).collect()
    }

    fn identity(data: &[u8]) -> Result<Vec<u8>, CompressionError> {
        Ok(data.to_vec())
    }

    #[test]
    fn zero_workers_is_invalid_configuration() {
        assert!(matches!(WorkerPool::new(0), Err(PipelineError::InvalidConfiguration(_))));
    }

    #[test]
    fn gauge_tracks_current_and_peak() {
        let gauge = InFlightGauge::default();
        {
            let _a = gauge.enter();
            let _b = gauge.enter();
            assert_eq!(gauge.current(), 2);
        }
        assert_eq!(gauge.current(), 0);

        let _c = gauge.enter();
        assert_eq!(gauge.current(), 1);
        assert_eq!(gauge.peak(), 2);
    }

    #[test]
    fn gauge_is_released_when_the_op_panics() {
        let gauge = InFlightGauge::default();
        let unwound = std::panic::catch_unwind(|| {
            let _guard = gauge.enter();
            panic!("codec exploded");
        });
        assert!(unwound.is_err());
        assert_eq!(gauge.current(), 0);
        assert_eq!(gauge.peak(), 1);
    }

    #[test]
    fn results_are_in_index_order_under_adversarial_completion() {
        init_tracing();
        let pool = WorkerPool::new(4).unwrap();

        // Early chunks sleep longest, so they finish last.
        let results = pool
            .run(tagged_chunks(16), |data| {
                let i = data[0] as u64;
                thread::sleep(Duration::from_millis(2 * (16 - i)));
                Ok(data.to_vec())
            })
            .unwrap();

        assert_eq!(results.len(), 16);
        for (i, r) in results.iter().enumerate() {
            assert_eq!(r.index, i as u64);
            assert_eq!(r.outcome.as_ref().unwrap(), &vec![i as u8; 4]);
        }
    }

    #[test]
    fn peak_in_flight_is_bounded_by_worker_count() {
        for workers in [1usize, 2, 3, 8] {
            let pool = WorkerPool::new(workers).unwrap();
            let (results, stats) = pool
                .run_with_stats(tagged_chunks(24), |data| {
                    thread::sleep(Duration::from_millis(3));
                    Ok(data.to_vec())
                })
                .unwrap();

            assert_eq!(results.len(), 24);
            assert_eq!(stats.dispatched, 24);
            assert_eq!(stats.worker_count, workers);
            assert!(stats.peak_in_flight >= 1);
            assert!(
                stats.peak_in_flight <= workers,
                "peak {} > workers {}",
                stats.peak_in_flight,
                workers
            );
        }
    }

    #[test]
    fn concurrency_observed_inside_op_never_exceeds_workers() {
        let current = AtomicUsize::new(0);
        let seen_max = AtomicUsize::new(0);
        let pool = WorkerPool::new(3).unwrap();

        pool.run(tagged_chunks(30), |data| {
            let now = current.fetch_add(1, Ordering::SeqCst) + 1;
            seen_max.fetch_max(now, Ordering::SeqCst);
            thread::sleep(Duration::from_millis(2));
            current.fetch_sub(1, Ordering::SeqCst);
            Ok(data.to_vec())
        })
        .unwrap();

        assert!(seen_max.load(Ordering::SeqCst) <= 3);
    }

    #[test]
    fn failures_are_recorded_and_other_chunks_still_run() {
        let pool = WorkerPool::new(2).unwrap();
        let calls = AtomicUsize::new(0);

        let results = pool
            .run(tagged_chunks(10), |data| {
                calls.fetch_add(1, Ordering::SeqCst);
                if data[0] == 3 || data[0] == 7 {
                    Err(CompressionError::CodecProcessFailed { codec: "test", msg: "boom".into() })
                } else {
                    Ok(data.to_vec())
                }
            })
            .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 10);
        let failed: Vec<u64> = results.iter().filter(|r| !r.is_ok()).map(|r| r.index).collect();
        assert_eq!(failed, vec![3, 7]);
    }

    #[test]
    fn empty_task_source_returns_nothing() {
        let pool = WorkerPool::new(4).unwrap();
        let (results, stats) = pool.run_with_stats(Vec::<Chunk>::new(), identity).unwrap();
        assert!(results.is_empty());
        assert_eq!(stats.dispatched, 0);
        assert_eq!(stats.peak_in_flight, 0);
    }

    #[test]
    fn lazy_sources_are_pulled_on_demand() {
        let pulled = AtomicUsize::new(0);
        let source = (0..50u64).map(|i| {
            pulled.fetch_add(1, Ordering::SeqCst);
            Chunk::new(i, vec![i as u8])
        });

        let results = WorkerPool::new(2).unwrap().run(source, identity).unwrap();
        assert_eq!(results.len(), 50);
        assert_eq!(pulled.load(Ordering::SeqCst), 50);
    }

    #[test]
    fn panicking_worker_is_reported() {
        init_tracing();
        for workers in [1usize, 3] {
            let pool = WorkerPool::new(workers).unwrap();
            let err = pool
                .run(tagged_chunks(8), |data| {
                    if data[0] == 5 {
                        panic!("codec exploded");
                    }
                    Ok(data.to_vec())
                })
                .unwrap_err();

            assert!(matches!(err, PipelineError::WorkerPanicked { count: 1 }), "got {:?}", err);
        }
    }

    #[test]
    fn same_input_gives_same_output_for_any_worker_count() {
        let chunks = tagged_chunks(40);
        let baseline = WorkerPool::new(1).unwrap().run(chunks.clone(), identity).unwrap();
        for workers in [2usize, 5, 16] {
            let got = WorkerPool::new(workers).unwrap().run(chunks.clone(), identity).unwrap();
            assert_eq!(got, baseline);
        }
    }
}
