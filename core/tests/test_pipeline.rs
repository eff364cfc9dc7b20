// End-to-end pipeline tests
//
// * round trip for every codec, chunk size and worker count
// * byte-identical containers regardless of worker count
// * corrupt chunks are named by index and nothing is written
// * malformed containers and bad configuration fail before any output

#[cfg(test)]
mod tests {
    use std::io::{self, Cursor, Read};

    use bytes::Bytes;
    use proptest::prelude::*;

    use chunkpress_core::compression::{CompressionCodec, CompressionError};
    use chunkpress_core::container::{
        decode_container, decode_header_le, encode_header_le, ContainerError, CONTAINER_HEADER_LEN,
    };
    use chunkpress_core::{
        compress, compress_bytes, decompress, decompress_bytes, PipelineConfig, PipelineError,
    };

    const ALL_CODECS: [CompressionCodec; 4] = [
        CompressionCodec::Stored,
        CompressionCodec::Zstd,
        CompressionCodec::Lz4,
        CompressionCodec::Deflate,
    ];

    // ------------------------------------------------------------
    // Helpers
    // ------------------------------------------------------------

    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("chunkpress_core=debug")
            .with_test_writer()
            .try_init();
    }

    /// Compressible but not trivially repetitive.
    fn sample(len: usize) -> Vec<u8> {
        let words: [&[u8]; 6] = [b"alpha ", b"bravo ", b"charlie ", b"delta ", b"echo ", b"foxtrot\n"];
        let mut state = 0x2545_F491u32;
        let mut out = Vec::with_capacity(len);
        while out.len() < len {
            state = state.wrapping_mul(1_103_515_245).wrapping_add(12_345);
            out.extend_from_slice(words[(state >> 16) as usize % words.len()]);
        }
        out.truncate(len);
        out
    }

    fn cfg(chunk_size: usize, workers: usize, codec: CompressionCodec) -> PipelineConfig {
        PipelineConfig::new(chunk_size, workers).with_codec(codec)
    }

    /// Byte range of block `k` inside an encoded container.
    fn block_range(wire: &[u8], k: usize) -> std::ops::Range<usize> {
        let c = decode_container(Bytes::copy_from_slice(wire)).unwrap();
        let start = CONTAINER_HEADER_LEN + 8 * c.index.len();
        let before: u64 = c.index[..k].iter().map(|d| d.compressed_length).sum();
        let s = start + before as usize;
        s..s + c.index[k].compressed_length as usize
    }

    struct FailingReader {
        served: usize,
        fail_at: usize,
    }

    impl Read for FailingReader {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.served >= self.fail_at {
                return Err(io::Error::new(io::ErrorKind::Other, "input went away"));
            }
            let n = buf.len().min(self.fail_at - self.served);
            buf[..n].fill(b'x');
            self.served += n;
            Ok(n)
        }
    }

    // ------------------------------------------------------------
    // Round trips
    // ------------------------------------------------------------

    #[test]
    fn round_trip_every_codec() {
        init_tracing();
        let data = sample(50_000);
        for codec in ALL_CODECS {
            let config = cfg(4096, 4, codec);
            let wire = compress_bytes(&data, &config).unwrap();
            assert_eq!(&wire[0..4], b"CHP1");
            assert_eq!(u16::from_le_bytes([wire[6], wire[7]]), codec.id());

            let back = decompress_bytes(&wire, &config).unwrap();
            assert_eq!(back, data, "codec {}", codec.name());
        }
    }

    #[test]
    fn reader_writer_entry_points_round_trip() {
        let data = sample(10_000);
        let mut wire = Vec::new();
        compress(Cursor::new(&data), &mut wire, 1000, 3).unwrap();

        let mut back = Vec::new();
        decompress(Cursor::new(&wire), &mut back, 1000, 3).unwrap();
        assert_eq!(back, data);
    }

    #[test]
    fn container_bytes_do_not_depend_on_worker_count() {
        let data = sample(30_000);
        for codec in ALL_CODECS {
            let baseline = compress_bytes(&data, &cfg(1024, 1, codec)).unwrap();
            for workers in [2usize, 3, 8] {
                let wire = compress_bytes(&data, &cfg(1024, workers, codec)).unwrap();
                assert_eq!(wire, baseline, "codec {} workers {}", codec.name(), workers);
            }
        }
    }

    #[test]
    fn empty_input_is_a_header_only_container() {
        for codec in ALL_CODECS {
            let config = cfg(64, 2, codec);
            let wire = compress_bytes(&[], &config).unwrap();
            assert_eq!(wire.len(), CONTAINER_HEADER_LEN);

            let h = decode_header_le(&wire).unwrap();
            assert_eq!(h.chunk_count, 0);
            assert_eq!(h.original_size, 0);
            assert!(decompress_bytes(&wire, &config).unwrap().is_empty());
        }
    }

    #[test]
    fn chunk_count_and_nominal_size_are_recorded() {
        let data = sample(10_001);
        let wire = compress_bytes(&data, &cfg(1000, 2, CompressionCodec::Lz4)).unwrap();
        let h = decode_header_le(&wire).unwrap();
        assert_eq!(h.chunk_count, 11);
        assert_eq!(h.nominal_chunk_size, 1000);
        assert_eq!(h.original_size, 10_001);
    }

    #[test]
    fn decompress_ignores_requested_chunk_size() {
        let data = sample(9_000);
        let wire = compress_bytes(&data, &cfg(700, 2, CompressionCodec::Zstd)).unwrap();
        let back = decompress_bytes(&wire, &cfg(123, 5, CompressionCodec::Stored)).unwrap();
        assert_eq!(back, data);
    }

    #[test]
    fn explicit_level_round_trips() {
        let data = sample(20_000);
        let config = cfg(4096, 2, CompressionCodec::Zstd).with_level(19);
        let wire = compress_bytes(&data, &config).unwrap();
        assert_eq!(decompress_bytes(&wire, &config).unwrap(), data);
    }

    // ------------------------------------------------------------
    // Corruption
    // ------------------------------------------------------------

    #[test]
    fn flipped_checksum_names_only_that_chunk() {
        init_tracing();
        let data = sample(8 * 512);
        let config = cfg(512, 4, CompressionCodec::Deflate);
        let wire = compress_bytes(&data, &config).unwrap();

        for k in [0usize, 3, 7] {
            let mut bad = wire.clone();
            let r = block_range(&bad, k);
            bad[r.end - 1] ^= 0xFF;

            let mut out = Vec::new();
            let err = decompress(Cursor::new(&bad), &mut out, 512, 4).unwrap_err();
            assert_eq!(err.failed_indices(), vec![k as u64]);
            assert!(out.is_empty(), "output written despite corrupt chunk {k}");

            match err {
                PipelineError::PartialDecompression { failures } => {
                    assert!(matches!(failures[0].reason, CompressionError::ChecksumMismatch { .. }));
                }
                other => panic!("expected PartialDecompression, got {:?}", other),
            }
        }
    }

    #[test]
    fn damaged_codec_stream_is_detected() {
        let data = sample(4 * 1024);
        let config = cfg(1024, 2, CompressionCodec::Deflate);
        let mut wire = compress_bytes(&data, &config).unwrap();

        // First payload byte of chunk 2 is the zlib header.
        let r = block_range(&wire, 2);
        wire[r.start + 8] ^= 0xFF;

        let err = decompress_bytes(&wire, &config).unwrap_err();
        assert_eq!(err.failed_indices(), vec![2]);
    }

    #[test]
    fn several_corrupt_chunks_are_all_reported() {
        let data = sample(6 * 256);
        let config = cfg(256, 3, CompressionCodec::Lz4);
        let mut wire = compress_bytes(&data, &config).unwrap();
        for k in [1usize, 4] {
            let r = block_range(&wire, k);
            wire[r.end - 2] ^= 0x55;
        }
        let err = decompress_bytes(&wire, &config).unwrap_err();
        assert_eq!(err.failed_indices(), vec![1, 4]);
    }

    #[test]
    fn forged_raw_length_is_rejected_as_too_large() {
        let data = sample(3 * 100);
        let config = cfg(100, 2, CompressionCodec::Stored);
        let mut wire = compress_bytes(&data, &config).unwrap();
        let r = block_range(&wire, 1);
        wire[r.start..r.start + 8].copy_from_slice(&(1u64 << 40).to_le_bytes());

        match decompress_bytes(&wire, &config).unwrap_err() {
            PipelineError::PartialDecompression { failures } => {
                assert_eq!(failures.len(), 1);
                assert_eq!(failures[0].index, 1);
                assert!(matches!(failures[0].reason, CompressionError::ChunkTooLarge { .. }));
            }
            other => panic!("expected PartialDecompression, got {:?}", other),
        }
    }

    #[test]
    fn forged_sizes_in_header_and_envelope_fail_without_aborting() {
        // Header and envelope both claim 2^46 bytes, with a freshly computed header CRC.
        let forged_len = 1u64 << 46;
        for codec in ALL_CODECS {
            let config = cfg(100, 2, codec);
            let mut wire = compress_bytes(&sample(100), &config).unwrap();

            let mut h = decode_header_le(&wire).unwrap();
            assert_eq!(h.chunk_count, 1);
            h.nominal_chunk_size = forged_len;
            h.original_size = forged_len;
            wire[..CONTAINER_HEADER_LEN].copy_from_slice(&encode_header_le(&h));

            let r = block_range(&wire, 0);
            wire[r.start..r.start + 8].copy_from_slice(&forged_len.to_le_bytes());

            let mut out = Vec::new();
            match decompress(Cursor::new(&wire), &mut out, 100, 2).unwrap_err() {
                PipelineError::PartialDecompression { failures } => {
                    assert_eq!(failures.len(), 1);
                    assert_eq!(failures[0].index, 0);
                    assert!(
                        matches!(
                            failures[0].reason,
                            CompressionError::ChunkTooLarge { .. } | CompressionError::LengthMismatch { .. }
                        ),
                        "codec {}: {:?}",
                        codec.name(),
                        failures[0].reason
                    );
                }
                other => panic!("codec {}: expected PartialDecompression, got {:?}", codec.name(), other),
            }
            assert!(out.is_empty());
        }
    }

    // ------------------------------------------------------------
    // Malformed input and configuration
    // ------------------------------------------------------------

    #[test]
    fn truncated_index_is_malformed_and_writes_nothing() {
        let data = sample(5_000);
        let wire = compress_bytes(&data, &cfg(1000, 2, CompressionCodec::Zstd)).unwrap();

        let mut out = Vec::new();
        let err = decompress(Cursor::new(&wire[..CONTAINER_HEADER_LEN + 12]), &mut out, 1000, 2).unwrap_err();
        assert!(err.is_malformed_container(), "got {:?}", err);
        assert!(matches!(
            err,
            PipelineError::MalformedContainer(ContainerError::IndexTruncated { have: 1, need: 5 })
        ));
        assert!(out.is_empty());
    }

    #[test]
    fn garbage_input_is_malformed() {
        let err = decompress_bytes(b"definitely not a container, just some words", &PipelineConfig::new(16, 1))
            .unwrap_err();
        assert!(err.is_malformed_container());
    }

    #[test]
    fn forged_original_size_is_caught_after_decoding() {
        let data = sample(10_000);
        let config = cfg(1024, 3, CompressionCodec::Deflate);
        let mut wire = compress_bytes(&data, &config).unwrap();

        // Still 10 chunks at 1024, so the header itself stays consistent.
        let mut h = decode_header_le(&wire).unwrap();
        h.original_size = 9_999;
        wire[..CONTAINER_HEADER_LEN].copy_from_slice(&encode_header_le(&h));

        let mut out = Vec::new();
        let err = decompress(Cursor::new(&wire), &mut out, 1024, 3).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::MalformedContainer(ContainerError::OriginalSizeMismatch { have: 10_000, expected: 9_999 })
        ));
        assert!(out.is_empty());
    }

    #[test]
    fn zero_parameters_are_invalid_configuration() {
        let mut out = Vec::new();
        assert!(compress(Cursor::new(b"abc"), &mut out, 0, 2).unwrap_err().is_invalid_configuration());
        assert!(compress(Cursor::new(b"abc"), &mut out, 16, 0).unwrap_err().is_invalid_configuration());
        assert!(out.is_empty());

        let wire = compress_bytes(b"abc", &PipelineConfig::new(16, 1)).unwrap();
        assert!(decompress(Cursor::new(&wire), &mut out, 0, 1).unwrap_err().is_invalid_configuration());
        assert!(decompress(Cursor::new(&wire), &mut out, 16, 0).unwrap_err().is_invalid_configuration());
        assert!(out.is_empty());
    }

    #[test]
    fn input_read_error_surfaces_and_writes_nothing() {
        let mut out = Vec::new();
        let err = compress(FailingReader { served: 0, fail_at: 5_000 }, &mut out, 1024, 2).unwrap_err();
        assert!(matches!(err, PipelineError::Io(_)), "got {:?}", err);
        assert!(out.is_empty());

        let err = decompress(FailingReader { served: 0, fail_at: 100 }, &mut out, 1024, 2).unwrap_err();
        assert!(matches!(err, PipelineError::Io(_)), "got {:?}", err);
        assert!(out.is_empty());
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn round_trip_any_input(data in proptest::collection::vec(any::<u8>(), 0..8192),
                                chunk_size in 1usize..2048,
                                workers in 1usize..5,
                                codec_idx in 0usize..4) {
            let config = cfg(chunk_size, workers, ALL_CODECS[codec_idx]);
            let wire = compress_bytes(&data, &config).unwrap();
            prop_assert_eq!(decompress_bytes(&wire, &config).unwrap(), data);
        }
    }
}
