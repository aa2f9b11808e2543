//! Unit tests for the batch partitioner

use taskdemo::config::BatchConfig;
use taskdemo::core::batch::{chunk_count, partition, BatchProcessor};
use taskdemo::error::DemoError;
use taskdemo::models::DelaySpec;
use taskdemo::services::simulator::TaskSimulator;
use tokio_test::{assert_err, assert_ok};
use tokio_util::sync::CancellationToken;

fn records(count: usize) -> Vec<String> {
    (0..count).map(|i| format!("Record {}", i)).collect()
}

fn processor(batch_size: usize) -> BatchProcessor {
    BatchProcessor::new(
        TaskSimulator::default(),
        BatchConfig {
            record_count: 0,
            batch_size,
            processing_delay: DelaySpec::uniform(200, 400),
        },
    )
}

#[test]
fn test_partition_ten_thousand_by_one_thousand() {
    let items = records(10_000);
    let chunks = assert_ok!(partition(&items, 1000));
    assert_eq!(chunks.len(), 10);
    for (i, chunk) in chunks.iter().enumerate() {
        assert_eq!(chunk.index, i);
        assert_eq!(chunk.offset, i * 1000);
        assert_eq!(chunk.len(), 1000);
        assert_eq!(chunk.items[0], format!("Record {}", i * 1000));
    }
}

#[test]
fn test_partition_keeps_remainder_in_last_chunk() {
    let items: Vec<u32> = (0..10).collect();
    let chunks = assert_ok!(partition(&items, 3));
    let sizes: Vec<usize> = chunks.iter().map(|c| c.len()).collect();
    assert_eq!(sizes, vec![3, 3, 3, 1]);
}

#[test]
fn test_partition_covers_every_item_once_in_order() {
    for len in 0..60usize {
        let items: Vec<usize> = (0..len).collect();
        for batch_size in 1..13usize {
            let chunks = partition(&items, batch_size).expect("valid batch size");
            assert_eq!(chunks.len(), len.div_ceil(batch_size));
            assert_eq!(chunks.len(), chunk_count(len, batch_size).unwrap());
            assert!(chunks.iter().all(|c| !c.is_empty()));
            assert_eq!(chunks.iter().map(|c| c.len()).sum::<usize>(), len);

            let rejoined: Vec<usize> = chunks.into_iter().flat_map(|c| c.items).collect();
            assert_eq!(rejoined, items);
        }
    }
}

#[test]
fn test_empty_input_has_no_chunks() {
    let items: Vec<u8> = Vec::new();
    assert!(assert_ok!(partition(&items, 5)).is_empty());
}

#[test]
fn test_zero_batch_size_is_rejected() {
    let items = records(3);
    let err = assert_err!(partition(&items, 0));
    assert!(matches!(err, DemoError::InvalidBatchSize));
    assert!(chunk_count(3, 0).is_err());
}

#[tokio::test(start_paused = true)]
async fn test_process_ten_batches() {
    let items = records(10_000);
    let report = processor(1000)
        .process(&items, &CancellationToken::new())
        .await
        .expect("batch run");

    assert_eq!(report.total_items, 10_000);
    assert_eq!(report.chunks, 10);
    assert_eq!(report.completed, 10);
    assert_eq!(report.interrupted, 0);
    assert_eq!(report.barrier_signals, 10);
    assert!(report.elapsed_ms >= 200 && report.elapsed_ms <= 400);
    assert!(report.throughput_per_sec > 0.0);
}

#[tokio::test(start_paused = true)]
async fn test_cancelled_run_still_releases_barrier() {
    let items = records(25);
    let token = CancellationToken::new();
    token.cancel();

    let report = processor(10).process(&items, &token).await.expect("batch run");
    assert_eq!(report.chunks, 3);
    assert_eq!(report.completed, 0);
    assert_eq!(report.interrupted, 3);
    assert_eq!(report.barrier_signals, 3);
}

#[tokio::test(start_paused = true)]
async fn test_process_empty_input() {
    let items: Vec<String> = Vec::new();
    let report = processor(100)
        .process(&items, &CancellationToken::new())
        .await
        .expect("batch run");
    assert_eq!(report.chunks, 0);
    assert_eq!(report.barrier_signals, 0);
    assert_eq!(report.throughput_per_sec, 0.0);
}

#[tokio::test]
async fn test_process_rejects_zero_batch_size() {
    let items = records(5);
    let result = processor(0).process(&items, &CancellationToken::new()).await;
    assert!(matches!(result, Err(DemoError::InvalidBatchSize)));
}
