//! Batch partitioner: one task per fixed-size chunk, joined on a countdown barrier

use crate::config::BatchConfig;
use crate::core::barrier::{CountdownBarrier, CountdownGuard};
use crate::error::DemoError;
use crate::models::{BatchChunk, BatchReport, DelaySpec, Payload, SimulatedResult, TimingSample};
use crate::services::simulator::{worker_name, TaskSimulator};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Number of chunks `len` items split into at `batch_size` per chunk.
pub fn chunk_count(len: usize, batch_size: usize) -> Result<usize, DemoError> {
    if batch_size == 0 {
        return Err(DemoError::InvalidBatchSize);
    }
    Ok(len.div_ceil(batch_size))
}

/// Split `items` into contiguous, ordered chunks of at most `batch_size`.
pub fn partition<T: Clone>(items: &[T], batch_size: usize) -> Result<Vec<BatchChunk<T>>, DemoError> {
    chunk_count(items.len(), batch_size)?;
    Ok(items
        .chunks(batch_size)
        .enumerate()
        .map(|(index, chunk)| BatchChunk {
            index,
            offset: index * batch_size,
            items: chunk.to_vec(),
        })
        .collect())
}

pub struct BatchProcessor {
    simulator: TaskSimulator,
    config: BatchConfig,
}

impl BatchProcessor {
    pub fn new(simulator: TaskSimulator, config: BatchConfig) -> Self {
        Self { simulator, config }
    }

    pub fn config(&self) -> &BatchConfig {
        &self.config
    }

    /// Process `items` chunk by chunk, one task per chunk, and wait for all of them.
    pub async fn process<T>(
        &self,
        items: &[T],
        token: &CancellationToken,
    ) -> Result<BatchReport, DemoError>
    where
        T: Clone + Send + 'static,
    {
        let chunks = partition(items, self.config.batch_size)?;
        let chunk_total = chunks.len();
        let barrier = CountdownBarrier::new(chunk_total);

        info!(
            records = items.len(),
            batch_size = self.config.batch_size,
            batches = chunk_total,
            "Dispatching {} batches of up to {} records",
            chunk_total,
            self.config.batch_size
        );

        let start = Instant::now();
        let mut handles = Vec::with_capacity(chunk_total);
        for chunk in chunks {
            let guard = barrier.guard();
            let simulator = self.simulator.clone();
            let delay = self.config.processing_delay;
            let token = token.child_token();
            handles.push(tokio::spawn(process_chunk(
                simulator, chunk, delay, token, guard,
            )));
        }

        info!("All batches dispatched, waiting for completion");
        barrier.wait().await;
        let elapsed = TimingSample::since(start);

        let mut report = BatchReport::new(items.len(), self.config.batch_size, chunk_total, elapsed);
        // Every guard has dropped, so these joins return immediately.
        for handle in handles {
            match handle.await {
                Ok(result) if result.is_completed() => report.completed += 1,
                Ok(_) => report.interrupted += 1,
                Err(e) => {
                    warn!(error = %e, "Batch task failed");
                    report.failed += 1;
                }
            }
        }
        report.barrier_signals = barrier.signals();

        Ok(report)
    }
}

async fn process_chunk<T>(
    simulator: TaskSimulator,
    chunk: BatchChunk<T>,
    delay: DelaySpec,
    token: CancellationToken,
    _done: CountdownGuard,
) -> SimulatedResult {
    let size = chunk.len();
    let result = simulator
        .produce(format!("Batch {}", chunk.index), &delay, &token, |_| {
            Payload::Integer(size as i64)
        })
        .await;

    if result.is_completed() {
        info!(
            batch = chunk.index,
            records = size,
            delay_ms = result.delay_ms,
            "Batch {} ({} records) processed in {}ms on {}",
            chunk.index,
            size,
            result.delay_ms,
            worker_name()
        );
    } else {
        warn!(batch = chunk.index, "Batch {} interrupted", chunk.index);
    }
    result
}
