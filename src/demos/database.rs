//! Simulated database workload: query comparison, multi-table fan-out, batch processing

use crate::config::{DemoConfig, TableQueryConfig};
use crate::core::batch::{chunk_count, BatchProcessor};
use crate::core::combiner::fan_out_simulated;
use crate::core::harness::Harness;
use crate::error::DemoError;
use crate::models::CombinedResult;
use crate::services::simulator::TaskSimulator;
use tokio_util::sync::CancellationToken;

pub async fn run(config: &DemoConfig) -> Result<(), DemoError> {
    let simulator = TaskSimulator::new(&config.simulator);
    let token = CancellationToken::new();

    println!("\n=== Lightweight tasks with simulated database queries ===\n");

    println!("1. Sequential vs concurrent queries:");
    let harness = Harness::new(simulator.clone(), config.harness.clone());
    let report = harness.compare_queries(&token).await;
    println!("{}", config.report_format.render(&report)?);

    println!("\n2. Querying several tables at once:");
    let combined = query_tables(&simulator, &config.tables, &token).await?;
    println!("{}", config.report_format.render(&combined)?);
    println!("All queries finished in: {} ms", combined.elapsed_ms);
    println!("Slowest query took: {} ms", combined.slowest_ms());
    println!("Total if run sequentially: {} ms", combined.sequential_ms());
    println!(
        "Saved versus sequential: {} ms",
        combined.sequential_ms() as i64 - combined.elapsed_ms as i64
    );

    println!("\n3. Batch processing:");
    let records: Vec<String> = (0..config.batch.record_count)
        .map(|i| format!("Record {}", i))
        .collect();
    println!("Total records: {}", records.len());
    println!("Batch size: {}", config.batch.batch_size);
    println!(
        "Number of batches: {}",
        chunk_count(records.len(), config.batch.batch_size)?
    );
    let processor = BatchProcessor::new(simulator, config.batch.clone());
    let report = processor.process(&records, &token).await?;
    println!("{}", config.report_format.render(&report)?);

    Ok(())
}

/// Query every configured table at once.
pub async fn query_tables(
    simulator: &TaskSimulator,
    config: &TableQueryConfig,
    token: &CancellationToken,
) -> Result<CombinedResult, DemoError> {
    fan_out_simulated(simulator, &config.tables, config.failure_policy, token).await
}
