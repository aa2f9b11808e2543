//! OS threads vs lightweight tasks, a non-blocking I/O burst, then the other demos

use crate::config::DemoConfig;
use crate::core::harness::{compare_pool_vs_tasks, io_burst};
use crate::demos::{database, server};
use crate::error::DemoError;
use crate::services::simulator::TaskSimulator;
use tokio_util::sync::CancellationToken;

pub async fn run(config: &DemoConfig) -> Result<(), DemoError> {
    let simulator = TaskSimulator::new(&config.simulator);
    let token = CancellationToken::new();

    println!("Lightweight task demo - non-blocking processing");
    println!("===================================");

    println!("\n1. OS thread pool vs lightweight tasks:");
    let report = compare_pool_vs_tasks(&config.threads).await?;
    println!("{}", config.report_format.render(&report)?);

    println!("\n2. Non-blocking I/O with lightweight tasks:");
    let report = io_burst(&simulator, &config.threads, &token).await;
    println!("{}", config.report_format.render(&report)?);
    println!("All I/O tasks finished!");

    println!("\n3. HTTP server on lightweight tasks:");
    server::run(config).await?;

    println!("\n4. Database workload on lightweight tasks:");
    database::run(config).await
}
