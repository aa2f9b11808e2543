//! Database Demo
//!
//! Simulated queries run sequentially and then on one lightweight task each,
//! a five-table fan-out, and batch processing of 10,000 records.

use dotenvy::dotenv;
use taskdemo::config::{get_environment, DemoConfig};
use taskdemo::demos::database;
use taskdemo::logging;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    logging::init_logging();

    let config = DemoConfig::from_env();
    info!(environment = %get_environment(), "Starting database demo");

    if let Err(e) = database::run(&config).await {
        error!(error = %e, "Database demo failed");
        return Err(e.into());
    }
    Ok(())
}
