//! Lightweight Task Demo
//!
//! OS thread pool vs lightweight tasks, a burst of non-blocking I/O, then the
//! HTTP server and database demos in sequence.

use dotenvy::dotenv;
use taskdemo::config::{get_environment, DemoConfig};
use taskdemo::demos::threads;
use taskdemo::logging;
use tokio::signal;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    logging::init_logging();

    let config = DemoConfig::from_env();
    info!(environment = %get_environment(), "Starting lightweight task demo");

    tokio::select! {
        outcome = threads::run(&config) => {
            if let Err(e) = outcome {
                error!(error = %e, "Lightweight task demo failed");
                return Err(e.into());
            }
        }
        _ = signal::ctrl_c() => {
            info!("Interrupted, shutting down...");
        }
    }
    Ok(())
}
