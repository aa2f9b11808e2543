//! Non-blocking Demo
//!
//! Three independent steps run one after another, then concurrently, each
//! followed by a step that needs all three results.

use dotenvy::dotenv;
use taskdemo::config::DemoConfig;
use taskdemo::demos::nonblocking;
use taskdemo::logging;
use tracing::error;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    logging::init_logging();

    let config = DemoConfig::from_env();
    if let Err(e) = nonblocking::run(&config).await {
        error!(error = %e, "Non-blocking demo failed");
        return Err(e.into());
    }
    Ok(())
}
