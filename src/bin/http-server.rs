//! HTTP Server Demo
//!
//! Serves /api/fast, /api/slow and /api/parallel with one lightweight task per
//! request, then shuts down after the configured lifetime (30s by default).

use dotenvy::dotenv;
use taskdemo::config::{get_environment, DemoConfig};
use taskdemo::demos::server;
use taskdemo::logging;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env if present
    dotenv().ok();
    logging::init_logging();

    let config = DemoConfig::from_env();
    info!(environment = %get_environment(), "Starting HTTP server demo");
    info!(
        port = config.listener.port,
        lifetime_secs = config.listener.lifetime.as_secs(),
        "Listener configuration"
    );

    if let Err(e) = server::run(&config).await {
        error!(error = %e, "HTTP server demo failed");
        return Err(e.into());
    }
    Ok(())
}
