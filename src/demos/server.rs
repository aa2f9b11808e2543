//! HTTP listener demo

use crate::config::DemoConfig;
use crate::core::http::HttpListener;
use crate::error::DemoError;
use crate::metrics::Metrics;
use crate::services::simulator::TaskSimulator;
use std::sync::Arc;

pub async fn run(config: &DemoConfig) -> Result<(), DemoError> {
    let metrics = Arc::new(Metrics::new()?);
    let listener = HttpListener::new(
        config.listener.clone(),
        TaskSimulator::new(&config.simulator),
        metrics,
    );

    let addr = listener.start().await?;
    let port = addr.port();
    let lifetime = config.listener.lifetime;

    println!("HTTP server running at http://localhost:{}", port);
    println!("Available endpoints:");
    println!("  - GET /api/fast - immediate reply");
    println!("  - GET /api/slow - slow reply (simulated blocking I/O)");
    println!("  - GET /api/parallel - reply after several concurrent sub-tasks");
    println!("\nTo load test, use a tool such as Apache Bench:");
    println!("  ab -n 1000 -c 100 http://localhost:{}/api/slow", port);

    listener.run_for(lifetime).await?;
    println!("HTTP server stopped after {} seconds.", lifetime.as_secs());
    Ok(())
}
