//! Minimal HTTP listener using Axum
//!
//! Three fixed routes, each request body handled on its own spawned task.
//! The listener serves for a fixed lifetime and then shuts down gracefully,
//! interrupting whatever simulated work is still in flight.

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
    routing::get,
    Router,
};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::net::TcpListener;
use tokio::signal;
use tokio::sync::RwLock;
use tokio::task::{JoinError, JoinHandle};
use tokio_util::sync::CancellationToken;
use tower::ServiceBuilder;
use tower_http::trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::{error, info, warn, Level};

use crate::config::ListenerConfig;
use crate::core::combiner::fan_out_simulated;
use crate::error::DemoError;
use crate::metrics::Metrics;
use crate::models::Payload;
use crate::services::simulator::{worker_name, TaskSimulator};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ListenerConfig>,
    pub simulator: TaskSimulator,
    pub metrics: Arc<Metrics>,
    /// Cancelled when the listener shuts down.
    pub shutdown: CancellationToken,
    requests: Arc<AtomicU64>,
}

impl AppState {
    pub fn new(
        config: Arc<ListenerConfig>,
        simulator: TaskSimulator,
        metrics: Arc<Metrics>,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            config,
            simulator,
            metrics,
            shutdown,
            requests: Arc::new(AtomicU64::new(0)),
        }
    }

    fn next_request(&self) -> u64 {
        self.requests.fetch_add(1, Ordering::Relaxed) + 1
    }
}

/// Run a handler body on its own task.
async fn on_worker<F>(work: F) -> Result<F::Output, JoinError>
where
    F: Future + Send + 'static,
    F::Output: Send + 'static,
{
    tokio::spawn(work).await
}

/// Immediate reply, no simulated I/O.
pub async fn fast_reply(State(state): State<AppState>) -> (StatusCode, String) {
    let request = state.next_request();
    match on_worker(async move { format!("Fast reply to request #{} from {}", request, worker_name()) }).await {
        Ok(body) => (StatusCode::OK, body),
        Err(e) => {
            error!(error = %e, request = request, "Fast handler failed");
            (StatusCode::INTERNAL_SERVER_ERROR, format!("Operation failed: {}", e))
        }
    }
}

/// Reply after a randomized wait standing in for blocking I/O.
pub async fn slow_reply(State(state): State<AppState>) -> (StatusCode, String) {
    let request = state.next_request();
    let simulator = state.simulator.clone();
    let delay = state.config.slow_delay;
    let token = state.shutdown.child_token();

    let work = async move {
        simulator
            .produce("slow reply", &delay, &token, |_| Payload::Text(worker_name()))
            .await
    };

    match on_worker(work).await {
        Ok(result) if result.is_completed() => (
            StatusCode::OK,
            format!(
                "Slow reply to request #{} after {}ms of I/O on {}",
                request, result.delay_ms, result.payload
            ),
        ),
        Ok(_) => {
            warn!(request = request, "Slow handler interrupted");
            (StatusCode::INTERNAL_SERVER_ERROR, "Operation interrupted".to_string())
        }
        Err(e) => {
            error!(error = %e, request = request, "Slow handler failed");
            (StatusCode::INTERNAL_SERVER_ERROR, format!("Operation failed: {}", e))
        }
    }
}

/// Run the configured sub-tasks concurrently and reply with all of them.
pub async fn parallel_reply(State(state): State<AppState>) -> (StatusCode, String) {
    let request = state.next_request();
    let simulator = state.simulator.clone();
    let config = state.config.clone();
    let token = state.shutdown.child_token();

    let work = async move {
        let combined = fan_out_simulated(
            &simulator,
            &config.parallel_tasks,
            config.failure_policy,
            &token,
        )
        .await?;
        Ok::<_, DemoError>(format!(
            "Parallel tasks completed:\n{}Served by: {}",
            combined,
            worker_name()
        ))
    };

    let outcome = match on_worker(work).await {
        Ok(outcome) => outcome,
        Err(e) => Err(DemoError::from_join("parallel reply", e)),
    };
    match outcome {
        Ok(body) => (StatusCode::OK, body),
        Err(e) => {
            error!(error = %e, request = request, "Parallel handler failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Parallel tasks failed: {}", e),
            )
        }
    }
}

/// Middleware to track HTTP request metrics
async fn metrics_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    state.metrics.http_requests_in_flight.inc();
    let response = next.run(request).await;
    let status = response.status();
    let duration = start.elapsed();
    state.metrics.http_requests_in_flight.dec();

    state.metrics.http_requests_total.inc();
    state
        .metrics
        .http_request_duration_seconds
        .observe(duration.as_secs_f64());

    if status.is_server_error() {
        state.metrics.http_server_errors_total.inc();
        warn!(
            method = %method,
            path = %path,
            status = %status,
            duration_ms = duration.as_millis(),
            "HTTP request error"
        );
    }

    response
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/fast", get(fast_reply))
        .route("/api/slow", get(slow_reply))
        .route("/api/parallel", get(parallel_reply))
        .layer(
            ServiceBuilder::new()
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(DefaultMakeSpan::new().level(Level::DEBUG))
                        .on_request(DefaultOnRequest::new().level(Level::DEBUG))
                        .on_response(DefaultOnResponse::new().level(Level::DEBUG)),
                )
                .layer(axum::middleware::from_fn_with_state(
                    state.clone(),
                    metrics_middleware,
                )),
        )
        .with_state(state)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListenerState {
    Stopped,
    Listening,
}

struct Running {
    addr: SocketAddr,
    shutdown: CancellationToken,
    handle: JoinHandle<Result<(), DemoError>>,
}

/// Listener lifecycle: `Stopped -> Listening -> Stopped`.
pub struct HttpListener {
    config: Arc<ListenerConfig>,
    simulator: TaskSimulator,
    metrics: Arc<Metrics>,
    running: Arc<RwLock<Option<Running>>>,
}

impl HttpListener {
    pub fn new(config: ListenerConfig, simulator: TaskSimulator, metrics: Arc<Metrics>) -> Self {
        Self {
            config: Arc::new(config),
            simulator,
            metrics,
            running: Arc::new(RwLock::new(None)),
        }
    }

    pub fn metrics(&self) -> &Arc<Metrics> {
        &self.metrics
    }

    pub async fn state(&self) -> ListenerState {
        if self.running.read().await.is_some() {
            ListenerState::Listening
        } else {
            ListenerState::Stopped
        }
    }

    pub async fn local_addr(&self) -> Option<SocketAddr> {
        self.running.read().await.as_ref().map(|running| running.addr)
    }

    /// Bind and start serving in the background. Already listening is not an error.
    pub async fn start(&self) -> Result<SocketAddr, DemoError> {
        let mut running = self.running.write().await;
        if let Some(ref current) = *running {
            return Ok(current.addr);
        }

        let bind_addr = self.config.bind_addr();
        let listener = TcpListener::bind(&bind_addr)
            .await
            .map_err(|source| DemoError::Bind {
                addr: bind_addr.clone(),
                source,
            })?;
        let addr = listener.local_addr()?;

        let shutdown = CancellationToken::new();
        let state = AppState::new(
            self.config.clone(),
            self.simulator.clone(),
            self.metrics.clone(),
            shutdown.clone(),
        );
        let app = create_router(state);
        let signal = shutdown.clone();
        let handle = tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move { signal.cancelled().await })
                .await
                .map_err(DemoError::from)
        });

        info!(addr = %addr, "HTTP listener running at http://{}", addr);
        *running = Some(Running {
            addr,
            shutdown,
            handle,
        });
        Ok(addr)
    }

    /// Interrupt in-flight work, drain connections and return to `Stopped`.
    pub async fn stop(&self) -> Result<(), DemoError> {
        let Some(running) = self.running.write().await.take() else {
            return Ok(());
        };

        running.shutdown.cancel();
        let served = running
            .handle
            .await
            .map_err(|e| DemoError::from_join("http-listener", e))?;

        info!(
            addr = %running.addr,
            requests = self.metrics.http_requests_total.get(),
            server_errors = self.metrics.http_server_errors_total.get(),
            "HTTP listener stopped after {} requests",
            self.metrics.http_requests_total.get()
        );
        served
    }

    /// Serve until `lifetime` elapses or Ctrl-C arrives, then stop.
    pub async fn run_for(&self, lifetime: Duration) -> Result<(), DemoError> {
        self.start().await?;
        tokio::select! {
            _ = tokio::time::sleep(lifetime) => {
                info!(lifetime_secs = lifetime.as_secs(), "Listener lifetime elapsed");
            }
            _ = signal::ctrl_c() => {
                info!("Shutdown signal received");
            }
        }
        self.stop().await
    }

    /// Serve for the configured lifetime.
    pub async fn run(&self) -> Result<(), DemoError> {
        self.run_for(self.config.lifetime).await
    }
}
