//! Demo parameters
//!
//! Every component takes its slice of [`DemoConfig`] at construction. The
//! defaults are the demo constants; a handful can be overridden through
//! environment variables (or a `.env` file loaded by the binaries).

use crate::core::combiner::FailurePolicy;
use crate::models::{DelaySpec, ReportFormat};
use std::env;
use std::str::FromStr;
use std::time::Duration;
use tracing::warn;

/// Deployment environment, read from `APP_ENV`.
pub fn get_environment() -> String {
    env::var("APP_ENV").unwrap_or_else(|_| "sandbox".to_string())
}

/// A labelled simulated operation with its own delay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedTask {
    pub label: String,
    pub delay: DelaySpec,
}

impl NamedTask {
    pub fn new(label: impl Into<String>, delay: DelaySpec) -> Self {
        Self {
            label: label.into(),
            delay,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SimulatorConfig {
    /// No simulated operation sleeps for less than this.
    pub min_delay: Duration,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            min_delay: Duration::from_millis(10),
        }
    }
}

#[derive(Debug, Clone)]
pub struct HarnessConfig {
    pub operations: usize,
    pub query_delay: DelaySpec,
    /// Only every `log_every`-th query logs its completion.
    pub log_every: usize,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            operations: 1000,
            query_delay: DelaySpec::uniform(50, 150),
            log_every: 100,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TableQueryConfig {
    pub tables: Vec<NamedTask>,
    pub failure_policy: FailurePolicy,
}

impl Default for TableQueryConfig {
    fn default() -> Self {
        Self {
            tables: vec![
                NamedTask::new("users", DelaySpec::jitter(300, 50)),
                NamedTask::new("orders", DelaySpec::jitter(250, 50)),
                NamedTask::new("products", DelaySpec::jitter(200, 50)),
                NamedTask::new("payments", DelaySpec::jitter(350, 50)),
                NamedTask::new("logs", DelaySpec::jitter(150, 50)),
            ],
            failure_policy: FailurePolicy::default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct BatchConfig {
    pub record_count: usize,
    pub batch_size: usize,
    pub processing_delay: DelaySpec,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            record_count: 10_000,
            batch_size: 1000,
            processing_delay: DelaySpec::uniform(200, 400),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ListenerConfig {
    pub host: String,
    pub port: u16,
    pub lifetime: Duration,
    pub slow_delay: DelaySpec,
    pub parallel_tasks: Vec<NamedTask>,
    pub failure_policy: FailurePolicy,
}

impl ListenerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            lifetime: Duration::from_secs(30),
            slow_delay: DelaySpec::uniform(200, 500),
            parallel_tasks: vec![
                NamedTask::new("Database query", DelaySpec::fixed(300)),
                NamedTask::new("Payment API call", DelaySpec::fixed(200)),
                NamedTask::new("Authentication", DelaySpec::fixed(150)),
                NamedTask::new("Logging", DelaySpec::fixed(100)),
                NamedTask::new("Notification", DelaySpec::fixed(250)),
            ],
            failure_policy: FailurePolicy::default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ThreadDemoConfig {
    pub task_count: usize,
    pub pool_size: usize,
    pub task_sleep: Duration,
    pub io_tasks: usize,
    pub io_delay: DelaySpec,
    pub log_every: usize,
}

impl Default for ThreadDemoConfig {
    fn default() -> Self {
        Self {
            task_count: 10_000,
            pool_size: 100,
            task_sleep: Duration::from_millis(10),
            io_tasks: 1000,
            io_delay: DelaySpec::uniform(100, 300),
            log_every: 100,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NonBlockingConfig {
    pub step_delay: DelaySpec,
}

impl Default for NonBlockingConfig {
    fn default() -> Self {
        Self {
            step_delay: DelaySpec::fixed(100),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct DemoConfig {
    pub simulator: SimulatorConfig,
    pub harness: HarnessConfig,
    pub tables: TableQueryConfig,
    pub batch: BatchConfig,
    pub listener: ListenerConfig,
    pub threads: ThreadDemoConfig,
    pub nonblocking: NonBlockingConfig,
    pub report_format: ReportFormat,
}

impl DemoConfig {
    /// Defaults with overrides from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Defaults with overrides from `lookup`; unparsable values are ignored.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(port) = parse(&lookup, "PORT") {
            config.listener.port = port;
        }
        if let Some(host) = lookup("HOST") {
            config.listener.host = host;
        }
        if let Some(seconds) = parse(&lookup, "LISTENER_LIFETIME_SECONDS") {
            config.listener.lifetime = Duration::from_secs(seconds);
        }
        if let Some(count) = parse(&lookup, "QUERY_COUNT") {
            config.harness.operations = count;
        }
        if let Some(count) = parse(&lookup, "RECORD_COUNT") {
            config.batch.record_count = count;
        }
        if let Some(size) = parse(&lookup, "BATCH_SIZE") {
            config.batch.batch_size = size;
        }
        if let Some(count) = parse(&lookup, "TASK_COUNT") {
            config.threads.task_count = count;
        }
        if let Some(size) = parse(&lookup, "POOL_SIZE") {
            config.threads.pool_size = size;
        }
        if let Some(format) = parse(&lookup, "REPORT_FORMAT") {
            config.report_format = format;
        }
        if let Some(policy) = parse::<FailurePolicy, _>(&lookup, "COMBINER_FAILURE_POLICY") {
            config.tables.failure_policy = policy;
            config.listener.failure_policy = policy;
        }

        config
    }
}

fn parse<T, F>(lookup: &F, key: &str) -> Option<T>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(key = key, value = %raw, "Ignoring unparsable override for {}", key);
            None
        }
    }
}
