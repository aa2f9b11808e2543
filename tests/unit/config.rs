//! Unit tests for demo configuration

use std::collections::HashMap;
use std::time::Duration;
use taskdemo::config::DemoConfig;
use taskdemo::core::combiner::FailurePolicy;
use taskdemo::logging::is_production;
use taskdemo::models::{DelaySpec, ReportFormat};

fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let values: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| values.get(key).cloned()
}

#[test]
fn test_default_config_matches_demo_constants() {
    let config = DemoConfig::default();
    assert_eq!(config.simulator.min_delay, Duration::from_millis(10));
    assert_eq!(config.harness.operations, 1000);
    assert_eq!(config.harness.query_delay, DelaySpec::uniform(50, 150));
    assert_eq!(config.batch.record_count, 10_000);
    assert_eq!(config.batch.batch_size, 1000);
    assert_eq!(config.listener.port, 8080);
    assert_eq!(config.listener.lifetime, Duration::from_secs(30));
    assert_eq!(config.threads.task_count, 10_000);
    assert_eq!(config.threads.pool_size, 100);
    assert_eq!(config.report_format, ReportFormat::Text);
    assert_eq!(config.listener.failure_policy, FailurePolicy::Abort);
}

#[test]
fn test_default_parallel_tasks_in_declared_order() {
    let config = DemoConfig::default();
    let labels: Vec<&str> = config
        .listener
        .parallel_tasks
        .iter()
        .map(|task| task.label.as_str())
        .collect();
    assert_eq!(
        labels,
        vec![
            "Database query",
            "Payment API call",
            "Authentication",
            "Logging",
            "Notification"
        ]
    );
    assert_eq!(config.tables.tables.len(), 5);
    assert_eq!(config.tables.tables[0].delay, DelaySpec::jitter(300, 50));
}

#[test]
fn test_overrides_are_applied() {
    let config = DemoConfig::from_lookup(lookup_from(&[
        ("PORT", "9090"),
        ("LISTENER_LIFETIME_SECONDS", "5"),
        ("BATCH_SIZE", "250"),
        ("REPORT_FORMAT", "json"),
        ("COMBINER_FAILURE_POLICY", "placeholder"),
    ]));
    assert_eq!(config.listener.port, 9090);
    assert_eq!(config.listener.bind_addr(), "0.0.0.0:9090");
    assert_eq!(config.listener.lifetime, Duration::from_secs(5));
    assert_eq!(config.batch.batch_size, 250);
    assert_eq!(config.report_format, ReportFormat::Json);
    assert_eq!(config.listener.failure_policy, FailurePolicy::Placeholder);
    assert_eq!(config.tables.failure_policy, FailurePolicy::Placeholder);
}

#[test]
fn test_unparsable_overrides_are_ignored() {
    let config = DemoConfig::from_lookup(lookup_from(&[
        ("PORT", "not-a-port"),
        ("QUERY_COUNT", "-3"),
        ("COMBINER_FAILURE_POLICY", "sometimes"),
    ]));
    assert_eq!(config.listener.port, 8080);
    assert_eq!(config.harness.operations, 1000);
    assert_eq!(config.listener.failure_policy, FailurePolicy::Abort);
}

#[test]
fn test_production_environment_names() {
    assert!(is_production("production"));
    assert!(is_production("prod"));
    assert!(!is_production("sandbox"));
    assert!(!is_production("staging"));
}
