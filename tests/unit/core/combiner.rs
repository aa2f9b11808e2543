//! Unit tests for the fan-out/fan-in combiner

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use taskdemo::config::{ListenerConfig, NamedTask};
use taskdemo::core::combiner::{fan_out_simulated, FailurePolicy, FanOut};
use taskdemo::error::DemoError;
use taskdemo::models::{DelaySpec, Outcome, SimulatedResult, SlotOutcome};
use taskdemo::services::simulator::TaskSimulator;
use tokio::time::{sleep, Instant};
use tokio_util::sync::CancellationToken;

fn crash() -> Result<SimulatedResult, DemoError> {
    panic!("simulated crash");
}

fn tasks(specs: &[(&str, u64)]) -> Vec<NamedTask> {
    specs
        .iter()
        .map(|(label, ms)| NamedTask::new(*label, DelaySpec::fixed(*ms)))
        .collect()
}

#[tokio::test(start_paused = true)]
async fn test_results_follow_declared_order_not_completion_order() {
    let simulator = TaskSimulator::default();
    let token = CancellationToken::new();

    let start = Instant::now();
    let combined = fan_out_simulated(
        &simulator,
        &tasks(&[("slowest", 300), ("middle", 200), ("fastest", 100)]),
        FailurePolicy::Abort,
        &token,
    )
    .await
    .expect("fan-out succeeds");

    assert_eq!(combined.labels(), vec!["slowest", "middle", "fastest"]);
    assert!(start.elapsed() < Duration::from_millis(600));
    assert_eq!(combined.slowest_ms(), 300);
    assert_eq!(combined.sequential_ms(), 600);
    assert_eq!(combined.failures(), 0);

    let text = combined.to_string();
    assert!(text.starts_with("1. slowest: slowest completed after 300ms"));
    assert!(text.contains("3. fastest: fastest completed after 100ms"));
}

#[tokio::test(start_paused = true)]
async fn test_listener_sub_tasks_are_all_reported() {
    let simulator = TaskSimulator::default();
    let config = ListenerConfig::default();
    let combined = fan_out_simulated(
        &simulator,
        &config.parallel_tasks,
        FailurePolicy::Abort,
        &CancellationToken::new(),
    )
    .await
    .expect("fan-out succeeds");

    let expected: Vec<&str> = config
        .parallel_tasks
        .iter()
        .map(|task| task.label.as_str())
        .collect();
    assert_eq!(combined.labels(), expected);
}

#[tokio::test(start_paused = true)]
async fn test_abort_policy_cancels_the_rest_and_returns_first_error() {
    let simulator = TaskSimulator::default();
    let interrupted = Arc::new(AtomicBool::new(false));
    let mut fan_out = FanOut::new(FailurePolicy::Abort, &CancellationToken::new());

    {
        let simulator = simulator.clone();
        let interrupted = interrupted.clone();
        fan_out.spawn("slow", move |token| async move {
            let result = simulator
                .simulate("slow", &DelaySpec::fixed(5000), &token)
                .await;
            interrupted.store(result.outcome == Outcome::Interrupted, Ordering::SeqCst);
            Ok(result)
        });
    }
    fan_out.spawn("broken", |_token| async move {
        sleep(Duration::from_millis(10)).await;
        Err(DemoError::TaskFailed {
            label: "broken".to_string(),
            reason: "connection reset".to_string(),
        })
    });

    let start = Instant::now();
    let err = fan_out.join().await.expect_err("abort policy fails");

    assert!(matches!(err, DemoError::TaskFailed { ref label, .. } if label == "broken"));
    assert!(start.elapsed() < Duration::from_millis(5000));
    // join() only returns after the slow slot has been awaited
    assert!(interrupted.load(Ordering::SeqCst));
}

#[tokio::test(start_paused = true)]
async fn test_placeholder_policy_marks_only_failed_slots() {
    let simulator = TaskSimulator::default();
    let mut fan_out = FanOut::new(FailurePolicy::Placeholder, &CancellationToken::new());

    fan_out.spawn_simulated(&simulator, &NamedTask::new("users", DelaySpec::fixed(100)));
    fan_out.spawn("broken", |_token| async move {
        Err(DemoError::TaskFailed {
            label: "broken".to_string(),
            reason: "connection reset".to_string(),
        })
    });
    fan_out.spawn("crashing", |_token| async move { crash() });
    fan_out.spawn_simulated(&simulator, &NamedTask::new("logs", DelaySpec::fixed(50)));
    assert_eq!(fan_out.len(), 4);

    let combined = fan_out.join().await.expect("placeholder policy never fails");

    assert_eq!(combined.labels(), vec!["users", "broken", "crashing", "logs"]);
    assert_eq!(combined.failures(), 2);
    assert!(combined.slots[0].result().is_some_and(SimulatedResult::is_completed));
    assert!(combined.slots[3].result().is_some_and(SimulatedResult::is_completed));
    match &combined.slots[2].outcome {
        SlotOutcome::Failed { error } => assert!(error.contains("panicked")),
        other => panic!("expected failed slot, got {:?}", other),
    }

    let text = combined.to_string();
    assert!(text.contains("2. [failed] broken: task 'broken' failed: connection reset"));
    assert!(text.contains("3. [failed] crashing"));
}

#[tokio::test(start_paused = true)]
async fn test_parent_cancellation_interrupts_without_failing() {
    let simulator = TaskSimulator::default();
    let parent = CancellationToken::new();
    parent.cancel();

    let combined = fan_out_simulated(
        &simulator,
        &tasks(&[("users", 300), ("orders", 250)]),
        FailurePolicy::Abort,
        &parent,
    )
    .await
    .expect("interruption is not a failure");

    assert!(combined
        .slots
        .iter()
        .all(|slot| slot.result().is_some_and(|r| r.outcome == Outcome::Interrupted)));
    assert_eq!(combined.slowest_ms(), 0);
}

#[test]
fn test_failure_policy_parsing() {
    assert_eq!("abort".parse::<FailurePolicy>(), Ok(FailurePolicy::Abort));
    assert_eq!("Placeholder".parse::<FailurePolicy>(), Ok(FailurePolicy::Placeholder));
    assert_eq!("degrade".parse::<FailurePolicy>(), Ok(FailurePolicy::Placeholder));
    assert!("retry".parse::<FailurePolicy>().is_err());
    assert_eq!(FailurePolicy::default(), FailurePolicy::Abort);
}
