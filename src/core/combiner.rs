//! Fan-out/fan-in combiner
//!
//! Spawns a fixed set of labelled operations at once, collects them as they
//! finish, and presents the results in the order the operations were declared.

use crate::config::NamedTask;
use crate::error::DemoError;
use crate::models::{CombinedResult, Payload, SimulatedResult, Slot, SlotOutcome, TimingSample};
use crate::services::simulator::{worker_name, TaskSimulator};
use futures_util::stream::{FuturesUnordered, StreamExt};
use std::future::Future;
use std::str::FromStr;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// What a failing operation does to the rest of the fan-out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// First failure cancels the others and fails the whole combination.
    #[default]
    Abort,
    /// Failed operations become marked placeholders; the rest complete.
    Placeholder,
}

impl FromStr for FailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "abort" => Ok(FailurePolicy::Abort),
            "placeholder" | "degrade" => Ok(FailurePolicy::Placeholder),
            other => Err(format!("unknown failure policy '{}'", other)),
        }
    }
}

type OperationHandle = JoinHandle<Result<SimulatedResult, DemoError>>;

pub struct FanOut {
    policy: FailurePolicy,
    token: CancellationToken,
    operations: Vec<(String, OperationHandle)>,
    started: Instant,
}

impl FanOut {
    /// Operations see a child of `parent`, so cancelling `parent` interrupts them all.
    pub fn new(policy: FailurePolicy, parent: &CancellationToken) -> Self {
        Self {
            policy,
            token: parent.child_token(),
            operations: Vec::new(),
            started: Instant::now(),
        }
    }

    pub fn policy(&self) -> FailurePolicy {
        self.policy
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Start `operation` now on its own task; its slot is the next declared position.
    pub fn spawn<F, Fut>(&mut self, label: impl Into<String>, operation: F) -> &mut Self
    where
        F: FnOnce(CancellationToken) -> Fut,
        Fut: Future<Output = Result<SimulatedResult, DemoError>> + Send + 'static,
    {
        let label = label.into();
        let handle = tokio::spawn(operation(self.token.clone()));
        self.operations.push((label, handle));
        self
    }

    /// Start a simulated operation described by `task`.
    pub fn spawn_simulated(&mut self, simulator: &TaskSimulator, task: &NamedTask) -> &mut Self {
        let simulator = simulator.clone();
        let label = task.label.clone();
        let delay = task.delay;
        self.spawn(task.label.clone(), move |token| async move {
            let description = label.clone();
            Ok(simulator
                .produce(label, &delay, &token, move |realized| {
                    Payload::Text(format!(
                        "{} completed after {}ms on {}",
                        description,
                        realized.as_millis(),
                        worker_name()
                    ))
                })
                .await)
        })
    }

    /// Wait for every operation and combine them in declared order.
    ///
    /// Every handle is awaited before this returns, whichever policy is in force.
    pub async fn join(self) -> Result<CombinedResult, DemoError> {
        let FanOut {
            policy,
            token,
            operations,
            started,
        } = self;

        let mut slots: Vec<Option<Slot>> = vec![None; operations.len()];
        let mut in_flight: FuturesUnordered<_> = operations
            .into_iter()
            .enumerate()
            .map(|(index, (label, handle))| async move { (index, label, handle.await) })
            .collect();

        let mut first_error = None;
        while let Some((index, label, joined)) = in_flight.next().await {
            let outcome = match joined {
                Ok(Ok(result)) => Ok(result),
                Ok(Err(e)) => Err(e),
                Err(e) => Err(DemoError::from_join(&label, e)),
            };

            let outcome = match outcome {
                Ok(result) => {
                    debug!(label = %label, delay_ms = result.delay_ms, "Fan-out slot finished");
                    SlotOutcome::Done { result }
                }
                Err(e) => {
                    warn!(label = %label, error = %e, policy = ?policy, "Fan-out operation failed");
                    let error = e.to_string();
                    if policy == FailurePolicy::Abort && first_error.is_none() {
                        token.cancel();
                        first_error = Some(e);
                    }
                    SlotOutcome::Failed { error }
                }
            };
            slots[index] = Some(Slot { label, outcome });
        }

        if let Some(e) = first_error {
            return Err(e);
        }

        Ok(CombinedResult {
            slots: slots.into_iter().flatten().collect(),
            elapsed_ms: TimingSample::since(started).millis(),
        })
    }
}

/// Run every task in `tasks` concurrently and combine them in declared order.
pub async fn fan_out_simulated(
    simulator: &TaskSimulator,
    tasks: &[NamedTask],
    policy: FailurePolicy,
    token: &CancellationToken,
) -> Result<CombinedResult, DemoError> {
    let mut fan_out = FanOut::new(policy, token);
    for task in tasks {
        fan_out.spawn_simulated(simulator, task);
    }
    fan_out.join().await
}
