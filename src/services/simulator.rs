//! Task simulator: the stand-in for every network call, query and batch record

use crate::config::SimulatorConfig;
use crate::models::{DelaySpec, Payload, SimulatedResult};
use std::time::Duration;
use tokio::time::{sleep, Instant};
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Name of the OS thread currently driving this task.
pub fn worker_name() -> String {
    std::thread::current()
        .name()
        .unwrap_or("unnamed-worker")
        .to_string()
}

#[derive(Debug, Clone)]
pub struct TaskSimulator {
    min_delay: Duration,
}

impl Default for TaskSimulator {
    fn default() -> Self {
        Self::new(&SimulatorConfig::default())
    }
}

impl TaskSimulator {
    pub fn new(config: &SimulatorConfig) -> Self {
        Self {
            min_delay: config.min_delay,
        }
    }

    pub fn min_delay(&self) -> Duration {
        self.min_delay
    }

    /// Draw a concrete delay for `spec`, clamped to the minimum.
    pub fn realize(&self, spec: &DelaySpec) -> Duration {
        spec.sample(&mut rand::thread_rng(), self.min_delay)
    }

    /// Wait for a delay drawn from `spec` and report it.
    pub async fn simulate(
        &self,
        label: impl Into<String>,
        spec: &DelaySpec,
        token: &CancellationToken,
    ) -> SimulatedResult {
        self.produce(label, spec, token, |delay| {
            Payload::Text(format!(
                "completed after {}ms on {}",
                delay.as_millis(),
                worker_name()
            ))
        })
        .await
    }

    /// Like [`simulate`](Self::simulate), with the payload built from the realized delay.
    pub async fn produce<F>(
        &self,
        label: impl Into<String>,
        spec: &DelaySpec,
        token: &CancellationToken,
        build: F,
    ) -> SimulatedResult
    where
        F: FnOnce(Duration) -> Payload,
    {
        let delay = self.realize(spec);
        self.wait(label.into(), delay, token, build).await
    }

    /// Suspend for exactly `delay` (still clamped to the minimum).
    pub async fn wait<F>(
        &self,
        label: String,
        delay: Duration,
        token: &CancellationToken,
        build: F,
    ) -> SimulatedResult
    where
        F: FnOnce(Duration) -> Payload,
    {
        let delay = delay.max(self.min_delay);
        let started = Instant::now();

        tokio::select! {
            biased;
            _ = token.cancelled() => {
                let waited = started.elapsed();
                debug!(
                    label = %label,
                    waited_ms = waited.as_millis() as u64,
                    "{} interrupted after {}ms",
                    label,
                    waited.as_millis()
                );
                // Keep the interrupt visible to whatever runs next in this unit.
                token.cancel();
                SimulatedResult::interrupted(label, waited)
            }
            _ = sleep(delay) => SimulatedResult::completed(label, build(delay), delay),
        }
    }
}
