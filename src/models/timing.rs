//! Wall-clock timing samples

use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimingSample {
    pub start: Instant,
    pub end: Instant,
}

impl TimingSample {
    /// Close a sample that started at `start`.
    pub fn since(start: Instant) -> Self {
        Self {
            start,
            end: Instant::now(),
        }
    }

    pub fn duration(&self) -> Duration {
        self.end.saturating_duration_since(self.start)
    }

    pub fn millis(&self) -> u64 {
        self.duration().as_millis() as u64
    }
}

/// Await `fut` and report how long it took.
pub async fn timed<F: Future>(fut: F) -> (F::Output, TimingSample) {
    let start = Instant::now();
    let output = fut.await;
    (output, TimingSample::since(start))
}
