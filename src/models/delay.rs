//! Delay specifications for simulated work

use rand::Rng;
use serde::Serialize;
use std::time::Duration;

/// How long a simulated operation should take.
///
/// Ranges are half-open: `Uniform { min_ms: 50, max_ms: 150 }` yields a delay
/// in `[50, 150)` milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DelaySpec {
    Fixed { ms: u64 },
    Uniform { min_ms: u64, max_ms: u64 },
    Jitter { base_ms: u64, jitter_ms: u64 },
}

impl DelaySpec {
    pub const fn fixed(ms: u64) -> Self {
        DelaySpec::Fixed { ms }
    }

    pub const fn uniform(min_ms: u64, max_ms: u64) -> Self {
        DelaySpec::Uniform { min_ms, max_ms }
    }

    pub const fn jitter(base_ms: u64, jitter_ms: u64) -> Self {
        DelaySpec::Jitter { base_ms, jitter_ms }
    }

    /// Draw a concrete delay, never shorter than `floor`.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R, floor: Duration) -> Duration {
        let ms = match *self {
            DelaySpec::Fixed { ms } => ms,
            DelaySpec::Uniform { min_ms, max_ms } => {
                if max_ms <= min_ms {
                    min_ms
                } else {
                    rng.gen_range(min_ms..max_ms)
                }
            }
            DelaySpec::Jitter { base_ms, jitter_ms } => {
                if jitter_ms == 0 {
                    base_ms
                } else {
                    let jitter = jitter_ms as i64;
                    let offset = rng.gen_range(-jitter..jitter);
                    (base_ms as i64 + offset).max(0) as u64
                }
            }
        };
        Duration::from_millis(ms).max(floor)
    }

    /// Upper bound (exclusive for ranges) of what `sample` can return, ignoring the floor.
    pub fn max_ms(&self) -> u64 {
        match *self {
            DelaySpec::Fixed { ms } => ms,
            DelaySpec::Uniform { min_ms, max_ms } => max_ms.max(min_ms),
            DelaySpec::Jitter { base_ms, jitter_ms } => base_ms + jitter_ms,
        }
    }
}
