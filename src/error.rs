//! Error type shared by the demo components

use thiserror::Error;
use tokio::task::JoinError;

#[derive(Debug, Error)]
pub enum DemoError {
    #[error("batch size must be at least 1")]
    InvalidBatchSize,

    #[error("task '{label}' failed: {reason}")]
    TaskFailed { label: String, reason: String },

    #[error("task '{label}' panicked")]
    TaskPanicked { label: String },

    #[error("task '{label}' was cancelled before completing")]
    Cancelled { label: String },

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("metrics error: {0}")]
    Metrics(#[from] prometheus::Error),

    #[error("report serialization failed: {0}")]
    Report(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl DemoError {
    /// Classify a failed join of the task running `label`.
    pub fn from_join(label: &str, err: JoinError) -> Self {
        if err.is_panic() {
            DemoError::TaskPanicked {
                label: label.to_string(),
            }
        } else {
            DemoError::Cancelled {
                label: label.to_string(),
            }
        }
    }
}
