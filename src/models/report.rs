//! Summaries printed at the end of each demo

use crate::error::DemoError;
use crate::models::timing::TimingSample;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// How reports are written to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(ReportFormat::Text),
            "json" => Ok(ReportFormat::Json),
            other => Err(format!("unknown report format '{}'", other)),
        }
    }
}

impl ReportFormat {
    pub fn render<T: fmt::Display + Serialize>(&self, report: &T) -> Result<String, DemoError> {
        match self {
            ReportFormat::Text => Ok(report.to_string()),
            ReportFormat::Json => Ok(serde_json::to_string_pretty(report)?),
        }
    }
}

fn percent_saved(before_ms: u64, after_ms: u64) -> f64 {
    if before_ms == 0 {
        return 0.0;
    }
    (before_ms as f64 - after_ms as f64) * 100.0 / before_ms as f64
}

fn speedup(before_ms: u64, after_ms: u64) -> f64 {
    before_ms as f64 / after_ms.max(1) as f64
}

/// Same N operations, first one at a time, then one task each.
#[derive(Debug, Clone, Serialize)]
pub struct ComparisonReport {
    pub label: String,
    pub operations: usize,
    pub sequential_ms: u64,
    pub concurrent_ms: u64,
    pub delta_ms: i64,
    pub improvement_pct: f64,
    pub speedup: f64,
    pub completed: usize,
    pub interrupted: usize,
    pub failed: usize,
}

impl ComparisonReport {
    pub fn new(
        label: impl Into<String>,
        operations: usize,
        sequential: TimingSample,
        concurrent: TimingSample,
    ) -> Self {
        let sequential_ms = sequential.millis();
        let concurrent_ms = concurrent.millis();
        Self {
            label: label.into(),
            operations,
            sequential_ms,
            concurrent_ms,
            delta_ms: sequential_ms as i64 - concurrent_ms as i64,
            improvement_pct: percent_saved(sequential_ms, concurrent_ms),
            speedup: speedup(sequential_ms, concurrent_ms),
            completed: operations,
            interrupted: 0,
            failed: 0,
        }
    }

    pub fn with_outcomes(mut self, completed: usize, interrupted: usize, failed: usize) -> Self {
        self.completed = completed;
        self.interrupted = interrupted;
        self.failed = failed;
        self
    }
}

impl fmt::Display for ComparisonReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} ({} operations)", self.label, self.operations)?;
        writeln!(f, "  Sequential: {} ms", self.sequential_ms)?;
        writeln!(f, "  Concurrent: {} ms", self.concurrent_ms)?;
        write!(
            f,
            "  Improvement: {} ms ({:.2}%, {:.1}x faster)",
            self.delta_ms, self.improvement_pct, self.speedup
        )?;
        if self.interrupted > 0 || self.failed > 0 {
            write!(
                f,
                "\n  Interrupted: {}, failed: {}",
                self.interrupted, self.failed
            )?;
        }
        Ok(())
    }
}

/// Fixed OS thread pool vs. one lightweight task per job.
#[derive(Debug, Clone, Serialize)]
pub struct PoolComparisonReport {
    pub tasks: usize,
    pub pool_size: usize,
    pub pool_ms: u64,
    pub tasks_ms: u64,
    pub delta_ms: i64,
    pub speedup: f64,
}

impl PoolComparisonReport {
    pub fn new(tasks: usize, pool_size: usize, pool: TimingSample, lightweight: TimingSample) -> Self {
        let pool_ms = pool.millis();
        let tasks_ms = lightweight.millis();
        Self {
            tasks,
            pool_size,
            pool_ms,
            tasks_ms,
            delta_ms: pool_ms as i64 - tasks_ms as i64,
            speedup: speedup(pool_ms, tasks_ms),
        }
    }
}

impl fmt::Display for PoolComparisonReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} short I/O waits", self.tasks)?;
        writeln!(f, "  OS thread pool ({} threads): {} ms", self.pool_size, self.pool_ms)?;
        writeln!(f, "  Lightweight tasks: {} ms", self.tasks_ms)?;
        write!(f, "  Improvement: {} ms ({:.1}x faster)", self.delta_ms, self.speedup)
    }
}

/// Burst of independent simulated I/O operations gated by a countdown barrier.
#[derive(Debug, Clone, Serialize)]
pub struct BurstReport {
    pub tasks: usize,
    pub elapsed_ms: u64,
    pub completed: usize,
    pub interrupted: usize,
    pub failed: usize,
    pub barrier_signals: usize,
}

impl fmt::Display for BurstReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} I/O tasks finished in {} ms ({} completed, {} interrupted, {} failed)",
            self.tasks, self.elapsed_ms, self.completed, self.interrupted, self.failed
        )
    }
}

/// Outcome of processing one collection in fixed-size chunks.
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub total_items: usize,
    pub batch_size: usize,
    pub chunks: usize,
    pub elapsed_ms: u64,
    pub avg_chunk_ms: u64,
    pub throughput_per_sec: f64,
    pub completed: usize,
    pub interrupted: usize,
    pub failed: usize,
    pub barrier_signals: usize,
}

impl BatchReport {
    pub fn new(total_items: usize, batch_size: usize, chunks: usize, elapsed: TimingSample) -> Self {
        let elapsed_ms = elapsed.millis();
        let avg_chunk_ms = if chunks == 0 {
            0
        } else {
            elapsed_ms / chunks as u64
        };
        // Sub-millisecond runs still count as one millisecond of work.
        let seconds = elapsed.duration().as_secs_f64().max(0.001);
        let throughput_per_sec = if total_items == 0 {
            0.0
        } else {
            total_items as f64 / seconds
        };
        Self {
            total_items,
            batch_size,
            chunks,
            elapsed_ms,
            avg_chunk_ms,
            throughput_per_sec,
            completed: 0,
            interrupted: 0,
            failed: 0,
            barrier_signals: 0,
        }
    }
}

impl fmt::Display for BatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "All batches processed in: {} ms", self.elapsed_ms)?;
        writeln!(f, "Average time per batch: {} ms", self.avg_chunk_ms)?;
        write!(f, "Throughput: {:.0} records/second", self.throughput_per_sec)?;
        if self.interrupted > 0 || self.failed > 0 {
            write!(
                f,
                "\nInterrupted batches: {}, failed batches: {}",
                self.interrupted, self.failed
            )?;
        }
        Ok(())
    }
}
