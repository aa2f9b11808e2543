//! Sequential-vs-concurrent harness and the related task-count comparisons

use crate::config::{HarnessConfig, ThreadDemoConfig};
use crate::core::barrier::CountdownBarrier;
use crate::error::DemoError;
use crate::models::{
    BurstReport, ComparisonReport, PoolComparisonReport, SimulatedResult, TimingSample,
};
use crate::services::simulator::{worker_name, TaskSimulator};
use futures_util::future::join_all;
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// How the concurrent phase ended, task by task.
#[derive(Debug, Clone, Copy)]
pub struct ConcurrentRun {
    pub completed: usize,
    pub interrupted: usize,
    pub failed: usize,
    pub timing: TimingSample,
}

/// Run `work(0..n)` one after another.
pub async fn run_sequential<F, Fut>(n: usize, work: &F) -> (usize, TimingSample)
where
    F: Fn(usize) -> Fut,
    Fut: Future<Output = SimulatedResult>,
{
    let start = Instant::now();
    let mut completed = 0;
    for id in 0..n {
        if work(id).await.is_completed() {
            completed += 1;
        }
    }
    (completed, TimingSample::since(start))
}

/// Run `work(0..n)` with one spawned task per call and wait for all of them.
pub async fn run_concurrent<F, Fut>(n: usize, work: &F) -> ConcurrentRun
where
    F: Fn(usize) -> Fut,
    Fut: Future<Output = SimulatedResult> + Send + 'static,
{
    let start = Instant::now();
    let handles: Vec<_> = (0..n).map(|id| tokio::spawn(work(id))).collect();

    let mut run = ConcurrentRun {
        completed: 0,
        interrupted: 0,
        failed: 0,
        timing: TimingSample::since(start),
    };
    for joined in join_all(handles).await {
        match joined {
            Ok(result) if result.is_completed() => run.completed += 1,
            Ok(_) => run.interrupted += 1,
            Err(e) => {
                warn!(error = %e, "Concurrent operation failed");
                run.failed += 1;
            }
        }
    }
    run.timing = TimingSample::since(start);
    run
}

/// Sequential phase to completion, then the concurrent phase.
pub async fn compare<F, Fut>(label: &str, n: usize, work: F) -> ComparisonReport
where
    F: Fn(usize) -> Fut,
    Fut: Future<Output = SimulatedResult> + Send + 'static,
{
    info!(operations = n, "{}: running {} operations sequentially", label, n);
    let (_, sequential) = run_sequential(n, &work).await;
    info!(elapsed_ms = sequential.millis(), "Sequential phase took {} ms", sequential.millis());

    info!(operations = n, "{}: running {} operations on one task each", label, n);
    let concurrent = run_concurrent(n, &work).await;
    info!(
        elapsed_ms = concurrent.timing.millis(),
        "Concurrent phase took {} ms",
        concurrent.timing.millis()
    );

    ComparisonReport::new(label, n, sequential, concurrent.timing).with_outcomes(
        concurrent.completed,
        concurrent.interrupted,
        concurrent.failed,
    )
}

/// Simulated database queries run through [`compare`].
pub struct Harness {
    simulator: TaskSimulator,
    config: HarnessConfig,
}

impl Harness {
    pub fn new(simulator: TaskSimulator, config: HarnessConfig) -> Self {
        Self { simulator, config }
    }

    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    /// One simulated query; every `log_every`-th id reports its completion.
    pub fn query(
        &self,
        id: usize,
        token: &CancellationToken,
    ) -> impl Future<Output = SimulatedResult> + Send + 'static {
        let simulator = self.simulator.clone();
        let delay = self.config.query_delay;
        let log_every = self.config.log_every.max(1);
        let token = token.child_token();
        async move {
            let result = simulator.simulate(format!("Query {}", id), &delay, &token).await;
            if id % log_every == 0 && result.is_completed() {
                info!(
                    query = id,
                    delay_ms = result.delay_ms,
                    "Query {} completed after {}ms on {}",
                    id,
                    result.delay_ms,
                    worker_name()
                );
            }
            result
        }
    }

    pub async fn compare_queries(&self, token: &CancellationToken) -> ComparisonReport {
        compare("Database queries", self.config.operations, |id| {
            self.query(id, token)
        })
        .await
    }
}

/// The same short waits on a fixed pool of OS threads, then on lightweight tasks.
pub async fn compare_pool_vs_tasks(
    config: &ThreadDemoConfig,
) -> Result<PoolComparisonReport, DemoError> {
    let tasks = config.task_count;
    let pool_size = config.pool_size.max(1);
    let pause = config.task_sleep;

    info!(tasks = tasks, pool_size = pool_size, "Running {} waits on {} OS threads", tasks, pool_size);
    let start = Instant::now();
    tokio::task::spawn_blocking(move || run_on_thread_pool(tasks, pool_size, pause))
        .await
        .map_err(|e| DemoError::from_join("thread-pool", e))?;
    let pool = TimingSample::since(start);

    info!(tasks = tasks, "Running {} waits on lightweight tasks", tasks);
    let start = Instant::now();
    run_on_tasks(tasks, pause).await;
    let lightweight = TimingSample::since(start);

    Ok(PoolComparisonReport::new(tasks, pool_size, pool, lightweight))
}

fn run_on_thread_pool(tasks: usize, pool_size: usize, pause: Duration) {
    let next = AtomicUsize::new(0);
    std::thread::scope(|scope| {
        for _ in 0..pool_size.min(tasks) {
            scope.spawn(|| {
                while next.fetch_add(1, Ordering::Relaxed) < tasks {
                    std::thread::sleep(pause);
                }
            });
        }
    });
}

async fn run_on_tasks(tasks: usize, pause: Duration) {
    let barrier = CountdownBarrier::new(tasks);
    for _ in 0..tasks {
        let done = barrier.guard();
        tokio::spawn(async move {
            let _done = done;
            tokio::time::sleep(pause).await;
        });
    }
    barrier.wait().await;
}

/// Spawn `config.io_tasks` simulated I/O operations and wait on a countdown barrier.
pub async fn io_burst(
    simulator: &TaskSimulator,
    config: &ThreadDemoConfig,
    token: &CancellationToken,
) -> BurstReport {
    let tasks = config.io_tasks;
    let log_every = config.log_every.max(1);
    let barrier = CountdownBarrier::new(tasks);
    let start = Instant::now();

    let handles: Vec<_> = (0..tasks)
        .map(|id| {
            let done = barrier.guard();
            let simulator = simulator.clone();
            let delay = config.io_delay;
            let token = token.child_token();
            tokio::spawn(async move {
                let _done = done;
                let result = simulator.simulate(format!("Task {}", id), &delay, &token).await;
                if id % log_every == 0 && result.is_completed() {
                    info!(
                        task = id,
                        delay_ms = result.delay_ms,
                        "Task {} completed after {}ms on {}",
                        id,
                        result.delay_ms,
                        worker_name()
                    );
                }
                result
            })
        })
        .collect();

    info!(tasks = tasks, "Spawned {} tasks for non-blocking I/O, waiting...", tasks);
    barrier.wait().await;
    let elapsed = TimingSample::since(start);

    let mut report = BurstReport {
        tasks,
        elapsed_ms: elapsed.millis(),
        completed: 0,
        interrupted: 0,
        failed: 0,
        barrier_signals: barrier.signals(),
    };
    for joined in join_all(handles).await {
        match joined {
            Ok(result) if result.is_completed() => report.completed += 1,
            Ok(_) => report.interrupted += 1,
            Err(_) => report.failed += 1,
        }
    }
    report
}
