//! Core concurrency primitives (harness, combiner, partitioner, listener)

pub mod barrier;
pub mod batch;
pub mod combiner;
pub mod harness;
pub mod http;

pub use barrier::{CountdownBarrier, CountdownGuard};
pub use batch::{chunk_count, partition, BatchProcessor};
pub use combiner::{fan_out_simulated, FailurePolicy, FanOut};
pub use harness::{compare, compare_pool_vs_tasks, io_burst, run_concurrent, run_sequential, Harness};
pub use http::{create_router, AppState, HttpListener, ListenerState};
