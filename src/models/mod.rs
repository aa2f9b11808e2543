//! Shared data models spanning the demo components.

pub mod batch;
pub mod combined;
pub mod delay;
pub mod report;
pub mod result;
pub mod timing;

pub use batch::BatchChunk;
pub use combined::{CombinedResult, Slot, SlotOutcome};
pub use delay::DelaySpec;
pub use report::{
    BatchReport, BurstReport, ComparisonReport, PoolComparisonReport, ReportFormat,
};
pub use result::{Outcome, Payload, Person, SimulatedResult};
pub use timing::{timed, TimingSample};
