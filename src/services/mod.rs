//! Simulated external work.

pub mod simulator;

pub use simulator::{worker_name, TaskSimulator};
