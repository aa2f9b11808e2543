//! Sequential vs. lightweight-task concurrency demos.
//!
//! Every piece of "work" here is a simulated delay: database queries, batch
//! records and HTTP sub-requests all sleep for a randomized duration and
//! report how long they took.

pub mod config;
pub mod core;
pub mod demos;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod services;

pub use error::DemoError;
