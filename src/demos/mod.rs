//! Demo flows behind the binaries; each prints its reports to stdout.

pub mod database;
pub mod nonblocking;
pub mod server;
pub mod threads;
