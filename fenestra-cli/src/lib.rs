//! Library surface of the fenestra benchmark driver.
//!
//! `main` stays thin; argument handling, workload orchestration, logging
//! setup, and process telemetry live here so tests can exercise them
//! directly.

pub mod cli;
pub mod logging;
pub mod telemetry;
