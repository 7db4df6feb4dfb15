//! # takt-harness
//!
//! Workload driver around `takt-core`: for each configured workload it runs a
//! scheduler for a fixed number of cycles, writes the samples to
//! `metrics_<mode>_<workload>.csv` and summarizes the steady state.
//!
//! ## Key Components:
//! - **Harness:** builds the pool and scheduler from `TaktConfig` and runs one or both modes.
//! - **LatencySink:** CSV writer with header `cycle,latency_us`.
//! - **WorkloadSummary:** mean, standard deviation and percentiles excluding cycle 0.

mod error;
mod runner;
mod sink;
mod summary;

pub use error::HarnessError;
pub use runner::{CompareReport, Harness, ModeReport, WorkloadRun};
pub use sink::{csv_file_name, LatencySink};
pub use summary::WorkloadSummary;
