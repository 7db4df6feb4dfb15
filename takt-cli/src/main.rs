//! ## takt-cli
//! **Control-loop latency harness**
//!
//! `takt run <default|rt>` drives one scheduler through every configured
//! workload and writes `metrics_<mode>_<workload>.csv`; `takt compare` runs
//! both schedulers on one shared pool and prints their statistics side by side.

use clap::Parser;
use takt_telemetry::logging::EventLogger;

mod commands;

use commands::Cli;

fn main() -> anyhow::Result<()> {
    EventLogger::init();
    let cli = Cli::parse();
    commands::run_command(cli)
}
