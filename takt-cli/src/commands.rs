use std::fmt::Write as _;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::info;

use takt_config::TaktConfig;
use takt_core::SchedulerVariant;
use takt_harness::{CompareReport, Harness, ModeReport};
use takt_telemetry::MetricsRecorder;

#[derive(Parser)]
#[command(version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run every workload with one scheduler and write its CSV files
    Run(RunArgs),
    /// Run both schedulers concurrently on one shared pool and compare them
    Compare(CommonArgs),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    /// General-purpose scheduler
    Default,
    /// Real-time-tuned scheduler
    Rt,
}

impl From<Mode> for SchedulerVariant {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Default => SchedulerVariant::GeneralPurpose,
            Mode::Rt => SchedulerVariant::RealTime,
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Scheduler to run
    #[arg(value_enum)]
    pub mode: Mode,
    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(Args, Debug, Clone, Default)]
pub struct CommonArgs {
    /// Configuration file; defaults to config/takt.yaml plus TAKT_* overrides
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Cycles per workload
    #[arg(long)]
    pub cycles: Option<usize>,
    /// Directory for the CSV files
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    /// Print prometheus metrics after the run
    #[arg(long, default_value_t = false)]
    pub metrics: bool,
}

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Run(args) => {
            let harness = build_harness(&args.common)?;
            let report = harness.run_mode(args.mode.into())?;
            print!("{}", render_mode(&report));
            print_metrics(&harness)
        }
        Commands::Compare(args) => {
            let harness = build_harness(&args)?;
            let report = harness.compare()?;
            print!("{}", render_comparison(&report));
            print_metrics(&harness)
        }
    }
}

fn load_config(args: &CommonArgs) -> anyhow::Result<TaktConfig> {
    let mut config = match &args.config {
        Some(path) => TaktConfig::load_from_path(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => TaktConfig::load()?,
    };
    if let Some(cycles) = args.cycles {
        config.run.cycles_per_workload = cycles;
    }
    if let Some(output) = &args.output {
        config.run.output_dir = output.clone();
    }
    Ok(config)
}

fn build_harness(args: &CommonArgs) -> anyhow::Result<Harness> {
    let config = load_config(args)?;
    info!(
        capacity = config.pool.capacity,
        chunk_size = config.pool.chunk_size,
        output = %config.run.output_dir.display(),
        "takt starting"
    );
    let harness = Harness::new(config)?;
    Ok(if args.metrics {
        harness.with_metrics(MetricsRecorder::new()?)
    } else {
        harness
    })
}

fn print_metrics(harness: &Harness) -> anyhow::Result<()> {
    if let Some(metrics) = harness.metrics() {
        print!("{}", metrics.gather_metrics()?);
    }
    Ok(())
}

pub fn render_mode(report: &ModeReport) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<10} {:>5} {:>10} {:>8} {:>8} {:>8} {:>10}  file",
        format!("[{}]", report.variant),
        "load",
        "mean_us",
        "std_us",
        "p99_us",
        "first_us",
        "exhausted"
    );
    for run in &report.workloads {
        let s = &run.summary;
        let _ = writeln!(
            out,
            "{:<10} {:>4}% {:>10.1} {:>8.1} {:>8} {:>8} {:>10}  {}",
            run.name,
            run.load_percent,
            s.mean_us,
            s.std_dev_us,
            s.p99_us,
            s.first_cycle_us.unwrap_or(0),
            s.exhausted_cycles,
            run.path.display()
        );
    }
    out
}

pub fn render_comparison(report: &CompareReport) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<10} {:>5} {:>12} {:>10} {:>12} {:>10}",
        "workload", "load", "default_mean", "default_sd", "rt_mean", "rt_sd"
    );
    for (general, realtime) in report.rows() {
        let _ = writeln!(
            out,
            "{:<10} {:>4}% {:>12.1} {:>10.1} {:>12.1} {:>10.1}",
            general.name,
            general.load_percent,
            general.summary.mean_us,
            general.summary.std_dev_us,
            realtime.summary.mean_us,
            realtime.summary.std_dev_us
        );
    }
    let _ = writeln!(
        out,
        "pool: peak {} of {} blocks, {} exhaustions",
        report.pool.peak_in_use, report.pool.capacity, report.pool.exhaustions
    );
    out
}
