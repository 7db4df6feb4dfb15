//! Drives schedulers through the configured workloads.
use std::path::PathBuf;
use std::time::{Duration, Instant};

use tracing::{debug, info, instrument, warn};
use validator::Validate;

use takt_config::{ConfigError, ProfileConfig, TaktConfig, WorkloadConfig};
use takt_core::{
    BlockPool, LatencyModel, PoolStats, Scheduler, SchedulerProfile, SchedulerVariant,
};
use takt_telemetry::{EventLogger, MetricsRecorder};

use crate::error::HarnessError;
use crate::sink::{csv_file_name, LatencySink};
use crate::summary::WorkloadSummary;

/// One workload's samples and where they were written.
#[derive(Debug, Clone)]
pub struct WorkloadRun {
    pub name: String,
    pub load_percent: i32,
    pub path: PathBuf,
    pub samples: Vec<u64>,
    pub summary: WorkloadSummary,
}

/// Everything one scheduler produced over the workload set.
#[derive(Debug, Clone)]
pub struct ModeReport {
    pub variant: SchedulerVariant,
    /// Workloads whose output file could not be created are absent.
    pub workloads: Vec<WorkloadRun>,
    /// Pool state after the run. Shared pools report the combined usage.
    pub pool: PoolStats,
}

impl ModeReport {
    pub fn workload(&self, name: &str) -> Option<&WorkloadRun> {
        self.workloads.iter().find(|run| run.name == name)
    }
}

/// Both variants run side by side on one shared pool.
#[derive(Debug, Clone)]
pub struct CompareReport {
    pub general: ModeReport,
    pub realtime: ModeReport,
    pub pool: PoolStats,
}

impl CompareReport {
    /// Pairs up workloads present in both reports, in general-purpose order.
    pub fn rows(&self) -> impl Iterator<Item = (&WorkloadRun, &WorkloadRun)> {
        self.general
            .workloads
            .iter()
            .filter_map(|general| Some((general, self.realtime.workload(&general.name)?)))
    }
}

pub struct Harness {
    config: TaktConfig,
    model: LatencyModel,
    metrics: Option<MetricsRecorder>,
}

impl Harness {
    pub fn new(config: TaktConfig) -> Result<Self, HarnessError> {
        config.validate().map_err(ConfigError::from)?;
        let latency = &config.latency;
        let model = LatencyModel::new(
            latency.base_latency_us,
            latency.per_percent_us,
            latency.base_jitter_us,
        )?;
        Ok(Self {
            config,
            model,
            metrics: None,
        })
    }

    /// Records every cycle into `metrics` as well.
    pub fn with_metrics(mut self, metrics: MetricsRecorder) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn config(&self) -> &TaktConfig {
        &self.config
    }

    pub fn metrics(&self) -> Option<&MetricsRecorder> {
        self.metrics.as_ref()
    }

    pub fn profile(&self, variant: SchedulerVariant) -> SchedulerProfile {
        let ProfileConfig { jitter_scale, seed } = match variant {
            SchedulerVariant::GeneralPurpose => &self.config.schedulers.default,
            SchedulerVariant::RealTime => &self.config.schedulers.rt,
        };
        SchedulerProfile {
            jitter_scale: *jitter_scale,
            seed: *seed,
        }
    }

    fn build_pool(&self) -> Result<BlockPool, HarnessError> {
        let pool = BlockPool::new(self.config.pool.capacity, self.config.pool.chunk_size)?;
        debug!(?pool, "Block pool ready");
        Ok(pool)
    }

    /// Runs every workload with one scheduler of `variant` on a fresh pool.
    pub fn run_mode(&self, variant: SchedulerVariant) -> Result<ModeReport, HarnessError> {
        let pool = self.build_pool()?;
        self.drive(&pool, variant)
    }

    /// Runs both variants concurrently on two threads sharing one pool.
    pub fn compare(&self) -> Result<CompareReport, HarnessError> {
        let pool = self.build_pool()?;

        let (general, realtime) = crossbeam::scope(|scope| {
            let spawn = |variant: SchedulerVariant| {
                let pool = &pool;
                scope
                    .builder()
                    .name(format!("takt-{}", variant))
                    .spawn(move |_| self.drive(pool, variant))
            };
            let general = spawn(SchedulerVariant::GeneralPurpose)?;
            let realtime = spawn(SchedulerVariant::RealTime)?;
            Ok::<_, HarnessError>((join(general.join())?, join(realtime.join())?))
        })
        .map_err(|_| HarnessError::Worker("compare scope panicked".into()))??;

        Ok(CompareReport {
            general,
            realtime,
            pool: pool.stats(),
        })
    }

    #[instrument(skip_all, fields(mode = %variant))]
    fn drive(&self, pool: &BlockPool, variant: SchedulerVariant) -> Result<ModeReport, HarnessError> {
        let mut scheduler = Scheduler::with_profile(pool, self.model, self.profile(variant))?;
        let run = &self.config.run;
        std::fs::create_dir_all(&run.output_dir)?;
        info!(
            cycles = run.cycles_per_workload,
            workloads = run.workloads.len(),
            "Starting {} scheduler",
            variant
        );

        let mut workloads = Vec::with_capacity(run.workloads.len());
        for workload in &run.workloads {
            let path = run.output_dir.join(csv_file_name(variant, &workload.name));
            info!(
                "=== Workload: {} ({}%) ===",
                workload.name, workload.load_percent
            );

            let sink = match LatencySink::create(&path) {
                Ok(sink) => sink,
                Err(e) => {
                    warn!("Failed to open {}: {e}", path.display());
                    continue;
                }
            };
            let workload_run = self.drive_workload(&mut scheduler, workload, sink, path)?;
            EventLogger::log_workload(
                variant.label(),
                &workload_run.name,
                workload_run.load_percent,
                workload_run.summary.mean_us,
                workload_run.summary.std_dev_us,
            );
            workloads.push(workload_run);
        }

        info!(cycles = scheduler.cycles(), "{} scheduler done", variant);
        Ok(ModeReport {
            variant,
            workloads,
            pool: pool.stats(),
        })
    }

    fn drive_workload(
        &self,
        scheduler: &mut Scheduler<'_>,
        workload: &WorkloadConfig,
        mut sink: LatencySink,
        path: PathBuf,
    ) -> Result<WorkloadRun, HarnessError> {
        let cycles = self.config.run.cycles_per_workload;
        let mut samples = Vec::with_capacity(cycles);
        let mut exhausted_cycles = 0;
        let mut host_time = Duration::ZERO;

        for cycle in 0..cycles {
            let start = Instant::now();
            let report = scheduler.run_cycle(workload.load_percent);
            host_time += start.elapsed();

            sink.record(cycle, report.latency_us)?;
            if !report.borrowed {
                exhausted_cycles += 1;
            }
            if let Some(metrics) = &self.metrics {
                metrics.record_cycle(report.latency_us, report.borrowed);
            }
            samples.push(report.latency_us);
        }
        sink.finish()?;
        info!(" -> wrote {}", path.display());

        let summary = WorkloadSummary::from_samples(&samples, exhausted_cycles, host_time);
        Ok(WorkloadRun {
            name: workload.name.clone(),
            load_percent: workload.load_percent,
            path,
            samples,
            summary,
        })
    }
}

fn join<T>(result: std::thread::Result<Result<T, HarnessError>>) -> Result<T, HarnessError> {
    result.map_err(|_| HarnessError::Worker("scheduler thread panicked".into()))?
}
