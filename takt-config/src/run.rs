//! Workload set and output location for a run.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::validation;

#[derive(Debug, Serialize, Deserialize, Validate, Clone, PartialEq)]
pub struct WorkloadConfig {
    #[validate(custom(function = validation::validate_workload_name))]
    pub name: String,

    /// Simulated CPU load, 0-100.
    #[validate(range(min = 0, max = 100))]
    pub load_percent: i32,
}

impl WorkloadConfig {
    pub fn new(name: impl Into<String>, load_percent: i32) -> Self {
        Self {
            name: name.into(),
            load_percent,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Validate, Clone, PartialEq)]
pub struct RunConfig {
    /// Latency samples drawn per workload.
    #[serde(default = "default_cycles")]
    #[validate(range(min = 1, max = 10_000_000))]
    pub cycles_per_workload: usize,

    /// Directory receiving `metrics_<mode>_<workload>.csv`.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Workloads in execution order.
    #[serde(default = "default_workloads")]
    #[validate(length(min = 1))]
    #[validate(custom(function = validation::validate_unique_workloads))]
    #[validate(nested)]
    pub workloads: Vec<WorkloadConfig>,
}

fn default_cycles() -> usize {
    500
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("metrics")
}

fn default_workloads() -> Vec<WorkloadConfig> {
    vec![
        WorkloadConfig::new("light", 10),
        WorkloadConfig::new("normal", 30),
        WorkloadConfig::new("moderate", 50),
        WorkloadConfig::new("high", 70),
        WorkloadConfig::new("extreme", 90),
    ]
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            cycles_per_workload: default_cycles(),
            output_dir: default_output_dir(),
            workloads: default_workloads(),
        }
    }
}
