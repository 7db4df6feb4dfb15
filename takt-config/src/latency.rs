//! Latency model constants, in microseconds.

use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, Validate, Clone, PartialEq)]
pub struct LatencyConfig {
    /// Cycle latency at 0% load.
    #[serde(default = "default_base_latency")]
    #[validate(range(min = 0.0, max = 1.0e9))]
    pub base_latency_us: f64,

    /// Added per percent of load.
    #[serde(default = "default_per_percent")]
    #[validate(range(min = 0.0, max = 1.0e7))]
    pub per_percent_us: f64,

    /// Standard deviation before the scheduler's jitter scale is applied.
    #[serde(default = "default_base_jitter")]
    #[validate(range(min = 0.0, max = 1.0e9))]
    pub base_jitter_us: f64,
}

fn default_base_latency() -> f64 {
    15_000.0
}

fn default_per_percent() -> f64 {
    20.0
}

fn default_base_jitter() -> f64 {
    100.0
}

impl Default for LatencyConfig {
    fn default() -> Self {
        Self {
            base_latency_us: default_base_latency(),
            per_percent_us: default_per_percent(),
            base_jitter_us: default_base_jitter(),
        }
    }
}
