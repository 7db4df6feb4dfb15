//! Per-variant scheduler parameters.

use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, Validate, Clone, PartialEq)]
pub struct ProfileConfig {
    /// Multiplier on the base jitter.
    #[validate(range(min = 0.0, max = 10.0))]
    pub jitter_scale: f64,

    /// Seed of the scheduler's private random stream.
    pub seed: u64,
}

#[derive(Debug, Serialize, Deserialize, Validate, Clone, PartialEq)]
pub struct SchedulersConfig {
    /// General-purpose scheduler.
    #[serde(default = "default_profile")]
    #[validate(nested)]
    pub default: ProfileConfig,

    /// Real-time-tuned scheduler.
    #[serde(default = "rt_profile")]
    #[validate(nested)]
    pub rt: ProfileConfig,
}

fn default_profile() -> ProfileConfig {
    ProfileConfig {
        jitter_scale: 1.0,
        seed: 123_456,
    }
}

fn rt_profile() -> ProfileConfig {
    ProfileConfig {
        jitter_scale: 0.70,
        seed: 654_321,
    }
}

impl Default for SchedulersConfig {
    fn default() -> Self {
        Self {
            default: default_profile(),
            rt: rt_profile(),
        }
    }
}
