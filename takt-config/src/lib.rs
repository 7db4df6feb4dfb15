//! # Takt Configuration System
//!
//! Hierarchical configuration for the takt workload harness.
//!
//! ## Features
//! - **Layered sources**: defaults, YAML files, `TAKT_*` environment variables
//! - **Validation**: every section is checked with `validator` after merging

#![warn(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

mod error;
mod latency;
mod pool;
mod run;
mod scheduler;
mod validation;

pub use error::ConfigError;
pub use latency::LatencyConfig;
pub use pool::{PoolConfig, MAX_POOL_BYTES};
pub use run::{RunConfig, WorkloadConfig};
pub use scheduler::{ProfileConfig, SchedulersConfig};

const BASE_FILE: &str = "config/takt.yaml";

/// Top‑level configuration container.
#[derive(Debug, Serialize, Deserialize, Validate, Default, Clone, PartialEq)]
pub struct TaktConfig {
    /// Block pool sizing.
    #[serde(default)]
    #[validate(nested)]
    pub pool: PoolConfig,

    /// Latency model constants.
    #[serde(default)]
    #[validate(nested)]
    pub latency: LatencyConfig,

    /// Scheduler variant parameters.
    #[serde(default)]
    #[validate(nested)]
    pub schedulers: SchedulersConfig,

    /// Workloads, cycle count and output location.
    #[serde(default)]
    #[validate(nested)]
    pub run: RunConfig,
}

impl TaktConfig {
    /// Load configuration from default files and environment.
    ///
    /// Hierarchy:
    /// 1. Default Values
    /// 2. `config/takt.yaml` - base settings. If missing, defaults are used.
    /// 3. `config/<environment>.yaml` - overrides selected by `TAKT_ENV` (default `production`).
    /// 4. `TAKT_*` environment variables, nested with `__`.
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(TaktConfig::default()));

        if Path::new(BASE_FILE).exists() {
            figment = figment.merge(Yaml::file(BASE_FILE));
        }

        let env = std::env::var("TAKT_ENV").unwrap_or_else(|_| "production".into());
        let env_file = format!("config/{}.yaml", env);
        if Path::new(&env_file).exists() {
            figment = figment.merge(Yaml::file(env_file));
        }

        Self::finish(figment)
    }

    /// Load configuration from a specific file, still honoring `TAKT_*` overrides.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }

        let figment =
            Figment::from(Serialized::defaults(TaktConfig::default())).merge(Yaml::file(path));
        Self::finish(figment)
    }

    fn finish(figment: Figment) -> Result<Self, ConfigError> {
        figment
            .merge(Env::prefixed("TAKT_").split("__"))
            .extract()
            .map_err(ConfigError::from)
            .and_then(|config: Self| {
                config.validate()?;
                Ok(config)
            })
    }
}
