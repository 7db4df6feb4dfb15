use thiserror::Error;

use takt_config::ConfigError;
use takt_core::{PoolError, SchedulerError};

#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("Pool error: {0}")]
    Pool(#[from] PoolError),

    #[error("Scheduler error: {0}")]
    Scheduler(#[from] SchedulerError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Worker thread failed: {0}")]
    Worker(String),
}
