//! ## takt-telemetry::logging
//! **Structured logging with `tracing`**
//!
//! `RUST_LOG` selects the filter; the default level is `info`.

use tracing::info_span;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Clone)]
pub struct EventLogger;

impl EventLogger {
    /// Installs the global subscriber. Later calls are no-ops.
    pub fn init() {
        let _ = fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .with_thread_names(true)
            .with_span_events(FmtSpan::ENTER)
            .try_init();
    }

    /// Logs the outcome of one workload inside a `workload` span.
    #[inline]
    pub fn log_workload(mode: &str, workload: &str, load_percent: i32, mean_us: f64, std_dev_us: f64) {
        let span = info_span!("workload", mode = mode, workload = workload, load_percent);
        let _enter = span.enter();
        tracing::info!(
            mean_us = format_args!("{mean_us:.1}"),
            std_dev_us = format_args!("{std_dev_us:.1}"),
            "Workload finished"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_test::traced_test;

    #[traced_test]
    #[test]
    fn test_logging() {
        EventLogger::log_workload("rt", "normal", 30, 15_600.2, 70.4);
        assert!(logs_contain("Workload finished"));
        assert!(logs_contain("15600.2"));
    }
}
