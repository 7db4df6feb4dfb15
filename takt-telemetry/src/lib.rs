//! # Takt Telemetry
//!
//! Logging setup and prometheus metrics for scheduler runs.

pub mod logging;
pub mod metrics;

pub use logging::EventLogger;
pub use metrics::MetricsRecorder;
