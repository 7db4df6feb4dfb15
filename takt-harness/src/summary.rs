//! Per-workload latency statistics.
//!
//! Cycle 0 is reported separately as `first_cycle_us`; the remaining cycles
//! form the steady state that every other figure is computed over.

use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub struct WorkloadSummary {
    pub cycles: usize,
    pub first_cycle_us: Option<u64>,
    pub mean_us: f64,
    /// Sample standard deviation (n - 1); zero with fewer than two steady samples.
    pub std_dev_us: f64,
    pub min_us: u64,
    pub max_us: u64,
    pub p50_us: u64,
    pub p99_us: u64,
    pub exhausted_cycles: usize,
    /// Wall-clock time spent inside the scheduler across all cycles.
    pub host_time: Duration,
}

impl WorkloadSummary {
    pub fn from_samples(samples: &[u64], exhausted_cycles: usize, host_time: Duration) -> Self {
        let steady = samples.get(1..).unwrap_or(&[]);
        let mut sorted = steady.to_vec();
        sorted.sort_unstable();

        let n = sorted.len();
        let mean_us = if n == 0 {
            0.0
        } else {
            sorted.iter().map(|&s| s as f64).sum::<f64>() / n as f64
        };
        let std_dev_us = if n < 2 {
            0.0
        } else {
            let sum_sq = sorted
                .iter()
                .map(|&s| (s as f64 - mean_us).powi(2))
                .sum::<f64>();
            (sum_sq / (n - 1) as f64).sqrt()
        };

        Self {
            cycles: samples.len(),
            first_cycle_us: samples.first().copied(),
            mean_us,
            std_dev_us,
            min_us: sorted.first().copied().unwrap_or(0),
            max_us: sorted.last().copied().unwrap_or(0),
            p50_us: percentile(&sorted, 0.50),
            p99_us: percentile(&sorted, 0.99),
            exhausted_cycles,
            host_time,
        }
    }
}

/// Nearest-rank percentile over an ascending slice.
fn percentile(sorted: &[u64], p: f64) -> u64 {
    if sorted.is_empty() {
        return 0;
    }
    let rank = (p * sorted.len() as f64).ceil() as usize;
    sorted[rank.clamp(1, sorted.len()) - 1]
}
