//! ## takt-telemetry::metrics
//! **Prometheus counters and latency histogram**

use prometheus::{Counter, Histogram, HistogramOpts, Registry};

#[derive(Debug, Clone)]
pub struct MetricsRecorder {
    pub registry: prometheus::Registry,
    pub cycles: prometheus::Counter,
    pub exhausted_cycles: prometheus::Counter,
    pub cycle_latency: prometheus::Histogram,
}

impl MetricsRecorder {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();
        let cycles = Counter::new("takt_cycles_total", "Scheduler cycles run")?;
        let exhausted_cycles = Counter::new(
            "takt_pool_exhausted_total",
            "Cycles that ran without a pool block",
        )?;

        let cycle_latency = Histogram::with_opts(
            HistogramOpts::new("takt_cycle_latency_us", "Synthetic cycle latency").buckets(vec![
                10_000.0, 14_000.0, 14_500.0, 15_000.0, 15_500.0, 16_000.0, 16_500.0, 17_000.0,
                17_500.0, 18_000.0, 20_000.0,
            ]),
        )?;

        registry.register(Box::new(cycles.clone()))?;
        registry.register(Box::new(exhausted_cycles.clone()))?;
        registry.register(Box::new(cycle_latency.clone()))?;

        Ok(Self {
            registry,
            cycles,
            exhausted_cycles,
            cycle_latency,
        })
    }

    #[inline]
    pub fn record_cycle(&self, latency_us: u64, borrowed: bool) {
        self.cycles.inc();
        if !borrowed {
            self.exhausted_cycles.inc();
        }
        self.cycle_latency.observe(latency_us as f64);
    }

    pub fn gather_metrics(&self) -> Result<String, prometheus::Error> {
        use prometheus::Encoder;
        let encoder = prometheus::TextEncoder::new();
        let mut buffer = Vec::<u8>::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_cycle() {
        let metrics = MetricsRecorder::new().unwrap();
        metrics.record_cycle(15_200, true);
        metrics.record_cycle(16_100, false);

        assert_eq!(metrics.cycles.get(), 2.0);
        assert_eq!(metrics.exhausted_cycles.get(), 1.0);
        assert_eq!(metrics.cycle_latency.get_sample_count(), 2);
        assert_eq!(metrics.cycle_latency.get_sample_sum(), 31_300.0);
    }

    #[test]
    fn test_gather_metrics() {
        let metrics = MetricsRecorder::new().unwrap();
        metrics.record_cycle(15_000, true);
        let text = metrics.gather_metrics().unwrap();
        assert!(text.contains("takt_cycles_total 1"));
        assert!(text.contains("takt_cycle_latency_us_bucket"));
        assert!(text.contains("takt_pool_exhausted_total 0"));
    }
}
