//! Per-workload CSV output: header `cycle,latency_us`, one row per cycle.

use std::fs::File;
use std::path::Path;

use serde::Serialize;

use takt_core::SchedulerVariant;

use crate::error::HarnessError;

#[derive(Debug, Serialize)]
struct LatencyRecord {
    cycle: usize,
    latency_us: u64,
}

/// `metrics_<mode>_<workload>.csv`
pub fn csv_file_name(variant: SchedulerVariant, workload: &str) -> String {
    format!("metrics_{}_{}.csv", variant.label(), workload)
}

pub struct LatencySink {
    writer: csv::Writer<File>,
}

impl LatencySink {
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self, HarnessError> {
        Ok(Self {
            writer: csv::Writer::from_path(path)?,
        })
    }

    #[inline]
    pub fn record(&mut self, cycle: usize, latency_us: u64) -> Result<(), HarnessError> {
        self.writer.serialize(LatencyRecord { cycle, latency_us })?;
        Ok(())
    }

    pub fn finish(mut self) -> Result<(), HarnessError> {
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_name() {
        assert_eq!(
            csv_file_name(SchedulerVariant::RealTime, "normal"),
            "metrics_rt_normal.csv"
        );
        assert_eq!(
            csv_file_name(SchedulerVariant::GeneralPurpose, "light"),
            "metrics_default_light.csv"
        );
    }

    #[test]
    fn test_sink_writes_header_and_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");

        let mut sink = LatencySink::create(&path).unwrap();
        sink.record(0, 15_321).unwrap();
        sink.record(1, 15_198).unwrap();
        sink.finish().unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text, "cycle,latency_us\n0,15321\n1,15198\n");
    }
}
