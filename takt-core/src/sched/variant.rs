//! Scheduler variants and their parameters.

use std::fmt;
use std::str::FromStr;

use crate::error::SchedulerError;

/// What distinguishes one scheduler class from another: how much of the base
/// jitter it lets through, and the seed of its private random stream.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SchedulerProfile {
    pub jitter_scale: f64,
    pub seed: u64,
}

impl SchedulerProfile {
    pub const GENERAL_PURPOSE: Self = Self {
        jitter_scale: 1.0,
        seed: 123_456,
    };

    pub const REAL_TIME: Self = Self {
        jitter_scale: 0.70,
        seed: 654_321,
    };

    pub fn validate(&self) -> Result<(), SchedulerError> {
        if !self.jitter_scale.is_finite() || self.jitter_scale < 0.0 {
            return Err(SchedulerError::InvalidConfiguration(format!(
                "jitter_scale must be finite and >= 0, got {}",
                self.jitter_scale
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchedulerVariant {
    /// Stock time-sharing scheduler.
    GeneralPurpose,
    /// PREEMPT_RT-style scheduler with reduced jitter.
    RealTime,
}

impl SchedulerVariant {
    pub const ALL: [Self; 2] = [Self::GeneralPurpose, Self::RealTime];

    pub fn profile(self) -> SchedulerProfile {
        match self {
            Self::GeneralPurpose => SchedulerProfile::GENERAL_PURPOSE,
            Self::RealTime => SchedulerProfile::REAL_TIME,
        }
    }

    /// Short name used on the command line and in output file names.
    pub fn label(self) -> &'static str {
        match self {
            Self::GeneralPurpose => "default",
            Self::RealTime => "rt",
        }
    }
}

impl fmt::Display for SchedulerVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SchedulerVariant {
    type Err = SchedulerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "default" => Ok(Self::GeneralPurpose),
            "rt" => Ok(Self::RealTime),
            other => Err(SchedulerError::InvalidConfiguration(format!(
                "unknown scheduler variant '{other}' (expected 'default' or 'rt')"
            ))),
        }
    }
}
