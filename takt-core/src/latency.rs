//! ## takt-core::latency
//! **Synthetic control-loop latency model**
//!
//! A cycle's latency is normally distributed:
//!
//! - mean  = `base_latency_us + load_percent * per_percent_us`
//! - sigma = `base_jitter_us * jitter_scale`
//!
//! Samples are floored at zero and rounded to the nearest microsecond.
//! The model is pure; the caller owns the random stream.

use rand::Rng;
use rand_distr::StandardNormal;

use crate::error::SchedulerError;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatencyModel {
    pub base_latency_us: f64,
    pub per_percent_us: f64,
    pub base_jitter_us: f64,
}

impl Default for LatencyModel {
    fn default() -> Self {
        Self {
            base_latency_us: 15_000.0,
            per_percent_us: 20.0,
            base_jitter_us: 100.0,
        }
    }
}

impl LatencyModel {
    pub fn new(
        base_latency_us: f64,
        per_percent_us: f64,
        base_jitter_us: f64,
    ) -> Result<Self, SchedulerError> {
        let model = Self {
            base_latency_us,
            per_percent_us,
            base_jitter_us,
        };
        model.validate()?;
        Ok(model)
    }

    /// All constants must be finite and non-negative.
    pub fn validate(&self) -> Result<(), SchedulerError> {
        for (name, value) in [
            ("base_latency_us", self.base_latency_us),
            ("per_percent_us", self.per_percent_us),
            ("base_jitter_us", self.base_jitter_us),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(SchedulerError::InvalidConfiguration(format!(
                    "{name} must be finite and >= 0, got {value}"
                )));
            }
        }
        Ok(())
    }

    #[inline]
    pub fn mean_us(&self, load_percent: i32) -> f64 {
        self.base_latency_us + f64::from(load_percent) * self.per_percent_us
    }

    #[inline]
    pub fn sigma_us(&self, jitter_scale: f64) -> f64 {
        self.base_jitter_us * jitter_scale
    }

    /// Draws one latency sample in microseconds.
    #[inline]
    pub fn sample<R: Rng + ?Sized>(&self, load_percent: i32, jitter_scale: f64, rng: &mut R) -> u64 {
        let z: f64 = rng.sample(StandardNormal);
        let raw = self.mean_us(load_percent) + self.sigma_us(jitter_scale) * z;
        // `max` maps NaN to 0.0 as well; the cast saturates on overflow.
        raw.max(0.0).round() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256PlusPlus;

    #[test]
    fn test_mean_and_sigma() {
        let model = LatencyModel::default();
        assert_eq!(model.mean_us(50), 16_000.0);
        assert_eq!(model.mean_us(0), 15_000.0);
        assert_eq!(model.sigma_us(1.0), 100.0);
        assert!((model.sigma_us(0.70) - 70.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_jitter_returns_mean() {
        let model = LatencyModel::new(1_000.0, 10.0, 0.0).unwrap();
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(7);
        for load in [0, 25, 100] {
            assert_eq!(model.sample(load, 1.0, &mut rng), 1_000 + 10 * load as u64);
        }
    }

    #[test]
    fn test_negative_samples_clamp_to_zero() {
        let model = LatencyModel::new(0.0, 0.0, 1_000.0).unwrap();
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(11);
        let zeros = (0..1_000)
            .map(|_| model.sample(0, 1.0, &mut rng))
            .filter(|&sample| sample == 0)
            .count();
        // Roughly half the raw draws are negative.
        assert!(zeros > 300, "expected many clamped samples, got {zeros}");
    }

    #[test]
    fn test_invalid_constants_rejected() {
        assert!(LatencyModel::new(-1.0, 20.0, 100.0).is_err());
        assert!(LatencyModel::new(15_000.0, f64::NAN, 100.0).is_err());
        assert!(LatencyModel::new(15_000.0, 20.0, f64::INFINITY).is_err());
        assert!(LatencyModel::default().validate().is_ok());
    }

    #[test]
    fn test_same_seed_same_samples() {
        let model = LatencyModel::default();
        let mut a = Xoshiro256PlusPlus::seed_from_u64(123_456);
        let mut b = Xoshiro256PlusPlus::seed_from_u64(123_456);
        for load in 0..100 {
            assert_eq!(model.sample(load, 1.0, &mut a), model.sample(load, 1.0, &mut b));
        }
    }
}
