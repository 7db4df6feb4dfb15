//! ## takt-core::sched
//! **Synthetic schedulers**
//!
//! One algorithm, parameterized by `SchedulerProfile`. Every `run` is a
//! single cycle: borrow a block (Idle -> Borrowed), draw a latency sample,
//! release the block (Borrowed -> Idle). Between calls only the pool's free
//! registry and the scheduler's own random stream carry state.
//!
//! When the pool is exhausted the cycle still runs, without a block, and is
//! counted in `exhausted_cycles`.

mod variant;

pub use variant::{SchedulerProfile, SchedulerVariant};

use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;
use tracing::trace;

use crate::alloc::{BlockHandle, BlockPool};
use crate::error::SchedulerError;
use crate::latency::LatencyModel;

/// Outcome of one cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleReport {
    pub latency_us: u64,
    /// False when the pool had no free block for this cycle.
    pub borrowed: bool,
}

enum CycleState {
    Idle,
    Borrowed(BlockHandle),
}

/// A scheduler bound to a pool it does not own.
///
/// Each instance owns its random stream; use one instance per thread. Several
/// instances may share a pool concurrently.
pub struct Scheduler<'pool> {
    pool: &'pool BlockPool,
    model: LatencyModel,
    profile: SchedulerProfile,
    rng: Xoshiro256PlusPlus,
    cycles: u64,
    exhausted_cycles: u64,
}

impl<'pool> Scheduler<'pool> {
    /// A scheduler of a built-in variant using the default latency model.
    pub fn new(pool: &'pool BlockPool, variant: SchedulerVariant) -> Self {
        Self::build(pool, LatencyModel::default(), variant.profile())
    }

    pub fn with_profile(
        pool: &'pool BlockPool,
        model: LatencyModel,
        profile: SchedulerProfile,
    ) -> Result<Self, SchedulerError> {
        model.validate()?;
        profile.validate()?;
        Ok(Self::build(pool, model, profile))
    }

    fn build(pool: &'pool BlockPool, model: LatencyModel, profile: SchedulerProfile) -> Self {
        Self {
            pool,
            model,
            profile,
            rng: Xoshiro256PlusPlus::seed_from_u64(profile.seed),
            cycles: 0,
            exhausted_cycles: 0,
        }
    }

    /// Runs one cycle and returns its latency in microseconds. Never fails.
    pub fn run(&mut self, load_percent: i32) -> u64 {
        self.run_cycle(load_percent).latency_us
    }

    pub fn run_cycle(&mut self, load_percent: i32) -> CycleReport {
        let mut state = match self.pool.allocate() {
            Some(handle) => CycleState::Borrowed(handle),
            None => {
                self.exhausted_cycles += 1;
                trace!(load_percent, "no free block, running cycle without one");
                CycleState::Idle
            }
        };

        if let CycleState::Borrowed(handle) = &mut state {
            self.touch_block(handle);
        }

        let latency_us = self
            .model
            .sample(load_percent, self.profile.jitter_scale, &mut self.rng);
        self.cycles += 1;

        let borrowed = match state {
            CycleState::Borrowed(handle) => {
                let released = self.pool.deallocate(handle);
                debug_assert!(released.is_ok(), "scheduler released a block it did not own");
                true
            }
            CycleState::Idle => false,
        };

        CycleReport {
            latency_us,
            borrowed,
        }
    }

    /// Stands in for the control loop's use of its working buffer.
    fn touch_block(&self, handle: &mut BlockHandle) {
        if let Ok(block) = self.pool.block_mut(handle) {
            let stamp = self.cycles.to_le_bytes();
            let len = stamp.len().min(block.len());
            block[..len].copy_from_slice(&stamp[..len]);
        }
    }

    pub fn profile(&self) -> SchedulerProfile {
        self.profile
    }

    pub fn model(&self) -> LatencyModel {
        self.model
    }

    pub fn pool(&self) -> &'pool BlockPool {
        self.pool
    }

    /// Cycles run since construction.
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Cycles that found the pool exhausted.
    pub fn exhausted_cycles(&self) -> u64 {
        self.exhausted_cycles
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mean_and_variance(samples: &[u64]) -> (f64, f64) {
        let n = samples.len() as f64;
        let mean = samples.iter().map(|&s| s as f64).sum::<f64>() / n;
        let variance = samples
            .iter()
            .map(|&s| (s as f64 - mean).powi(2))
            .sum::<f64>()
            / (n - 1.0);
        (mean, variance)
    }

    fn draw(scheduler: &mut Scheduler<'_>, load: i32, count: usize) -> Vec<u64> {
        (0..count).map(|_| scheduler.run(load)).collect()
    }

    #[test]
    fn test_same_variant_is_deterministic() {
        let pool_a = BlockPool::new(4, 256).unwrap();
        let pool_b = BlockPool::new(4, 256).unwrap();
        let mut a = Scheduler::new(&pool_a, SchedulerVariant::GeneralPurpose);
        let mut b = Scheduler::new(&pool_b, SchedulerVariant::GeneralPurpose);

        let loads = [10, 30, 50, 70, 90, 0, 100, 42];
        for _ in 0..50 {
            for load in loads {
                assert_eq!(a.run(load), b.run(load));
            }
        }
    }

    #[test]
    fn test_stream_follows_profile_seed() {
        let pool = BlockPool::new(2, 64).unwrap();
        let mut scheduler = Scheduler::new(&pool, SchedulerVariant::RealTime);
        assert!(std::ptr::eq(scheduler.pool(), &pool));
        assert_eq!(scheduler.model(), LatencyModel::default());

        let profile = scheduler.profile();
        let model = scheduler.model();
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(654_321);
        for load in [0, 10, 50, 90, 100] {
            let expected = model.sample(load, profile.jitter_scale, &mut rng);
            assert_eq!(scheduler.run(load), expected);
        }
    }

    #[test]
    fn test_variants_use_different_streams() {
        let pool = BlockPool::new(4, 256).unwrap();
        let mut general = Scheduler::new(&pool, SchedulerVariant::GeneralPurpose);
        let mut realtime = Scheduler::new(&pool, SchedulerVariant::RealTime);
        assert_ne!(draw(&mut general, 50, 20), draw(&mut realtime, 50, 20));
    }

    #[test]
    fn test_four_sigma_window() {
        let pool = BlockPool::new(2, 256).unwrap();
        let mut scheduler = Scheduler::new(&pool, SchedulerVariant::GeneralPurpose);
        let samples = draw(&mut scheduler, 50, 10_000);
        let inside = samples
            .iter()
            .filter(|&&s| (15_600..=16_400).contains(&s))
            .count();
        assert!(inside >= 9_990, "only {inside} of 10000 samples within 4 sigma");

        let (mean, _) = mean_and_variance(&samples);
        assert!((mean - 16_000.0).abs() < 10.0, "mean {mean}");
    }

    #[test]
    fn test_mean_increases_with_load() {
        let pool = BlockPool::new(2, 256).unwrap();
        let mut scheduler = Scheduler::new(&pool, SchedulerVariant::RealTime);
        let means: Vec<f64> = [0, 10, 30, 50, 70, 90, 100]
            .into_iter()
            .map(|load| mean_and_variance(&draw(&mut scheduler, load, 2_000)).0)
            .collect();
        assert!(means.windows(2).all(|pair| pair[0] < pair[1]), "{means:?}");
    }

    #[test]
    fn test_realtime_has_lower_variance() {
        let pool = BlockPool::new(2, 256).unwrap();
        let mut general = Scheduler::new(&pool, SchedulerVariant::GeneralPurpose);
        let mut realtime = Scheduler::new(&pool, SchedulerVariant::RealTime);

        let (_, general_var) = mean_and_variance(&draw(&mut general, 50, 5_000));
        let (_, realtime_var) = mean_and_variance(&draw(&mut realtime, 50, 5_000));
        assert!(realtime_var < general_var);
        // 0.70^2 = 0.49 of the general-purpose variance.
        let ratio = realtime_var / general_var;
        assert!((0.40..0.60).contains(&ratio), "variance ratio {ratio}");
    }

    #[test]
    fn test_cycles_return_their_block() {
        let pool = BlockPool::new(3, 64).unwrap();
        let mut scheduler = Scheduler::new(&pool, SchedulerVariant::GeneralPurpose);
        for load in 0..=100 {
            let report = scheduler.run_cycle(load);
            assert!(report.borrowed);
            assert_eq!(pool.free_count(), 3);
        }
        assert_eq!(scheduler.cycles(), 101);
        assert_eq!(scheduler.exhausted_cycles(), 0);
        assert_eq!(pool.stats().peak_in_use, 1);
    }

    #[test]
    fn test_exhausted_pool_is_absorbed() {
        let pool = BlockPool::new(1, 64).unwrap();
        let held = pool.allocate().unwrap();
        let mut scheduler = Scheduler::new(&pool, SchedulerVariant::RealTime);

        let report = scheduler.run_cycle(30);
        assert!(!report.borrowed);
        assert!(report.latency_us > 0);
        assert_eq!(scheduler.exhausted_cycles(), 1);
        assert_eq!(pool.free_count(), 0);

        pool.deallocate(held).unwrap();
        assert!(scheduler.run_cycle(30).borrowed);
        assert_eq!(pool.free_count(), 1);
    }

    #[test]
    fn test_exhaustion_does_not_change_samples() {
        let empty = BlockPool::new(1, 8).unwrap();
        let _held = empty.allocate().unwrap();
        let roomy = BlockPool::new(8, 8).unwrap();

        let mut starved = Scheduler::new(&empty, SchedulerVariant::GeneralPurpose);
        let mut fed = Scheduler::new(&roomy, SchedulerVariant::GeneralPurpose);
        assert_eq!(draw(&mut starved, 70, 100), draw(&mut fed, 70, 100));
    }

    #[test]
    fn test_custom_profile_validation() {
        let pool = BlockPool::new(1, 8).unwrap();
        let bad_profile = SchedulerProfile {
            jitter_scale: f64::NAN,
            seed: 1,
        };
        assert!(Scheduler::with_profile(&pool, LatencyModel::default(), bad_profile).is_err());

        let bad_model = LatencyModel {
            base_latency_us: -5.0,
            ..LatencyModel::default()
        };
        assert!(
            Scheduler::with_profile(&pool, bad_model, SchedulerProfile::REAL_TIME).is_err()
        );
    }

    #[test]
    fn test_schedulers_share_pool_across_threads() {
        let pool = BlockPool::new(2, 128).unwrap();
        let results = crossbeam::scope(|scope| {
            let workers: Vec<_> = SchedulerVariant::ALL
                .into_iter()
                .map(|variant| {
                    let pool = &pool;
                    scope.spawn(move |_| {
                        let mut scheduler = Scheduler::new(pool, variant);
                        draw(&mut scheduler, 50, 5_000)
                    })
                })
                .collect();
            workers
                .into_iter()
                .map(|worker| worker.join().unwrap())
                .collect::<Vec<_>>()
        })
        .unwrap();

        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|samples| samples.len() == 5_000));
        assert_eq!(pool.free_count(), 2);
        let stats = pool.stats();
        assert_eq!(stats.allocations, 10_000);
        assert_eq!(stats.deallocations, 10_000);
        assert_eq!(stats.exhaustions, 0);
    }
}
