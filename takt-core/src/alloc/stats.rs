//! ## takt-core::alloc::stats
//! **Block pool usage tracking**
//!
//! Counters are updated with relaxed atomics right after the pool's critical
//! section, so a snapshot may be one operation behind under contention.

use std::sync::atomic::{AtomicUsize, Ordering};

/// Point-in-time view of a `BlockPool`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PoolStats {
    pub capacity: usize,
    pub chunk_size: usize,
    /// Blocks currently held by callers.
    pub in_use: usize,
    /// Blocks currently in the free registry.
    pub free: usize,
    /// Highest `in_use` observed since construction.
    pub peak_in_use: usize,
    pub allocations: usize,
    pub deallocations: usize,
    /// `allocate()` calls that found the registry empty.
    pub exhaustions: usize,
    /// `deallocate()` calls refused with `InvalidHandle`.
    pub rejected_releases: usize,
}

/// Live counters owned by a pool.
#[derive(Debug, Default)]
pub(crate) struct PoolCounters {
    allocations: AtomicUsize,
    deallocations: AtomicUsize,
    exhaustions: AtomicUsize,
    rejected_releases: AtomicUsize,
    peak_in_use: AtomicUsize,
}

impl PoolCounters {
    #[inline]
    pub(crate) fn record_allocation(&self, in_use: usize) {
        self.allocations.fetch_add(1, Ordering::Relaxed);
        self.peak_in_use.fetch_max(in_use, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_deallocation(&self) {
        self.deallocations.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_exhaustion(&self) {
        self.exhaustions.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_rejected_release(&self) {
        self.rejected_releases.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self, capacity: usize, chunk_size: usize, free: usize) -> PoolStats {
        PoolStats {
            capacity,
            chunk_size,
            in_use: capacity - free,
            free,
            peak_in_use: self.peak_in_use.load(Ordering::Relaxed),
            allocations: self.allocations.load(Ordering::Relaxed),
            deallocations: self.deallocations.load(Ordering::Relaxed),
            exhaustions: self.exhaustions.load(Ordering::Relaxed),
            rejected_releases: self.rejected_releases.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_start_at_zero() {
        let counters = PoolCounters::default();
        let stats = counters.snapshot(8, 64, 8);
        assert_eq!(stats.in_use, 0);
        assert_eq!(stats.allocations, 0);
        assert_eq!(stats.peak_in_use, 0);
    }

    #[test]
    fn test_peak_keeps_maximum() {
        let counters = PoolCounters::default();
        counters.record_allocation(1);
        counters.record_allocation(3);
        counters.record_deallocation();
        counters.record_allocation(2);

        let stats = counters.snapshot(4, 16, 2);
        assert_eq!(stats.peak_in_use, 3);
        assert_eq!(stats.allocations, 3);
        assert_eq!(stats.deallocations, 1);
        assert_eq!(stats.in_use, 2);
    }

    #[test]
    fn test_exhaustion_and_rejection_counts() {
        let counters = PoolCounters::default();
        for _ in 0..5 {
            counters.record_exhaustion();
        }
        counters.record_rejected_release();

        let stats = counters.snapshot(1, 1, 0);
        assert_eq!(stats.exhaustions, 5);
        assert_eq!(stats.rejected_releases, 1);
    }
}
