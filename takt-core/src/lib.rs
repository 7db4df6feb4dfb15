//! # takt-core
//!
//! Memory discipline of a real-time control loop, modeled in two parts:
//!
//! - `alloc`: a fixed-capacity pool of uniformly sized blocks with O(1)
//!   allocate/deallocate and no fragmentation, safe to share between threads.
//! - `sched`: synthetic schedulers that borrow one block per cycle and report
//!   a latency sample drawn from `latency::LatencyModel`.
//!
//! ### Expectations:
//! - No heap allocation after pool construction
//! - Exhaustion is a value (`None`), never a panic or a wait
//! - Same variant + same seed + same loads => bit-identical latency sequence
//!
//! The crate has no file-format, CLI or logging-sink contract of its own;
//! see `takt-harness` for the workload driver.

pub mod alloc;
pub mod error;
pub mod latency;
pub mod sched;

pub mod prelude {
    pub use crate::alloc::*;
    pub use crate::error::*;
    pub use crate::latency::*;
    pub use crate::sched::*;
}

pub use alloc::{BlockHandle, BlockPool, PoolStats};
pub use error::{HandleFault, PoolError, SchedulerError};
pub use latency::LatencyModel;
pub use sched::{CycleReport, Scheduler, SchedulerProfile, SchedulerVariant};
