//! ## takt-core::alloc
//! **Fixed-size block pool**
//!
//! ### Key Submodules:
//! - `pool/`: the block pool, its handles and free registry
//! - `stats/`: allocation counters and point-in-time snapshots

pub mod pool;
pub mod stats;

pub use pool::{BlockHandle, BlockPool};
pub use stats::PoolStats;
