use std::fmt;

use thiserror::Error;

/// Why a handle was refused by `BlockPool::deallocate` or `BlockPool::block_mut`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleFault {
    /// Index is past the end of the pool.
    OutOfBounds,
    /// Handle was issued by another pool.
    ForeignPool,
    /// Slot is already free (double release).
    NotAllocated,
}

impl fmt::Display for HandleFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            HandleFault::OutOfBounds => "index out of bounds",
            HandleFault::ForeignPool => "issued by a different pool",
            HandleFault::NotAllocated => "block is not currently allocated",
        };
        f.write_str(msg)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PoolError {
    #[error("Invalid pool configuration: capacity={capacity}, chunk_size={chunk_size}")]
    InvalidConfiguration { capacity: usize, chunk_size: usize },

    #[error("Invalid block handle #{index}: {fault}")]
    InvalidHandle { index: usize, fault: HandleFault },
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SchedulerError {
    #[error("Invalid scheduler configuration: {0}")]
    InvalidConfiguration(String),
}
