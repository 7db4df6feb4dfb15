//! ## takt-core::alloc::pool
//! **Fixed-size block pool**
//!
//! One contiguous buffer of `capacity * chunk_size` bytes, carved into
//! `capacity` blocks at construction and never resized. Free blocks are
//! tracked by index in a stack, so the most recently released block is the
//! next one handed out.
//!
//! A `BlockHandle` is the only proof of ownership of a block: it is neither
//! `Clone` nor `Copy`, and `deallocate` consumes it. Handles carry the id of
//! the pool that issued them, and every slot carries a live bit, so foreign
//! handles and double releases are refused with `PoolError::InvalidHandle`
//! instead of corrupting the free registry.
use std::cell::UnsafeCell;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;
use tracing::trace;

use crate::alloc::stats::{PoolCounters, PoolStats};
use crate::error::{HandleFault, PoolError};

static NEXT_POOL_ID: AtomicU64 = AtomicU64::new(1);

/// Exclusive claim on one block of a `BlockPool`.
///
/// Dropping a handle without `deallocate` keeps its block out of the pool
/// for the pool's lifetime.
#[must_use = "a dropped handle never returns its block to the pool"]
#[derive(Debug, PartialEq, Eq)]
pub struct BlockHandle {
    pool_id: u64,
    index: usize,
}

impl BlockHandle {
    /// Position of the block inside the pool's backing buffer, in blocks.
    pub fn index(&self) -> usize {
        self.index
    }
}

struct FreeRegistry {
    free: Vec<usize>,
    live: Vec<bool>,
}

pub struct BlockPool {
    id: u64,
    chunk_size: usize,
    capacity: usize,
    storage: Box<[UnsafeCell<u8>]>,
    registry: Mutex<FreeRegistry>,
    counters: PoolCounters,
}

// SAFETY: the only shared mutable state outside `registry` is `storage`, and
// a block's bytes are only reachable through `block_mut`, which requires a
// `&mut BlockHandle`. At most one handle exists per allocated slot, so no two
// threads can touch the same block concurrently.
unsafe impl Sync for BlockPool {}

impl BlockPool {
    /// Carves `capacity` blocks of `chunk_size` bytes out of one buffer.
    /// All blocks start free.
    pub fn new(capacity: usize, chunk_size: usize) -> Result<Self, PoolError> {
        let invalid = PoolError::InvalidConfiguration {
            capacity,
            chunk_size,
        };
        if capacity == 0 || chunk_size == 0 {
            return Err(invalid);
        }
        let bytes = capacity.checked_mul(chunk_size).ok_or(invalid)?;

        let storage = std::iter::repeat_with(|| UnsafeCell::new(0u8))
            .take(bytes)
            .collect();
        // Reverse order so the first allocation hands out block 0.
        let free = (0..capacity).rev().collect();

        Ok(Self {
            id: NEXT_POOL_ID.fetch_add(1, Ordering::Relaxed),
            chunk_size,
            capacity,
            storage,
            registry: Mutex::new(FreeRegistry {
                free,
                live: vec![false; capacity],
            }),
            counters: PoolCounters::default(),
        })
    }

    /// Takes one block out of the free registry.
    /// Returns `None` when every block is held; callers treat that as a normal outcome.
    pub fn allocate(&self) -> Option<BlockHandle> {
        let claimed = {
            let mut registry = self.registry.lock();
            registry.free.pop().map(|index| {
                registry.live[index] = true;
                (index, self.capacity - registry.free.len())
            })
        };

        match claimed {
            Some((index, in_use)) => {
                self.counters.record_allocation(in_use);
                Some(BlockHandle {
                    pool_id: self.id,
                    index,
                })
            }
            None => {
                self.counters.record_exhaustion();
                trace!(capacity = self.capacity, "block pool exhausted");
                None
            }
        }
    }

    /// Returns a block to the free registry.
    pub fn deallocate(&self, handle: BlockHandle) -> Result<(), PoolError> {
        let released = self.check_handle(&handle).and_then(|()| {
            let mut registry = self.registry.lock();
            if !registry.live[handle.index] {
                return Err(PoolError::InvalidHandle {
                    index: handle.index,
                    fault: HandleFault::NotAllocated,
                });
            }
            registry.live[handle.index] = false;
            registry.free.push(handle.index);
            Ok(())
        });

        match released {
            Ok(()) => self.counters.record_deallocation(),
            Err(_) => self.counters.record_rejected_release(),
        }
        released
    }

    /// Gives the holder of `handle` access to its block's bytes.
    ///
    /// Contents are whatever the previous holder left behind; the pool never
    /// clears a block on release.
    pub fn block_mut<'a>(&'a self, handle: &'a mut BlockHandle) -> Result<&'a mut [u8], PoolError> {
        self.check_handle(handle)?;
        let offset = handle.index * self.chunk_size;
        // SAFETY: `check_handle` bounds `offset + chunk_size` by the buffer
        // length. The pointer comes from the whole slice, so it may cover the
        // full block, and `UnsafeCell` permits writes through `&self`. The
        // unique `&mut BlockHandle` borrowed for `'a` rules out a second
        // reference to the same block for as long as this one lives.
        unsafe {
            let start = UnsafeCell::raw_get(self.storage.as_ptr().add(offset));
            Ok(std::slice::from_raw_parts_mut(start, self.chunk_size))
        }
    }

    fn check_handle(&self, handle: &BlockHandle) -> Result<(), PoolError> {
        let fault = if handle.pool_id != self.id {
            HandleFault::ForeignPool
        } else if handle.index >= self.capacity {
            HandleFault::OutOfBounds
        } else {
            return Ok(());
        };
        Err(PoolError::InvalidHandle {
            index: handle.index,
            fault,
        })
    }

    /// Number of blocks currently in the free registry.
    pub fn free_count(&self) -> usize {
        self.registry.lock().free.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn stats(&self) -> PoolStats {
        self.counters
            .snapshot(self.capacity, self.chunk_size, self.free_count())
    }
}

impl std::fmt::Debug for BlockPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockPool")
            .field("id", &self.id)
            .field("capacity", &self.capacity)
            .field("chunk_size", &self.chunk_size)
            .field("free", &self.free_count())
            .finish()
    }
}
