//! Block pool sizing.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::validation::validate_pool_bytes;

/// Upper bound on `capacity * chunk_size`.
pub const MAX_POOL_BYTES: usize = 1 << 30;

#[derive(Debug, Serialize, Deserialize, Validate, Clone, PartialEq)]
#[validate(schema(function = "validate_pool_bytes"))]
pub struct PoolConfig {
    /// Number of blocks.
    #[serde(default = "default_capacity")]
    #[validate(range(min = 1, max = 1_048_576))]
    pub capacity: usize,

    /// Bytes per block.
    #[serde(default = "default_chunk_size")]
    #[validate(range(min = 1, max = 1_048_576))]
    pub chunk_size: usize,
}

fn default_capacity() -> usize {
    512
}

fn default_chunk_size() -> usize {
    256
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            capacity: default_capacity(),
            chunk_size: default_chunk_size(),
        }
    }
}
