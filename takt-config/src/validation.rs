//! Custom validation functions for configuration.

use std::collections::HashSet;

use validator::ValidationError;

use crate::pool::{PoolConfig, MAX_POOL_BYTES};
use crate::run::WorkloadConfig;

/// Workload names become part of output file names.
pub fn validate_workload_name(name: &str) -> Result<(), ValidationError> {
    let re = regex::Regex::new("^[A-Za-z0-9_-]+$")
        .map_err(|_| ValidationError::new("invalid_regex"))?;
    if name.len() <= 64 && re.is_match(name) {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_workload_name"))
    }
}

/// The pool's backing buffer is allocated up front in one piece.
pub fn validate_pool_bytes(pool: &PoolConfig) -> Result<(), ValidationError> {
    match pool.capacity.checked_mul(pool.chunk_size) {
        Some(bytes) if bytes <= MAX_POOL_BYTES => Ok(()),
        _ => Err(ValidationError::new("pool_too_large")),
    }
}

/// Two workloads with the same name would write to the same file.
pub fn validate_unique_workloads(workloads: &[WorkloadConfig]) -> Result<(), ValidationError> {
    let mut seen = HashSet::new();
    if workloads.iter().all(|w| seen.insert(w.name.as_str())) {
        Ok(())
    } else {
        Err(ValidationError::new("duplicate_workload_name"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn workload_names() {
        assert!(validate_workload_name("light").is_ok());
        assert!(validate_workload_name("burst_10-a").is_ok());
        assert!(validate_workload_name("").is_err());
        assert!(validate_workload_name("../etc").is_err());
        assert!(validate_workload_name("with space").is_err());
    }

    #[test]
    fn duplicate_workloads() {
        let workloads = vec![
            WorkloadConfig::new("light", 10),
            WorkloadConfig::new("light", 20),
        ];
        assert!(validate_unique_workloads(&workloads).is_err());
        assert!(validate_unique_workloads(&workloads[..1]).is_ok());
    }
}
