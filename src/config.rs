//! Pool and hashing limits.

use crate::error::{HashError, HashResult};

/// Default maximum container nesting for checked hashing.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Default number of idle states kept by a pool.
pub const DEFAULT_MAX_IDLE: usize = 64;

/// Limits for the depth-checked entry points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashConfig {
    /// Maximum container nesting depth; a top-level map or slice is depth 1.
    /// Default: 128
    pub max_depth: usize,
}

impl Default for HashConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl HashConfig {
    /// Create config with a custom depth limit.
    pub const fn new(max_depth: usize) -> Self {
        Self { max_depth }
    }

    /// Tight limit for untrusted, externally sourced attributes.
    pub const fn untrusted() -> Self {
        Self { max_depth: 16 }
    }
}

/// Sizing for a [`HashStatePool`](crate::pool::HashStatePool).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolConfig {
    /// Idle states retained; extra returned states are dropped.
    /// Default: 64
    pub max_idle: usize,
    /// Initial capacity of each state's fragment buffer.
    /// Default: 128
    pub scratch_capacity: usize,
    /// Initial capacity of each state's key-order stack.
    /// Default: 16
    pub key_capacity: usize,
    /// States whose buffers grew past this many bytes are dropped on return
    /// instead of pinning the memory. Default: 64 KiB
    pub max_retained_capacity: usize,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_idle: DEFAULT_MAX_IDLE,
            scratch_capacity: 128,
            key_capacity: 16,
            max_retained_capacity: 64 * 1024,
        }
    }
}

impl PoolConfig {
    /// Config with a custom idle limit and default buffer sizes.
    pub fn with_max_idle(max_idle: usize) -> Self {
        Self {
            max_idle,
            ..Self::default()
        }
    }

    /// Check that the sizes are consistent.
    pub fn validate(&self) -> HashResult<()> {
        if self.max_idle == 0 {
            return Err(HashError::invalid_config("max_idle must be non-zero"));
        }
        if self.scratch_capacity > self.max_retained_capacity {
            return Err(HashError::invalid_config(format!(
                "scratch_capacity ({}) exceeds max_retained_capacity ({})",
                self.scratch_capacity, self.max_retained_capacity
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        assert!(PoolConfig::default().validate().is_ok());
        assert_eq!(HashConfig::default().max_depth, DEFAULT_MAX_DEPTH);
        assert!(HashConfig::untrusted().max_depth < DEFAULT_MAX_DEPTH);
    }

    #[test]
    fn test_invalid_pool_config() {
        assert!(PoolConfig::with_max_idle(0).validate().is_err());

        let config = PoolConfig {
            scratch_capacity: 1 << 20,
            ..PoolConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("scratch_capacity"));
    }
}
