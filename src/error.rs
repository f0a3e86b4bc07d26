//! Error types for attr-hash.
//!
//! The plain hashing entry points are total and never return these; only the
//! depth-checked variants and configuration validation do.

use thiserror::Error;

/// Errors that can occur when hashing under caller-imposed limits.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HashError {
    /// Input nests containers deeper than the configured limit
    #[error("attribute value nests deeper than the limit of {limit} (found depth {depth})")]
    DepthExceeded {
        /// Configured maximum container depth
        limit: usize,
        /// First depth observed above the limit
        depth: usize,
    },

    /// Pool or hash configuration is inconsistent
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type alias for checked hashing operations.
pub type HashResult<T> = Result<T, HashError>;

impl HashError {
    /// Create a configuration error with a message.
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }
}
