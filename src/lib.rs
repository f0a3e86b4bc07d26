//! attr-hash - Deterministic structural hashing of telemetry attributes
//!
//! Maps an attribute [`Value`] or [`AttrMap`] to a 16-byte [`AttrDigest`].
//! Equal values hash equal regardless of map insertion order; values that
//! differ in type, content, key set or nesting are overwhelmingly unlikely
//! to collide. Intended for deduplicating and grouping telemetry records,
//! not for adversarial settings.
//!
//! ## Modules
//! - `value`: attribute value model
//! - `encode`: canonical tagged byte stream
//! - `digest`: streaming accumulators and 64 to 128-bit widening
//! - `state`: reusable scratch state
//! - `pool`: shared state pool and entry points
//!
//! ## Usage
//!
//! ```
//! use attr_hash::{map_hash, AttrMap, Value};
//!
//! let mut a = AttrMap::new();
//! a.insert("b", 2);
//! a.insert("a", "x");
//!
//! let mut b = AttrMap::new();
//! b.insert("a", "x");
//! b.insert("b", 2);
//!
//! assert_eq!(map_hash(&a), map_hash(&b));
//!
//! b.insert("a", Value::str("y"));
//! assert_ne!(map_hash(&a), map_hash(&b));
//! ```

// =============================================================================
// Core modules
// =============================================================================

/// Attribute value model
pub mod value;

/// Canonical encoder and marker bytes
pub mod encode;

/// Accumulators and digest type
pub mod digest;

/// Hashing scratch state
pub mod state;

/// State pool
pub mod pool;

/// Pool and depth configuration
pub mod config;

/// Error types
pub mod error;

/// Parallel batch hashing
#[cfg(feature = "parallel")]
pub mod parallel;

/// Prelude for common imports
pub mod prelude;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::{HashConfig, PoolConfig};
pub use digest::{Accumulator, AttrDigest, Xxh64Accumulator};
#[cfg(feature = "blake3")]
pub use digest::Blake3Accumulator;
pub use error::{HashError, HashResult};
pub use pool::{HashStatePool, PooledState};
pub use state::HashState;
pub use value::{AttrMap, Value};

#[cfg(feature = "parallel")]
pub use parallel::{par_map_hashes, par_value_hashes};

// =============================================================================
// Entry points
// =============================================================================

/// Order-insensitive digest of a map, using the global state pool.
pub fn map_hash(map: &AttrMap) -> AttrDigest {
    HashStatePool::global().map_hash(map)
}

/// Digest of a value, using the global state pool.
pub fn value_hash(value: &Value) -> AttrDigest {
    HashStatePool::global().value_hash(value)
}

/// [`map_hash`] that fails instead of hashing input nested past `config.max_depth`.
pub fn try_map_hash(map: &AttrMap, config: &HashConfig) -> HashResult<AttrDigest> {
    HashStatePool::global().try_map_hash(map, config)
}

/// [`value_hash`] that fails instead of hashing input nested past `config.max_depth`.
pub fn try_value_hash(value: &Value, config: &HashConfig) -> HashResult<AttrDigest> {
    HashStatePool::global().try_value_hash(value, config)
}

// =============================================================================
// Tests
// =============================================================================
