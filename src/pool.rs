//! Shared pool of hashing states.
//!
//! Pooling only cuts allocation under high call volume: a fresh
//! [`HashState`] per call produces identical digests.

use std::ops::{Deref, DerefMut};
use std::sync::LazyLock;

use parking_lot::Mutex;
use tracing::{debug, trace};

use crate::config::{HashConfig, PoolConfig};
use crate::digest::{Accumulator, AttrDigest, Xxh64Accumulator};
use crate::encode::{check_depth, check_map_depth};
use crate::error::HashResult;
use crate::state::HashState;
use crate::value::{AttrMap, Value};

static GLOBAL: LazyLock<HashStatePool> = LazyLock::new(HashStatePool::default);

// =============================================================================
// HashStatePool
// =============================================================================

/// Thread-safe pool of idle [`HashState`]s.
///
/// The lock guards only the idle list and is never held while hashing.
pub struct HashStatePool<A: Accumulator = Xxh64Accumulator> {
    idle: Mutex<Vec<HashState<A>>>,
    config: PoolConfig,
}

impl HashStatePool {
    /// The process-wide pool behind [`map_hash`](crate::map_hash) and
    /// [`value_hash`](crate::value_hash).
    pub fn global() -> &'static Self {
        &GLOBAL
    }
}

impl<A: Accumulator> Default for HashStatePool<A> {
    fn default() -> Self {
        Self::new(PoolConfig::default())
    }
}

impl<A: Accumulator> HashStatePool<A> {
    /// Create an empty pool. Use [`with_config`](Self::with_config) to
    /// validate untrusted sizes first.
    pub fn new(config: PoolConfig) -> Self {
        Self {
            idle: Mutex::new(Vec::new()),
            config,
        }
    }

    /// Create an empty pool after validating `config`.
    pub fn with_config(config: PoolConfig) -> HashResult<Self> {
        config.validate()?;
        Ok(Self::new(config))
    }

    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    /// Number of states waiting for reuse.
    pub fn idle_len(&self) -> usize {
        self.idle.lock().len()
    }

    /// Check out a reset state. It goes back to the pool when the guard drops.
    pub fn checkout(&self) -> PooledState<'_, A> {
        let popped = self.idle.lock().pop();
        let mut state = popped.unwrap_or_else(|| {
            trace!("hash state pool empty, allocating");
            HashState::with_capacity(self.config.scratch_capacity, self.config.key_capacity)
        });
        state.reset();
        PooledState {
            pool: self,
            state: Some(state),
        }
    }

    fn release(&self, state: HashState<A>) {
        let retained = state.retained_capacity();
        if retained > self.config.max_retained_capacity {
            debug!(retained, limit = self.config.max_retained_capacity, "dropping oversized hash state");
            return;
        }
        let mut idle = self.idle.lock();
        if idle.len() >= self.config.max_idle {
            drop(idle);
            debug!(max_idle = self.config.max_idle, "hash state pool full, dropping state");
            return;
        }
        idle.push(state);
    }

    /// Order-insensitive digest of a map's entries.
    pub fn map_hash(&self, map: &AttrMap) -> AttrDigest {
        let mut state = self.checkout();
        state.write_map(map);
        state.finish()
    }

    /// Digest of any value.
    pub fn value_hash(&self, value: &Value) -> AttrDigest {
        let mut state = self.checkout();
        state.write_value(value);
        state.finish()
    }

    /// [`map_hash`](Self::map_hash) that rejects over-deep input first.
    pub fn try_map_hash(&self, map: &AttrMap, config: &HashConfig) -> HashResult<AttrDigest> {
        check_map_depth(map, config)?;
        Ok(self.map_hash(map))
    }

    /// [`value_hash`](Self::value_hash) that rejects over-deep input first.
    pub fn try_value_hash(&self, value: &Value, config: &HashConfig) -> HashResult<AttrDigest> {
        check_depth(value, config)?;
        Ok(self.value_hash(value))
    }
}

// =============================================================================
// PooledState
// =============================================================================

/// A state checked out of a [`HashStatePool`].
///
/// Derefs to [`HashState`]; returned to the pool on drop, so it cannot be
/// used after return.
pub struct PooledState<'a, A: Accumulator = Xxh64Accumulator> {
    pool: &'a HashStatePool<A>,
    state: Option<HashState<A>>,
}

impl<A: Accumulator> Deref for PooledState<'_, A> {
    type Target = HashState<A>;

    fn deref(&self) -> &Self::Target {
        // Only taken in drop
        self.state.as_ref().unwrap_or_else(|| unreachable!())
    }
}

impl<A: Accumulator> DerefMut for PooledState<'_, A> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.state.as_mut().unwrap_or_else(|| unreachable!())
    }
}

impl<A: Accumulator> Drop for PooledState<'_, A> {
    fn drop(&mut self) {
        if let Some(state) = self.state.take() {
            self.pool.release(state);
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checkout_returns_on_drop() {
        let pool: HashStatePool = HashStatePool::default();
        assert_eq!(pool.idle_len(), 0);
        {
            let _a = pool.checkout();
            let _b = pool.checkout();
            assert_eq!(pool.idle_len(), 0);
        }
        assert_eq!(pool.idle_len(), 2);

        let _c = pool.checkout();
        assert_eq!(pool.idle_len(), 1);
    }

    #[test]
    fn test_max_idle_is_respected() {
        let pool: HashStatePool = HashStatePool::new(PoolConfig::with_max_idle(1));
        {
            let _a = pool.checkout();
            let _b = pool.checkout();
        }
        assert_eq!(pool.idle_len(), 1);
    }

    #[test]
    fn test_oversized_state_is_dropped() {
        let config = PoolConfig {
            max_retained_capacity: 256,
            scratch_capacity: 16,
            ..PoolConfig::default()
        };
        let pool: HashStatePool = HashStatePool::with_config(config).unwrap();
        let big = Value::str("x".repeat(1024));
        let _ = pool.value_hash(&big);
        assert_eq!(pool.idle_len(), 0);

        let _ = pool.value_hash(&Value::str("small"));
        assert_eq!(pool.idle_len(), 1);
    }

    #[test]
    fn test_dirty_state_is_reset_on_checkout() {
        let pool: HashStatePool = HashStatePool::default();
        {
            let mut state = pool.checkout();
            state.feed(b"abandoned without finishing");
        }
        let value = Value::Int(42);
        let pooled = pool.value_hash(&value);

        let mut fresh: HashState = HashState::new();
        fresh.write_value(&value);
        assert_eq!(pooled, fresh.finish());
    }

    #[test]
    fn test_invalid_config_rejected() {
        assert!(HashStatePool::<Xxh64Accumulator>::with_config(PoolConfig::with_max_idle(0)).is_err());
    }

    #[test]
    fn test_try_hash_matches_plain_hash() {
        let pool: HashStatePool = HashStatePool::default();
        let value = Value::slice([Value::slice([1])]);
        assert_eq!(
            pool.try_value_hash(&value, &HashConfig::default()).unwrap(),
            pool.value_hash(&value)
        );
        assert!(pool.try_value_hash(&value, &HashConfig::new(1)).is_err());
    }

    #[test]
    fn test_global_pool_is_shared() {
        assert!(std::ptr::eq(HashStatePool::global(), HashStatePool::global()));
    }
}
