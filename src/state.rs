//! Reusable hashing scratch state.

use smallvec::SmallVec;

use crate::digest::{widen, Accumulator, AttrDigest, Xxh64Accumulator};

/// Mutable scratch for one hash computation.
///
/// Owns the live accumulator plus the buffers the encoder reuses, so a
/// pooled state hashes without allocating once its buffers have grown.
/// A state belongs to exactly one caller between [`reset`](Self::reset)
/// and [`finish`](Self::finish).
pub struct HashState<A: Accumulator = Xxh64Accumulator> {
    pub(crate) acc: A,
    /// Tagged key/string fragment under construction
    pub(crate) scratch: Vec<u8>,
    /// Stack of entry indices, one sorted segment per open map
    pub(crate) key_order: SmallVec<[usize; 16]>,
    /// Little-endian number payload
    pub(crate) num_buf: [u8; 8],
}

impl<A: Accumulator> HashState<A> {
    /// Create a state with default buffer capacities
    pub fn new() -> Self {
        Self::with_capacity(128, 16)
    }

    /// Create a state with the given scratch and key-order capacities
    pub fn with_capacity(scratch: usize, keys: usize) -> Self {
        Self {
            acc: A::new(),
            scratch: Vec::with_capacity(scratch),
            key_order: SmallVec::with_capacity(keys),
            num_buf: [0; 8],
        }
    }

    /// Clear the accumulator and truncate buffers, keeping their capacity.
    pub fn reset(&mut self) {
        self.acc.reset();
        self.scratch.clear();
        self.key_order.clear();
    }

    /// Fold a fragment into the running hash.
    #[inline]
    pub fn feed(&mut self, bytes: &[u8]) {
        self.acc.update(bytes);
    }

    /// Produce the 128-bit digest of everything fed since the last reset.
    ///
    /// Call once per logical hash: finishing extends the stream with the
    /// extension byte, so a second call returns a different digest.
    pub fn finish(&mut self) -> AttrDigest {
        widen(&mut self.acc)
    }

    /// Heap bytes held by the scratch buffers
    pub fn retained_capacity(&self) -> usize {
        let keys = if self.key_order.spilled() {
            self.key_order.capacity() * size_of::<usize>()
        } else {
            0
        };
        self.scratch.capacity() + keys
    }
}

impl<A: Accumulator> Default for HashState<A> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reset_keeps_capacity() {
        let mut state: HashState = HashState::with_capacity(8, 4);
        state.scratch.extend_from_slice(&[1u8; 300]);
        state.key_order.extend(0..40);
        let cap = state.scratch.capacity();

        state.reset();
        assert!(state.scratch.is_empty());
        assert!(state.key_order.is_empty());
        assert_eq!(state.scratch.capacity(), cap);
        assert!(state.retained_capacity() >= 300);
    }

    #[test]
    fn test_reset_clears_accumulator() {
        let mut dirty: HashState = HashState::new();
        dirty.feed(b"left over from an earlier call");
        dirty.reset();
        dirty.feed(b"abc");

        let mut fresh: HashState = HashState::new();
        fresh.feed(b"abc");

        assert_eq!(dirty.finish(), fresh.finish());
    }

    #[test]
    fn test_finish_twice_changes_digest() {
        let mut state: HashState = HashState::new();
        state.feed(b"abc");
        let first = state.finish();
        assert_ne!(first, state.finish());
    }
}
