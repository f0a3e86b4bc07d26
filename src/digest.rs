//! Streaming accumulators and the 128-bit attribute digest.
//!
//! An [`Accumulator`] is a 64-bit streaming hash that can be finalized
//! without being consumed. [`widen`] uses that to stretch one accumulator
//! into 16 bytes: finalize, feed [`EXTENSION_BYTE`], finalize again.

use std::fmt;

use xxhash_rust::xxh64::Xxh64;

/// Byte fed between the two finalizations of a widened digest.
pub const EXTENSION_BYTE: u8 = 0xF3;

// =============================================================================
// AttrDigest
// =============================================================================

/// Opaque 16-byte digest of an attribute value.
///
/// Only equality is meaningful; byte order carries no ordering semantics.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
#[must_use]
pub struct AttrDigest([u8; 16]);

impl AttrDigest {
    /// Wrap raw digest bytes (e.g. read back from a dedup cache).
    #[inline]
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    #[inline]
    pub const fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }

    #[inline]
    pub const fn into_bytes(self) -> [u8; 16] {
        self.0
    }
}

impl From<AttrDigest> for [u8; 16] {
    fn from(d: AttrDigest) -> Self {
        d.0
    }
}

impl fmt::Display for AttrDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for b in &self.0 {
            write!(f, "{b:02x}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for AttrDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AttrDigest({self})")
    }
}

// =============================================================================
// Accumulator
// =============================================================================

/// A resettable streaming hash with non-consuming finalization.
///
/// Implementations must be concatenation-equivalent: feeding `"ab"` then
/// `"c"` yields the same state as feeding `"a"` then `"bc"`.
pub trait Accumulator: Send {
    /// Fresh accumulator in its initial state
    fn new() -> Self
    where
        Self: Sized;

    /// Return to the initial state
    fn reset(&mut self);

    /// Fold bytes into the running state
    fn update(&mut self, bytes: &[u8]);

    /// 8 digest bytes for everything fed so far; the state stays live
    fn finalize8(&self) -> [u8; 8];
}

/// XXH64 with seed 0, the default accumulator.
///
/// Digest bytes are the big-endian encoding of the 64-bit hash.
#[derive(Clone)]
pub struct Xxh64Accumulator {
    inner: Xxh64,
}

impl Accumulator for Xxh64Accumulator {
    #[inline]
    fn new() -> Self {
        Self { inner: Xxh64::new(0) }
    }

    #[inline]
    fn reset(&mut self) {
        self.inner.reset(0);
    }

    #[inline]
    fn update(&mut self, bytes: &[u8]) {
        self.inner.update(bytes);
    }

    #[inline]
    fn finalize8(&self) -> [u8; 8] {
        self.inner.digest().to_be_bytes()
    }
}

/// BLAKE3 accumulator, truncated to 8 bytes per finalization.
///
/// Slower than XXH64 but much harder to steer into collisions.
#[cfg(feature = "blake3")]
#[derive(Clone)]
pub struct Blake3Accumulator {
    inner: blake3::Hasher,
}

#[cfg(feature = "blake3")]
impl Accumulator for Blake3Accumulator {
    #[inline]
    fn new() -> Self {
        Self {
            inner: blake3::Hasher::new(),
        }
    }

    #[inline]
    fn reset(&mut self) {
        self.inner.reset();
    }

    #[inline]
    fn update(&mut self, bytes: &[u8]) {
        self.inner.update(bytes);
    }

    #[inline]
    fn finalize8(&self) -> [u8; 8] {
        let hash = self.inner.finalize();
        let mut out = [0u8; 8];
        out.copy_from_slice(&hash.as_bytes()[..8]);
        out
    }
}

/// Widen a live accumulator into a 16-byte digest.
///
/// Leaves [`EXTENSION_BYTE`] fed into `acc`, so calling this twice on the
/// same stream yields a different digest each time.
pub fn widen<A: Accumulator>(acc: &mut A) -> AttrDigest {
    let mut out = [0u8; 16];
    out[..8].copy_from_slice(&acc.finalize8());
    acc.update(&[EXTENSION_BYTE]);
    out[8..].copy_from_slice(&acc.finalize8());
    AttrDigest(out)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn xxh(data: &[u8]) -> [u8; 8] {
        let mut acc = Xxh64Accumulator::new();
        acc.update(data);
        acc.finalize8()
    }

    #[test]
    fn test_xxh64_reference_values() {
        assert_eq!(u64::from_be_bytes(xxh(b"")), 0xef46_db37_51d8_e999);
        assert_eq!(u64::from_be_bytes(xxh(b"a")), 0xd24e_c4f1_a98c_6e5b);
        assert_eq!(u64::from_be_bytes(xxh(b"abc")), 0x44bc_2cf5_ad77_0999);
    }

    #[test]
    fn test_update_is_concatenation_equivalent() {
        let mut a = Xxh64Accumulator::new();
        a.update(b"ab");
        a.update(b"c");

        let mut b = Xxh64Accumulator::new();
        b.update(b"a");
        b.update(b"bc");

        assert_eq!(a.finalize8(), b.finalize8());
        assert_eq!(a.finalize8(), xxh(b"abc"));
    }

    #[test]
    fn test_update_is_order_sensitive() {
        assert_ne!(xxh(b"ab"), xxh(b"ba"));
    }

    #[test]
    fn test_reset_restores_initial_state() {
        let mut acc = Xxh64Accumulator::new();
        acc.update(b"stale");
        acc.reset();
        acc.update(b"abc");
        assert_eq!(acc.finalize8(), xxh(b"abc"));
    }

    #[test]
    fn test_widen_is_two_finalizations() {
        let mut acc = Xxh64Accumulator::new();
        let digest = widen(&mut acc);
        // hi = XXH64(""), lo = XXH64("\xF3")
        assert_eq!(digest.to_string(), "ef46db3751d8e999ebce35852d8e7cfe");
        assert_eq!(&digest.as_bytes()[8..], &xxh(&[EXTENSION_BYTE]));
    }

    #[test]
    fn test_widen_extends_stream() {
        let mut acc = Xxh64Accumulator::new();
        acc.update(b"payload");
        let first = widen(&mut acc);
        let second = widen(&mut acc);
        assert_ne!(first, second);
    }

    #[cfg(feature = "blake3")]
    #[test]
    fn test_blake3_widen() {
        let mut acc = Blake3Accumulator::new();
        acc.update(b"abc");
        let digest = widen(&mut acc);
        let expected = blake3::hash(b"abc");
        assert_eq!(&digest.as_bytes()[..8], &expected.as_bytes()[..8]);

        let mut fresh = Blake3Accumulator::new();
        fresh.update(b"abc");
        fresh.reset();
        fresh.update(b"abc");
        assert_eq!(widen(&mut fresh), digest);
    }

    #[test]
    fn test_digest_bytes_round_trip() {
        let bytes = [7u8; 16];
        let d = AttrDigest::from_bytes(bytes);
        assert_eq!(d.into_bytes(), bytes);
        assert_eq!(<[u8; 16]>::from(d), bytes);
        assert_eq!(format!("{d:?}"), format!("AttrDigest({})", "07".repeat(16)));
    }
}
