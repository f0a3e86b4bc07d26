//! Attribute value model
//!
//! - `Value`: closed tagged union of the supported attribute shapes
//! - `AttrMap`: string-keyed map with unique keys, kept in insertion order
//!
//! Insertion order is preserved for iteration only; hashing always visits
//! keys in byte-wise sorted order.

use compact_str::CompactString;

/// A semi-structured attribute value.
///
/// Slices may hold heterogeneous variants and maps nest arbitrarily.
/// Adding a variant here is a compile error in the encoder until a marker
/// byte is assigned to it.
#[derive(Debug, Clone, Default)]
pub enum Value {
    /// Absent / null value
    #[default]
    Empty,
    Bool(bool),
    Int(i64),
    Double(f64),
    Str(CompactString),
    Bytes(Vec<u8>),
    /// Ordered list of values
    Slice(Vec<Value>),
    /// Unordered string-keyed map of values
    Map(AttrMap),
}

impl Value {
    /// Create a string value
    #[inline]
    pub fn str(s: impl Into<CompactString>) -> Self {
        Self::Str(s.into())
    }

    /// Create a byte string value
    #[inline]
    pub fn bytes(b: impl Into<Vec<u8>>) -> Self {
        Self::Bytes(b.into())
    }

    /// Create a slice value from anything convertible to values
    pub fn slice<T: Into<Value>>(items: impl IntoIterator<Item = T>) -> Self {
        Self::Slice(items.into_iter().map(Into::into).collect())
    }

    /// Short name of the variant, for diagnostics
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Double(_) => "double",
            Self::Str(_) => "str",
            Self::Bytes(_) => "bytes",
            Self::Slice(_) => "slice",
            Self::Map(_) => "map",
        }
    }

    /// Whether this value is a container (slice or map)
    #[inline]
    pub const fn is_container(&self) -> bool {
        matches!(self, Self::Slice(_) | Self::Map(_))
    }
}

/// Structural equality: maps compare independent of insertion order,
/// doubles compare by bit pattern (so equal values always hash equal).
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Empty, Self::Empty) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Double(a), Self::Double(b)) => a.to_bits() == b.to_bits(),
            (Self::Str(a), Self::Str(b)) => a == b,
            (Self::Bytes(a), Self::Bytes(b)) => a == b,
            (Self::Slice(a), Self::Slice(b)) => a == b,
            (Self::Map(a), Self::Map(b)) => a == b,
            _ => false,
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Double(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Str(CompactString::from(v))
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Str(CompactString::from(v))
    }
}

impl From<CompactString> for Value {
    fn from(v: CompactString) -> Self {
        Self::Str(v)
    }
}

impl From<&[u8]> for Value {
    fn from(v: &[u8]) -> Self {
        Self::Bytes(v.to_vec())
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Self::Bytes(v)
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Self::Slice(v)
    }
}

impl From<AttrMap> for Value {
    fn from(v: AttrMap) -> Self {
        Self::Map(v)
    }
}

// =============================================================================
// AttrMap
// =============================================================================

/// String-keyed attribute map.
///
/// Stored as a flat `Vec` of pairs (attribute sets are small, so linear
/// lookup beats hashing). `insert` replaces in place, which keeps keys unique.
#[derive(Debug, Clone, Default)]
pub struct AttrMap {
    entries: Vec<(CompactString, Value)>,
}

impl AttrMap {
    /// Create an empty map
    pub const fn new() -> Self {
        Self { entries: Vec::new() }
    }

    /// Create an empty map with room for `capacity` entries
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    /// Insert or replace a value, returning the previous one if present
    pub fn insert(&mut self, key: impl Into<CompactString>, value: impl Into<Value>) -> Option<Value> {
        let key = key.into();
        let value = value.into();
        if let Some(slot) = self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(std::mem::replace(&mut slot.1, value))
        } else {
            self.entries.push((key, value));
            None
        }
    }

    /// Get a value by key
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(k, _)| k.as_str() == key)
            .map(|(_, v)| v)
    }

    /// Check if a key exists
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k.as_str() == key)
    }

    /// Remove a key, returning its value if present
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.entries
            .iter()
            .position(|(k, _)| k.as_str() == key)
            .map(|pos| self.entries.remove(pos).1)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Raw entry slice, insertion order
    #[inline]
    pub(crate) fn entries(&self) -> &[(CompactString, Value)] {
        &self.entries
    }
}

/// Order-insensitive: two maps are equal when they hold the same key/value pairs.
impl PartialEq for AttrMap {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .entries
                .iter()
                .all(|(k, v)| other.get(k).is_some_and(|ov| ov == v))
    }
}

impl<K: Into<CompactString>, V: Into<Value>> FromIterator<(K, V)> for AttrMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let mut map = Self::with_capacity(iter.size_hint().0);
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

impl<K: Into<CompactString>, V: Into<Value>> Extend<(K, V)> for AttrMap {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
