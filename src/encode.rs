//! Canonical encoder
//!
//! Writes a [`Value`] into a [`HashState`] as a tagged byte stream. Nothing is
//! materialized: each fragment goes straight into the accumulator.
//!
//! # Stream Layout
//!
//! | Value   | Bytes                                                   |
//! |---------|---------------------------------------------------------|
//! | Empty   | `F5`                                                    |
//! | Bool    | `F8` (true) / `F9` (false)                              |
//! | Int     | `FA` + i64 little-endian                                |
//! | Double  | `FB` + IEEE-754 bits little-endian                      |
//! | Str     | `F7` + UTF-8 bytes                                      |
//! | Bytes   | `F6` + raw bytes                                        |
//! | Slice   | `FE` + elements in order + `FF`                         |
//! | Map     | `FC` + (`F4` + key + value) sorted by key bytes + `FD`  |
//!
//! # Injectivity
//!
//! Payloads carry no length prefix and no escaping. Boundaries are
//! recoverable only because marker bytes never occur inside string content:
//! `F5..=FF` are not valid anywhere in UTF-8, and `F4` can only appear as a
//! lead byte followed by a continuation byte, which no key starts with.
//! Every container needs its close marker because its extent cannot be
//! inferred from a streamed encoding. Any new `Value` variant must take an
//! unused byte from this range.

use tracing::warn;

use crate::config::HashConfig;
use crate::digest::Accumulator;
use crate::error::{HashError, HashResult};
use crate::state::HashState;
use crate::value::{AttrMap, Value};

/// Reserved marker bytes.
pub mod marker {
    pub use crate::digest::EXTENSION_BYTE as EXTENSION;

    pub const KEY: u8 = 0xF4;
    pub const EMPTY: u8 = 0xF5;
    pub const BYTES: u8 = 0xF6;
    pub const STR: u8 = 0xF7;
    pub const TRUE: u8 = 0xF8;
    pub const FALSE: u8 = 0xF9;
    pub const INT: u8 = 0xFA;
    pub const DOUBLE: u8 = 0xFB;
    pub const MAP_OPEN: u8 = 0xFC;
    pub const MAP_CLOSE: u8 = 0xFD;
    pub const SLICE_OPEN: u8 = 0xFE;
    pub const SLICE_CLOSE: u8 = 0xFF;

    /// Every reserved byte, extension included
    pub const ALL: [u8; 13] = [
        EXTENSION, KEY, EMPTY, BYTES, STR, TRUE, FALSE, INT, DOUBLE, MAP_OPEN, MAP_CLOSE,
        SLICE_OPEN, SLICE_CLOSE,
    ];
}

impl<A: Accumulator> HashState<A> {
    /// Encode one value.
    pub fn write_value(&mut self, value: &Value) {
        match value {
            Value::Empty => self.feed(&[marker::EMPTY]),
            Value::Bool(true) => self.feed(&[marker::TRUE]),
            Value::Bool(false) => self.feed(&[marker::FALSE]),
            Value::Int(v) => self.write_number(marker::INT, v.to_le_bytes()),
            Value::Double(v) => self.write_number(marker::DOUBLE, v.to_bits().to_le_bytes()),
            Value::Str(s) => self.write_tagged(marker::STR, s.as_bytes()),
            Value::Bytes(b) => {
                self.feed(&[marker::BYTES]);
                self.feed(b);
            }
            Value::Slice(items) => {
                self.feed(&[marker::SLICE_OPEN]);
                for item in items {
                    self.write_value(item);
                }
                self.feed(&[marker::SLICE_CLOSE]);
            }
            Value::Map(map) => {
                self.feed(&[marker::MAP_OPEN]);
                self.write_map(map);
                self.feed(&[marker::MAP_CLOSE]);
            }
        }
    }

    /// Encode map entries in byte-wise key order, without open/close markers.
    ///
    /// Top-level map hashing uses this directly; nested maps are wrapped by
    /// [`write_value`](Self::write_value).
    pub fn write_map(&mut self, map: &AttrMap) {
        let entries = map.entries();
        let base = self.key_order.len();
        self.key_order.extend(0..entries.len());
        // Keys are unique, so this order is total.
        self.key_order[base..]
            .sort_by(|&a, &b| entries[a].0.as_bytes().cmp(entries[b].0.as_bytes()));

        for pos in base..base + entries.len() {
            let (key, value) = &entries[self.key_order[pos]];
            self.write_tagged(marker::KEY, key.as_bytes());
            // Nested maps push above `base + len` and truncate back.
            self.write_value(value);
        }
        self.key_order.truncate(base);
    }

    fn write_tagged(&mut self, tag: u8, payload: &[u8]) {
        self.scratch.clear();
        self.scratch.push(tag);
        self.scratch.extend_from_slice(payload);
        self.acc.update(&self.scratch);
    }

    fn write_number(&mut self, tag: u8, le: [u8; 8]) {
        self.num_buf = le;
        self.acc.update(&[tag]);
        self.acc.update(&self.num_buf);
    }
}

// =============================================================================
// Depth Limits
// =============================================================================

/// Reject values nesting containers deeper than `config.max_depth`.
///
/// Iterative, so it is safe to run on inputs that would overflow the
/// recursive encoder. Scalars sit at depth 0, a top-level container at 1.
pub fn check_depth(value: &Value, config: &HashConfig) -> HashResult<()> {
    walk_depth(vec![(value, 0)], config.max_depth)
}

/// Like [`check_depth`] for a bare map, which itself sits at depth 1.
pub fn check_map_depth(map: &AttrMap, config: &HashConfig) -> HashResult<()> {
    if config.max_depth == 0 {
        return Err(depth_exceeded(0, 1));
    }
    walk_depth(map.iter().map(|(_, v)| (v, 1)).collect(), config.max_depth)
}

fn walk_depth(mut stack: Vec<(&Value, usize)>, limit: usize) -> HashResult<()> {
    while let Some((value, depth)) = stack.pop() {
        if !value.is_container() {
            continue;
        }
        let depth = depth + 1;
        if depth > limit {
            return Err(depth_exceeded(limit, depth));
        }
        match value {
            Value::Slice(items) => stack.extend(items.iter().map(|v| (v, depth))),
            Value::Map(map) => stack.extend(map.iter().map(|(_, v)| (v, depth))),
            _ => {}
        }
    }
    Ok(())
}

fn depth_exceeded(limit: usize, depth: usize) -> HashError {
    warn!(limit, depth, "attribute value exceeds depth limit");
    HashError::DepthExceeded { limit, depth }
}

// =============================================================================
// Tests
// =============================================================================
