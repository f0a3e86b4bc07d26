//! Prelude for common imports.
//!
//! ```
//! use attr_hash::prelude::*;
//! ```

pub use crate::config::{HashConfig, PoolConfig};
pub use crate::digest::{Accumulator, AttrDigest, Xxh64Accumulator};
#[cfg(feature = "blake3")]
pub use crate::digest::Blake3Accumulator;
pub use crate::error::{HashError, HashResult};
pub use crate::pool::{HashStatePool, PooledState};
pub use crate::state::HashState;
pub use crate::value::{AttrMap, Value};
pub use crate::{map_hash, try_map_hash, try_value_hash, value_hash};
