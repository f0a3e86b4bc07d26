//! Batch hashing on rayon's thread pool.
//!
//! Only available with the `parallel` feature. Every worker checks states out
//! of the global pool, so results equal sequential [`value_hash`] calls.

use rayon::prelude::*;

use crate::digest::AttrDigest;
use crate::value::{AttrMap, Value};
use crate::{map_hash, value_hash};

/// Hash a batch of values in parallel, preserving input order.
pub fn par_value_hashes(values: &[Value]) -> Vec<AttrDigest> {
    values.par_iter().map(value_hash).collect()
}

/// Hash a batch of maps in parallel, preserving input order.
pub fn par_map_hashes(maps: &[AttrMap]) -> Vec<AttrDigest> {
    maps.par_iter().map(map_hash).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parallel_matches_sequential() {
        let values: Vec<Value> = (0..256)
            .map(|i| Value::slice([Value::Int(i), Value::str(format!("v{i}"))]))
            .collect();
        let sequential: Vec<_> = values.iter().map(value_hash).collect();
        assert_eq!(par_value_hashes(&values), sequential);

        let maps: Vec<AttrMap> = (0..64)
            .map(|i| [("id", Value::Int(i)), ("kind", Value::str("span"))].into_iter().collect())
            .collect();
        let sequential: Vec<_> = maps.iter().map(map_hash).collect();
        assert_eq!(par_map_hashes(&maps), sequential);
    }
}
