//! Exact membership set, the calibration counterpart of the Bloom filter.

use std::collections::HashSet;

use super::MembershipSet;

/// Hash set of every inserted key; no false positives.
#[derive(Clone, Debug, Default)]
pub struct OracleSet {
    keys: HashSet<u64>,
}

impl OracleSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct keys inserted this epoch.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Whether nothing has been inserted this epoch.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl MembershipSet for OracleSet {
    fn insert(&mut self, key: u64) {
        let _ = self.keys.insert(key);
    }

    fn contains(&self, key: u64) -> bool {
        self.keys.contains(&key)
    }

    fn clear(&mut self) {
        self.keys.clear();
    }
}
