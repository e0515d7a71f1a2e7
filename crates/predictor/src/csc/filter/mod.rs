//! Membership filters.
//!
//! A membership filter remembers branch addresses that have mispredicted.
//! Both backends are insert-only within an epoch and never report a false
//! negative: once inserted, a key stays a member until the next clear.

pub use self::{bloom::BloomFilter, oracle::OracleSet};

/// Bloom filter backend.
pub mod bloom;

/// Exact-set backend.
pub mod oracle;

use crate::config::{FilterConfig, FilterKind};

/// Set operations shared by every membership filter backend.
pub trait MembershipSet {
    /// Adds `key`; there is no removal.
    fn insert(&mut self, key: u64);

    /// Whether `key` may have been inserted. Never false for an inserted key.
    fn contains(&self, key: u64) -> bool;

    /// Forgets every key, starting a new epoch.
    fn clear(&mut self);
}

/// Enum wrapper for static dispatch of membership filter backends.
#[derive(Clone, Debug)]
pub enum MembershipFilter {
    /// Probabilistic bit-array filter.
    Bloom(BloomFilter),
    /// Exact hash set.
    Oracle(OracleSet),
}

impl MembershipFilter {
    /// Builds the backend selected by `kind`, sized by `config`.
    pub fn new(kind: FilterKind, config: &FilterConfig) -> Self {
        match kind {
            FilterKind::Bloom => Self::Bloom(BloomFilter::new(config.bits, config.hash_rounds)),
            FilterKind::Oracle => Self::Oracle(OracleSet::new()),
        }
    }

    /// Backend kind.
    pub const fn kind(&self) -> FilterKind {
        match self {
            Self::Bloom(_) => FilterKind::Bloom,
            Self::Oracle(_) => FilterKind::Oracle,
        }
    }
}

impl MembershipSet for MembershipFilter {
    #[inline]
    fn insert(&mut self, key: u64) {
        match self {
            Self::Bloom(f) => f.insert(key),
            Self::Oracle(f) => f.insert(key),
        }
    }

    #[inline]
    fn contains(&self, key: u64) -> bool {
        match self {
            Self::Bloom(f) => f.contains(key),
            Self::Oracle(f) => f.contains(key),
        }
    }

    #[inline]
    fn clear(&mut self) {
        match self {
            Self::Bloom(f) => f.clear(),
            Self::Oracle(f) => f.clear(),
        }
    }
}
