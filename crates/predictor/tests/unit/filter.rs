//! Membership Filter Tests.
//!
//! Checks the two guarantees every backend gives (no false negatives, only
//! `clear` forgets) and that the Bloom filter's measured false-positive
//! rate tracks the textbook estimate at the default sizing.

use cscsim_core::config::{FilterConfig, FilterKind};
use cscsim_core::csc::filter::{BloomFilter, MembershipFilter, MembershipSet, OracleSet};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Once inserted, every key stays a member no matter what follows.
    #[test]
    fn bloom_is_monotonic(
        keys in prop::collection::vec(any::<u64>(), 1..400),
        bits in 64usize..4096,
        rounds in 1u32..5,
    ) {
        let mut f = BloomFilter::new(bits, rounds);
        for (i, &k) in keys.iter().enumerate() {
            f.insert(k);
            for &earlier in &keys[..=i] {
                prop_assert!(f.contains(earlier));
            }
        }
    }

    #[test]
    fn oracle_is_exact(
        inserted in prop::collection::hash_set(any::<u64>(), 0..200),
        probes in prop::collection::vec(any::<u64>(), 0..200),
    ) {
        let mut set = OracleSet::new();
        for &k in &inserted {
            set.insert(k);
        }
        prop_assert_eq!(set.len(), inserted.len());
        for k in probes {
            prop_assert_eq!(set.contains(k), inserted.contains(&k));
        }
    }
}

#[test]
fn bloom_false_positive_rate_matches_theory() {
    const INSERTED: usize = 1000;
    const PROBES: u64 = 1_000_000;

    let mut f = BloomFilter::new(174_745, 2);
    for i in 0..INSERTED as u64 {
        f.insert(0x0040_0000 + i * 4);
    }

    let false_positives = (0..PROBES)
        .map(|i| 0x8000_0000_0000 + i * 4)
        .filter(|&k| f.contains(k))
        .count();
    let measured = false_positives as f64 / PROBES as f64;
    let expected = f.expected_false_positive_rate(INSERTED);

    assert!(
        (measured - expected).abs() < expected * 0.5,
        "measured {measured:.3e}, expected {expected:.3e}"
    );
}

#[test]
fn bloom_clear_forgets() {
    let mut f = BloomFilter::new(1024, 2);
    f.insert(0xdead_beef);
    assert!(f.contains(0xdead_beef));
    f.clear();
    assert!(!f.contains(0xdead_beef));
    assert_eq!(f.set_bits(), 0);
}

#[test]
fn wrapper_dispatches_to_backend() {
    let config = FilterConfig::default();
    let mut bloom = MembershipFilter::new(FilterKind::Bloom, &config);
    let mut oracle = MembershipFilter::new(FilterKind::Oracle, &config);
    assert_eq!(bloom.kind(), FilterKind::Bloom);
    assert_eq!(oracle.kind(), FilterKind::Oracle);

    for f in [&mut bloom, &mut oracle] {
        assert!(!f.contains(0x1000));
        f.insert(0x1000);
        assert!(f.contains(0x1000));
        f.clear();
        assert!(!f.contains(0x1000));
    }

    let MembershipFilter::Bloom(inner) = &bloom else {
        panic!("expected a bloom backend");
    };
    assert_eq!(inner.bits(), 174_745);
    assert_eq!(inner.hash_rounds(), 2);
}
