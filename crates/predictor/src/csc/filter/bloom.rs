//! Bloom filter over 64-bit keys.
//!
//! `k` hash rounds are derived from one 64-bit finalizer (xor-shift and
//! multiply passes) by salting the key with a large odd constant times the
//! round index. Membership queries may return false positives but never
//! false negatives; there is no delete, only [`BloomFilter::clear`].
//!
//! # Performance
//!
//! - **Time Complexity:** `insert()` and `contains()` are O(k).
//! - **Space Complexity:** `N / 8` bytes for an `N`-bit array.

use super::MembershipSet;

/// Golden-ratio salt multiplied by the round index.
const ROUND_SALT: u64 = 0x9e37_79b1_85eb_ca87;

/// 64-bit finalizer mix of `key` salted with `seed`.
#[inline]
pub const fn mix64(key: u64, seed: u64) -> u64 {
    let mut k = key ^ seed;
    k ^= k >> 33;
    k = k.wrapping_mul(0xff51_afd7_ed55_8ccd);
    k ^= k >> 33;
    k = k.wrapping_mul(0xc4ce_b9fe_1a85_ec53);
    k ^= k >> 33;
    k
}

/// Fixed-size bit array with `k` hash rounds.
#[derive(Clone, Debug)]
pub struct BloomFilter {
    words: Vec<u64>,
    bits: usize,
    hash_rounds: u32,
    populated: usize,
}

impl BloomFilter {
    /// Creates an empty filter of `bits` bits using `hash_rounds` rounds.
    pub fn new(bits: usize, hash_rounds: u32) -> Self {
        assert!(bits > 0, "bloom filter needs at least one bit");
        assert!(hash_rounds > 0, "bloom filter needs at least one hash round");
        Self {
            words: vec![0; bits.div_ceil(64)],
            bits,
            hash_rounds,
            populated: 0,
        }
    }

    /// Bit index for `key` in round `round`.
    #[inline]
    fn bit_index(&self, key: u64, round: u32) -> usize {
        let seed = u64::from(round).wrapping_mul(ROUND_SALT);
        (mix64(key, seed) % self.bits as u64) as usize
    }

    #[inline]
    fn test_bit(&self, idx: usize) -> bool {
        self.words[idx / 64] & (1 << (idx % 64)) != 0
    }

    /// Size of the bit array.
    pub const fn bits(&self) -> usize {
        self.bits
    }

    /// Number of hash rounds.
    pub const fn hash_rounds(&self) -> u32 {
        self.hash_rounds
    }

    /// Number of bits currently set.
    pub const fn set_bits(&self) -> usize {
        self.populated
    }

    /// Theoretical false-positive rate after `inserted` distinct keys:
    /// `(1 - e^(-k n / N))^k`.
    pub fn expected_false_positive_rate(&self, inserted: usize) -> f64 {
        let k = f64::from(self.hash_rounds);
        let exponent = -k * inserted as f64 / self.bits as f64;
        (1.0 - exponent.exp()).powf(k)
    }
}

impl MembershipSet for BloomFilter {
    fn insert(&mut self, key: u64) {
        for round in 0..self.hash_rounds {
            let idx = self.bit_index(key, round);
            let word = &mut self.words[idx / 64];
            let mask = 1 << (idx % 64);
            if *word & mask == 0 {
                *word |= mask;
                self.populated += 1;
            }
        }
    }

    fn contains(&self, key: u64) -> bool {
        (0..self.hash_rounds).all(|round| self.test_bit(self.bit_index(key, round)))
    }

    fn clear(&mut self) {
        self.words.fill(0);
        self.populated = 0;
    }
}
