//! Per-feature weight tables.
//!
//! Each feature maps a folded tag to a signed saturating weight. Entries are
//! created on first touch with weight zero and are never overwritten by a
//! later touch; only training moves them.

use std::collections::BTreeMap;
use std::fmt;

use super::counter::CounterRange;

/// Folds a 64-bit tag down to `width` bits by XOR-ing successive `width`-bit
/// slices, starting from the least significant end.
///
/// Pure: the same input always yields the same output.
///
/// ```
/// use cscsim_core::csc::feature::fold_tag;
///
/// assert_eq!(fold_tag(0xABC, 12), 0xABC);
/// assert_eq!(fold_tag(u64::MAX, 12), 0xFF0);
/// ```
pub fn fold_tag(tag: u64, width: u32) -> u64 {
    assert!((1..64).contains(&width), "folded tag width {width} out of range");
    let mask = (1u64 << width) - 1;
    let mut remaining = u64::BITS;
    let mut rest = tag;
    let mut folded = 0;
    while remaining > 0 {
        folded ^= rest & mask;
        rest >>= width;
        remaining = remaining.saturating_sub(width);
    }
    assert!(folded <= mask, "folded tag {folded:#x} wider than {width} bits");
    folded
}

/// One feature's weight table.
#[derive(Clone, Debug)]
pub struct Feature {
    name: String,
    weights: BTreeMap<u64, i64>,
    range: CounterRange,
    folded_bits: u32,
    counter_bits: u32,
}

impl Feature {
    /// Creates an empty table with `counter_bits`-wide weights indexed by
    /// `folded_bits`-wide tags.
    pub fn new(name: impl Into<String>, folded_bits: u32, counter_bits: u32) -> Self {
        Self {
            name: name.into(),
            weights: BTreeMap::new(),
            range: CounterRange::signed(counter_bits),
            folded_bits,
            counter_bits,
        }
    }

    /// Feature name, used in dumps.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Saturation bounds of the weights.
    pub const fn range(&self) -> CounterRange {
        self.range
    }

    /// Folds a raw tag to this table's index width.
    #[inline]
    pub fn fold(&self, tag: u64) -> u64 {
        fold_tag(tag, self.folded_bits)
    }

    /// Ensures an entry exists for `tag`, inserting zero if absent, and
    /// returns its weight.
    pub fn touch(&mut self, tag: u64) -> i64 {
        let folded = self.fold(tag);
        *self.weights.entry(folded).or_insert(0)
    }

    /// Weight for `tag`, or zero if never touched.
    pub fn weight(&self, tag: u64) -> i64 {
        self.weights.get(&self.fold(tag)).copied().unwrap_or(0)
    }

    /// Moves the weight for `tag` one step toward `taken`.
    ///
    /// The entry must already exist; training an untouched tag means the
    /// caller skipped the prediction step.
    pub fn train(&mut self, tag: u64, taken: bool) {
        let folded = self.fold(tag);
        let Some(weight) = self.weights.get_mut(&folded) else {
            panic!(
                "feature {}: training tag {folded:#x} that was never predicted",
                self.name
            );
        };
        *weight = self.range.step(*weight, taken);
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    /// Whether the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Drops every entry.
    pub fn clear(&mut self) {
        self.weights.clear();
    }

    /// Storage of a fully populated table: `2^folded_bits` weights.
    ///
    /// Widened to `u128` so every accepted tag width fits.
    pub fn storage_bits(&self) -> u128 {
        (1u128 << self.folded_bits) * u128::from(self.counter_bits)
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:", self.name)?;
        for (tag, weight) in &self.weights {
            write!(f, " [{tag}, {weight}],")?;
        }
        Ok(())
    }
}
