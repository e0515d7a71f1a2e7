//! Knob vector: the scalar features fed to the correlator.
//!
//! Call depth and global bias are running counters maintained by the
//! speculative-update hook; the four window counts are refreshed from the
//! [`WindowTracker`](super::window::WindowTracker) right before each prediction.

use std::ops::{Index, IndexMut};

use crate::common::constants::GLOBAL_BIAS_MAX;

/// Named knob positions, in feature-table order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Knob {
    /// Outstanding calls (calls minus returns, floored at zero).
    CallDepth,
    /// 3-bit taken/not-taken bias over recent conditional branches.
    GlobalBias,
    /// Indirect branches in the short window.
    IndirectShort,
    /// Indirect branches in the long window.
    IndirectLong,
    /// Long-distance branches in the short window.
    LongBranchShort,
    /// Long-distance branches in the long window.
    LongBranchLong,
}

impl Knob {
    /// Number of knobs.
    pub const COUNT: usize = 6;

    /// All knobs in table order.
    pub const ALL: [Self; Self::COUNT] = [
        Self::CallDepth,
        Self::GlobalBias,
        Self::IndirectShort,
        Self::IndirectLong,
        Self::LongBranchShort,
        Self::LongBranchLong,
    ];

    /// Feature name used for tables and dumps.
    pub const fn name(self) -> &'static str {
        match self {
            Self::CallDepth => "call_depth",
            Self::GlobalBias => "global_bias",
            Self::IndirectShort => "indirect_100",
            Self::IndirectLong => "indirect_1K",
            Self::LongBranchShort => "long_br_100",
            Self::LongBranchLong => "long_br_1K",
        }
    }
}

/// Values of every knob, indexed by [`Knob`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct KnobVector {
    values: [u64; Knob::COUNT],
}

impl KnobVector {
    /// All knobs at zero.
    pub const fn new() -> Self {
        Self {
            values: [0; Knob::COUNT],
        }
    }

    /// Knob values in table order; these are the correlator's tags.
    pub const fn as_tags(&self) -> &[u64] {
        &self.values
    }

    /// Resets every knob to zero.
    pub const fn reset(&mut self) {
        self.values = [0; Knob::COUNT];
    }

    /// A call was fetched.
    pub const fn on_call(&mut self) {
        self.values[Knob::CallDepth as usize] += 1;
    }

    /// A return was fetched; depth never drops below zero.
    pub const fn on_return(&mut self) {
        let depth = &mut self.values[Knob::CallDepth as usize];
        *depth = depth.saturating_sub(1);
    }

    /// A conditional branch went `taken`; bias saturates in `[0, 7]`.
    pub const fn on_conditional(&mut self, taken: bool) {
        let bias = &mut self.values[Knob::GlobalBias as usize];
        if taken {
            if *bias < GLOBAL_BIAS_MAX {
                *bias += 1;
            }
        } else {
            *bias = bias.saturating_sub(1);
        }
    }
}

impl Index<Knob> for KnobVector {
    type Output = u64;

    fn index(&self, knob: Knob) -> &u64 {
        &self.values[knob as usize]
    }
}

impl IndexMut<Knob> for KnobVector {
    fn index_mut(&mut self, knob: Knob) -> &mut u64 {
        &mut self.values[knob as usize]
    }
}
