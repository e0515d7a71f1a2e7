//! GShare baseline predictor.
//!
//! GShare correlates global branch history with the program counter using an
//! XOR hash. This version splits the classic predict/update pair across the
//! speculative protocol: the PHT index is captured at prediction time and
//! held per branch instance until the outcome trains or discards it, while
//! the global history advances speculatively at `history_update`.
//!
//! # Performance
//!
//! - **Time Complexity:** `predict()` and `update()` are O(1).
//! - **Space Complexity:** O(2^N) 2-bit counters for an N-bit history.

use std::collections::HashMap;

use super::BaselinePredictor;
use crate::common::BranchKey;

/// Default PHT index width (4096 entries).
pub const DEFAULT_TABLE_BITS: u32 = 12;

/// GShare predictor with per-branch speculative checkpoints.
#[derive(Clone, Debug)]
pub struct GShareBaseline {
    /// Global history register, advanced speculatively.
    ghr: u64,
    /// Pattern History Table of 2-bit saturating counters.
    pht: Vec<u8>,
    /// Index mask for the PHT and history.
    mask: u64,
    /// PHT index used by each in-flight prediction.
    checkpoints: HashMap<BranchKey, usize>,
}

impl GShareBaseline {
    /// Creates a predictor with a `2^table_bits`-entry PHT, counters weakly not-taken.
    pub fn new(table_bits: u32) -> Self {
        let size = 1usize << table_bits;
        Self {
            ghr: 0,
            pht: vec![1; size],
            mask: (size as u64) - 1,
            checkpoints: HashMap::new(),
        }
    }

    /// PHT index for `pc` under the current history.
    fn index(&self, pc: u64) -> usize {
        (((pc >> 2) ^ self.ghr) & self.mask) as usize
    }

    /// Number of predictions awaiting update or kill.
    pub fn live_checkpoints(&self) -> usize {
        self.checkpoints.len()
    }
}

impl Default for GShareBaseline {
    fn default() -> Self {
        Self::new(DEFAULT_TABLE_BITS)
    }
}

impl BaselinePredictor for GShareBaseline {
    fn setup(&mut self) {
        self.ghr = 0;
        self.pht.fill(1);
        self.checkpoints.clear();
    }

    /// Predicts taken if the counter is 2 or 3.
    fn predict(&mut self, key: BranchKey, pc: u64) -> bool {
        let idx = self.index(pc);
        let _ = self.checkpoints.insert(key, idx);
        self.pht[idx] >= 2
    }

    fn history_update(
        &mut self,
        _key: BranchKey,
        _pc: u64,
        _br_type: u8,
        _pred_dir: bool,
        resolve_dir: bool,
        _next_pc: u64,
    ) {
        self.ghr = ((self.ghr << 1) | u64::from(resolve_dir)) & self.mask;
    }

    /// Unconditional branches do not enter the history.
    fn track_other_inst(&mut self, _pc: u64, _br_type: u8, _pred_dir: bool, _resolve_dir: bool, _next_pc: u64) {}

    fn update(&mut self, key: BranchKey, _pc: u64, resolve_dir: bool, _pred_dir: bool, _next_pc: u64) {
        let Some(idx) = self.checkpoints.remove(&key) else {
            panic!("gshare: update for branch {key} without a prediction");
        };
        let counter = &mut self.pht[idx];
        if resolve_dir && *counter < 3 {
            *counter += 1;
        } else if !resolve_dir && *counter > 0 {
            *counter -= 1;
        }
    }

    fn kill_checkpoint(&mut self, key: BranchKey) {
        let removed = self.checkpoints.remove(&key);
        assert!(removed.is_some(), "gshare: kill for branch {key} without a prediction");
    }
}
