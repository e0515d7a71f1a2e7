//! Baseline predictor interface.
//!
//! The correlation selector supplements a primary direction predictor that
//! it treats as opaque. This module defines the hooks that predictor must
//! expose and ships a small gshare implementation for trace replay and
//! tests.

pub use self::{gshare::GShareBaseline, inst_class::InstClass};

/// Reference gshare baseline.
pub mod gshare;

/// Branch instruction classes.
pub mod inst_class;

use crate::common::BranchKey;

/// Trait for the baseline (primary) direction predictor.
///
/// Hooks arrive in program order per branch instance: `predict`, then one
/// of `history_update`/`track_other_inst`, then for conditional branches
/// exactly one of `update` or `kill_checkpoint`.
pub trait BaselinePredictor {
    /// Called once before simulation.
    fn setup(&mut self) {}

    /// Predicts the direction of the conditional branch `key` at `pc`.
    fn predict(&mut self, key: BranchKey, pc: u64) -> bool;

    /// Speculative history update after a conditional branch is predicted.
    ///
    /// # Arguments
    ///
    /// * `key` - Branch instance
    /// * `pc` - Program counter of the branch
    /// * `br_type` - Branch-type code (see [`InstClass::br_type`])
    /// * `pred_dir` - Final predicted direction
    /// * `resolve_dir` - Actual direction
    /// * `next_pc` - Address of the next instruction
    fn history_update(
        &mut self,
        key: BranchKey,
        pc: u64,
        br_type: u8,
        pred_dir: bool,
        resolve_dir: bool,
        next_pc: u64,
    );

    /// History update for a non-conditional branch.
    fn track_other_inst(&mut self, pc: u64, br_type: u8, pred_dir: bool, resolve_dir: bool, next_pc: u64);

    /// Trains on the resolved outcome of `key` and consumes its checkpoint.
    fn update(&mut self, key: BranchKey, pc: u64, resolve_dir: bool, pred_dir: bool, next_pc: u64);

    /// Discards the speculative state of `key` without training.
    fn kill_checkpoint(&mut self, key: BranchKey);

    /// An instruction writing `dst_reg` was decoded.
    fn decode_notify(&mut self, _key: BranchKey, _dst_reg: u64) {}

    /// An instruction writing `value` to `dst_reg` executed.
    fn execute_notify(&mut self, _key: BranchKey, _dst_reg: u64, _value: u64) {}

    /// Called once after simulation.
    fn terminate(&mut self) {}
}
