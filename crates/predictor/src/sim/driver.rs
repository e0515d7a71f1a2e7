//! Trace replay driver.
//!
//! Plays the host's role: walks a trace in fetch order and calls the
//! predictor hooks the way a cycle-accurate front end would. Conditional
//! branches resolve `resolve_delay` branches after they are fetched, so with
//! a non-zero delay several predictions are in flight at once and the
//! correlator trains against checkpoints rather than current state.

use std::collections::VecDeque;

use tracing::debug;

use super::trace::TraceRecord;
use crate::baseline::BaselinePredictor;
use crate::csc::PredictorState;
use crate::stats::SelectionStats;

/// A predicted conditional branch waiting to execute.
#[derive(Debug, Clone, Copy)]
struct PendingResolve {
    seq_no: u64,
    piece: u8,
    pc: u64,
    pred_dir: bool,
    taken: bool,
    next_pc: u64,
}

/// Replays trace records through a [`PredictorState`].
#[derive(Debug)]
pub struct TraceDriver<B> {
    state: PredictorState<B>,
    pending: VecDeque<PendingResolve>,
    resolve_delay: usize,
    branches: u64,
}

impl<B: BaselinePredictor> TraceDriver<B> {
    /// Wraps `state`, calling its setup hook.
    pub fn new(mut state: PredictorState<B>, resolve_delay: usize) -> Self {
        state.setup();
        Self {
            state,
            pending: VecDeque::with_capacity(resolve_delay + 1),
            resolve_delay,
            branches: 0,
        }
    }

    /// Feeds one branch.
    pub fn step(&mut self, rec: &TraceRecord) {
        self.branches += 1;
        if rec.class.is_conditional() {
            let pred_dir = self.state.predict(rec.seq_no, rec.piece, rec.pc);
            self.state.spec_update(
                rec.seq_no, rec.piece, rec.pc, rec.class, rec.taken, pred_dir, rec.next_pc,
            );
            self.pending.push_back(PendingResolve {
                seq_no: rec.seq_no,
                piece: rec.piece,
                pc: rec.pc,
                pred_dir,
                taken: rec.taken,
                next_pc: rec.next_pc,
            });
        } else {
            self.state
                .spec_update(rec.seq_no, rec.piece, rec.pc, rec.class, rec.taken, true, rec.next_pc);
        }

        while self.pending.len() > self.resolve_delay {
            self.resolve_oldest();
        }
    }

    fn resolve_oldest(&mut self) {
        if let Some(p) = self.pending.pop_front() {
            self.state
                .resolve(p.seq_no, p.piece, p.pc, p.pred_dir, p.taken, p.next_pc);
        }
    }

    /// Resolves every branch still in flight.
    pub fn drain(&mut self) {
        while !self.pending.is_empty() {
            self.resolve_oldest();
        }
    }

    /// Feeds every record in order.
    pub fn run<'a>(&mut self, records: impl IntoIterator<Item = &'a TraceRecord>) {
        for rec in records {
            self.step(rec);
        }
    }

    /// Branches still waiting to resolve.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Underlying predictor state.
    pub const fn state(&self) -> &PredictorState<B> {
        &self.state
    }

    /// Drains outstanding branches and terminates the predictor.
    pub fn finish(mut self) -> SelectionStats {
        self.drain();
        debug!(branches = self.branches, "trace replay complete");
        self.state.terminate()
    }
}
