//! Arbitration layer and predictor state.
//!
//! [`PredictorState`] owns every piece of mutable state the selector needs
//! (correlator tables and checkpoints, recency windows, the membership
//! filter, knobs, the correlator-use hysteresis counter) together with the
//! baseline predictor, and is threaded through each host hook:
//!
//! 1. **Predict:** both predictors vote; the selection policy picks one.
//! 2. **Speculative update:** window and knob bookkeeping for every branch,
//!    plus the baseline's history update.
//! 3. **Resolve:** the correlator trains, mispredicted addresses enter the
//!    filter, and the baseline either trains or drops its checkpoint
//!    depending on filter membership.

use std::collections::HashMap;

use tracing::{debug, info, trace, warn};

use super::correlator::Correlator;
use super::counter::{CounterRange, SaturatingCounter};
use super::filter::{MembershipFilter, MembershipSet};
use super::knobs::KnobVector;
use super::window::WindowTracker;
use crate::baseline::{BaselinePredictor, InstClass};
use crate::common::constants::{MAX_NOTIFY_REG, USE_COUNTER_MAX, USE_COUNTER_MIN};
use crate::common::{BranchKey, ConfigError};
use crate::config::{CscConfig, SelectionMode};
use crate::stats::{Provider, SelectionStats};

/// Range of the correlator-use hysteresis counter.
const USE_COUNTER_RANGE: CounterRange = CounterRange::new(USE_COUNTER_MIN as i64, USE_COUNTER_MAX as i64);

/// Everything the selector mutates, plus the baseline predictor `B`.
#[derive(Debug)]
pub struct PredictorState<B> {
    config: CscConfig,
    correlator: Correlator,
    windows: WindowTracker,
    filter: MembershipFilter,
    knobs: KnobVector,
    /// Hysteresis on correlator usefulness, consulted in raw-strength mode.
    use_counter: SaturatingCounter,
    /// Minimum vote magnitude for raw-strength selection.
    use_threshold: u64,
    /// Filter epoch; Bloom insertions happen only in even epochs.
    epoch: u64,
    epoch_insertions: u64,
    /// Provider of each prediction awaiting resolution.
    in_flight: HashMap<BranchKey, Provider>,
    stats: SelectionStats,
    baseline: B,
}

impl<B: BaselinePredictor> PredictorState<B> {
    /// Validates `config` and builds fresh state around `baseline`.
    pub fn new(config: CscConfig, baseline: B) -> Result<Self, ConfigError> {
        config.validate()?;

        let correlator = Correlator::new(&config.correlator);
        let use_threshold =
            config.correlator.counter_max() as u64 * (correlator.feature_count() as u64 - 1);

        Ok(Self {
            correlator,
            windows: WindowTracker::new(&config.windows),
            filter: MembershipFilter::new(config.effective_filter_kind(), &config.filter),
            knobs: KnobVector::new(),
            use_counter: SaturatingCounter::new(USE_COUNTER_RANGE, USE_COUNTER_MAX as i64),
            use_threshold,
            epoch: 0,
            epoch_insertions: 0,
            in_flight: HashMap::new(),
            stats: SelectionStats::default(),
            baseline,
            config,
        })
    }

    /// Host hook: once before simulation.
    pub fn setup(&mut self) {
        self.baseline.setup();
        self.knobs.reset();
        self.correlator.reset();
        self.windows.reset();
        self.filter.clear();
        self.use_counter = SaturatingCounter::new(USE_COUNTER_RANGE, USE_COUNTER_MAX as i64);
        self.epoch = 0;
        self.epoch_insertions = 0;
        self.in_flight.clear();
        self.stats = SelectionStats::default();

        info!(
            table_bits = %self.correlator.storage_bits(),
            mode = ?self.config.arbiter.mode,
            filter = ?self.filter.kind(),
            correlator_enabled = self.config.arbiter.correlator_enabled,
            use_theta = self.config.correlator.use_theta,
            "correlation selector ready"
        );
    }

    /// Whether the selection policy trusts the correlator for `pc`.
    fn trusts_correlator(&self, pc: u64, strength: u64) -> bool {
        match self.config.arbiter.mode {
            SelectionMode::Bloom | SelectionMode::Oracle => !self.filter.contains(pc),
            SelectionMode::RawStrength => {
                self.config.arbiter.correlator_enabled
                    && self.use_counter.get() > 0
                    && strength >= self.use_threshold
            }
        }
    }

    /// Host hook: predicts the conditional branch `(seq_no, piece)` at `pc`.
    pub fn predict(&mut self, seq_no: u64, piece: u8, pc: u64) -> bool {
        let key = BranchKey::new(seq_no, piece);
        let baseline_pred = self.baseline.predict(key, pc);

        self.windows.knob_snapshot().apply(&mut self.knobs);
        let correlator_pred = self.correlator.predict(self.knobs.as_tags(), key);
        let raw = self.correlator.raw_predict(self.knobs.as_tags());
        let strength = raw.unsigned_abs();

        let provider = if self.trusts_correlator(pc, strength) {
            Provider::Correlator
        } else {
            Provider::Baseline
        };
        self.stats.record_prediction(provider);
        let prev = self.in_flight.insert(key, provider);
        assert!(prev.is_none(), "branch {key} predicted twice");

        trace!(%key, pc, raw, baseline_pred, correlator_pred, ?provider, "predict");
        match provider {
            Provider::Correlator => correlator_pred,
            Provider::Baseline => baseline_pred,
        }
    }

    /// Host hook: speculative bookkeeping right after any branch is predicted.
    ///
    /// For conditional branches `resolve_dir` is already the true outcome and
    /// drives the global-bias knob.
    #[allow(clippy::too_many_arguments)]
    pub fn spec_update(
        &mut self,
        seq_no: u64,
        piece: u8,
        pc: u64,
        class: InstClass,
        resolve_dir: bool,
        pred_dir: bool,
        next_pc: u64,
    ) {
        let key = BranchKey::new(seq_no, piece);
        self.windows.record_front(seq_no, piece, pc, next_pc);

        match class {
            InstClass::CondBranch => self.knobs.on_conditional(resolve_dir),
            InstClass::UncondDirect => {}
            InstClass::UncondIndirect => self.windows.record_indirect(seq_no),
            InstClass::CallDirect | InstClass::CallIndirect => {
                self.knobs.on_call();
                self.windows.record_call(seq_no);
            }
            InstClass::Return => self.knobs.on_return(),
        }

        if class.is_conditional() {
            self.baseline
                .history_update(key, pc, class.br_type(), pred_dir, resolve_dir, next_pc);
        } else {
            self.baseline
                .track_other_inst(pc, class.br_type(), pred_dir, resolve_dir, next_pc);
        }

        self.windows.record_back(seq_no);
    }

    /// Records a mispredicted address in the membership filter.
    fn record_misprediction(&mut self, pc: u64) {
        let fresh = !self.filter.contains(pc);
        let insert = match self.filter {
            MembershipFilter::Bloom(_) => fresh && self.epoch % 2 == 0,
            MembershipFilter::Oracle(_) => true,
        };
        if insert {
            self.filter.insert(pc);
            if fresh {
                self.epoch_insertions += 1;
                self.stats.filter_insertions += 1;
            }
        }
    }

    /// Host hook: a conditional branch executed.
    ///
    /// `pred_dir` is the final arbitrated prediction returned by
    /// [`PredictorState::predict`].
    pub fn resolve(&mut self, seq_no: u64, piece: u8, pc: u64, pred_dir: bool, resolve_dir: bool, next_pc: u64) {
        let key = BranchKey::new(seq_no, piece);
        let Some(provider) = self.in_flight.remove(&key) else {
            panic!("cannot resolve branch {key}: it was never predicted");
        };

        let mispredicted = pred_dir != resolve_dir;
        self.stats.record_resolution(provider, !mispredicted);
        if provider == Provider::Correlator {
            self.use_counter.update(!mispredicted);
        }

        if mispredicted {
            self.record_misprediction(pc);
        }

        let outcome = self.correlator.update(resolve_dir, pred_dir, key);
        if !outcome.trained {
            self.stats.threshold_skips += 1;
        }

        let member = self.filter.contains(pc);
        if member {
            self.baseline.update(key, pc, resolve_dir, pred_dir, next_pc);
        } else {
            self.baseline.kill_checkpoint(key);
        }

        trace!(%key, pc, resolve_dir, mispredicted, ?provider, member, "resolve");
    }

    /// Discards a predicted branch that will never resolve (wrong-path
    /// flush): both predictors drop their checkpoints and nothing trains.
    pub fn squash(&mut self, seq_no: u64, piece: u8) {
        let key = BranchKey::new(seq_no, piece);
        let removed = self.in_flight.remove(&key);
        assert!(removed.is_some(), "cannot squash branch {key}: it was never predicted");
        self.correlator.kill_checkpoint(key);
        self.baseline.kill_checkpoint(key);
        trace!(%key, "squash");
    }

    /// Host hook: an instruction was decoded. Forwarded to the baseline for
    /// architectural destination registers only.
    pub fn notify_decode(&mut self, seq_no: u64, piece: u8, dst_reg: Option<u64>) {
        if let Some(reg) = dst_reg.filter(|&r| r <= MAX_NOTIFY_REG) {
            self.baseline.decode_notify(BranchKey::new(seq_no, piece), reg);
        }
    }

    /// Host hook: an instruction executed and wrote `value` to `dst_reg`.
    pub fn notify_execute(&mut self, seq_no: u64, piece: u8, dst_reg: Option<u64>, value: u64) {
        if let Some(reg) = dst_reg.filter(|&r| r <= MAX_NOTIFY_REG) {
            self.baseline
                .execute_notify(BranchKey::new(seq_no, piece), reg, value);
        }
    }

    /// Moves the membership filter to the next epoch.
    ///
    /// Bloom insertions are only accepted in even epochs; nothing advances
    /// the epoch implicitly.
    pub fn advance_epoch(&mut self) {
        debug!(
            epoch = self.epoch,
            insertions = self.epoch_insertions,
            "membership filter epoch closed"
        );
        self.epoch += 1;
        self.epoch_insertions = 0;
    }

    /// Empties the membership filter.
    pub fn clear_filter(&mut self) {
        self.filter.clear();
    }

    /// Host hook: once after simulation. Releases all state and returns the
    /// selection statistics.
    pub fn terminate(mut self) -> SelectionStats {
        self.baseline.terminate();
        if !self.in_flight.is_empty() || self.correlator.live_checkpoints() > 0 {
            warn!(
                in_flight = self.in_flight.len(),
                checkpoints = self.correlator.live_checkpoints(),
                "simulation ended with unresolved branches"
            );
        }
        info!(
            from_correlator = self.stats.from_correlator,
            from_baseline = self.stats.from_baseline,
            coverage = self.stats.correlator_coverage(),
            accuracy = self.stats.correlator_accuracy(),
            "correlation selector finished"
        );
        self.stats
    }

    /// Active configuration.
    pub const fn config(&self) -> &CscConfig {
        &self.config
    }

    /// Correlator engine.
    pub const fn correlator(&self) -> &Correlator {
        &self.correlator
    }

    /// Recency windows.
    pub const fn windows(&self) -> &WindowTracker {
        &self.windows
    }

    /// Membership filter.
    pub const fn filter(&self) -> &MembershipFilter {
        &self.filter
    }

    /// Knob values as of the last prediction and speculative update.
    pub const fn knobs(&self) -> &KnobVector {
        &self.knobs
    }

    /// Correlator-use hysteresis counter.
    pub const fn use_counter(&self) -> i64 {
        self.use_counter.get()
    }

    /// Vote magnitude required by raw-strength selection.
    pub const fn use_threshold(&self) -> u64 {
        self.use_threshold
    }

    /// Current filter epoch.
    pub const fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Distinct addresses inserted into the filter this epoch.
    pub const fn epoch_insertions(&self) -> u64 {
        self.epoch_insertions
    }

    /// Predictions awaiting resolution.
    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    /// Statistics so far.
    pub const fn stats(&self) -> &SelectionStats {
        &self.stats
    }

    /// Baseline predictor.
    pub const fn baseline(&self) -> &B {
        &self.baseline
    }

    /// Baseline predictor, mutably.
    pub const fn baseline_mut(&mut self) -> &mut B {
        &mut self.baseline
    }
}
