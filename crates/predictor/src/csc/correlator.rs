//! Correlator engine.
//!
//! A multi-feature voting model in the spirit of a perceptron: one weight
//! table per knob, indexed by the knob's folded value. The vote is the sum
//! of the enabled features' weights and predicts taken when non-negative.
//!
//! Predictions are speculative. Every [`Correlator::predict`] records the
//! tag vector it used as a checkpoint keyed by the branch instance; the
//! checkpoint is later consumed exactly once, either by
//! [`Correlator::update`] (train on the resolved outcome) or by
//! [`Correlator::kill_checkpoint`] (discard without training).
//!
//! # Performance
//!
//! - **Time Complexity:** `predict()` and `update()` are O(F log T) for F
//!   features and T live tags per table.
//! - **Space Complexity:** O(F × 2^W) weights for W-bit folded tags, plus one
//!   checkpoint per in-flight branch.

use std::collections::HashMap;
use std::fmt;

use tracing::{debug, trace};

use super::feature::Feature;
use super::knobs::Knob;
use super::threshold::{AdaptiveThreshold, ThetaChange};
use crate::common::BranchKey;
use crate::config::CorrelatorConfig;

/// Result of training on one resolved branch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TrainOutcome {
    /// Whether the checkpointed vote matched the resolved direction.
    pub correct: bool,
    /// Signed vote recomputed from the checkpointed tags.
    pub sum: i64,
    /// Whether the weights were actually moved.
    pub trained: bool,
}

/// Correlation predictor with speculative checkpoints.
#[derive(Clone, Debug)]
pub struct Correlator {
    /// One weight table per knob, in [`Knob::ALL`] order.
    features: Vec<Feature>,
    /// Features contributing to the vote. Disabled features still train.
    mask: Vec<bool>,
    /// Tag vectors of in-flight predictions.
    checkpoints: HashMap<BranchKey, Vec<u64>>,
    /// Adaptive confidence threshold.
    threshold: AdaptiveThreshold,
    /// Skip training on confidently correct votes.
    use_theta: bool,
}

impl Correlator {
    /// Builds empty tables for every knob.
    ///
    /// `theta` starts at the number of enabled features.
    pub fn new(config: &CorrelatorConfig) -> Self {
        let features = Knob::ALL
            .iter()
            .map(|k| Feature::new(k.name(), config.folded_tag_bits, config.counter_bits))
            .collect();
        Self {
            features,
            mask: config.feature_mask.clone(),
            checkpoints: HashMap::new(),
            threshold: AdaptiveThreshold::new(
                config.enabled_features() as i64,
                config.training_counter_bits,
            ),
            use_theta: config.use_theta,
        }
    }

    /// Clears all tables, checkpoints and threshold state.
    pub fn reset(&mut self) {
        for f in &mut self.features {
            f.clear();
        }
        self.checkpoints.clear();
        self.threshold.reset();
    }

    /// Touches every tag (zero on first sight) and returns the masked vote.
    fn touch_and_sum(&mut self, tags: &[u64]) -> i64 {
        assert_eq!(
            tags.len(),
            self.features.len(),
            "tag vector length must match feature count"
        );
        for (feature, &tag) in self.features.iter_mut().zip(tags) {
            let _ = feature.touch(tag);
        }
        self.sum(tags)
    }

    /// Signed vote for `tags`: the sum of enabled features' weights.
    pub fn sum(&self, tags: &[u64]) -> i64 {
        self.features
            .iter()
            .zip(&self.mask)
            .zip(tags)
            .filter(|&((_, &on), _)| on)
            .map(|((feature, _), &tag)| feature.weight(tag))
            .sum()
    }

    /// Predicts the direction for `key` and checkpoints `tags` for training.
    ///
    /// At most one checkpoint may be live per key.
    pub fn predict(&mut self, tags: &[u64], key: BranchKey) -> bool {
        let sum = self.touch_and_sum(tags);
        let prev = self.checkpoints.insert(key, tags.to_vec());
        assert!(prev.is_none(), "branch {key} predicted twice without resolving");
        sum >= 0
    }

    /// Signed vote for `tags` without checkpointing; used for confidence.
    pub fn raw_predict(&mut self, tags: &[u64]) -> i64 {
        self.touch_and_sum(tags)
    }

    /// Trains on the resolved direction of `key` and consumes its checkpoint.
    ///
    /// The vote is recomputed from the checkpointed tags against current
    /// weights. With thresholding enabled, a correct vote stronger than
    /// `theta` leaves the weights untouched. `predicted` is the final
    /// arbitrated direction and only informs tracing.
    pub fn update(&mut self, taken: bool, predicted: bool, key: BranchKey) -> TrainOutcome {
        let Some(tags) = self.checkpoints.remove(&key) else {
            panic!("cannot update branch {key}: no checkpoint (never predicted or already consumed)");
        };

        let sum = self.sum(&tags);
        let correct = taken == (sum >= 0);

        match self.threshold.update(correct, sum) {
            Some(ThetaChange::Raised) => debug!(theta = self.threshold.theta(), "correlator theta raised"),
            Some(ThetaChange::Lowered) => debug!(theta = self.threshold.theta(), "correlator theta lowered"),
            None => {}
        }

        let confident = sum.saturating_abs() > self.threshold.theta();
        let trained = !(self.use_theta && confident && correct);
        if trained {
            for (feature, &tag) in self.features.iter_mut().zip(&tags) {
                feature.train(tag, taken);
            }
        }

        trace!(%key, taken, predicted, sum, correct, trained, "correlator update");
        TrainOutcome {
            correct,
            sum,
            trained,
        }
    }

    /// Discards the checkpoint for `key` without training.
    pub fn kill_checkpoint(&mut self, key: BranchKey) {
        let removed = self.checkpoints.remove(&key);
        assert!(removed.is_some(), "cannot kill branch {key}: no checkpoint");
    }

    /// Whether `key` has a live checkpoint.
    pub fn has_checkpoint(&self, key: BranchKey) -> bool {
        self.checkpoints.contains_key(&key)
    }

    /// Number of live checkpoints.
    pub fn live_checkpoints(&self) -> usize {
        self.checkpoints.len()
    }

    /// Current adaptive threshold.
    pub const fn theta(&self) -> i64 {
        self.threshold.theta()
    }

    /// Threshold state, for inspection.
    pub const fn threshold(&self) -> &AdaptiveThreshold {
        &self.threshold
    }

    /// Weight table of `knob`.
    pub fn feature(&self, knob: Knob) -> &Feature {
        &self.features[knob as usize]
    }

    /// Number of feature tables.
    pub fn feature_count(&self) -> usize {
        self.features.len()
    }

    /// Storage in bits of the enabled features' fully populated tables.
    pub fn storage_bits(&self) -> u128 {
        self.features
            .iter()
            .zip(&self.mask)
            .filter(|&(_, &on)| on)
            .map(|(f, _)| f.storage_bits())
            .sum()
    }
}

impl fmt::Display for Correlator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for feature in &self.features {
            writeln!(f, "{{{feature} }}")?;
        }
        write!(
            f,
            "pred params: theta: {} TC: {} N_FEATURES: {}",
            self.threshold.theta(),
            self.threshold.training_counter(),
            self.features.len()
        )
    }
}
