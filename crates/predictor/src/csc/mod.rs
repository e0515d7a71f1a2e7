//! Correlation selector (CSC).
//!
//! A secondary direction predictor that augments a baseline predictor:
//! a tag-indexed, multi-feature correlator votes on each conditional branch,
//! a membership filter tracks hard-to-predict addresses, recency windows
//! derive the correlator's features, and the arbitration layer picks which
//! prediction to use and how to train.

pub use self::{
    arbiter::PredictorState,
    correlator::{Correlator, TrainOutcome},
    knobs::{Knob, KnobVector},
    window::WindowTracker,
};

/// Arbitration layer and top-level predictor state.
pub mod arbiter;

/// Multi-feature correlator with speculative checkpoints.
pub mod correlator;

/// Saturating counters.
pub mod counter;

/// Per-feature weight tables and tag folding.
pub mod feature;

/// Bloom and exact membership filters.
pub mod filter;

/// Knob vector definitions.
pub mod knobs;

/// Adaptive confidence threshold.
pub mod threshold;

/// Sliding-window feature tracker.
pub mod window;
