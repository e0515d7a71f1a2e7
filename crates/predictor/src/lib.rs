//! Correlation selector branch predictor library.
//!
//! This crate implements a secondary branch-direction predictor that decides,
//! per conditional branch, whether to trust a correlation-based predictor or
//! defer to a baseline predictor:
//! 1. **Correlator:** Multi-feature saturating-counter voting with an adaptive
//!    confidence threshold and speculative checkpoints.
//! 2. **Membership filter:** Bloom or exact set of hard-to-predict addresses.
//! 3. **Feature windows:** Recency windows that derive the correlator's knobs.
//! 4. **Arbitration:** Selection policy and training/cancellation routing.
//! 5. **Simulation:** Baseline interface, reference gshare, trace replay and statistics.

/// Baseline predictor interface and reference implementation.
pub mod baseline;
/// Common types (branch keys, constants, errors).
pub mod common;
/// Predictor configuration (defaults, enums, validation).
pub mod config;
/// Correlation selector core (correlator, filter, windows, arbitration).
pub mod csc;
/// Trace loading and replay.
pub mod sim;
/// Selection statistics collection and reporting.
pub mod stats;

/// Root configuration type; use `CscConfig::default()` or deserialize from JSON.
pub use crate::config::CscConfig;
/// Top-level predictor state threaded through every host hook.
pub use crate::csc::PredictorState;
