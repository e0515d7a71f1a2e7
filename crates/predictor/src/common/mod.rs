//! Common types shared across the predictor.
//!
//! This module provides the building blocks used by every other component:
//! 1. **Branch identity:** The `(seq_no, piece)` key naming a dynamic branch.
//! 2. **Constants:** Fixed protocol and knob bounds.
//! 3. **Errors:** Configuration and trace error types.

/// Protocol and knob constants.
pub mod constants;

/// Configuration and trace error types.
pub mod error;

/// Branch instance key.
pub mod key;

pub use error::{ConfigError, TraceError};
pub use key::BranchKey;
