//! Fixed architectural constants shared across the predictor.
//!
//! These are properties of the host callback protocol and of the knob
//! definitions, not tunables. Tunables live in [`crate::config`].

/// Number of bits used for the piece index in a packed branch key.
pub const PIECE_BITS: u32 = 4;

/// Mask selecting the piece index from a packed branch key.
pub const PIECE_MASK: u64 = (1 << PIECE_BITS) - 1;

/// Exclusive upper bound on the piece index.
pub const MAX_PIECES: u8 = 1 << PIECE_BITS;

/// Upper bound of the global-bias knob (3-bit saturating counter).
pub const GLOBAL_BIAS_MAX: u64 = 7;

/// Upper bound of the correlator-use hysteresis counter.
pub const USE_COUNTER_MAX: i8 = (1 << 3) - 1;

/// Lower bound of the correlator-use hysteresis counter.
pub const USE_COUNTER_MIN: i8 = -(1 << 3);

/// Largest destination register index forwarded to the baseline's notify hooks.
pub const MAX_NOTIFY_REG: u64 = 64;
