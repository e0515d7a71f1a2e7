//! Recoverable error types.
//!
//! Only conditions caused by external input are represented here: a bad
//! configuration or a malformed trace. Violations of the host callback
//! contract (resolving an unpredicted branch, a piece index of 16 or more,
//! an oversize folded tag) are caller bugs and abort via `assert!` at the
//! point of detection.

use std::io;

use thiserror::Error;

use super::BranchKey;

/// Configuration rejected by [`CscConfig::validate`](crate::config::CscConfig::validate).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// Folded tag width must leave room in a 64-bit tag.
    #[error("folded tag width {0} out of range (1..=63)")]
    FoldedTagBits(u32),

    /// Signed counter width must hold at least -2..=1 and fit an i64 sum.
    #[error("counter width {0} out of range (2..=32)")]
    CounterBits(u32),

    /// Training counter width for the adaptive threshold.
    #[error("training counter width {0} out of range (2..=16)")]
    TrainingCounterBits(u32),

    /// A membership filter needs at least one bit.
    #[error("membership filter must have a non-zero bit count")]
    EmptyFilter,

    /// A membership filter needs at least one hash round.
    #[error("membership filter must use at least one hash round")]
    NoHashRounds,

    /// The feature mask must name every knob exactly once.
    #[error("feature mask has {got} entries, expected {expected}")]
    FeatureMaskLength {
        /// Entries supplied.
        got: usize,
        /// Number of knobs.
        expected: usize,
    },

    /// Recency windows must be non-empty and properly nested.
    #[error("invalid recency windows: short={short}, long={long}")]
    Windows {
        /// Short window length in branches.
        short: u64,
        /// Long window length in branches.
        long: u64,
    },
}

/// Failure while reading or parsing a branch trace.
#[derive(Debug, Error)]
pub enum TraceError {
    /// Underlying I/O failure.
    #[error("trace I/O error: {0}")]
    Io(#[from] io::Error),

    /// A line could not be decoded as a trace record.
    #[error("malformed trace record at line {line}: {source}")]
    Parse {
        /// 1-based line number.
        line: usize,
        /// Decoder error.
        #[source]
        source: serde_json::Error,
    },

    /// A record carried a piece index that cannot be packed into a key.
    #[error("piece index {piece} at line {line} out of range (must be < 16)")]
    Piece {
        /// 1-based line number.
        line: usize,
        /// Offending piece index.
        piece: u8,
    },

    /// A record does not come strictly after the previous one in fetch order.
    #[error("branch {key} at line {line} does not follow branch {previous}")]
    OutOfOrder {
        /// 1-based line number.
        line: usize,
        /// Key of the offending record.
        key: BranchKey,
        /// Key of the preceding record.
        previous: BranchKey,
    },
}
