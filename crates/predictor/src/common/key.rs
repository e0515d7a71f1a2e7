//! Branch instance identity.
//!
//! Every dynamic branch the host presents is named by a monotonically
//! increasing sequence number plus a sub-instruction index ("piece"). The
//! pair is the key for checkpoints, in-flight provider attribution and the
//! baseline predictor's speculative state.

use std::fmt;

use super::constants::{MAX_PIECES, PIECE_BITS, PIECE_MASK};

/// Unique identifier of one dynamic branch instance.
///
/// Ordered by sequence number first, then piece, which matches program order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BranchKey {
    seq_no: u64,
    piece: u8,
}

impl BranchKey {
    /// Creates a key for `(seq_no, piece)`.
    ///
    /// A piece index of 16 or more is a caller bug and aborts.
    #[inline]
    pub fn new(seq_no: u64, piece: u8) -> Self {
        assert!(
            piece < MAX_PIECES,
            "piece index {piece} out of range (must be < {MAX_PIECES})"
        );
        Self { seq_no, piece }
    }

    /// Sequence number of the owning instruction.
    #[inline]
    pub const fn seq_no(self) -> u64 {
        self.seq_no
    }

    /// Sub-instruction index within the instruction.
    #[inline]
    pub const fn piece(self) -> u8 {
        self.piece
    }

    /// Bit-packed form `seq_no << 4 | piece`, as exchanged with the host.
    #[inline]
    pub const fn packed(self) -> u64 {
        (self.seq_no << PIECE_BITS) | (self.piece as u64 & PIECE_MASK)
    }

    /// Inverse of [`BranchKey::packed`].
    #[inline]
    pub const fn from_packed(raw: u64) -> Self {
        Self {
            seq_no: raw >> PIECE_BITS,
            piece: (raw & PIECE_MASK) as u8,
        }
    }
}

impl fmt::Display for BranchKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.seq_no, self.piece)
    }
}
