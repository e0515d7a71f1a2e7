//! Branch instruction classes reported by the host.

use serde::Deserialize;

/// Class of a branch instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InstClass {
    /// Conditional direct branch.
    CondBranch,
    /// Unconditional direct jump.
    UncondDirect,
    /// Unconditional indirect jump.
    UncondIndirect,
    /// Direct call.
    CallDirect,
    /// Indirect call.
    CallIndirect,
    /// Return.
    Return,
}

impl InstClass {
    /// Branch-type code passed to the baseline predictor's history hooks:
    /// conditional 1, indirect 2, call 4, return 8, combined by addition.
    pub const fn br_type(self) -> u8 {
        match self {
            Self::UncondDirect => 0,
            Self::CondBranch => 1,
            Self::UncondIndirect => 2,
            Self::CallDirect => 4,
            Self::CallIndirect => 6,
            Self::Return => 10,
        }
    }

    /// Whether this is a conditional branch (the only class that resolves).
    pub const fn is_conditional(self) -> bool {
        matches!(self, Self::CondBranch)
    }

    /// Whether this is a call of either kind.
    pub const fn is_call(self) -> bool {
        matches!(self, Self::CallDirect | Self::CallIndirect)
    }
}
