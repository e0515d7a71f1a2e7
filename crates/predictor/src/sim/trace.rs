//! Branch trace loading.
//!
//! A trace is a JSON-lines file with one branch per line, in fetch order:
//!
//! ```text
//! {"seq_no": 12, "piece": 0, "pc": 4096, "class": "cond_branch", "taken": true, "next_pc": 4064}
//! ```
//!
//! Blank lines and lines starting with `#` are ignored.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use serde::Deserialize;

use crate::baseline::InstClass;
use crate::common::{BranchKey, TraceError};
use crate::common::constants::MAX_PIECES;

/// One dynamic branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct TraceRecord {
    /// Instruction sequence number.
    pub seq_no: u64,
    /// Sub-instruction index.
    #[serde(default)]
    pub piece: u8,
    /// Branch address.
    pub pc: u64,
    /// Branch class.
    pub class: InstClass,
    /// Actual direction (always true for unconditional branches).
    pub taken: bool,
    /// Address of the next instruction.
    pub next_pc: u64,
}

/// Parses a JSON-lines trace from `reader`.
///
/// Branch keys `(seq_no, piece)` must strictly increase from record to
/// record; a repeated or backwards key is rejected.
pub fn parse_trace<R: BufRead>(reader: R) -> Result<Vec<TraceRecord>, TraceError> {
    let mut records = Vec::new();
    let mut previous: Option<BranchKey> = None;
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let text = line.trim();
        if text.is_empty() || text.starts_with('#') {
            continue;
        }
        let record: TraceRecord = serde_json::from_str(text)
            .map_err(|source| TraceError::Parse { line: idx + 1, source })?;
        if record.piece >= MAX_PIECES {
            return Err(TraceError::Piece {
                line: idx + 1,
                piece: record.piece,
            });
        }
        let key = BranchKey::new(record.seq_no, record.piece);
        if let Some(prev) = previous.filter(|&prev| key <= prev) {
            return Err(TraceError::OutOfOrder {
                line: idx + 1,
                key,
                previous: prev,
            });
        }
        previous = Some(key);
        records.push(record);
    }
    Ok(records)
}

/// Reads and parses the trace at `path`.
pub fn load_trace(path: &Path) -> Result<Vec<TraceRecord>, TraceError> {
    let file = File::open(path)?;
    parse_trace(BufReader::new(file))
}
