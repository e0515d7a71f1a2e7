//! Sliding-window feature tracker.
//!
//! Keeps FIFO queues of the sequence numbers at which interesting branch
//! events happened, at two recencies (by default the last 100 and the last
//! 1000 branches). Sequence numbers are pushed in increasing order, so
//! pruning only ever inspects the front of each queue.
//!
//! Only the indirect and long-branch counts feed the correlator; the call,
//! direction and basic-block windows are maintained for additional knobs.

use std::collections::VecDeque;

use super::knobs::{Knob, KnobVector};
use crate::config::WindowConfig;

/// Kind of event a window counts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WindowKind {
    /// Unconditional indirect branches.
    Indirect,
    /// Block-starting branches jumping farther than the long-branch distance.
    LongBranch,
    /// Direct and indirect calls.
    Call,
    /// Branches whose next PC is above their own.
    Forward,
    /// Branches whose next PC is below their own.
    Backward,
    /// Basic-block boundaries (piece zero).
    BlockStart,
}

impl WindowKind {
    /// Number of window kinds.
    pub const COUNT: usize = 6;
}

/// Which of the two recencies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Span {
    /// Short window (default 100 branches).
    Short,
    /// Long window (default 1000 branches).
    Long,
}

/// FIFO of event sequence numbers no older than `span` branches.
#[derive(Clone, Debug)]
struct RecencyWindow {
    span: u64,
    entries: VecDeque<u64>,
}

impl RecencyWindow {
    const fn new(span: u64) -> Self {
        Self {
            span,
            entries: VecDeque::new(),
        }
    }

    fn push(&mut self, seq_no: u64) {
        debug_assert!(self.entries.back().is_none_or(|&last| last <= seq_no));
        self.entries.push_back(seq_no);
    }

    /// Evicts entries older than `seq_no - span`; returns how many.
    fn prune(&mut self, seq_no: u64) -> usize {
        let horizon = seq_no.saturating_sub(self.span);
        let mut evicted = 0;
        while self.entries.front().is_some_and(|&s| s < horizon) {
            let _ = self.entries.pop_front();
            evicted += 1;
        }
        evicted
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Short and long window for one event kind.
#[derive(Clone, Debug)]
struct WindowPair {
    short: RecencyWindow,
    long: RecencyWindow,
}

impl WindowPair {
    const fn new(short: u64, long: u64) -> Self {
        Self {
            short: RecencyWindow::new(short),
            long: RecencyWindow::new(long),
        }
    }

    fn push(&mut self, seq_no: u64) {
        self.short.push(seq_no);
        self.long.push(seq_no);
    }

    const fn get(&self, span: Span) -> &RecencyWindow {
        match span {
            Span::Short => &self.short,
            Span::Long => &self.long,
        }
    }
}

/// Window-derived knob values.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WindowCounts {
    /// Indirect branches in the short window.
    pub indirect_short: u64,
    /// Indirect branches in the long window.
    pub indirect_long: u64,
    /// Long branches in the short window.
    pub long_branch_short: u64,
    /// Long branches in the long window.
    pub long_branch_long: u64,
}

impl WindowCounts {
    /// Writes these counts into the matching knob slots.
    pub fn apply(self, knobs: &mut KnobVector) {
        knobs[Knob::IndirectShort] = self.indirect_short;
        knobs[Knob::IndirectLong] = self.indirect_long;
        knobs[Knob::LongBranchShort] = self.long_branch_short;
        knobs[Knob::LongBranchLong] = self.long_branch_long;
    }
}

/// Bounded-recency event tracker.
#[derive(Clone, Debug)]
pub struct WindowTracker {
    windows: [WindowPair; WindowKind::COUNT],
    /// Block sizes, parallel to the `BlockStart` windows.
    block_sizes_short: VecDeque<u64>,
    block_sizes_long: VecDeque<u64>,
    last_block_start: Option<u64>,
    long_branch_distance: u64,
}

impl WindowTracker {
    /// Creates empty windows sized by `config`.
    pub fn new(config: &WindowConfig) -> Self {
        let pair = WindowPair::new(config.short_window, config.long_window);
        Self {
            windows: std::array::from_fn(|_| pair.clone()),
            block_sizes_short: VecDeque::new(),
            block_sizes_long: VecDeque::new(),
            last_block_start: None,
            long_branch_distance: config.long_branch_distance,
        }
    }

    /// Empties every window.
    pub fn reset(&mut self) {
        for pair in &mut self.windows {
            pair.short.clear();
            pair.long.clear();
        }
        self.block_sizes_short.clear();
        self.block_sizes_long.clear();
        self.last_block_start = None;
    }

    /// Front-end bookkeeping for a freshly predicted branch, before its
    /// class-specific events are recorded.
    ///
    /// Piece zero opens a basic block; its size is the distance from the
    /// previous block start. Direction windows follow the sign of
    /// `next_pc - pc`, and a block-opening branch farther than the
    /// long-branch distance also lands in the long-branch windows.
    pub fn record_front(&mut self, seq_no: u64, piece: u8, pc: u64, next_pc: u64) {
        if piece == 0 {
            let block_size = seq_no.saturating_sub(self.last_block_start.unwrap_or(0));
            self.last_block_start = Some(seq_no);
            self.windows[WindowKind::BlockStart as usize].push(seq_no);
            self.block_sizes_short.push_back(block_size);
            self.block_sizes_long.push_back(block_size);
        }

        let delta = next_pc.wrapping_sub(pc) as i64;
        if delta > 0 {
            self.windows[WindowKind::Forward as usize].push(seq_no);
        } else if delta < 0 {
            self.windows[WindowKind::Backward as usize].push(seq_no);
        }

        if piece == 0 && delta.unsigned_abs() > self.long_branch_distance {
            self.windows[WindowKind::LongBranch as usize].push(seq_no);
        }
    }

    /// An unconditional indirect branch was fetched.
    pub fn record_indirect(&mut self, seq_no: u64) {
        self.windows[WindowKind::Indirect as usize].push(seq_no);
    }

    /// A call was fetched.
    pub fn record_call(&mut self, seq_no: u64) {
        self.windows[WindowKind::Call as usize].push(seq_no);
    }

    /// Back-end bookkeeping: prunes every window relative to `seq_no`.
    pub fn record_back(&mut self, seq_no: u64) {
        for (kind, pair) in self.windows.iter_mut().enumerate() {
            let short = pair.short.prune(seq_no);
            let long = pair.long.prune(seq_no);
            if kind == WindowKind::BlockStart as usize {
                drop(self.block_sizes_short.drain(..short));
                drop(self.block_sizes_long.drain(..long));
            }
        }
        debug_assert_eq!(self.block_sizes_short.len(), self.count(WindowKind::BlockStart, Span::Short));
        debug_assert_eq!(self.block_sizes_long.len(), self.count(WindowKind::BlockStart, Span::Long));
    }

    /// Number of `kind` events in the `span` window.
    pub fn count(&self, kind: WindowKind, span: Span) -> usize {
        self.windows[kind as usize].get(span).len()
    }

    /// Window-derived knob values consumed by the correlator.
    pub fn knob_snapshot(&self) -> WindowCounts {
        WindowCounts {
            indirect_short: self.count(WindowKind::Indirect, Span::Short) as u64,
            indirect_long: self.count(WindowKind::Indirect, Span::Long) as u64,
            long_branch_short: self.count(WindowKind::LongBranch, Span::Short) as u64,
            long_branch_long: self.count(WindowKind::LongBranch, Span::Long) as u64,
        }
    }

    /// Whether the `span` window holds at least one basic block.
    pub fn has_blocks(&self, span: Span) -> bool {
        self.count(WindowKind::BlockStart, span) > 0
    }

    /// Mean basic-block size over the `span` window, rounded down.
    ///
    /// The window must be non-empty; check [`WindowTracker::has_blocks`] first.
    pub fn mean_block_size(&self, span: Span) -> u64 {
        let sizes = match span {
            Span::Short => &self.block_sizes_short,
            Span::Long => &self.block_sizes_long,
        };
        assert!(!sizes.is_empty(), "mean block size of an empty window");
        sizes.iter().sum::<u64>() / sizes.len() as u64
    }
}
