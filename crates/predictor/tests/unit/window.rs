//! Recency Window Tests.
//!
//! Windows keep only events whose sequence number is within the window
//! length of the latest pruning point, and expose the counts the
//! correlator's window knobs are built from.

use cscsim_core::config::WindowConfig;
use cscsim_core::csc::window::{Span, WindowKind, WindowTracker};
use cscsim_core::csc::{Knob, KnobVector};
use rstest::rstest;

fn tracker() -> WindowTracker {
    WindowTracker::new(&WindowConfig::default())
}

/// Records an indirect branch at every multiple of 7 and prunes after
/// every sequence number up to `last`.
fn indirect_every_seventh(t: &mut WindowTracker, last: u64) {
    for seq in 1..=last {
        t.record_front(seq, 1, 0x1000, 0x1004);
        if seq % 7 == 0 {
            t.record_indirect(seq);
        }
        t.record_back(seq);
    }
}

#[test]
fn short_window_keeps_last_hundred() {
    let mut t = tracker();
    indirect_every_seventh(&mut t, 500);
    // Multiples of 7 in (400, 500]: 406, 413, ..., 497. 400 is not a
    // multiple of 7, so the horizon entry itself never arises here.
    assert_eq!(t.count(WindowKind::Indirect, Span::Short), 14);
    // Multiples of 7 in [1, 500]; nothing is old enough to leave the long window.
    assert_eq!(t.count(WindowKind::Indirect, Span::Long), 71);
}

#[test]
fn long_window_prunes_past_a_thousand() {
    let mut t = tracker();
    indirect_every_seventh(&mut t, 2000);
    // Multiples of 7 in [1000, 2000]: 1001, ..., 1995.
    assert_eq!(t.count(WindowKind::Indirect, Span::Long), 143);
}

/// Pruning at `seq_no` evicts events strictly older than `seq_no - span`;
/// an event exactly at the horizon survives until the next branch.
#[test]
fn event_at_horizon_is_kept() {
    let mut t = tracker();
    t.record_indirect(399);
    t.record_indirect(400);
    t.record_indirect(401);
    t.record_back(500);
    assert_eq!(t.count(WindowKind::Indirect, Span::Short), 2);

    t.record_back(501);
    assert_eq!(t.count(WindowKind::Indirect, Span::Short), 1);

    t.record_back(502);
    assert_eq!(t.count(WindowKind::Indirect, Span::Short), 0);
    assert_eq!(t.count(WindowKind::Indirect, Span::Long), 3);
}

#[test]
fn early_sequence_numbers_evict_nothing() {
    let mut t = tracker();
    t.record_indirect(0);
    t.record_indirect(5);
    t.record_back(50);
    assert_eq!(t.count(WindowKind::Indirect, Span::Short), 2);
}

#[rstest]
#[case(0x1000, 0x1004, Some(WindowKind::Forward))]
#[case(0x1000, 0x0f00, Some(WindowKind::Backward))]
#[case(0x1000, 0x1000, None)]
fn direction_windows(#[case] pc: u64, #[case] next_pc: u64, #[case] kind: Option<WindowKind>) {
    let mut t = tracker();
    t.record_front(10, 1, pc, next_pc);
    for k in [WindowKind::Forward, WindowKind::Backward] {
        let expected = usize::from(kind == Some(k));
        assert_eq!(t.count(k, Span::Short), expected, "{k:?}");
    }
}

#[test]
fn long_branches_need_block_start_and_distance() {
    let mut t = tracker();
    t.record_front(1, 0, 0x1000, 0x1000 + 4097);
    t.record_front(2, 1, 0x1000, 0x1000 + 8192);
    t.record_front(3, 0, 0x1000, 0x1000 + 4096);
    t.record_front(4, 0, 0x9000, 0x1000);
    assert_eq!(t.count(WindowKind::LongBranch, Span::Short), 2);

    let counts = t.knob_snapshot();
    assert_eq!(counts.long_branch_short, 2);
    assert_eq!(counts.long_branch_long, 2);
    assert_eq!(counts.indirect_short, 0);

    let mut knobs = KnobVector::new();
    knobs[Knob::CallDepth] = 3;
    counts.apply(&mut knobs);
    assert_eq!(knobs[Knob::LongBranchShort], 2);
    assert_eq!(knobs[Knob::LongBranchLong], 2);
    assert_eq!(knobs[Knob::CallDepth], 3, "window counts leave other knobs alone");
}

#[test]
fn block_sizes_follow_block_starts() {
    let mut t = tracker();
    assert!(!t.has_blocks(Span::Short));
    for seq in [10u64, 14, 20, 30] {
        t.record_front(seq, 0, 0x1000, 0x1004);
        t.record_back(seq);
    }
    assert_eq!(t.count(WindowKind::BlockStart, Span::Short), 4);
    // Sizes 10, 4, 6, 10.
    assert_eq!(t.mean_block_size(Span::Short), 7);

    t.record_back(125);
    // Only the block starting at 30 survives in the short window.
    assert_eq!(t.count(WindowKind::BlockStart, Span::Short), 1);
    assert_eq!(t.mean_block_size(Span::Short), 10);
    assert_eq!(t.mean_block_size(Span::Long), 7);
}

#[test]
fn calls_are_counted_and_reset_empties() {
    let mut t = tracker();
    t.record_call(3);
    t.record_call(4);
    assert_eq!(t.count(WindowKind::Call, Span::Long), 2);
    t.reset();
    assert_eq!(t.count(WindowKind::Call, Span::Long), 0);
    assert!(!t.has_blocks(Span::Long));
}
