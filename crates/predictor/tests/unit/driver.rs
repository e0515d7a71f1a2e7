//! Trace Replay Tests.
//!
//! The driver predicts and speculatively updates each branch in fetch
//! order, resolves conditional branches after the configured delay, and
//! drains everything before terminating.

use cscsim_core::baseline::{GShareBaseline, InstClass};
use cscsim_core::config::CscConfig;
use cscsim_core::sim::{TraceDriver, TraceRecord};
use cscsim_core::PredictorState;

use crate::common::init_tracing;

fn cond(seq_no: u64, pc: u64, taken: bool) -> TraceRecord {
    TraceRecord {
        seq_no,
        piece: 0,
        pc,
        class: InstClass::CondBranch,
        taken,
        next_pc: if taken { pc - 32 } else { pc + 4 },
    }
}

fn other(seq_no: u64, pc: u64, class: InstClass, next_pc: u64) -> TraceRecord {
    TraceRecord {
        seq_no,
        piece: 0,
        pc,
        class,
        taken: true,
        next_pc,
    }
}

/// A loop body: a call, a return, then the loop-closing branch taken
/// except every eighth iteration.
fn looping_trace(iterations: u64) -> Vec<TraceRecord> {
    let mut records = Vec::new();
    let mut seq = 0;
    for i in 0..iterations {
        records.push(other(seq, 0x1000, InstClass::CallDirect, 0x8000));
        records.push(other(seq + 1, 0x8010, InstClass::Return, 0x1004));
        records.push(cond(seq + 2, 0x1040, i % 8 != 7));
        seq += 3;
    }
    records
}

fn driver(resolve_delay: usize) -> TraceDriver<GShareBaseline> {
    init_tracing();
    let state = PredictorState::new(CscConfig::default(), GShareBaseline::default()).unwrap();
    TraceDriver::new(state, resolve_delay)
}

#[test]
fn immediate_resolution_leaves_nothing_pending() {
    let mut d = driver(0);
    let trace = looping_trace(20);
    d.run(&trace);
    assert_eq!(d.pending(), 0);
    assert_eq!(d.state().in_flight(), 0);

    let stats = d.finish();
    assert_eq!(stats.predictions(), 20);
    assert_eq!(stats.mispredictions() + stats.correlator_right + stats.baseline_right, 20);
}

#[test]
fn delayed_resolution_keeps_checkpoints_live() {
    let mut d = driver(4);
    let trace = looping_trace(10);

    for rec in &trace[..9] {
        d.step(rec);
    }
    assert_eq!(d.pending(), 3);
    assert_eq!(d.state().correlator().live_checkpoints(), 3);
    assert_eq!(d.state().baseline().live_checkpoints(), 3);

    for rec in &trace[9..] {
        d.step(rec);
    }
    assert_eq!(d.pending(), 4);
    assert_eq!(d.state().in_flight(), 4);

    d.drain();
    assert_eq!(d.pending(), 0);
    assert_eq!(d.state().correlator().live_checkpoints(), 0);
    assert_eq!(d.state().baseline().live_checkpoints(), 0);
}

#[test]
fn finish_resolves_outstanding_branches() {
    let mut d = driver(64);
    d.run(&looping_trace(30));
    assert_eq!(d.pending(), 30);

    let stats = d.finish();
    assert_eq!(stats.predictions(), 30);
    assert_eq!(stats.mispredictions() + stats.correlator_right + stats.baseline_right, 30);
}

#[test]
fn calls_and_returns_move_call_depth() {
    let mut d = driver(0);
    d.step(&other(0, 0x1000, InstClass::CallDirect, 0x8000));
    d.step(&other(1, 0x8000, InstClass::CallIndirect, 0x9000));
    assert_eq!(d.state().knobs()[cscsim_core::csc::Knob::CallDepth], 2);
    d.step(&other(2, 0x9010, InstClass::Return, 0x8004));
    assert_eq!(d.state().knobs()[cscsim_core::csc::Knob::CallDepth], 1);
    assert_eq!(d.pending(), 0);
}
