//! Selection Statistics Tests.

use cscsim_core::stats::{Provider, SelectionStats};

#[test]
fn empty_stats_report_zero_percentages() {
    let s = SelectionStats::default();
    assert_eq!(s.predictions(), 0);
    assert_eq!(s.correlator_coverage(), 0.0);
    assert_eq!(s.baseline_accuracy(), 0.0);
    s.print();
}

#[test]
fn coverage_and_accuracy() {
    let mut s = SelectionStats::default();
    for _ in 0..3 {
        s.record_prediction(Provider::Correlator);
    }
    s.record_prediction(Provider::Baseline);
    s.record_resolution(Provider::Correlator, true);
    s.record_resolution(Provider::Correlator, true);
    s.record_resolution(Provider::Correlator, false);
    s.record_resolution(Provider::Baseline, false);

    assert_eq!(s.predictions(), 4);
    assert_eq!(s.mispredictions(), 2);
    assert!((s.correlator_coverage() - 75.0).abs() < 1e-9);
    assert!((s.baseline_coverage() - 25.0).abs() < 1e-9);
    assert!((s.correlator_accuracy() - 200.0 / 3.0).abs() < 1e-9);
    assert_eq!(s.baseline_accuracy(), 0.0);
}
