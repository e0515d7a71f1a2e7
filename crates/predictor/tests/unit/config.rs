//! Configuration Tests.
//!
//! Defaults, partial JSON documents, and every validation failure.

use cscsim_core::common::ConfigError;
use cscsim_core::config::{CscConfig, FilterKind, SelectionMode};
use pretty_assertions::assert_eq;
use rstest::rstest;

#[test]
fn defaults() {
    let c = CscConfig::default();
    assert_eq!(c.correlator.folded_tag_bits, 12);
    assert_eq!(c.correlator.counter_bits, 12);
    assert_eq!(c.correlator.training_counter_bits, 9);
    assert!(!c.correlator.use_theta);
    assert_eq!(c.correlator.feature_mask, vec![true; 6]);
    assert_eq!(c.correlator.counter_max(), 2047);
    assert_eq!(c.filter.kind, FilterKind::Oracle);
    assert_eq!(c.filter.bits, 174_745);
    assert_eq!(c.filter.hash_rounds, 2);
    assert_eq!(c.arbiter.mode, SelectionMode::RawStrength);
    assert!(!c.arbiter.correlator_enabled);
    assert_eq!(c.windows.short_window, 100);
    assert_eq!(c.windows.long_window, 1000);
    assert_eq!(c.windows.long_branch_distance, 4096);
    assert_eq!(c.driver.resolve_delay, 0);
    assert_eq!(c.validate(), Ok(()));
}

#[test]
fn empty_document_is_default() {
    let c: CscConfig = serde_json::from_str("{}").unwrap();
    assert_eq!(c.correlator.folded_tag_bits, 12);
    assert_eq!(c.arbiter.mode, SelectionMode::RawStrength);
    assert_eq!(c.effective_filter_kind(), FilterKind::Oracle);
}

#[test]
fn partial_sections_keep_other_defaults() {
    let json = r#"{
        "correlator": { "use_theta": true, "feature_mask": [true, true, false, false, true, true] },
        "arbiter": { "correlator_enabled": true },
        "driver": { "resolve_delay": 16 }
    }"#;
    let c: CscConfig = serde_json::from_str(json).unwrap();
    assert!(c.correlator.use_theta);
    assert_eq!(c.correlator.enabled_features(), 4);
    assert_eq!(c.correlator.counter_bits, 12);
    assert!(c.arbiter.correlator_enabled);
    assert_eq!(c.arbiter.mode, SelectionMode::RawStrength);
    assert_eq!(c.driver.resolve_delay, 16);
    assert_eq!(c.windows.long_window, 1000);
}

#[test]
fn unknown_mode_is_rejected() {
    let result: Result<CscConfig, _> = serde_json::from_str(r#"{ "arbiter": { "mode": "Tage" } }"#);
    assert!(result.is_err());
}

#[rstest]
#[case(SelectionMode::Bloom, FilterKind::Oracle, FilterKind::Bloom)]
#[case(SelectionMode::Oracle, FilterKind::Bloom, FilterKind::Oracle)]
#[case(SelectionMode::RawStrength, FilterKind::Bloom, FilterKind::Bloom)]
#[case(SelectionMode::RawStrength, FilterKind::Oracle, FilterKind::Oracle)]
fn filter_backend_follows_mode(#[case] mode: SelectionMode, #[case] kind: FilterKind, #[case] expected: FilterKind) {
    let mut c = CscConfig::default();
    c.arbiter.mode = mode;
    c.filter.kind = kind;
    assert_eq!(c.effective_filter_kind(), expected);
}

#[rstest]
#[case::folded_zero(|c: &mut CscConfig| c.correlator.folded_tag_bits = 0, ConfigError::FoldedTagBits(0))]
#[case::folded_wide(|c: &mut CscConfig| c.correlator.folded_tag_bits = 64, ConfigError::FoldedTagBits(64))]
#[case::counter_narrow(|c: &mut CscConfig| c.correlator.counter_bits = 1, ConfigError::CounterBits(1))]
#[case::counter_wide(|c: &mut CscConfig| c.correlator.counter_bits = 33, ConfigError::CounterBits(33))]
#[case::training_narrow(|c: &mut CscConfig| c.correlator.training_counter_bits = 1, ConfigError::TrainingCounterBits(1))]
#[case::mask_short(
    |c: &mut CscConfig| c.correlator.feature_mask = vec![true; 4],
    ConfigError::FeatureMaskLength { got: 4, expected: 6 }
)]
#[case::filter_empty(|c: &mut CscConfig| c.filter.bits = 0, ConfigError::EmptyFilter)]
#[case::no_rounds(|c: &mut CscConfig| c.filter.hash_rounds = 0, ConfigError::NoHashRounds)]
#[case::short_zero(|c: &mut CscConfig| c.windows.short_window = 0, ConfigError::Windows { short: 0, long: 1000 })]
#[case::long_shorter(|c: &mut CscConfig| c.windows.long_window = 50, ConfigError::Windows { short: 100, long: 50 })]
fn validation_rejects(#[case] mutate: fn(&mut CscConfig), #[case] expected: ConfigError) {
    let mut c = CscConfig::default();
    mutate(&mut c);
    assert_eq!(c.validate(), Err(expected));
}
