//! Configuration system for the correlation selector.
//!
//! This module defines every tunable of the predictor. It provides:
//! 1. **Defaults:** The baseline sizing of tables, filters and windows.
//! 2. **Structures:** Hierarchical config for the correlator, membership filter,
//!    arbitration policy, recency windows and trace replay.
//! 3. **Enums:** Selection mode and membership filter backend.
//! 4. **Validation:** Range checks that turn bad input into a [`ConfigError`].
//!
//! Configuration is supplied as JSON (every field optional) or built with
//! `CscConfig::default()`.

use serde::Deserialize;

use crate::common::ConfigError;
use crate::csc::knobs::Knob;

/// Default configuration constants.
mod defaults {
    /// Width of a folded feature tag in bits (4096 table entries).
    pub const FOLDED_TAG_BITS: u32 = 12;

    /// Width of a signed feature counter in bits (range -2048..=2047).
    pub const COUNTER_BITS: u32 = 12;

    /// Width of the adaptive-threshold training counter in bits.
    pub const TRAINING_COUNTER_BITS: u32 = 9;

    /// Whether confidently-correct predictions skip training.
    pub const USE_THETA: bool = false;

    /// Number of bits in the Bloom filter's bit array.
    pub const FILTER_BITS: usize = 174_745;

    /// Number of hash rounds per Bloom filter operation.
    pub const FILTER_HASH_ROUNDS: u32 = 2;

    /// Whether the raw-strength policy may use the correlator at all.
    pub const CORRELATOR_ENABLED: bool = false;

    /// Short recency window, in branches.
    pub const SHORT_WINDOW: u64 = 100;

    /// Long recency window, in branches.
    pub const LONG_WINDOW: u64 = 1000;

    /// Minimum |next_pc - pc| in bytes for a branch to count as long (one page).
    pub const LONG_BRANCH_DISTANCE: u64 = 4096;

    /// Number of later branches before a conditional branch resolves in trace replay.
    pub const RESOLVE_DELAY: usize = 0;
}

/// Policy that decides, per prediction, whether the correlator's vote is used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum SelectionMode {
    /// Trust the correlator when the PC is absent from a Bloom filter.
    Bloom,
    /// Trust the correlator when the PC is absent from an exact set.
    Oracle,
    /// Trust the correlator when it is enabled, its hysteresis counter is
    /// positive and its vote magnitude reaches the use threshold.
    #[default]
    RawStrength,
}

/// Backend of the membership filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum FilterKind {
    /// Fixed-size bit array with `k` hash rounds; false positives possible.
    Bloom,
    /// Exact hash set; no false positives.
    #[default]
    Oracle,
}

/// Root configuration structure.
///
/// # Examples
///
/// ```
/// use cscsim_core::config::{CscConfig, SelectionMode};
///
/// let config = CscConfig::default();
/// assert_eq!(config.correlator.folded_tag_bits, 12);
/// assert_eq!(config.arbiter.mode, SelectionMode::RawStrength);
/// ```
///
/// Deserializing a partial JSON document; omitted fields take defaults:
///
/// ```
/// use cscsim_core::config::{CscConfig, FilterKind, SelectionMode};
///
/// let json = r#"{
///     "filter": { "kind": "Bloom", "bits": 8192 },
///     "arbiter": { "mode": "Bloom" }
/// }"#;
///
/// let config: CscConfig = serde_json::from_str(json).unwrap();
/// assert_eq!(config.filter.kind, FilterKind::Bloom);
/// assert_eq!(config.filter.bits, 8192);
/// assert_eq!(config.filter.hash_rounds, 2);
/// assert_eq!(config.arbiter.mode, SelectionMode::Bloom);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CscConfig {
    /// Correlator table and threshold settings
    #[serde(default)]
    pub correlator: CorrelatorConfig,
    /// Membership filter settings
    #[serde(default)]
    pub filter: FilterConfig,
    /// Arbitration policy
    #[serde(default)]
    pub arbiter: ArbiterConfig,
    /// Recency window settings
    #[serde(default)]
    pub windows: WindowConfig,
    /// Trace replay settings
    #[serde(default)]
    pub driver: DriverConfig,
}

impl CscConfig {
    /// Checks every field for a usable range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let c = &self.correlator;
        if !(1..=63).contains(&c.folded_tag_bits) {
            return Err(ConfigError::FoldedTagBits(c.folded_tag_bits));
        }
        if !(2..=32).contains(&c.counter_bits) {
            return Err(ConfigError::CounterBits(c.counter_bits));
        }
        if !(2..=16).contains(&c.training_counter_bits) {
            return Err(ConfigError::TrainingCounterBits(c.training_counter_bits));
        }
        if c.feature_mask.len() != Knob::COUNT {
            return Err(ConfigError::FeatureMaskLength {
                got: c.feature_mask.len(),
                expected: Knob::COUNT,
            });
        }

        if self.filter.bits == 0 {
            return Err(ConfigError::EmptyFilter);
        }
        if self.filter.hash_rounds == 0 {
            return Err(ConfigError::NoHashRounds);
        }

        let w = &self.windows;
        if w.short_window == 0 || w.long_window < w.short_window {
            return Err(ConfigError::Windows {
                short: w.short_window,
                long: w.long_window,
            });
        }
        Ok(())
    }

    /// Membership filter backend actually used under the configured mode.
    ///
    /// The Bloom and Oracle selection modes imply their backend; raw-strength
    /// selection still gates baseline training on a filter and uses `filter.kind`.
    pub const fn effective_filter_kind(&self) -> FilterKind {
        match self.arbiter.mode {
            SelectionMode::Bloom => FilterKind::Bloom,
            SelectionMode::Oracle => FilterKind::Oracle,
            SelectionMode::RawStrength => self.filter.kind,
        }
    }
}

/// Correlator table and adaptive threshold configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct CorrelatorConfig {
    /// Folded tag width in bits
    #[serde(default = "CorrelatorConfig::default_folded_tag_bits")]
    pub folded_tag_bits: u32,

    /// Signed saturating counter width in bits
    #[serde(default = "CorrelatorConfig::default_counter_bits")]
    pub counter_bits: u32,

    /// Adaptive threshold training counter width in bits
    #[serde(default = "CorrelatorConfig::default_training_counter_bits")]
    pub training_counter_bits: u32,

    /// Skip training when the vote was correct and stronger than theta
    #[serde(default = "CorrelatorConfig::default_use_theta")]
    pub use_theta: bool,

    /// Per-knob enable mask, in knob order; disabled features still train
    #[serde(default = "CorrelatorConfig::default_feature_mask")]
    pub feature_mask: Vec<bool>,
}

impl CorrelatorConfig {
    /// Returns the default folded tag width.
    fn default_folded_tag_bits() -> u32 {
        defaults::FOLDED_TAG_BITS
    }

    /// Returns the default counter width.
    fn default_counter_bits() -> u32 {
        defaults::COUNTER_BITS
    }

    /// Returns the default training counter width.
    fn default_training_counter_bits() -> u32 {
        defaults::TRAINING_COUNTER_BITS
    }

    /// Returns the default thresholding switch.
    fn default_use_theta() -> bool {
        defaults::USE_THETA
    }

    /// All knobs enabled.
    fn default_feature_mask() -> Vec<bool> {
        vec![true; Knob::COUNT]
    }

    /// Largest positive counter value, `2^(w-1) - 1`.
    pub const fn counter_max(&self) -> i64 {
        (1i64 << (self.counter_bits - 1)) - 1
    }

    /// Number of features whose counters contribute to the vote.
    pub fn enabled_features(&self) -> usize {
        self.feature_mask.iter().filter(|&&on| on).count()
    }
}

impl Default for CorrelatorConfig {
    fn default() -> Self {
        Self {
            folded_tag_bits: defaults::FOLDED_TAG_BITS,
            counter_bits: defaults::COUNTER_BITS,
            training_counter_bits: defaults::TRAINING_COUNTER_BITS,
            use_theta: defaults::USE_THETA,
            feature_mask: Self::default_feature_mask(),
        }
    }
}

/// Membership filter configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct FilterConfig {
    /// Filter backend (consulted in raw-strength mode)
    #[serde(default)]
    pub kind: FilterKind,

    /// Bloom filter bit-array size
    #[serde(default = "FilterConfig::default_bits")]
    pub bits: usize,

    /// Bloom filter hash rounds
    #[serde(default = "FilterConfig::default_hash_rounds")]
    pub hash_rounds: u32,
}

impl FilterConfig {
    /// Returns the default bit-array size.
    fn default_bits() -> usize {
        defaults::FILTER_BITS
    }

    /// Returns the default number of hash rounds.
    fn default_hash_rounds() -> u32 {
        defaults::FILTER_HASH_ROUNDS
    }
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            kind: FilterKind::default(),
            bits: defaults::FILTER_BITS,
            hash_rounds: defaults::FILTER_HASH_ROUNDS,
        }
    }
}

/// Arbitration policy configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ArbiterConfig {
    /// Selection policy
    #[serde(default)]
    pub mode: SelectionMode,

    /// Global enable for the raw-strength policy
    #[serde(default = "ArbiterConfig::default_correlator_enabled")]
    pub correlator_enabled: bool,
}

impl ArbiterConfig {
    /// Returns the default correlator enable flag.
    fn default_correlator_enabled() -> bool {
        defaults::CORRELATOR_ENABLED
    }
}

impl Default for ArbiterConfig {
    fn default() -> Self {
        Self {
            mode: SelectionMode::default(),
            correlator_enabled: defaults::CORRELATOR_ENABLED,
        }
    }
}

/// Recency window configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct WindowConfig {
    /// Short window length in branches
    #[serde(default = "WindowConfig::default_short")]
    pub short_window: u64,

    /// Long window length in branches
    #[serde(default = "WindowConfig::default_long")]
    pub long_window: u64,

    /// Byte distance beyond which a block-starting branch is long
    #[serde(default = "WindowConfig::default_long_branch_distance")]
    pub long_branch_distance: u64,
}

impl WindowConfig {
    /// Returns the default short window.
    fn default_short() -> u64 {
        defaults::SHORT_WINDOW
    }

    /// Returns the default long window.
    fn default_long() -> u64 {
        defaults::LONG_WINDOW
    }

    /// Returns the default long-branch distance.
    fn default_long_branch_distance() -> u64 {
        defaults::LONG_BRANCH_DISTANCE
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            short_window: defaults::SHORT_WINDOW,
            long_window: defaults::LONG_WINDOW,
            long_branch_distance: defaults::LONG_BRANCH_DISTANCE,
        }
    }
}

/// Trace replay configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DriverConfig {
    /// Branches fetched between a conditional branch's prediction and its resolution
    #[serde(default = "DriverConfig::default_resolve_delay")]
    pub resolve_delay: usize,
}

impl DriverConfig {
    /// Returns the default resolve delay.
    fn default_resolve_delay() -> usize {
        defaults::RESOLVE_DELAY
    }
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            resolve_delay: defaults::RESOLVE_DELAY,
        }
    }
}
