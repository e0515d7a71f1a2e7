//! Selection statistics collection and reporting.
//!
//! This module tracks how the arbitration layer split predictions between
//! the correlator and the baseline predictor. It provides:
//! 1. **Coverage:** How many conditional branches each provider predicted.
//! 2. **Accuracy:** Right/wrong counts per provider.
//! 3. **Filter activity:** Unique membership-filter insertions.

use std::time::Instant;

/// Which predictor supplied the final direction of a branch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Provider {
    /// The correlation predictor.
    Correlator,
    /// The baseline predictor.
    Baseline,
}

/// Aggregate selection statistics.
#[derive(Clone, Debug)]
pub struct SelectionStats {
    start_time: Instant,
    /// Predictions served by the correlator.
    pub from_correlator: u64,
    /// Predictions served by the baseline.
    pub from_baseline: u64,
    /// Resolved correlator predictions that were correct.
    pub correlator_right: u64,
    /// Resolved correlator predictions that were wrong.
    pub correlator_wrong: u64,
    /// Resolved baseline predictions that were correct.
    pub baseline_right: u64,
    /// Resolved baseline predictions that were wrong.
    pub baseline_wrong: u64,
    /// Addresses newly inserted into the membership filter.
    pub filter_insertions: u64,
    /// Correlator training events skipped by the confidence threshold.
    pub threshold_skips: u64,
}

impl Default for SelectionStats {
    fn default() -> Self {
        Self {
            start_time: Instant::now(),
            from_correlator: 0,
            from_baseline: 0,
            correlator_right: 0,
            correlator_wrong: 0,
            baseline_right: 0,
            baseline_wrong: 0,
            filter_insertions: 0,
            threshold_skips: 0,
        }
    }
}

/// `part / whole` as a percentage; zero when `whole` is zero.
fn percent(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        0.0
    } else {
        100.0 * part as f64 / whole as f64
    }
}

impl SelectionStats {
    /// Counts one prediction served by `provider`.
    pub const fn record_prediction(&mut self, provider: Provider) {
        match provider {
            Provider::Correlator => self.from_correlator += 1,
            Provider::Baseline => self.from_baseline += 1,
        }
    }

    /// Counts one resolution of a prediction served by `provider`.
    pub const fn record_resolution(&mut self, provider: Provider, correct: bool) {
        match (provider, correct) {
            (Provider::Correlator, true) => self.correlator_right += 1,
            (Provider::Correlator, false) => self.correlator_wrong += 1,
            (Provider::Baseline, true) => self.baseline_right += 1,
            (Provider::Baseline, false) => self.baseline_wrong += 1,
        }
    }

    /// Total predictions made.
    pub const fn predictions(&self) -> u64 {
        self.from_correlator + self.from_baseline
    }

    /// Total mispredictions among resolved branches.
    pub const fn mispredictions(&self) -> u64 {
        self.correlator_wrong + self.baseline_wrong
    }

    /// Share of predictions served by the correlator, in percent.
    pub fn correlator_coverage(&self) -> f64 {
        percent(self.from_correlator, self.predictions())
    }

    /// Share of predictions served by the baseline, in percent.
    pub fn baseline_coverage(&self) -> f64 {
        percent(self.from_baseline, self.predictions())
    }

    /// Correlator accuracy over its resolved predictions, in percent.
    pub fn correlator_accuracy(&self) -> f64 {
        percent(self.correlator_right, self.correlator_right + self.correlator_wrong)
    }

    /// Baseline accuracy over its resolved predictions, in percent.
    pub fn baseline_accuracy(&self) -> f64 {
        percent(self.baseline_right, self.baseline_right + self.baseline_wrong)
    }

    /// Prints the selection report to stdout.
    pub fn print(&self) {
        let seconds = self.start_time.elapsed().as_secs_f64();
        let resolved = self.mispredictions() + self.correlator_right + self.baseline_right;
        println!("\n==========================================================");
        println!("CORRELATION SELECTOR STATISTICS");
        println!("==========================================================");
        println!("host_seconds             {seconds:.4} s");
        println!("cond_predictions         {}", self.predictions());
        println!("cond_resolved            {resolved}");
        println!(
            "mispredictions           {} ({:.4}%)",
            self.mispredictions(),
            percent(self.mispredictions(), resolved)
        );
        println!("----------------------------------------------------------");
        println!("CORRELATOR");
        println!("  preds                  {}", self.from_correlator);
        println!("  coverage               {:.4}%", self.correlator_coverage());
        println!("  accuracy               {:.4}%", self.correlator_accuracy());
        println!("  threshold_skips        {}", self.threshold_skips);
        println!("BASELINE");
        println!("  preds                  {}", self.from_baseline);
        println!("  coverage               {:.4}%", self.baseline_coverage());
        println!("  accuracy               {:.4}%", self.baseline_accuracy());
        println!("FILTER");
        println!("  insertions             {}", self.filter_insertions);
        println!("==========================================================");
    }
}
