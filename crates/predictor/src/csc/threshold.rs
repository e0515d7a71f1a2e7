//! Adaptive confidence threshold.
//!
//! A training counter drifts up on every misprediction and down on every
//! correct-but-weak prediction. Each time it reaches either end it snaps
//! back to its midpoint and moves `theta` one step: up after a run of
//! mispredictions, down after a run of weak correct votes.

/// Direction `theta` moved during an update.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ThetaChange {
    /// `theta` grew by one.
    Raised,
    /// `theta` shrank by one.
    Lowered,
}

/// Training counter plus threshold.
#[derive(Clone, Debug)]
pub struct AdaptiveThreshold {
    theta: i64,
    initial_theta: i64,
    tc: u32,
    tc_init: u32,
    tc_max: u32,
}

impl AdaptiveThreshold {
    /// Starts at `theta` with a `tc_bits`-wide training counter at its midpoint.
    pub const fn new(theta: i64, tc_bits: u32) -> Self {
        let tc_init = (1 << (tc_bits - 1)) - 1;
        Self {
            theta,
            initial_theta: theta,
            tc: tc_init,
            tc_init,
            tc_max: (1 << tc_bits) - 1,
        }
    }

    /// Current threshold.
    #[inline]
    pub const fn theta(&self) -> i64 {
        self.theta
    }

    /// Current training counter.
    #[inline]
    pub const fn training_counter(&self) -> u32 {
        self.tc
    }

    /// Midpoint the training counter resets to.
    #[inline]
    pub const fn training_counter_init(&self) -> u32 {
        self.tc_init
    }

    /// Restores the initial threshold and midpoint counter.
    pub const fn reset(&mut self) {
        self.theta = self.initial_theta;
        self.tc = self.tc_init;
    }

    /// Feeds one training outcome. `sum` is the signed vote; only its
    /// magnitude matters. `theta` never drops below zero.
    pub fn update(&mut self, correct: bool, sum: i64) -> Option<ThetaChange> {
        let magnitude = sum.saturating_abs();

        if !correct {
            self.tc += 1;
            if self.tc >= self.tc_max {
                self.tc = self.tc_init;
                self.theta = self.theta.saturating_add(1);
                return Some(ThetaChange::Raised);
            }
        } else if magnitude <= self.theta {
            self.tc -= 1;
            if self.tc == 0 {
                self.tc = self.tc_init;
                if self.theta > 0 {
                    self.theta -= 1;
                    return Some(ThetaChange::Lowered);
                }
            }
        }
        None
    }
}
