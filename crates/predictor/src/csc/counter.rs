//! Signed saturating counters.
//!
//! Feature weights, the correlator-use hysteresis and the global-bias knob
//! are all small counters that clamp at their bounds instead of wrapping.
//! Saturation is steady-state behavior and never an error.

/// Inclusive bounds of a saturating counter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CounterRange {
    min: i64,
    max: i64,
}

impl CounterRange {
    /// Two's-complement range of a `bits`-wide counter: `[-(2^(bits-1)), 2^(bits-1) - 1]`.
    pub const fn signed(bits: u32) -> Self {
        let half = 1i64 << (bits - 1);
        Self {
            min: -half,
            max: half - 1,
        }
    }

    /// Arbitrary inclusive range.
    pub const fn new(min: i64, max: i64) -> Self {
        assert!(min <= max);
        Self { min, max }
    }

    /// Lower bound.
    #[inline]
    pub const fn min(self) -> i64 {
        self.min
    }

    /// Upper bound.
    #[inline]
    pub const fn max(self) -> i64 {
        self.max
    }

    /// Whether `value` lies inside the range.
    #[inline]
    pub const fn contains(self, value: i64) -> bool {
        value >= self.min && value <= self.max
    }

    /// Moves `value` one step toward `max` (`up`) or `min`, clamping.
    #[inline]
    pub const fn step(self, value: i64, up: bool) -> i64 {
        if up {
            if value < self.max { value + 1 } else { self.max }
        } else if value > self.min {
            value - 1
        } else {
            self.min
        }
    }
}

/// A counter value bundled with its range.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SaturatingCounter {
    value: i64,
    range: CounterRange,
}

impl SaturatingCounter {
    /// Creates a counter holding `initial`, clamped into `range`.
    pub const fn new(range: CounterRange, initial: i64) -> Self {
        let value = if initial < range.min {
            range.min
        } else if initial > range.max {
            range.max
        } else {
            initial
        };
        Self { value, range }
    }

    /// Current value.
    #[inline]
    pub const fn get(&self) -> i64 {
        self.value
    }

    /// Bounds this counter saturates at.
    #[inline]
    pub const fn range(&self) -> CounterRange {
        self.range
    }

    /// Increments, saturating at the upper bound.
    #[inline]
    pub const fn increment(&mut self) {
        self.value = self.range.step(self.value, true);
    }

    /// Decrements, saturating at the lower bound.
    #[inline]
    pub const fn decrement(&mut self) {
        self.value = self.range.step(self.value, false);
    }

    /// Steps toward `up`.
    #[inline]
    pub const fn update(&mut self, up: bool) {
        self.value = self.range.step(self.value, up);
    }
}
