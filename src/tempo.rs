//! Tap-tempo estimation from a debounced edge counter.
//!
//! [`TapTempo`] turns the first four taps after a reset into a beat period.
//! The fifth tap resets it. The estimator is keyed on the counter value
//! itself, so it only has to be told about the count and the time when a
//! press was accepted.

use crate::time::{TimeDuration, TimeInstant, millis_between};

/// Smallest period handed to pattern setters, in milliseconds.
pub const MIN_PERIOD_MS: u64 = 1;

/// Count at which the period is finalised.
pub const ARM_COUNT: u32 = 4;

/// Count at which the estimator resets.
pub const RESET_COUNT: u32 = 5;

/// How the summed tap intervals are turned into a period.
///
/// Four taps give three intervals. Deployed props disagree on the divisor;
/// `Half` is what the totem ships with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PeriodDivisor {
    /// Sum of intervals divided by 2.
    #[default]
    Half,
    /// Sum of intervals divided by 4.
    Quarter,
}

impl PeriodDivisor {
    fn divide(self, sum_millis: u64) -> u64 {
        match self {
            PeriodDivisor::Half => sum_millis / 2,
            PeriodDivisor::Quarter => sum_millis / 4,
        }
    }
}

/// What a reported tap did to the estimator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TempoEvent<D> {
    /// Nothing changed.
    None,
    /// First tap recorded, no interval yet.
    FirstBeat,
    /// An interval was added to the running sum.
    Sampled,
    /// Period finalised. Bound channels should follow it.
    Armed {
        /// Beat period, already clamped to [`MIN_PERIOD_MS`].
        period: D,
    },
    /// Estimator cleared. Bound channels should stop and the edge counter
    /// should be reset.
    Reset,
}

/// Tap-tempo state machine.
pub struct TapTempo<I: TimeInstant> {
    divisor: PeriodDivisor,
    count: u32,
    first_beat: Option<I>,
    interval_sum: u64,
    period: Option<I::Duration>,
}

impl<I: TimeInstant> TapTempo<I> {
    /// Creates an idle estimator using the given divisor policy.
    pub fn new(divisor: PeriodDivisor) -> Self {
        Self {
            divisor,
            count: 0,
            first_beat: None,
            interval_sum: 0,
            period: None,
        }
    }

    /// Reports the edge counter after a poll.
    ///
    /// `pressed` is whether the counter accepted an edge on this pass. The
    /// estimator ignores the call unless `pressed` is set and `edge_count`
    /// differs from the value it last saw.
    pub fn observe(&mut self, edge_count: u32, pressed: bool, now: I) -> TempoEvent<I::Duration> {
        if !pressed || edge_count == self.count {
            return TempoEvent::None;
        }
        self.count = edge_count;

        match edge_count {
            0 => TempoEvent::None,
            1 => {
                self.first_beat = Some(now);
                self.interval_sum = 0;
                self.period = None;
                TempoEvent::FirstBeat
            }
            c if c < ARM_COUNT => {
                self.sample(now);
                TempoEvent::Sampled
            }
            ARM_COUNT => {
                self.sample(now);
                let period = self.divisor.divide(self.interval_sum).max(MIN_PERIOD_MS);
                let period = I::Duration::from_millis(period);
                self.period = Some(period);
                TempoEvent::Armed { period }
            }
            _ => {
                self.reset();
                TempoEvent::Reset
            }
        }
    }

    /// Zeroes all timestamps and the observed count.
    pub fn reset(&mut self) {
        self.count = 0;
        self.first_beat = None;
        self.interval_sum = 0;
        self.period = None;
    }

    /// Returns the finalised period, if the estimator is armed.
    pub fn period(&self) -> Option<I::Duration> {
        self.period
    }

    /// Returns the last edge count observed.
    pub fn count(&self) -> u32 {
        self.count
    }

    /// Returns the running sum of tap intervals in milliseconds.
    pub fn interval_sum_millis(&self) -> u64 {
        self.interval_sum
    }

    /// Returns the divisor policy.
    pub fn divisor(&self) -> PeriodDivisor {
        self.divisor
    }

    fn sample(&mut self, now: I) {
        if let Some(first) = self.first_beat {
            self.interval_sum += millis_between(first, now);
        }
        self.first_beat = Some(now);
    }
}

impl<I: TimeInstant> Default for TapTempo<I> {
    fn default() -> Self {
        Self::new(PeriodDivisor::default())
    }
}
