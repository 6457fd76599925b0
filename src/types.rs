//! Core types for pattern construction.

use crate::time::TimeDuration;

/// What a channel does over time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PatternKind {
    /// Output held at zero.
    Off,

    /// Output held at full level.
    On,

    /// Full level for the on-time, zero for the off-time, per cycle.
    Blink,

    /// Eased ramp up over the on-time, eased ramp down over the off-time.
    Breathe,

    /// Ramp from the level shown when requested down to zero over the on-time.
    FadeOff,
}

/// How many times a pattern cycle should repeat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Repeat {
    /// Repeat a specific number of times.
    Times(u32),

    /// Repeat indefinitely.
    Forever,
}

impl Default for Repeat {
    fn default() -> Self {
        Repeat::Times(1)
    }
}

/// Timing descriptor for a single animation channel.
///
/// One cycle lasts `on + off`. A channel holds exactly one of these at a time;
/// issuing a new one replaces the old outright.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pattern<D: TimeDuration> {
    /// What the output does.
    pub kind: PatternKind,

    /// First phase of a cycle (lit / rising / fading).
    pub on: D,

    /// Second phase of a cycle (dark / falling).
    pub off: D,

    /// Number of cycles.
    pub repeat: Repeat,
}

impl<D: TimeDuration> Pattern<D> {
    /// Output held at zero.
    pub fn off() -> Self {
        Self {
            kind: PatternKind::Off,
            on: D::ZERO,
            off: D::ZERO,
            repeat: Repeat::Forever,
        }
    }

    /// Output held at full level.
    pub fn on() -> Self {
        Self {
            kind: PatternKind::On,
            on: D::ZERO,
            off: D::ZERO,
            repeat: Repeat::Forever,
        }
    }

    /// Blinks `times` cycles, then settles dark.
    pub fn blink(on: D, off: D, times: u32) -> Self {
        Self {
            kind: PatternKind::Blink,
            on,
            off,
            repeat: Repeat::Times(times),
        }
    }

    /// Blinks until replaced.
    pub fn blink_forever(on: D, off: D) -> Self {
        Self {
            kind: PatternKind::Blink,
            on,
            off,
            repeat: Repeat::Forever,
        }
    }

    /// Breathes `times` cycles of `period`, half rising and half falling.
    pub fn breathe(period: D, times: u32) -> Self {
        let (rise, fall) = split_period(period);
        Self {
            kind: PatternKind::Breathe,
            on: rise,
            off: fall,
            repeat: Repeat::Times(times),
        }
    }

    /// Breathes until replaced.
    pub fn breathe_forever(period: D) -> Self {
        let (rise, fall) = split_period(period);
        Self {
            kind: PatternKind::Breathe,
            on: rise,
            off: fall,
            repeat: Repeat::Forever,
        }
    }

    /// Ramps to zero over `duration` and stays there.
    pub fn fade_off(duration: D) -> Self {
        Self {
            kind: PatternKind::FadeOff,
            on: duration,
            off: D::ZERO,
            repeat: Repeat::Times(1),
        }
    }

    /// Length of a single cycle in milliseconds.
    #[inline]
    pub fn cycle_millis(&self) -> u64 {
        self.on.as_millis() + self.off.as_millis()
    }
}

fn split_period<D: TimeDuration>(period: D) -> (D, D) {
    let total = period.as_millis();
    let rise = total / 2;
    (D::from_millis(rise), D::from_millis(total - rise))
}

/// Sequencer construction errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SequencerError {
    /// Sequencer capacity exceeded.
    CapacityExceeded,

    /// Operation needs at least one channel.
    Empty,
}

impl core::fmt::Display for SequencerError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            SequencerError::CapacityExceeded => {
                write!(f, "sequencer capacity exceeded")
            }
            SequencerError::Empty => {
                write!(f, "sequencer has no channels")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for SequencerError {}
