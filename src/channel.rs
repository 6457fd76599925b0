//! Single-output animation channel.
//!
//! Provides [`AnimationChannel`] which drives one [`Output`] through a
//! [`Pattern`], re-rendering on each poll. The channel owns no clock: callers
//! pass the current instant to [`AnimationChannel::tick`].

use crate::output::Output;
use crate::pattern::LEVEL_OFF;
use crate::time::{TimeDuration, TimeInstant};
use crate::types::Pattern;

/// The current state of an animation channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ChannelState {
    /// Output off, nothing to render.
    Stopped,
    /// Pattern issued, clock starts on the next tick.
    Armed,
    /// Pattern actively rendering.
    Running,
    /// Pattern settled. Output holds its final level.
    Complete,
}

/// Timing information returned by [`AnimationChannel::tick`].
///
/// Indicates when the channel needs to be polled again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ServiceTiming<D> {
    /// Level is ramping. Poll at your frame rate.
    Continuous,

    /// Level holds for the given delay.
    Delay(D),

    /// Nothing will change until a new pattern is issued.
    Complete,
}

/// Controls a single output through time-based patterns.
///
/// # Type Parameters
/// * `I` - Time instant type
/// * `O` - Output implementation type
pub struct AnimationChannel<I: TimeInstant, O: Output> {
    output: O,
    state: ChannelState,
    pattern: Pattern<I::Duration>,
    start_time: Option<I>,
    fade_from: f32,
    level: f32,
}

impl<I: TimeInstant, O: Output> AnimationChannel<I, O> {
    /// Creates a stopped channel with its output switched off.
    pub fn new(mut output: O) -> Self {
        output.set_level(LEVEL_OFF);

        Self {
            output,
            state: ChannelState::Stopped,
            pattern: Pattern::off(),
            start_time: None,
            fade_from: LEVEL_OFF,
            level: LEVEL_OFF,
        }
    }

    /// Replaces any in-flight pattern.
    ///
    /// No I/O happens here. The pattern clock starts on the next [`tick`](Self::tick).
    pub fn set_pattern(&mut self, pattern: Pattern<I::Duration>) {
        self.pattern = pattern;
        self.fade_from = self.level;
        self.start_time = None;
        self.state = ChannelState::Armed;
    }

    /// Renders the output for `now`.
    ///
    /// Safe to call at any rate. Calling twice with the same `now` writes the
    /// same level (and skips the write the second time).
    pub fn tick(&mut self, now: I) -> ServiceTiming<I::Duration> {
        let start = match (self.state, self.start_time) {
            (ChannelState::Stopped, _) | (ChannelState::Complete, _) => {
                return ServiceTiming::Complete;
            }
            (ChannelState::Armed, _) | (ChannelState::Running, None) => {
                self.start_time = Some(now);
                self.state = ChannelState::Running;
                now
            }
            (ChannelState::Running, Some(start)) => start,
        };

        let elapsed = now.duration_since(start);
        let (level, next_service) = self.pattern.evaluate(elapsed, self.fade_from);
        self.write(level);

        match next_service {
            None => {
                self.state = ChannelState::Complete;
                ServiceTiming::Complete
            }
            Some(delay) if delay == I::Duration::ZERO => ServiceTiming::Continuous,
            Some(delay) => ServiceTiming::Delay(delay),
        }
    }

    /// Switches the output off immediately.
    pub fn stop(&mut self) {
        self.pattern = Pattern::off();
        self.start_time = None;
        self.fade_from = LEVEL_OFF;
        self.state = ChannelState::Stopped;
        self.write(LEVEL_OFF);
    }

    /// Ramps the output from its current level to off over `duration`.
    ///
    /// A zero duration behaves like [`stop`](Self::stop).
    /// On an on/off output such as [`DigitalOutput`](crate::output::DigitalOutput)
    /// the ramp quantizes to a single cut once the level drops below
    /// [`DigitalOutput::THRESHOLD`](crate::output::DigitalOutput::THRESHOLD).
    /// From full level that is halfway through `duration`.
    pub fn fade_off(&mut self, duration: I::Duration) {
        if duration.as_millis() == 0 || self.level == LEVEL_OFF {
            self.stop();
            return;
        }
        self.set_pattern(Pattern::fade_off(duration));
    }

    /// Switches the output fully on until replaced.
    pub fn turn_on(&mut self) {
        self.set_pattern(Pattern::on());
    }

    /// Switches the output off until replaced.
    pub fn turn_off(&mut self) {
        self.set_pattern(Pattern::off());
    }

    /// Returns the current state of the channel.
    pub fn state(&self) -> ChannelState {
        self.state
    }

    /// Returns the pattern currently held.
    pub fn pattern(&self) -> &Pattern<I::Duration> {
        &self.pattern
    }

    /// Returns the last level written to the output.
    pub fn level(&self) -> f32 {
        self.level
    }

    /// Returns true if the output is currently lit at all.
    pub fn is_on(&self) -> bool {
        self.level > LEVEL_OFF
    }

    /// Returns a reference to the driven output.
    pub fn output(&self) -> &O {
        &self.output
    }

    fn write(&mut self, level: f32) {
        if level != self.level {
            self.output.set_level(level);
            self.level = level;
        }
    }
}
