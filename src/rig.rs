//! Light rig bound to the tap-tempo estimator.
//!
//! [`BeatRig`] owns every light the totem pulses to the beat: the laser arm
//! (primary), the laser eye, the LED collar and the LED chain. It turns
//! [`TempoEvent`]s into patterns that share one cadence.

use crate::channel::{AnimationChannel, ServiceTiming};
use crate::output::Output;
use crate::sequencer::{ChannelSequencer, most_urgent};
use crate::tempo::{MIN_PERIOD_MS, TempoEvent};
use crate::time::{TimeDuration, TimeInstant};
use crate::types::Pattern;

/// Beat-synchronised lights.
///
/// # Type Parameters
/// * `I` - Time instant type
/// * `A` - Laser arm output
/// * `E` - Laser eye output
/// * `C` - Collar LED output
/// * `L` - LED chain output
/// * `N` - Collar LED count
pub struct BeatRig<I: TimeInstant, A: Output, E: Output, C: Output, L: Output, const N: usize> {
    laser_arm: AnimationChannel<I, A>,
    laser_eye: AnimationChannel<I, E>,
    collar: ChannelSequencer<I, C, N>,
    chain: AnimationChannel<I, L>,
    pulse: I::Duration,
    fade: I::Duration,
}

impl<I: TimeInstant, A: Output, E: Output, C: Output, L: Output, const N: usize>
    BeatRig<I, A, E, C, L, N>
{
    /// Wires the rig. Every output starts switched off.
    ///
    /// `pulse` is the laser arm's lit time per beat and `fade` the soft
    /// cut-off it gets on reset.
    pub fn new(
        laser_arm: A,
        laser_eye: E,
        collar: ChannelSequencer<I, C, N>,
        chain: L,
        pulse: I::Duration,
        fade: I::Duration,
    ) -> Self {
        Self {
            laser_arm: AnimationChannel::new(laser_arm),
            laser_eye: AnimationChannel::new(laser_eye),
            collar,
            chain: AnimationChannel::new(chain),
            pulse,
            fade,
        }
    }

    /// Applies an estimator event to the bound channels.
    pub fn apply(&mut self, event: TempoEvent<I::Duration>) {
        match event {
            TempoEvent::Armed { period } => self.arm(period),
            TempoEvent::Reset => self.release(),
            TempoEvent::None | TempoEvent::FirstBeat | TempoEvent::Sampled => {}
        }
    }

    /// Starts every channel on a shared beat `period`.
    pub fn arm(&mut self, period: I::Duration) {
        let period_ms = period.as_millis().max(MIN_PERIOD_MS);
        let pulse_ms = self.pulse.as_millis();
        let rest_ms = period_ms.saturating_sub(pulse_ms).max(MIN_PERIOD_MS);

        #[cfg(feature = "defmt")]
        defmt::debug!("beat armed: period {=u64} ms, pulse {=u64} ms", period_ms, pulse_ms);

        self.laser_arm
            .set_pattern(Pattern::blink_forever(self.pulse, I::Duration::from_millis(rest_ms)));

        self.laser_eye
            .set_pattern(Pattern::breathe_forever(I::Duration::from_millis(period_ms)));

        self.collar.autoplay(I::Duration::from_millis(period_ms));

        let half = (period_ms / 2).max(MIN_PERIOD_MS);
        self.chain.set_pattern(Pattern::blink_forever(
            I::Duration::from_millis(half),
            I::Duration::from_millis(period_ms.saturating_sub(half).max(MIN_PERIOD_MS)),
        ));
    }

    /// Soft fade on the laser arm, hard stop everywhere else.
    pub fn release(&mut self) {
        #[cfg(feature = "defmt")]
        defmt::debug!("beat released");

        self.laser_arm.fade_off(self.fade);
        self.laser_eye.stop();
        self.collar.halt();
        self.chain.stop();
    }

    /// Renders every bound channel for `now`.
    pub fn tick(&mut self, now: I) -> ServiceTiming<I::Duration> {
        let mut timing = self.laser_arm.tick(now);
        timing = most_urgent(timing, self.laser_eye.tick(now));
        timing = most_urgent(timing, self.collar.tick(now));
        most_urgent(timing, self.chain.tick(now))
    }

    /// Returns the laser arm channel.
    pub fn laser_arm(&self) -> &AnimationChannel<I, A> {
        &self.laser_arm
    }

    /// Returns the laser eye channel.
    pub fn laser_eye(&self) -> &AnimationChannel<I, E> {
        &self.laser_eye
    }

    /// Returns the collar sequencer.
    pub fn collar(&self) -> &ChannelSequencer<I, C, N> {
        &self.collar
    }

    /// Returns the LED chain channel.
    pub fn chain(&self) -> &AnimationChannel<I, L> {
        &self.chain
    }
}
