//! Looping sequencer over a fixed set of channels.
//!
//! [`ChannelSequencer`] cycles "active" status around an ordered set of
//! [`AnimationChannel`]s, either on explicit [`advance`](ChannelSequencer::advance)
//! calls or, once [`autoplay`](ChannelSequencer::autoplay) is set, on a fixed
//! cadence driven by [`tick`](ChannelSequencer::tick).

use crate::channel::{AnimationChannel, ServiceTiming};
use crate::output::Output;
use crate::time::{TimeDuration, TimeInstant, millis_between};
use crate::types::SequencerError;
use heapless::Vec;

/// Cycles one active channel around a fixed ring.
///
/// # Type Parameters
/// * `I` - Time instant type
/// * `O` - Output type shared by every member channel
/// * `N` - Maximum number of channels
pub struct ChannelSequencer<I: TimeInstant, O: Output, const N: usize> {
    channels: Vec<AnimationChannel<I, O>, N>,
    active: usize,
    cadence: Option<I::Duration>,
    last_advance: Option<I>,
}

impl<I: TimeInstant, O: Output, const N: usize> ChannelSequencer<I, O, N> {
    /// Creates an empty sequencer.
    pub fn new() -> Self {
        Self {
            channels: Vec::new(),
            active: 0,
            cadence: None,
            last_advance: None,
        }
    }

    /// Appends a channel bound to `output`.
    ///
    /// Membership is fixed once the rig is running; this is only meant for
    /// startup wiring.
    pub fn push(&mut self, output: O) -> Result<(), SequencerError> {
        self.channels
            .push(AnimationChannel::new(output))
            .map_err(|_| SequencerError::CapacityExceeded)
    }

    /// Moves the active marker one step around the ring.
    ///
    /// The channel that is active on entry is switched on, and the channel
    /// that becomes active is switched off. The lit channel therefore trails
    /// the active index by one step. Existing installations rely on this
    /// visual lag, so it is kept as is.
    pub fn advance(&mut self) -> Result<usize, SequencerError> {
        let len = self.channels.len();
        if len == 0 {
            return Err(SequencerError::Empty);
        }

        let current = self.active;
        let next = (current + 1) % len;
        self.channels[current].turn_on();
        self.channels[next].turn_off();
        self.active = next;
        Ok(next)
    }

    /// Advances automatically every `step` from the next tick onwards.
    pub fn autoplay(&mut self, step: I::Duration) {
        self.cadence = Some(step);
        self.last_advance = None;
    }

    /// Cancels autoplay and switches every channel off.
    pub fn halt(&mut self) {
        self.cadence = None;
        self.last_advance = None;
        for channel in self.channels.iter_mut() {
            channel.stop();
        }
    }

    /// Renders every channel for `now`, advancing first if autoplay is due.
    ///
    /// Returns the most urgent timing hint across the members and the
    /// autoplay cadence.
    pub fn tick(&mut self, now: I) -> ServiceTiming<I::Duration> {
        let mut timing = ServiceTiming::Complete;

        if let Some(step) = self.cadence {
            let step_millis = step.as_millis().max(1);
            let due = match self.last_advance {
                None => true,
                Some(last) => millis_between(last, now) >= step_millis,
            };
            if due && self.advance().is_ok() {
                self.last_advance = Some(self.next_step_origin(now, step_millis));
            }
            let waited = self.last_advance.map_or(0, |last| millis_between(last, now));
            timing = ServiceTiming::Delay(I::Duration::from_millis(
                step_millis.saturating_sub(waited).max(1),
            ));
        }

        for channel in self.channels.iter_mut() {
            timing = most_urgent(timing, channel.tick(now));
        }
        timing
    }

    /// Where the cadence grid continues from after a step serviced at `now`.
    ///
    /// Late polls keep the grid; falling more than a whole step behind
    /// restarts it at `now`.
    fn next_step_origin(&self, now: I, step_millis: u64) -> I {
        match self.last_advance {
            Some(last) if millis_between(last, now) < 2 * step_millis => last
                .checked_add(I::Duration::from_millis(step_millis))
                .unwrap_or(now),
            _ => now,
        }
    }

    /// Returns the active index.
    pub fn active(&self) -> usize {
        self.active
    }

    /// Returns the number of member channels.
    pub fn len(&self) -> usize {
        self.channels.len()
    }

    /// Returns true if no channels were added.
    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    /// Returns true while autoplay is set.
    pub fn is_autoplaying(&self) -> bool {
        self.cadence.is_some()
    }

    /// Returns the channel at `index`.
    pub fn channel(&self, index: usize) -> Option<&AnimationChannel<I, O>> {
        self.channels.get(index)
    }

    /// Iterates over the member channels in ring order.
    pub fn channels(&self) -> impl Iterator<Item = &AnimationChannel<I, O>> {
        self.channels.iter()
    }
}

impl<I: TimeInstant, O: Output, const N: usize> Default for ChannelSequencer<I, O, N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Picks whichever hint asks to be serviced sooner.
pub(crate) fn most_urgent<D: TimeDuration>(
    a: ServiceTiming<D>,
    b: ServiceTiming<D>,
) -> ServiceTiming<D> {
    match (a, b) {
        (ServiceTiming::Continuous, _) | (_, ServiceTiming::Continuous) => {
            ServiceTiming::Continuous
        }
        (ServiceTiming::Complete, other) | (other, ServiceTiming::Complete) => other,
        (ServiceTiming::Delay(x), ServiceTiming::Delay(y)) => {
            if x.as_millis() <= y.as_millis() {
                ServiceTiming::Delay(x)
            } else {
                ServiceTiming::Delay(y)
            }
        }
    }
}
