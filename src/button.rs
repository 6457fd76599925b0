//! Debounced push buttons that count accepted presses.

use crate::time::{TimeInstant, millis_between};

/// Trait for abstracting a raw button pin.
pub trait ButtonInput {
    /// Returns true while the button is held down.
    fn is_pressed(&mut self) -> bool;
}

/// A debounced edge source with a press counter.
pub trait EdgeCounter<I: TimeInstant> {
    /// Samples the input. Call exactly once per loop pass.
    fn poll(&mut self, now: I);

    /// Returns true if the last [`poll`](Self::poll) accepted a press.
    fn was_pressed(&self) -> bool;

    /// Returns the number of presses accepted since the last reset.
    fn edge_count(&self) -> u32;

    /// Zeroes the press counter.
    fn reset_count(&mut self);
}

/// Simple button debouncer for handling press detection.
///
/// A press is accepted on a released-to-pressed transition between two
/// consecutive samples that comes at least `debounce_ms` after the previously
/// accepted one. A contact bounce that is still down once the window expires
/// shows no new transition, so it is never counted twice.
pub struct DebouncedButton<I: TimeInstant, P: ButtonInput> {
    pin: P,
    debounce_ms: u64,
    was_down: bool,
    last_press: Option<I>,
    pressed_this_pass: bool,
    count: u32,
}

impl<I: TimeInstant, P: ButtonInput> DebouncedButton<I, P> {
    /// Wraps `pin` with the given debounce window.
    pub fn new(pin: P, debounce_ms: u64) -> Self {
        Self {
            pin,
            debounce_ms,
            was_down: false,
            last_press: None,
            pressed_this_pass: false,
            count: 0,
        }
    }

    /// Returns a mutable reference to the wrapped pin.
    pub fn pin_mut(&mut self) -> &mut P {
        &mut self.pin
    }
}

impl<I: TimeInstant, P: ButtonInput> EdgeCounter<I> for DebouncedButton<I, P> {
    fn poll(&mut self, now: I) {
        self.pressed_this_pass = false;
        let down = self.pin.is_pressed();

        let rising = down && !self.was_down;
        self.was_down = down;

        if rising {
            let settled = self
                .last_press
                .is_none_or(|last| millis_between(last, now) >= self.debounce_ms);
            if settled {
                self.last_press = Some(now);
                self.pressed_this_pass = true;
                self.count = self.count.wrapping_add(1);
            }
        }
    }

    fn was_pressed(&self) -> bool {
        self.pressed_this_pass
    }

    fn edge_count(&self) -> u32 {
        self.count
    }

    fn reset_count(&mut self) {
        self.count = 0;
    }
}
