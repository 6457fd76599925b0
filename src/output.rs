//! Physical output abstraction.
//!
//! Every light or motor a channel drives implements [`Output`]. Adapters are
//! provided for RGB elements ([`ColorOutput`]) and plain on/off pins
//! ([`DigitalOutput`]).

use crate::COLOR_OFF;
use palette::{Mix, Srgb};

/// Trait for abstracting a single-level output (PWM, GPIO, DAC, ...).
pub trait Output {
    /// Sets the output level.
    ///
    /// Levels are in the range 0.0-1.0. Implementations convert to their
    /// hardware's native format and handle hardware errors internally; this
    /// method cannot fail.
    fn set_level(&mut self, level: f32);
}

/// Trait for abstracting RGB LED hardware.
///
/// Implement this for your LED hardware (GPIO, PWM, SPI, etc.) and wrap it
/// in a [`ColorOutput`] to animate it as a channel.
pub trait RgbLed {
    /// Sets the LED to the specified RGB color (components 0.0-1.0).
    fn set_color(&mut self, color: Srgb);
}

/// Drives an RGB LED as a channel by dimming a fixed base color.
pub struct ColorOutput<L: RgbLed> {
    led: L,
    color: Srgb,
}

impl<L: RgbLed> ColorOutput<L> {
    /// Wraps `led`, lighting it with `color` at full level.
    pub fn new(led: L, color: Srgb) -> Self {
        Self { led, color }
    }

    /// Changes the base color. Takes effect on the next level write.
    pub fn set_color(&mut self, color: Srgb) {
        self.color = color;
    }

    /// Returns the base color.
    pub fn color(&self) -> Srgb {
        self.color
    }

    /// Returns a reference to the wrapped LED.
    pub fn led(&self) -> &L {
        &self.led
    }
}

impl<L: RgbLed> Output for ColorOutput<L> {
    fn set_level(&mut self, level: f32) {
        let level = level.clamp(0.0, 1.0);
        self.led.set_color(COLOR_OFF.mix(self.color, level));
    }
}

/// Any closure taking a bool acts as an on/off pin.
pub trait Switch {
    /// Drives the pin high (`true`) or low (`false`).
    fn set_on(&mut self, on: bool);
}

impl<F: FnMut(bool)> Switch for F {
    fn set_on(&mut self, on: bool) {
        self(on)
    }
}

/// Drives an on/off pin as a channel: lit at level 0.5 and above.
///
/// Ramps quantize to a single switch at [`THRESHOLD`](Self::THRESHOLD), so a
/// fade-off cuts the pin halfway through the fade.
pub struct DigitalOutput<S: Switch> {
    switch: S,
}

impl<S: Switch> DigitalOutput<S> {
    /// Threshold at which the pin is driven high.
    pub const THRESHOLD: f32 = 0.5;

    /// Wraps a switchable pin.
    pub fn new(switch: S) -> Self {
        Self { switch }
    }
}

impl<S: Switch> Output for DigitalOutput<S> {
    fn set_level(&mut self, level: f32) {
        self.switch.set_on(level >= Self::THRESHOLD);
    }
}
