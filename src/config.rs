//! Build-time tunables.
//!
//! The totem has no runtime configuration. Board crates start from
//! [`TotemConfig::DEFAULT`] and override fields with struct update syntax.

use crate::servo::{EasingProfile, FULL_WAIVE, WaivePattern};
use crate::tempo::PeriodDivisor;

/// Laser arm lit time per beat.
pub const PULSE_MS: u64 = 100;

/// Soft cut-off of the laser arm when the beat is released.
pub const FADE_OFF_MS: u64 = 300;

/// Minimum time between two accepted presses of one button.
pub const DEBOUNCE_MS: u64 = 50;

/// MP3 player volume (0-30).
pub const VOLUME: u8 = 20;

/// Angle the arm is parked at on attach.
pub const INITIAL_ANGLE: u16 = 45;

/// Mood folders on the player's storage, in playback order.
pub const MOODS: [u8; 3] = [1, 2, 3];

/// Every tunable of the totem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TotemConfig {
    /// Laser arm lit time per beat, ms.
    pub pulse_ms: u64,
    /// Laser arm fade-out on release, ms.
    pub fade_off_ms: u64,
    /// Button debounce window, ms.
    pub debounce_ms: u64,
    /// Player volume.
    pub volume: u8,
    /// Arm angle on attach.
    pub initial_angle: u16,
    /// Easing curve for arm moves.
    pub easing: EasingProfile,
    /// Setpoints the arm waves between.
    pub waive: WaivePattern,
    /// Tap interval divisor policy.
    pub divisor: PeriodDivisor,
    /// Seed for track selection.
    pub seed: u64,
}

impl TotemConfig {
    /// The shipped configuration.
    pub const DEFAULT: Self = Self {
        pulse_ms: PULSE_MS,
        fade_off_ms: FADE_OFF_MS,
        debounce_ms: DEBOUNCE_MS,
        volume: VOLUME,
        initial_angle: INITIAL_ANGLE,
        easing: EasingProfile::ElasticOut,
        waive: FULL_WAIVE,
        divisor: PeriodDivisor::Half,
        seed: 0x7073_6361_7400,
    };
}

impl Default for TotemConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}
