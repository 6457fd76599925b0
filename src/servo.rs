//! Servo waving between two setpoints.
//!
//! The easing itself runs in the actuator driver (usually timer-interrupt
//! driven). This module only decides where to go next and how fast, and it
//! never issues a move on its own: the control loop checks
//! [`EasedActuator::is_moving`] first.

/// Easing curve applied by the actuator driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EasingProfile {
    /// Constant speed.
    Linear,
    /// Quadratic ease-in-out.
    QuadraticInOut,
    /// Cubic ease-in-out.
    CubicInOut,
    /// Overshoots and springs back at the end of the move.
    #[default]
    ElasticOut,
    /// Bounces against the target at the end of the move.
    BounceOut,
}

/// Trait for abstracting an eased servo driver.
pub trait EasedActuator {
    /// Attaches the servo and moves it to `initial_angle` immediately.
    fn attach(&mut self, initial_angle: u16);

    /// Selects the easing curve for subsequent moves.
    fn set_easing(&mut self, profile: EasingProfile);

    /// Updates the default speed in degrees per second.
    fn set_speed(&mut self, speed: u16);

    /// Starts a non-blocking move to `angle` at `speed` degrees per second.
    fn start_move_to(&mut self, angle: u16, speed: u16);

    /// Returns true while a move is in progress.
    fn is_moving(&self) -> bool;
}

/// Trait for abstracting the speed potentiometer.
pub trait AnalogInput {
    /// Reads the raw ADC value, nominally `0..=SPEED_RAW_MAX`.
    fn read_raw(&mut self) -> u16;
}

/// Two setpoints the arm waves between, plus which one comes next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WaivePattern {
    /// Start and stop angles in degrees.
    pub setpoints: [u16; 2],
    /// Index into `setpoints` of the next move.
    pub next: usize,
}

impl WaivePattern {
    /// Creates a pattern that moves to `start` first.
    pub const fn new(start: u16, stop: u16) -> Self {
        Self {
            setpoints: [start, stop],
            next: 0,
        }
    }

    /// Angle of the next move.
    #[inline]
    pub fn target(&self) -> u16 {
        self.setpoints[self.next & 1]
    }

    fn flip(&mut self) {
        self.next = (self.next & 1) ^ 1;
    }
}

/// Big wave across most of the arm's travel.
pub const FULL_WAIVE: WaivePattern = WaivePattern::new(20, 120);

/// Small wiggle around the resting angle.
pub const TINY_WAIVE: WaivePattern = WaivePattern::new(45, 55);

/// Raw analog range of the speed potentiometer.
pub const SPEED_RAW_MAX: u16 = 1023;

/// Slowest servo speed, degrees per second.
pub const SPEED_MIN: u16 = 5;

/// Fastest servo speed, degrees per second.
pub const SPEED_MAX: u16 = 150;

/// Maps a raw potentiometer reading onto `[SPEED_MIN, SPEED_MAX]`.
///
/// Integer linear map, monotonic, clamped at both rails.
pub fn map_speed(raw: u16) -> u16 {
    map_range(raw, SPEED_RAW_MAX, SPEED_MIN, SPEED_MAX)
}

/// Maps `raw` in `[0, raw_max]` onto `[out_min, out_max]`, clamping `raw`.
pub fn map_range(raw: u16, raw_max: u16, out_min: u16, out_max: u16) -> u16 {
    if raw_max == 0 {
        return out_min;
    }
    let raw = raw.min(raw_max) as u32;
    let span = out_max.saturating_sub(out_min) as u32;
    out_min + (raw * span / raw_max as u32) as u16
}

/// Moves the arm to the pattern's next setpoint and flips the selector.
///
/// Callers must check [`EasedActuator::is_moving`] first.
pub fn waive<S: EasedActuator>(servo: &mut S, pattern: &mut WaivePattern, speed: u16) -> u16 {
    let target = pattern.target();
    servo.start_move_to(target, speed);
    pattern.flip();
    target
}
