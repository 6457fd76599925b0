//! Shared test infrastructure for totem-animator integration tests

#![allow(dead_code)] // Items used across multiple test files; Rust analyzes per-file

use palette::Srgb;
use totem_animator::control::{Board, PassReport, Totem, TotemParts};
use totem_animator::{
    AnalogInput, AudioError, AudioPlayer, ButtonInput, ChannelSequencer, DebouncedButton,
    EasedActuator, EasingProfile, Output, RgbLed, TimeDuration, TimeInstant, TotemConfig,
};

// ============================================================================
// Mock Time Types
// ============================================================================

/// Mock duration type for testing (wraps milliseconds)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TestDuration(pub u64);

impl TimeDuration for TestDuration {
    const ZERO: Self = TestDuration(0);

    fn as_millis(&self) -> u64 {
        self.0
    }

    fn from_millis(millis: u64) -> Self {
        TestDuration(millis)
    }
}

/// Mock instant type for testing
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TestInstant(pub u64);

impl TimeInstant for TestInstant {
    type Duration = TestDuration;

    fn duration_since(&self, earlier: Self) -> Self::Duration {
        TestDuration(self.0.saturating_sub(earlier.0))
    }

    fn checked_add(self, duration: Self::Duration) -> Option<Self> {
        self.0.checked_add(duration.0).map(TestInstant)
    }
}

// ============================================================================
// Mock Outputs
// ============================================================================

/// Mock output that records every level written
pub struct MockOutput {
    level: f32,
    history: heapless::Vec<f32, 64>,
}

impl MockOutput {
    pub fn new() -> Self {
        Self {
            level: 0.0,
            history: heapless::Vec::new(),
        }
    }

    pub fn level(&self) -> f32 {
        self.level
    }

    pub fn history(&self) -> &[f32] {
        &self.history
    }
}

impl Output for MockOutput {
    fn set_level(&mut self, level: f32) {
        self.level = level;
        let _ = self.history.push(level);
    }
}

/// Mock RGB LED that remembers the last color
pub struct MockLed {
    current_color: Srgb,
}

impl MockLed {
    pub fn new() -> Self {
        Self {
            current_color: Srgb::new(0.0, 0.0, 0.0),
        }
    }

    pub fn get_last_color(&self) -> Srgb {
        self.current_color
    }
}

impl RgbLed for MockLed {
    fn set_color(&mut self, color: Srgb) {
        self.current_color = color;
    }
}

// ============================================================================
// Mock Peripherals
// ============================================================================

/// Mock servo whose moves only finish when told to
pub struct MockServo {
    pub attached_at: Option<u16>,
    pub easing: Option<EasingProfile>,
    pub speed: u16,
    pub moving: bool,
    pub moves: heapless::Vec<(u16, u16), 64>,
}

impl MockServo {
    pub fn new() -> Self {
        Self {
            attached_at: None,
            easing: None,
            speed: 0,
            moving: false,
            moves: heapless::Vec::new(),
        }
    }

    /// Complete the move in flight
    pub fn finish(&mut self) {
        self.moving = false;
    }

    pub fn targets(&self) -> impl Iterator<Item = u16> + '_ {
        self.moves.iter().map(|(angle, _)| *angle)
    }
}

impl EasedActuator for MockServo {
    fn attach(&mut self, initial_angle: u16) {
        self.attached_at = Some(initial_angle);
    }

    fn set_easing(&mut self, profile: EasingProfile) {
        self.easing = Some(profile);
    }

    fn set_speed(&mut self, speed: u16) {
        self.speed = speed;
    }

    fn start_move_to(&mut self, angle: u16, speed: u16) {
        assert!(!self.moving, "move issued while servo was moving");
        self.moving = true;
        let _ = self.moves.push((angle, speed));
    }

    fn is_moving(&self) -> bool {
        self.moving
    }
}

/// Mock potentiometer
pub struct MockAnalog {
    pub raw: u16,
}

impl AnalogInput for MockAnalog {
    fn read_raw(&mut self) -> u16 {
        self.raw
    }
}

/// Mock button pin
pub struct MockPin {
    pub down: bool,
}

impl ButtonInput for MockPin {
    fn is_pressed(&mut self) -> bool {
        self.down
    }
}

pub type TestButton = DebouncedButton<TestInstant, MockPin>;

pub fn button() -> TestButton {
    DebouncedButton::new(MockPin { down: false }, TotemConfig::DEFAULT.debounce_ms)
}

/// Mock MP3 player with scripted file-count failures
pub struct MockPlayer {
    pub present: bool,
    pub busy: bool,
    pub volume: Option<u8>,
    pub files: u16,
    pub count_failures: u8,
    pub count_queries: u32,
    pub plays: heapless::Vec<(u8, u16), 64>,
}

impl MockPlayer {
    pub fn new(files: u16) -> Self {
        Self {
            present: true,
            busy: false,
            volume: None,
            files,
            count_failures: 0,
            count_queries: 0,
            plays: heapless::Vec::new(),
        }
    }

    pub fn missing() -> Self {
        Self {
            present: false,
            ..Self::new(1)
        }
    }
}

impl AudioPlayer for MockPlayer {
    fn begin(&mut self) -> Result<(), AudioError> {
        if self.present {
            Ok(())
        } else {
            Err(AudioError::NotFound)
        }
    }

    fn set_volume(&mut self, volume: u8) {
        self.volume = Some(volume);
    }

    fn is_busy(&mut self) -> bool {
        self.busy
    }

    fn play_folder_track(&mut self, folder: u8, track: u16) {
        let _ = self.plays.push((folder, track));
    }

    fn count_files_in_folder(&mut self, _folder: u8) -> Result<u16, AudioError> {
        self.count_queries += 1;
        if self.count_failures > 0 {
            self.count_failures -= 1;
            return Err(AudioError::InvalidResponse);
        }
        Ok(self.files)
    }
}

// ============================================================================
// Test Board
// ============================================================================

pub struct TestBoard;

impl Board for TestBoard {
    type Instant = TestInstant;
    type Servo = MockServo;
    type SpeedInput = MockAnalog;
    type Button = TestButton;
    type Player = MockPlayer;
    type LaserArm = MockOutput;
    type LaserEye = MockOutput;
    type Collar = MockOutput;
    type Chain = MockOutput;
}

pub const COLLAR_LEDS: usize = 3;

pub type TestTotem = Totem<'static, TestBoard, COLLAR_LEDS>;

pub static MOODS: [u8; 3] = [1, 2, 3];

pub fn collar() -> ChannelSequencer<TestInstant, MockOutput, COLLAR_LEDS> {
    let mut collar = ChannelSequencer::new();
    for _ in 0..COLLAR_LEDS {
        collar.push(MockOutput::new()).unwrap();
    }
    collar
}

pub fn parts(player: MockPlayer) -> TotemParts<TestBoard, COLLAR_LEDS> {
    TotemParts {
        servo: MockServo::new(),
        speed: MockAnalog { raw: 512 },
        waive_button: button(),
        talk_button: button(),
        laser_button: button(),
        player,
        laser_arm: MockOutput::new(),
        laser_eye: MockOutput::new(),
        collar: collar(),
        chain: MockOutput::new(),
    }
}

pub fn totem() -> TestTotem {
    Totem::new(parts(MockPlayer::new(4)), &TotemConfig::DEFAULT, &MOODS)
}

// ============================================================================
// Test Helper Functions
// ============================================================================

/// Press a button for one pass at `at`, then release it on a pass at `at + 1`.
///
/// Returns the report of the pass that saw the press.
pub fn press(
    totem: &mut TestTotem,
    select: fn(&mut TestTotem) -> &mut TestButton,
    at: u64,
) -> PassReport<TestDuration> {
    select(totem).pin_mut().down = true;
    let report = totem.run_pass(TestInstant(at));
    select(totem).pin_mut().down = false;
    totem.run_pass(TestInstant(at + 1));
    report
}

pub fn laser(totem: &mut TestTotem) -> &mut TestButton {
    totem.laser_button_mut()
}

pub fn waive_button(totem: &mut TestTotem) -> &mut TestButton {
    totem.waive_button_mut()
}

pub fn talk(totem: &mut TestTotem) -> &mut TestButton {
    totem.talk_button_mut()
}

/// Compare two levels with floating-point tolerance
pub fn levels_equal(a: f32, b: f32) -> bool {
    (a - b).abs() < 0.001
}

/// Compare two colors with floating-point tolerance
pub fn colors_equal(a: Srgb, b: Srgb) -> bool {
    const EPSILON: f32 = 0.001;
    (a.red - b.red).abs() < EPSILON
        && (a.green - b.green).abs() < EPSILON
        && (a.blue - b.blue).abs() < EPSILON
}
