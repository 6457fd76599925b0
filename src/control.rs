//! The totem's single cooperative control loop.
//!
//! [`Totem`] owns every component and runs one non-blocking pass per call to
//! [`Totem::run_pass`]:
//!
//! 1. read the speed potentiometer and push the mapped speed to the servo
//! 2. poll every button
//! 3. render every light
//! 4. waive the arm if it is idle and the waive button was pressed
//! 5. play a track if the talk button was pressed and the player is idle
//! 6. feed the tap-tempo estimator if the laser button was pressed
//!
//! Lights are rendered before triggers are dispatched, so anything a trigger
//! changes shows up from the next pass on.

use crate::audio::{AudioError, AudioPlayer, MoodPlayer};
use crate::button::EdgeCounter;
use crate::channel::ServiceTiming;
use crate::config::TotemConfig;
use crate::output::Output;
use crate::rig::BeatRig;
use crate::sequencer::ChannelSequencer;
use crate::servo::{AnalogInput, EasedActuator, WaivePattern, map_speed, waive};
use crate::tempo::{TapTempo, TempoEvent};
use crate::time::{TimeDuration, TimeInstant, TimeSource};

type Duration<B> = <<B as Board>::Instant as TimeInstant>::Duration;

/// Hardware types a board plugs into the totem.
pub trait Board {
    /// Time instant type of the board's clock.
    type Instant: TimeInstant;
    /// Arm servo driver.
    type Servo: EasedActuator;
    /// Speed potentiometer.
    type SpeedInput: AnalogInput;
    /// Debounced button type shared by all three buttons.
    type Button: EdgeCounter<Self::Instant>;
    /// MP3 player.
    type Player: AudioPlayer;
    /// Laser on the arm.
    type LaserArm: Output;
    /// Laser in the eye.
    type LaserEye: Output;
    /// One LED of the collar.
    type Collar: Output;
    /// LED chain.
    type Chain: Output;
}

/// Peripherals handed to [`Totem::new`].
pub struct TotemParts<B: Board, const N: usize> {
    pub servo: B::Servo,
    pub speed: B::SpeedInput,
    pub waive_button: B::Button,
    pub talk_button: B::Button,
    pub laser_button: B::Button,
    pub player: B::Player,
    pub laser_arm: B::LaserArm,
    pub laser_eye: B::LaserEye,
    pub collar: ChannelSequencer<B::Instant, B::Collar, N>,
    pub chain: B::Chain,
}

/// Fatal start-up failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InitError {
    /// The MP3 player could not be brought up.
    Audio(AudioError),
}

impl core::fmt::Display for InitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            InitError::Audio(e) => write!(f, "audio init failed: {}", e),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for InitError {}

/// Whether the loop is doing anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LoopState {
    /// Normal operation.
    Live,
    /// Start-up failed. The totem stays dark and ignores every input.
    Halted(InitError),
}

/// Values shared between the loop's steps, owned by the loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoopContext {
    /// Servo speed mapped on the latest pass.
    pub speed: u16,
    /// Number of passes run while live.
    pub passes: u64,
}

/// What happened during one pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PassReport<D> {
    /// Setpoint the arm was sent to.
    pub waived: Option<u16>,
    /// Folder and track that started playing.
    pub played: Option<(u8, u16)>,
    /// What the laser button did to the tempo estimator.
    pub tempo: TempoEvent<D>,
    /// When the lights next need rendering.
    pub timing: ServiceTiming<D>,
}

impl<D> PassReport<D> {
    fn idle() -> Self {
        Self {
            waived: None,
            played: None,
            tempo: TempoEvent::None,
            timing: ServiceTiming::Complete,
        }
    }
}

/// The assembled prop.
pub struct Totem<'m, B: Board, const N: usize> {
    servo: B::Servo,
    speed_input: B::SpeedInput,
    waive_button: B::Button,
    talk_button: B::Button,
    laser_button: B::Button,
    player: B::Player,
    moods: MoodPlayer<'m>,
    rig: BeatRig<B::Instant, B::LaserArm, B::LaserEye, B::Collar, B::Chain, N>,
    tempo: TapTempo<B::Instant>,
    waive_pattern: WaivePattern,
    context: LoopContext,
    state: LoopState,
}

impl<'m, B: Board, const N: usize> Totem<'m, B, N> {
    /// Brings up the peripherals and wires the components.
    ///
    /// If the player fails to start, the totem is returned in
    /// [`LoopState::Halted`] and every later pass is a no-op.
    pub fn new(parts: TotemParts<B, N>, config: &TotemConfig, moods: &'m [u8]) -> Self {
        let TotemParts {
            mut servo,
            speed,
            waive_button,
            talk_button,
            laser_button,
            mut player,
            laser_arm,
            laser_eye,
            collar,
            chain,
        } = parts;

        servo.attach(config.initial_angle);
        servo.set_easing(config.easing);

        let state = match player.begin() {
            Ok(()) => {
                player.set_volume(config.volume);
                LoopState::Live
            }
            Err(e) => {
                #[cfg(feature = "defmt")]
                defmt::warn!("audio init failed: {}, halting", e);
                LoopState::Halted(InitError::Audio(e))
            }
        };

        let rig = BeatRig::new(
            laser_arm,
            laser_eye,
            collar,
            chain,
            <Duration<B> as TimeDuration>::from_millis(config.pulse_ms),
            <Duration<B> as TimeDuration>::from_millis(config.fade_off_ms),
        );

        Self {
            servo,
            speed_input: speed,
            waive_button,
            talk_button,
            laser_button,
            player,
            moods: MoodPlayer::new(moods, config.seed),
            rig,
            tempo: TapTempo::new(config.divisor),
            waive_pattern: config.waive,
            context: LoopContext::default(),
            state,
        }
    }

    /// Runs one non-blocking pass of the loop at `now`.
    pub fn run_pass(&mut self, now: B::Instant) -> PassReport<Duration<B>> {
        let mut report = PassReport::idle();
        if let LoopState::Halted(_) = self.state {
            return report;
        }
        self.context.passes += 1;

        let speed = map_speed(self.speed_input.read_raw());
        self.context.speed = speed;
        self.servo.set_speed(speed);

        self.waive_button.poll(now);
        self.talk_button.poll(now);
        self.laser_button.poll(now);

        report.timing = self.rig.tick(now);

        if !self.servo.is_moving() && self.waive_button.was_pressed() {
            report.waived = Some(waive(&mut self.servo, &mut self.waive_pattern, speed));
        }

        if self.talk_button.was_pressed() && !self.player.is_busy() {
            report.played = self.moods.play_next(&mut self.player);
        }

        if self.laser_button.was_pressed() {
            let event = self.tempo.observe(self.laser_button.edge_count(), true, now);
            self.rig.apply(event);
            if matches!(event, TempoEvent::Reset) {
                self.laser_button.reset_count();
            }
            report.tempo = event;
        }

        report
    }

    /// Runs the loop forever.
    pub fn run<T: TimeSource<B::Instant>>(&mut self, clock: &T) -> ! {
        loop {
            self.run_pass(clock.now());
        }
    }

    /// Returns whether the loop is live.
    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Returns the loop context.
    pub fn context(&self) -> &LoopContext {
        &self.context
    }

    /// Returns the beat-synchronised lights.
    pub fn rig(&self) -> &BeatRig<B::Instant, B::LaserArm, B::LaserEye, B::Collar, B::Chain, N> {
        &self.rig
    }

    /// Returns the tempo estimator.
    pub fn tempo(&self) -> &TapTempo<B::Instant> {
        &self.tempo
    }

    /// Returns the arm's waive pattern.
    pub fn waive_pattern(&self) -> &WaivePattern {
        &self.waive_pattern
    }

    /// Returns the servo driver.
    pub fn servo(&self) -> &B::Servo {
        &self.servo
    }

    /// Returns the servo driver mutably.
    pub fn servo_mut(&mut self) -> &mut B::Servo {
        &mut self.servo
    }

    /// Returns the speed input mutably.
    pub fn speed_input_mut(&mut self) -> &mut B::SpeedInput {
        &mut self.speed_input
    }

    /// Returns the player.
    pub fn player(&self) -> &B::Player {
        &self.player
    }

    /// Returns the player mutably.
    pub fn player_mut(&mut self) -> &mut B::Player {
        &mut self.player
    }

    /// Returns the waive button mutably.
    pub fn waive_button_mut(&mut self) -> &mut B::Button {
        &mut self.waive_button
    }

    /// Returns the talk button mutably.
    pub fn talk_button_mut(&mut self) -> &mut B::Button {
        &mut self.talk_button
    }

    /// Returns the laser button mutably.
    pub fn laser_button_mut(&mut self) -> &mut B::Button {
        &mut self.laser_button
    }
}
