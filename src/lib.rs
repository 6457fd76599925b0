#![cfg_attr(not(feature = "std"), no_std)]
#![doc = include_str!("../README.md")]

//! # Core Concepts
//!
//! - **`Pattern`**: Declarative timing of one output (blink, breathe, fade-off, on, off)
//! - **`Repeat`**: How many cycles a pattern runs (`Times(n)` or `Forever`)
//! - **`AnimationChannel`**: Drives one `Output` through a pattern, re-rendered on each tick
//! - **`ChannelSequencer`**: Cycles "active" status around a fixed ring of channels
//! - **`TapTempo`**: Turns four taps into a beat period, resets on the fifth
//! - **`BeatRig`**: Arms every beat-synchronised light from one period
//! - **`WaivePattern`**: Two servo setpoints the arm alternates between
//! - **`MoodPlayer`**: Picks a mood folder and random track on the MP3 player
//! - **`Totem`**: The cooperative control loop tying it all together
//! - **`TimeSource`**: Trait to implement for your timing system
//!
//! Output levels are `f32` in the 0.0-1.0 range. RGB elements use `Srgb<f32>`
//! through [`ColorOutput`].

// Re-export Srgb from palette for user convenience
pub use palette::Srgb;

pub mod audio;
pub mod button;
pub mod channel;
pub mod config;
pub mod control;
pub mod output;
pub mod pattern;
pub mod rig;
pub mod sequencer;
pub mod servo;
pub mod tempo;
pub mod time;
pub mod types;

pub use audio::{AudioError, AudioPlayer, MoodPlayer};
pub use button::{ButtonInput, DebouncedButton, EdgeCounter};
pub use channel::{AnimationChannel, ChannelState, ServiceTiming};
pub use config::TotemConfig;
pub use control::{Board, InitError, LoopContext, LoopState, PassReport, Totem, TotemParts};
pub use output::{ColorOutput, DigitalOutput, Output, RgbLed, Switch};
pub use pattern::{LEVEL_OFF, LEVEL_ON};
pub use rig::BeatRig;
pub use sequencer::ChannelSequencer;
pub use servo::{AnalogInput, EasedActuator, EasingProfile, WaivePattern, map_speed, waive};
pub use tempo::{PeriodDivisor, TapTempo, TempoEvent};
pub use time::{TimeDuration, TimeInstant, TimeSource};
pub use types::{Pattern, PatternKind, Repeat, SequencerError};

pub const COLOR_OFF: Srgb = Srgb::new(0.0, 0.0, 0.0);
