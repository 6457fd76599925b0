//! Integration tests for the Totem control loop

mod common;
use common::*;

use totem_animator::config::{INITIAL_ANGLE, VOLUME};
use totem_animator::{
    AudioError, ChannelState, EasingProfile, EdgeCounter, InitError, LoopState, Pattern,
    PatternKind, TempoEvent, Totem, TotemConfig,
};

#[test]
fn startup_attaches_servo_and_sets_volume() {
    let totem = totem();
    assert_eq!(totem.state(), LoopState::Live);
    assert_eq!(totem.servo().attached_at, Some(INITIAL_ANGLE));
    assert_eq!(totem.servo().easing, Some(EasingProfile::ElasticOut));
    assert_eq!(totem.player().volume, Some(VOLUME));
}

#[test]
fn missing_player_halts_the_totem() {
    let mut totem: TestTotem =
        Totem::new(parts(MockPlayer::missing()), &TotemConfig::DEFAULT, &MOODS);
    assert_eq!(
        totem.state(),
        LoopState::Halted(InitError::Audio(AudioError::NotFound))
    );

    press(&mut totem, waive_button, 0);
    press(&mut totem, talk, 100);
    for t in [200, 400, 600, 800] {
        press(&mut totem, laser, t);
    }

    assert!(totem.servo().moves.is_empty());
    assert!(totem.player().plays.is_empty());
    assert_eq!(totem.tempo().count(), 0);
    assert_eq!(totem.context().passes, 0);
    assert_eq!(totem.rig().laser_arm().state(), ChannelState::Stopped);
}

#[test]
fn speed_follows_potentiometer_every_pass() {
    let mut totem = totem();

    totem.speed_input_mut().raw = 0;
    totem.run_pass(TestInstant(0));
    assert_eq!(totem.context().speed, 5);
    assert_eq!(totem.servo().speed, 5);

    totem.speed_input_mut().raw = 1023;
    totem.run_pass(TestInstant(1));
    assert_eq!(totem.context().speed, 150);
    assert_eq!(totem.servo().speed, 150);

    totem.speed_input_mut().raw = 511;
    totem.run_pass(TestInstant(2));
    let midpoint = (5.0 + 150.0) / 2.0;
    assert!((totem.context().speed as f32 - midpoint).abs() <= 1.0);
}

#[test]
fn waive_alternates_setpoints_starting_with_first() {
    let mut totem = totem();
    let setpoints = TotemConfig::DEFAULT.waive.setpoints;

    for i in 0..6u64 {
        let report = press(&mut totem, waive_button, i * 100);
        assert_eq!(report.waived, Some(setpoints[(i % 2) as usize]));
        totem.servo_mut().finish();
    }

    let targets: Vec<u16> = totem.servo().targets().collect();
    assert_eq!(targets, vec![20, 120, 20, 120, 20, 120]);
}

#[test]
fn waive_uses_current_speed() {
    let mut totem = totem();
    totem.speed_input_mut().raw = 1023;
    press(&mut totem, waive_button, 0);
    assert_eq!(totem.servo().moves[0], (20, 150));
}

#[test]
fn no_waive_while_servo_is_moving() {
    let mut totem = totem();

    press(&mut totem, waive_button, 0);
    assert_eq!(totem.servo().moves.len(), 1);

    // Still moving: presses are dropped and the selector stays put
    let report = press(&mut totem, waive_button, 100);
    assert_eq!(report.waived, None);
    press(&mut totem, waive_button, 200);
    assert_eq!(totem.servo().moves.len(), 1);
    assert_eq!(totem.waive_pattern().target(), 120);

    totem.servo_mut().finish();
    let report = press(&mut totem, waive_button, 300);
    assert_eq!(report.waived, Some(120));
}

#[test]
fn held_button_is_consumed_once() {
    let mut totem = totem();

    totem.laser_button_mut().pin_mut().down = true;
    let first = totem.run_pass(TestInstant(0));
    let second = totem.run_pass(TestInstant(100));
    let third = totem.run_pass(TestInstant(200));

    assert_eq!(first.tempo, TempoEvent::FirstBeat);
    assert_eq!(second.tempo, TempoEvent::None);
    assert_eq!(third.tempo, TempoEvent::None);
    assert_eq!(totem.tempo().count(), 1);
    assert_eq!(totem.laser_button_mut().edge_count(), 1);
}

#[test]
fn bounce_inside_debounce_window_is_ignored() {
    let mut totem = totem();
    press(&mut totem, laser, 0);
    press(&mut totem, laser, 20);
    assert_eq!(totem.tempo().count(), 1);
}

#[test]
fn bouncy_tap_is_one_beat() {
    let mut totem = totem();
    for (t, down) in [(0, true), (2, false), (4, true), (60, true), (300, false)] {
        totem.laser_button_mut().pin_mut().down = down;
        totem.run_pass(TestInstant(t));
    }
    assert_eq!(totem.tempo().count(), 1);
    assert_eq!(totem.laser_button_mut().edge_count(), 1);
}

#[test]
fn simultaneous_presses_each_dispatch_once() {
    let mut totem = totem();

    totem.waive_button_mut().pin_mut().down = true;
    totem.talk_button_mut().pin_mut().down = true;
    totem.laser_button_mut().pin_mut().down = true;
    let report = totem.run_pass(TestInstant(0));

    assert_eq!(report.waived, Some(20));
    assert!(report.played.is_some());
    assert_eq!(report.tempo, TempoEvent::FirstBeat);

    let report = totem.run_pass(TestInstant(1));
    assert_eq!(report.waived, None);
    assert_eq!(report.played, None);
    assert_eq!(report.tempo, TempoEvent::None);
}

#[test]
fn four_taps_arm_the_lights() {
    let mut totem = totem();
    let mut last = None;
    for t in [0, 200, 400, 600] {
        last = Some(press(&mut totem, laser, t));
    }

    assert_eq!(
        last.unwrap().tempo,
        TempoEvent::Armed {
            period: TestDuration(300)
        }
    );
    assert_eq!(
        *totem.rig().laser_arm().pattern(),
        Pattern::blink_forever(TestDuration(100), TestDuration(200))
    );
}

#[test]
fn trigger_shows_from_next_pass() {
    let mut totem = totem();
    for t in [0, 200, 400] {
        press(&mut totem, laser, t);
    }

    totem.laser_button_mut().pin_mut().down = true;
    totem.run_pass(TestInstant(600));
    // Lights were rendered before the tap was dispatched
    assert_eq!(totem.rig().laser_arm().state(), ChannelState::Armed);
    assert!(!totem.rig().laser_arm().is_on());

    totem.laser_button_mut().pin_mut().down = false;
    totem.run_pass(TestInstant(601));
    assert!(totem.rig().laser_arm().is_on());
}

#[test]
fn fifth_tap_releases_lights_and_resets_counter() {
    let mut totem = totem();
    for t in [0, 200, 400, 600] {
        press(&mut totem, laser, t);
    }
    assert!(totem.rig().chain().is_on());

    let report = press(&mut totem, laser, 650);
    assert_eq!(report.tempo, TempoEvent::Reset);
    assert_eq!(totem.laser_button_mut().edge_count(), 0);
    assert_eq!(totem.tempo().count(), 0);

    let rig = totem.rig();
    assert_eq!(rig.laser_arm().pattern().kind, PatternKind::FadeOff);
    assert_eq!(rig.laser_eye().state(), ChannelState::Stopped);
    assert_eq!(rig.chain().state(), ChannelState::Stopped);
    assert!(rig.collar().channels().all(|c| !c.is_on()));

    totem.run_pass(TestInstant(1000));
    assert!(!totem.rig().laser_arm().is_on());
}

#[test]
fn cycle_repeats_after_reset() {
    let mut totem = totem();
    for t in [0, 200, 400, 600, 700] {
        press(&mut totem, laser, t);
    }

    let mut last = None;
    for t in [1000, 1200, 1400, 1600] {
        last = Some(press(&mut totem, laser, t));
    }
    assert_eq!(
        last.unwrap().tempo,
        TempoEvent::Armed {
            period: TestDuration(300)
        }
    );
}

#[test]
fn talk_plays_when_player_idle() {
    let mut totem = totem();
    let report = press(&mut totem, talk, 0);

    let (folder, track) = report.played.unwrap();
    assert_eq!(folder, MOODS[0]);
    assert!((1..=4).contains(&track));
    assert_eq!(totem.player().plays.len(), 1);
}

#[test]
fn talk_ignored_while_player_busy() {
    let mut totem = totem();
    totem.player_mut().busy = true;

    let report = press(&mut totem, talk, 0);
    assert_eq!(report.played, None);
    assert!(totem.player().plays.is_empty());

    // The press was consumed, not queued
    totem.player_mut().busy = false;
    totem.run_pass(TestInstant(100));
    assert!(totem.player().plays.is_empty());
}

#[test]
fn passes_are_counted() {
    let mut totem = totem();
    for t in 0..5 {
        totem.run_pass(TestInstant(t));
    }
    assert_eq!(totem.context().passes, 5);
}
