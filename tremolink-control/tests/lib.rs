use std::sync::Once;

use rand::{rngs::SmallRng, SeedableRng};
use tremolink_control::params::expression_to_target;
use tremolink_control::status_led::{StatusLed, BLINK_TOGGLE_US, IDLE_TIMEOUT_US};
use tremolink_control::{Controller, Mode, Profile};
use tremolink_midi::{CcEvent, CcMessage};

static INIT: Once = Once::new();

fn init_logger() {
    INIT.call_once(|| {
        env_logger::init();
    });
}

fn event(controller: u8, value: u8) -> CcEvent {
    CcEvent {
        channel: 0,
        controller,
        value,
    }
}

fn cc(controller: u8, value: u8) -> CcMessage {
    CcMessage::new(0, controller, value)
}

#[test]
fn test_press_activates_without_output() {
    init_logger();
    let mut controller = Controller::new(Profile::quartet());

    let out = controller.handle_event(event(27, 1), 0);

    assert!(out.is_empty());
    assert!(controller.is_active());
    assert_eq!(controller.mode(), Mode::BrokenCable);
}

#[test]
fn test_same_mode_press_deactivates_with_reset() {
    init_logger();
    let mut controller = Controller::new(Profile::quartet());
    let mut rng = SmallRng::seed_from_u64(1);

    controller.handle_event(event(27, 1), 0);
    let out = controller.handle_event(event(27, 1), 1_000);

    assert_eq!(out.as_slice(), &[cc(69, 127), cc(70, 0)]);
    assert!(!controller.is_active());

    // Nothing runs while inactive.
    assert!(controller.tick(2_000, &mut rng).is_empty());
    assert!(controller.tick(10_000_000, &mut rng).is_empty());
}

#[test]
fn test_volume_passthrough_emits_every_iteration() {
    init_logger();
    let mut controller = Controller::new(Profile::quartet());
    let mut rng = SmallRng::seed_from_u64(2);

    controller.handle_event(event(30, 1), 0);
    controller.handle_event(event(31, 79), 100);

    for i in 0..3 {
        let out = controller.tick(1_000 + i * 1_000, &mut rng);
        assert_eq!(out.as_slice(), &[cc(69, 64)]);
    }
}

#[test]
fn test_ab_balance_law() {
    init_logger();
    let mut controller = Controller::new(Profile::quartet());
    let mut rng = SmallRng::seed_from_u64(3);

    controller.handle_event(event(28, 1), 0);

    // Default target is full volume; B saturates at zero.
    let out = controller.tick(1_000, &mut rng);
    assert_eq!(out.as_slice(), &[cc(29, 127), cc(40, 0)]);

    controller.handle_event(event(31, 79), 2_000);
    let out = controller.tick(3_000, &mut rng);
    assert_eq!(out.as_slice(), &[cc(29, 64), cc(40, 57)]);
}

#[test]
fn test_lfo_burst_then_speed_only_on_change() {
    init_logger();
    let mut controller = Controller::new(Profile::quartet());
    let mut rng = SmallRng::seed_from_u64(4);

    controller.handle_event(event(29, 1), 0);

    // Initialization burst once: speed, depth, delay.
    let out = controller.tick(1_000, &mut rng);
    assert_eq!(out.as_slice(), &[cc(70, 127), cc(61, 127), cc(51, 12)]);

    // Sticky parameters are not repeated.
    assert!(controller.tick(2_000, &mut rng).is_empty());

    // Toe down: target drops to 0, speed follows to its floor.
    controller.handle_event(event(31, 127), 3_000);
    let out = controller.tick(4_000, &mut rng);
    assert_eq!(out.as_slice(), &[cc(70, 10)]);

    // Same target again: nothing to re-send.
    controller.handle_event(event(31, 127), 5_000);
    assert!(controller.tick(6_000, &mut rng).is_empty());
}

#[test]
fn test_switching_modes_stops_running_lfo() {
    init_logger();
    let mut controller = Controller::new(Profile::quartet());
    let mut rng = SmallRng::seed_from_u64(5);

    controller.handle_event(event(29, 1), 0);
    controller.tick(1_000, &mut rng);

    let out = controller.handle_event(event(30, 1), 2_000);
    assert_eq!(out.as_slice(), &[cc(70, 0)]);
    assert_eq!(controller.mode(), Mode::VolumeControl);
    assert!(controller.is_active());

    let out = controller.tick(3_000, &mut rng);
    assert_eq!(out.as_slice(), &[cc(69, 127)]);
}

#[test]
fn test_switching_before_first_tick_emits_no_stop() {
    init_logger();
    let mut controller = Controller::new(Profile::quartet());

    controller.handle_event(event(29, 1), 0);

    // The LFO never initialized, so there is nothing to silence.
    let out = controller.handle_event(event(30, 1), 500);
    assert!(out.is_empty());
}

#[test]
fn test_ramp_lfo_reset_clears_depth() {
    init_logger();
    let mut controller = Controller::new(Profile::stereo_stutter());
    let mut rng = SmallRng::seed_from_u64(6);

    controller.handle_event(event(29, 1), 0);
    assert_eq!(controller.mode(), Mode::RampLfo);

    let out = controller.tick(1_000, &mut rng);
    assert_eq!(out.as_slice(), &[cc(70, 127), cc(65, 127), cc(51, 12)]);

    let out = controller.handle_event(event(29, 1), 2_000);
    assert_eq!(out.as_slice(), &[cc(69, 127), cc(70, 0), cc(65, 0)]);
}

#[test]
fn test_sustain_gate() {
    init_logger();
    let mut controller = Controller::new(Profile::duo());

    // Sustain down activates the current mode without output.
    let out = controller.handle_event(event(32, 1), 0);
    assert!(out.is_empty());
    assert!(controller.is_active());
    assert_eq!(controller.mode(), Mode::BrokenCable);

    // Sustain up resets exactly once.
    let out = controller.handle_event(event(33, 1), 1_000);
    assert_eq!(out.as_slice(), &[cc(69, 127), cc(70, 0)]);

    let out = controller.handle_event(event(33, 1), 2_000);
    assert!(out.is_empty());
}

#[test]
fn test_unrecognized_controllers_change_nothing() {
    init_logger();
    let mut controller = Controller::new(Profile::quartet());

    for value in [0, 1, 64, 127] {
        let out = controller.handle_event(event(99, value), 0);
        assert!(out.is_empty());
    }
    assert!(!controller.is_active());
    assert_eq!(controller.target_volume(), 127);
}

#[test]
fn test_expression_remap() {
    init_logger();

    #[rustfmt::skip]
    let cases = [
        (31, 127), // heel down: full volume
        (127, 0),  // toe down: silence
        (79, 64),
        (0, 127),  // below the pedal's floor clamps to the floor
        (30, 127),
    ];

    for (raw, expected) in cases {
        assert_eq!(expression_to_target(raw, 31), expected, "raw {raw}");
    }
}

#[test]
fn test_status_led_timeline() {
    init_logger();
    let mut led = StatusLed::new();

    // Active: solid, regardless of input age.
    assert!(led.poll(true, 0, 10_000_000));

    // Inactive with recent input: off.
    assert!(!led.poll(false, 10_000_000, 10_500_000));

    // Input goes silent; the blink starts one half-period past the last
    // live poll.
    let silent_since = 10_500_000;
    assert!(!led.poll(false, silent_since, silent_since + IDLE_TIMEOUT_US));
    let idle_at = silent_since + IDLE_TIMEOUT_US;
    assert!(!led.poll(false, silent_since, idle_at + BLINK_TOGGLE_US - 1));
    assert!(led.poll(false, silent_since, idle_at + BLINK_TOGGLE_US));
    assert!(led.poll(false, silent_since, idle_at + BLINK_TOGGLE_US + 500_000));
    assert!(!led.poll(false, silent_since, idle_at + 2 * BLINK_TOGGLE_US + 1));

    // Any new activity stops the blink.
    assert!(!led.poll(false, idle_at + 3_000_000, idle_at + 3_000_001));
}

#[test]
fn test_active_mode_counts_as_led_activity() {
    init_logger();
    let mut controller = Controller::new(Profile::quartet());
    let mut rng = SmallRng::seed_from_u64(7);

    controller.handle_event(event(30, 1), 0);
    controller.tick(20_000_000, &mut rng);

    // Twenty virtual seconds passed, but the running mode kept the
    // activity timestamp fresh.
    assert_eq!(controller.last_input_us(), 20_000_000);
}
