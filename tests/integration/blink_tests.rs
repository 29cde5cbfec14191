//! Integration tests for the blink pipeline:
//! `request_blink` → `BlinkFsm` → fade task → `PwmAdapter` → driver.
//!
//! The mock holds every fade in flight until the test releases it, so
//! each sub-phase of the breathing cycle can be observed separately.

use super::mock_pwm::{MockPwm, PwmCall, settle, wait_until};

use rgbled::channels::LedChannel;
use rgbled::fade::Cadence;
use rgbled::{BlinkState, Color, LedConfig, RgbLed};

const SLOW_MS: u32 = 3_000;
const FAST_MS: u32 = 1_000;

fn make_led(color: Color) -> (RgbLed<MockPwm>, MockPwm) {
    let mock = MockPwm::new();
    let mut led = RgbLed::new(mock.clone(), LedConfig::default()).unwrap();
    led.set_color(color).unwrap();
    mock.clear_calls();
    (led, mock)
}

/// The last three fade commands, in channel order.
fn last_phase(mock: &MockPwm) -> Vec<(LedChannel, u32, u32)> {
    let fades = mock.fades();
    fades[fades.len().saturating_sub(3)..].to_vec()
}

fn phase(targets: [u32; 3], duration_ms: u32) -> Vec<(LedChannel, u32, u32)> {
    LedChannel::ALL
        .iter()
        .zip(targets)
        .map(|(&ch, t)| (ch, t, duration_ms))
        .collect()
}

#[test]
fn slow_blink_fades_down_then_up_to_colour() {
    let (mut led, mock) = make_led(Color::new(247, 120, 138));

    assert!(led.request_blink(BlinkState::SlowBlink));
    assert!(wait_until(|| mock.pending() == 3));
    assert_eq!(last_phase(&mock), phase([0, 0, 0], SLOW_MS));

    mock.complete_pending();
    assert!(wait_until(|| mock.pending() == 3));
    assert_eq!(last_phase(&mock), phase([247, 120, 138], SLOW_MS));

    mock.complete_pending();
    assert!(wait_until(|| mock.pending() == 3));
    assert_eq!(last_phase(&mock), phase([0, 0, 0], SLOW_MS));
    assert_eq!(mock.fades().len(), 9);
}

#[test]
fn next_phase_waits_for_all_three_channels() {
    let (mut led, mock) = make_led(Color::WHITE);

    led.request_blink(BlinkState::FastBlink);
    assert!(wait_until(|| mock.pending() == 3));

    settle();
    assert_eq!(mock.fades().len(), 3, "no new phase before completion");
}

#[test]
fn colour_set_while_blinking_is_deferred_to_next_fade_up() {
    let (mut led, mock) = make_led(Color::RED);

    led.request_blink(BlinkState::SlowBlink);
    assert!(wait_until(|| mock.pending() == 3));

    led.set_color(Color::new(0, 201, 204)).unwrap();
    assert_eq!(
        mock.count(|c| matches!(c, PwmCall::SetDuty { .. })),
        0,
        "colour must not be written directly during a blink"
    );
    assert_eq!(led.color(), Color::new(0, 201, 204));

    mock.complete_pending();
    assert!(wait_until(|| mock.pending() == 3));
    assert_eq!(last_phase(&mock), phase([0, 201, 204], SLOW_MS));
}

#[test]
fn constant_stops_further_fades() {
    let (mut led, mock) = make_led(Color::GREEN);

    led.request_blink(BlinkState::SlowBlink);
    assert!(wait_until(|| mock.pending() == 3));

    assert!(led.request_blink(BlinkState::Constant));
    assert!(!led.is_fading(Cadence::Slow));

    // The in-flight fades still finish on the hardware.
    mock.complete_pending();
    settle();
    assert_eq!(mock.fades().len(), 3);

    led.set_color(Color::BLUE).unwrap();
    assert_eq!(mock.duties(), [0, 0, 255]);
}

#[test]
fn slow_to_fast_never_runs_both_cadences() {
    let (mut led, mock) = make_led(Color::WHITE);

    led.request_blink(BlinkState::SlowBlink);
    assert!(wait_until(|| mock.pending() == 3));

    led.request_blink(BlinkState::FastBlink);
    assert!(!led.is_fading(Cadence::Slow));
    assert!(led.is_fading(Cadence::Fast));

    assert!(wait_until(|| mock.fades().len() == 6));
    assert_eq!(last_phase(&mock), phase([0, 0, 0], FAST_MS));

    // The fast fades took over every channel from the slow ones.
    assert_eq!(mock.superseded(), 3);
    assert_eq!(mock.complete_pending(), 3);
    assert!(wait_until(|| mock.pending() == 3));
    assert_eq!(last_phase(&mock), phase([255, 255, 255], FAST_MS));

    settle();
    let slow_after_switch = mock.fades()[3..]
        .iter()
        .filter(|(_, _, ms)| *ms == SLOW_MS)
        .count();
    assert_eq!(slow_after_switch, 0);
}

#[test]
fn switched_cadence_advances_only_on_its_own_completions() {
    let (mut led, mock) = make_led(Color::new(52, 168, 83));

    led.request_blink(BlinkState::SlowBlink);
    assert!(wait_until(|| mock.pending() == 3));
    led.request_blink(BlinkState::FastBlink);
    assert!(wait_until(|| mock.fades().len() == 6));

    // One release finishes exactly one fast sub-phase.
    mock.complete_pending();
    assert!(wait_until(|| mock.fades().len() == 9));
    settle();
    assert_eq!(mock.fades().len(), 9);
    assert_eq!(last_phase(&mock), phase([52, 168, 83], FAST_MS));

    mock.complete_pending();
    assert!(wait_until(|| mock.fades().len() == 12));
    assert_eq!(last_phase(&mock), phase([0, 0, 0], FAST_MS));
}

#[test]
fn suspension_racing_the_last_completion_restarts_the_cycle() {
    let (mut led, mock) = make_led(Color::RED);

    led.request_blink(BlinkState::SlowBlink);
    assert!(wait_until(|| mock.pending() == 3));

    // The fades finish right behind the switch away, before the task
    // gets to look at either.
    led.request_blink(BlinkState::Constant);
    mock.complete_pending();
    led.request_blink(BlinkState::SlowBlink);

    assert!(wait_until(|| mock.fades().len() == 6));
    settle();
    assert_eq!(mock.fades().len(), 6);
    assert_eq!(last_phase(&mock), phase([0, 0, 0], SLOW_MS));
}

#[test]
fn repeated_request_does_not_resume_twice() {
    let (mut led, mock) = make_led(Color::WHITE);

    assert!(led.request_blink(BlinkState::FastBlink));
    assert!(!led.request_blink(BlinkState::FastBlink));
    assert_eq!(led.fade_resumes(Cadence::Fast), 1);

    assert!(wait_until(|| mock.pending() == 3));
    settle();
    assert_eq!(mock.fades().len(), 3);
}

#[test]
fn returning_to_a_cadence_restarts_its_cycle() {
    let (mut led, mock) = make_led(Color::RED);

    led.request_blink(BlinkState::SlowBlink);
    assert!(wait_until(|| mock.pending() == 3));
    led.request_blink(BlinkState::Constant);
    mock.complete_pending();
    settle();

    led.request_blink(BlinkState::SlowBlink);
    assert!(wait_until(|| mock.pending() == 3));
    assert_eq!(last_phase(&mock), phase([0, 0, 0], SLOW_MS));
    assert_eq!(led.fade_resumes(Cadence::Slow), 2);
}

#[test]
fn dropping_the_led_stops_the_fade_tasks() {
    let (mut led, mock) = make_led(Color::WHITE);

    led.request_blink(BlinkState::FastBlink);
    assert!(wait_until(|| mock.pending() == 3));

    drop(led);
    mock.complete_pending();
    settle();
    assert_eq!(mock.fades().len(), 3);
}
