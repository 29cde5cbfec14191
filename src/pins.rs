//! GPIO / LEDC assignments for the tri-colour status LED.
//!
//! Single source of truth for the defaults in [`LedConfig`](crate::config::LedConfig).
//! Every binding is overridable through the config structure; nothing
//! else in the crate hard-codes a pin number.

// ---------------------------------------------------------------------------
// LED pins (common-cathode RGB LED, one LEDC channel per colour)
// ---------------------------------------------------------------------------

pub const LED_R_GPIO: i32 = 21;
pub const LED_G_GPIO: i32 = 22;
pub const LED_B_GPIO: i32 = 23;

// ---------------------------------------------------------------------------
// LEDC channels and timer
// ---------------------------------------------------------------------------

pub const LEDC_CH_LED_R: u32 = 0;
pub const LEDC_CH_LED_G: u32 = 1;
pub const LEDC_CH_LED_B: u32 = 2;

/// All three LED channels share this timer.
pub const LEDC_TIMER_LED: u32 = 0;

// ---------------------------------------------------------------------------
// PWM configuration
// ---------------------------------------------------------------------------

/// LEDC timer resolution (bits).  8-bit maps colour bytes 1:1 onto duty.
pub const PWM_RESOLUTION_BITS: u8 = 8;
/// Resolutions the driver accepts.  Below 8 bits a colour byte no longer
/// fits; above 20 the LEDC counter overflows.
pub const DUTY_RESOLUTION_RANGE: core::ops::RangeInclusive<u8> = 8..=20;
/// LEDC frequency for the RGB LED.
pub const LED_PWM_FREQ_HZ: u32 = 100;
/// LEDC source clock (APB).  `freq << bits` must not exceed it.
pub const LEDC_SOURCE_CLK_HZ: u64 = 80_000_000;

// ---------------------------------------------------------------------------
// Fade cadences
// ---------------------------------------------------------------------------

/// Duration of one fade-down or fade-up sub-phase in slow blink.
pub const SLOW_CADENCE_MS: u32 = 3_000;
/// Duration of one fade-down or fade-up sub-phase in fast blink.
pub const FAST_CADENCE_MS: u32 = 1_000;

// ---------------------------------------------------------------------------
// Fade task scheduling
// ---------------------------------------------------------------------------

pub const FADE_TASK_STACK_KB: usize = 16;
pub const FADE_TASK_PRIORITY: u8 = 5;
