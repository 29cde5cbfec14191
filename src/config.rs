//! LED driver configuration.
//!
//! Fixed at build time on the target (see [`crate::pins`] for the
//! defaults) but kept as a plain structure so tests and alternative boards
//! can supply their own values.

use serde::{Deserialize, Serialize};

use crate::channels::{ChannelMap, SpeedMode, TimerConfig};
use crate::drivers::task_pin::Core;
use crate::error::{Error, Result};
use crate::pins;

/// Scheduling parameters shared by the slow and fast fade tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FadeTaskConfig {
    pub stack_kb: usize,
    pub priority: u8,
    /// Both fade tasks are pinned to the same core so they never race on
    /// the duty registers from two CPUs.
    pub core: Core,
}

impl Default for FadeTaskConfig {
    fn default() -> Self {
        Self {
            stack_kb: pins::FADE_TASK_STACK_KB,
            priority: pins::FADE_TASK_PRIORITY,
            core: Core::App,
        }
    }
}

/// Full driver configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedConfig {
    // --- Pins ---
    pub red_pin: i32,
    pub green_pin: i32,
    pub blue_pin: i32,

    // --- Timer ---
    /// PWM base frequency shared by all three channels.
    pub pwm_frequency_hz: u32,
    /// Duty resolution in bits (8 ..= 20).
    pub duty_resolution_bits: u8,
    /// LEDC group driving the timer and all three channels.
    pub speed_mode: SpeedMode,

    // --- Blink ---
    /// Length of one fade sub-phase in slow blink (ms).
    pub slow_cadence_ms: u32,
    /// Length of one fade sub-phase in fast blink (ms).
    pub fast_cadence_ms: u32,

    pub fade_task: FadeTaskConfig,
}

impl Default for LedConfig {
    fn default() -> Self {
        Self {
            red_pin: pins::LED_R_GPIO,
            green_pin: pins::LED_G_GPIO,
            blue_pin: pins::LED_B_GPIO,

            pwm_frequency_hz: pins::LED_PWM_FREQ_HZ,
            duty_resolution_bits: pins::PWM_RESOLUTION_BITS,
            speed_mode: SpeedMode::default(),

            slow_cadence_ms: pins::SLOW_CADENCE_MS,
            fast_cadence_ms: pins::FAST_CADENCE_MS,

            fade_task: FadeTaskConfig::default(),
        }
    }
}

impl LedConfig {
    pub fn timer_config(&self) -> TimerConfig {
        TimerConfig {
            timer_index: pins::LEDC_TIMER_LED,
            speed_mode: self.speed_mode,
            frequency_hz: self.pwm_frequency_hz,
            resolution_bits: self.duty_resolution_bits,
        }
    }

    pub fn channel_map(&self) -> ChannelMap {
        ChannelMap::from_config(self)
    }

    /// Check every field before any hardware is touched.
    pub fn validate(&self) -> Result<()> {
        if !pins::DUTY_RESOLUTION_RANGE.contains(&self.duty_resolution_bits) {
            return Err(Error::Config("duty resolution must be 8..=20 bits"));
        }
        if self.pwm_frequency_hz == 0 {
            return Err(Error::Config("PWM frequency must be non-zero"));
        }
        if (self.pwm_frequency_hz as u64) << self.duty_resolution_bits > pins::LEDC_SOURCE_CLK_HZ {
            return Err(Error::Config("PWM frequency too high for duty resolution"));
        }
        if self.slow_cadence_ms == 0 || self.fast_cadence_ms == 0 {
            return Err(Error::Config("fade cadence must be non-zero"));
        }
        if self.fade_task.stack_kb == 0 {
            return Err(Error::Config("fade task stack must be non-zero"));
        }
        let timer = self.timer_config();
        self.channel_map().validate(&timer)
    }
}
