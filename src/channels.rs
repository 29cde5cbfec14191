//! Logical colour channels and their hardware bindings.
//!
//! A [`ChannelMap`] is built once from [`LedConfig`](crate::config::LedConfig)
//! and handed to the PWM adapter.  It is never mutated after the adapter
//! has initialised the peripheral.

use serde::{Deserialize, Serialize};

use crate::config::LedConfig;
use crate::error::{Error, Result};
use crate::pins;

/// Number of PWM channels driven by one LED.
pub const CHANNEL_COUNT: usize = 3;

/// One colour of the LED.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum LedChannel {
    Red = 0,
    Green = 1,
    Blue = 2,
}

impl LedChannel {
    /// Fixed iteration order used for every multi-channel command.
    pub const ALL: [LedChannel; CHANNEL_COUNT] = [Self::Red, Self::Green, Self::Blue];

    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Red => "red",
            Self::Green => "green",
            Self::Blue => "blue",
        }
    }
}

/// LEDC speed-mode group.  The low-speed group exists on every ESP32 variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SpeedMode {
    /// Only present on the classic ESP32.
    High,
    #[default]
    Low,
}

/// Hardware binding for a single logical channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelBinding {
    pub channel: LedChannel,
    /// LEDC channel number.
    pub hw_channel: u32,
    pub gpio: i32,
    pub speed_mode: SpeedMode,
    pub timer_index: u32,
}

/// Parameters of the single timer shared by the three channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerConfig {
    pub timer_index: u32,
    pub speed_mode: SpeedMode,
    pub frequency_hz: u32,
    pub resolution_bits: u8,
}

impl TimerConfig {
    /// Largest duty value the timer accepts.
    pub const fn max_duty(&self) -> u32 {
        match 1u32.checked_shl(self.resolution_bits as u32) {
            Some(steps) => steps - 1,
            None => u32::MAX,
        }
    }
}

/// The R/G/B bindings, indexed by [`LedChannel::index`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelMap {
    bindings: [ChannelBinding; CHANNEL_COUNT],
}

impl ChannelMap {
    pub fn from_config(config: &LedConfig) -> Self {
        let bind = |channel, hw_channel, gpio| ChannelBinding {
            channel,
            hw_channel,
            gpio,
            speed_mode: config.speed_mode,
            timer_index: pins::LEDC_TIMER_LED,
        };
        Self {
            bindings: [
                bind(LedChannel::Red, pins::LEDC_CH_LED_R, config.red_pin),
                bind(LedChannel::Green, pins::LEDC_CH_LED_G, config.green_pin),
                bind(LedChannel::Blue, pins::LEDC_CH_LED_B, config.blue_pin),
            ],
        }
    }

    pub fn get(&self, channel: LedChannel) -> &ChannelBinding {
        &self.bindings[channel.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = &ChannelBinding> {
        self.bindings.iter()
    }

    /// Reject any binding set that cannot be configured as a whole.
    ///
    /// Runs before the first register write so a bad map never leaves the
    /// peripheral with a partial channel set.
    pub fn validate(&self, timer: &TimerConfig) -> Result<()> {
        if !pins::DUTY_RESOLUTION_RANGE.contains(&timer.resolution_bits) {
            return Err(Error::Config("duty resolution must be 8..=20 bits"));
        }
        for (i, a) in self.bindings.iter().enumerate() {
            if a.gpio < 0 {
                return Err(Error::Config("LED pin must be a valid GPIO number"));
            }
            if a.timer_index != timer.timer_index || a.speed_mode != timer.speed_mode {
                return Err(Error::Config("all LED channels must share one timer"));
            }
            for b in &self.bindings[i + 1..] {
                if a.gpio == b.gpio {
                    return Err(Error::Config("LED pins must be distinct"));
                }
                if a.hw_channel == b.hw_channel {
                    return Err(Error::Config("LEDC channels must be distinct"));
                }
            }
        }
        Ok(())
    }
}
