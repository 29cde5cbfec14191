//! PWM channel manager for the three LED channels.
//!
//! Owns the driver, the channel bindings and the initialization flag.
//! [`initialize`](PwmAdapter::initialize) configures the timer and the
//! channels exactly once; every other operation calls it first, so the
//! hardware is always set up before the first duty write no matter which
//! entry point is used.

use std::sync::Arc;

use log::{debug, info};

use crate::app::ports::PwmDriver;
use crate::channels::{ChannelMap, LedChannel, TimerConfig};
use crate::color::Color;
use crate::config::LedConfig;
use crate::error::Result;
use crate::fade::completion::FadeCompletion;

pub struct PwmAdapter<D> {
    driver: D,
    timer: TimerConfig,
    channels: ChannelMap,
    initialized: bool,
    init_runs: u32,
}

impl<D: PwmDriver> PwmAdapter<D> {
    pub fn new(driver: D, config: &LedConfig) -> Self {
        Self {
            driver,
            timer: config.timer_config(),
            channels: config.channel_map(),
            initialized: false,
            init_runs: 0,
        }
    }

    /// Configure the timer and the three channels.  No-op once done.
    ///
    /// The bindings are validated first; a failure part-way leaves the
    /// flag clear and is returned to the caller.
    pub fn initialize(&mut self) -> Result<()> {
        if self.initialized {
            return Ok(());
        }
        self.channels.validate(&self.timer)?;
        self.driver.configure(&self.timer, &self.channels)?;
        self.initialized = true;
        self.init_runs += 1;
        info!(
            "pwm: timer {} at {} Hz / {}-bit, channels R={} G={} B={}",
            self.timer.timer_index,
            self.timer.frequency_hz,
            self.timer.resolution_bits,
            self.channels.get(LedChannel::Red).gpio,
            self.channels.get(LedChannel::Green).gpio,
            self.channels.get(LedChannel::Blue).gpio,
        );
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Number of completed initialization sequences (0 or 1).
    pub fn init_runs(&self) -> u32 {
        self.init_runs
    }

    pub fn max_duty(&self) -> u32 {
        self.timer.max_duty()
    }

    /// Map an 8-bit colour level onto the timer's duty range.
    pub fn duty_for(&self, level: u8) -> u32 {
        let max = self.max_duty();
        if max == 255 {
            return level as u32;
        }
        (level as u64 * max as u64 / 255) as u32
    }

    /// Write a duty value and commit it to the output.
    pub fn set_channel_duty(&mut self, channel: LedChannel, duty: u32) -> Result<()> {
        self.initialize()?;
        let binding = *self.channels.get(channel);
        let duty = duty.min(self.max_duty());
        self.driver.set_duty(&binding, duty)?;
        self.driver.update_duty(&binding)?;
        Ok(())
    }

    pub fn channel_duty(&self, channel: LedChannel) -> u32 {
        self.driver.duty(self.channels.get(channel))
    }

    /// Push all three levels of `color` straight to the outputs.
    pub fn set_color(&mut self, color: Color) -> Result<()> {
        for ch in LedChannel::ALL {
            self.set_channel_duty(ch, self.duty_for(color.channel(ch)))?;
        }
        debug!("pwm: set {}", color);
        Ok(())
    }

    /// Start a hardware fade on one channel.  Returns immediately;
    /// completion is reported through `done`.
    pub fn fade_channel_to(
        &mut self,
        channel: LedChannel,
        target: u32,
        duration_ms: u32,
        done: &Arc<FadeCompletion>,
    ) -> Result<()> {
        self.initialize()?;
        let binding = *self.channels.get(channel);
        let target = target.min(self.max_duty());
        self.driver.start_fade(&binding, target, duration_ms, done)?;
        Ok(())
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }
}
