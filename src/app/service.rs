//! The LED service. Owns everything the caller needs.
//!
//! [`RgbLed`] holds the PWM adapter (behind [`LedShared`]), the blink state
//! machine and the two fade tasks.  Construction initializes the hardware
//! and spawns both tasks suspended; afterwards the caller only uses
//! [`set_color`](RgbLed::set_color) and [`request_blink`](RgbLed::request_blink).
//!
//! ```text
//!  caller ──set_color──▶ RgbLed ──(Constant)──▶ PwmAdapter ──▶ LEDC
//!         ──request_blink──▶ BlinkFsm ──▶ FadeTasks ──▶ PwmAdapter
//! ```

use std::sync::Arc;

use log::{debug, info};

use crate::app::ports::PwmDriver;
use crate::app::shared::LedShared;
use crate::channels::LedChannel;
use crate::color::Color;
use crate::config::LedConfig;
use crate::drivers::pwm::PwmAdapter;
use crate::error::Result;
use crate::fade::{Cadence, FadeTasks};
use crate::fsm::{BlinkFsm, BlinkState};

pub struct RgbLed<D: PwmDriver + 'static> {
    shared: Arc<LedShared<D>>,
    blink: BlinkFsm<FadeTasks>,
    fades: FadeTasks,
}

impl<D: PwmDriver + 'static> RgbLed<D> {
    /// Validate `config`, initialize the PWM hardware and spawn the fade
    /// tasks (suspended).  Any failure here is fatal for the LED.
    pub fn new(driver: D, config: LedConfig) -> Result<Self> {
        config.validate()?;

        let mut pwm = PwmAdapter::new(driver, &config);
        pwm.initialize()?;

        let shared = Arc::new(LedShared::new(pwm));
        let fades = FadeTasks::spawn(&shared, &config)?;

        info!(
            "rgb led ready (slow={}ms, fast={}ms)",
            config.slow_cadence_ms, config.fast_cadence_ms
        );
        Ok(Self {
            shared,
            blink: BlinkFsm::new(),
            fades,
        })
    }

    // ── Public operations ─────────────────────────────────────

    /// Make `color` the current colour.
    ///
    /// With no blink running the three duties are written immediately.
    /// While a cadence is active the colour is only stored; the fade task
    /// picks it up at its next fade-up.
    pub fn set_color(&mut self, color: Color) -> Result<()> {
        self.shared.store_color(color);
        if self.blink.current_state() == BlinkState::Constant {
            self.shared.pwm().set_color(color)?;
        } else {
            debug!("rgb led: {} queued for next fade-up", color);
        }
        Ok(())
    }

    /// Switch blink mode.  Returns `true` if the state changed.
    pub fn request_blink(&mut self, target: BlinkState) -> bool {
        self.blink.request(target, &self.fades)
    }

    /// Switch blink mode from an unchecked value.  Unknown values are
    /// logged and leave everything untouched.
    pub fn request_blink_raw(&mut self, raw: u8) -> bool {
        self.blink.request_raw(raw, &self.fades)
    }

    // ── Accessors ─────────────────────────────────────────────

    pub fn color(&self) -> Color {
        self.shared.color()
    }

    pub fn blink_state(&self) -> BlinkState {
        self.blink.current_state()
    }

    pub fn channel_duty(&self, channel: LedChannel) -> u32 {
        self.shared.pwm().channel_duty(channel)
    }

    pub fn is_fading(&self, cadence: Cadence) -> bool {
        self.fades.get(cadence).is_active()
    }

    /// Times the given cadence was resumed since construction.
    pub fn fade_resumes(&self, cadence: Cadence) -> u32 {
        self.fades.get(cadence).resume_count()
    }

    /// Completed hardware initialization sequences (always 1 after `new`).
    pub fn init_runs(&self) -> u32 {
        self.shared.pwm().init_runs()
    }
}

impl<D: PwmDriver + 'static> Drop for RgbLed<D> {
    fn drop(&mut self) {
        self.fades.shutdown();
    }
}
