//! RGB LED demo firmware.
//!
//! Brings the LED up in a static colour, walks it through both blink
//! cadences while changing colour, counts down and restarts the chip.
//!
//! ```text
//!   Constant ──▶ SlowBlink ──▶ FastBlink ──▶ Constant ──▶ countdown ──▶ restart
//! ```
#![deny(unused_must_use)]

use std::thread;
use std::time::Duration;

use anyhow::Result;
use log::{error, info};

use rgbled::drivers::ledc::LedcPwm;
use rgbled::{BlinkState, Color, LedConfig, RgbLed};

const TEAL: Color = Color::new(0, 201, 204);
const PINK: Color = Color::new(247, 120, 138);
const LEAF: Color = Color::new(52, 168, 83);

/// How long each demo step is held.
const STEP: Duration = Duration::from_secs(8);
const RESTART_COUNTDOWN_S: u32 = 10;

fn main() -> Result<()> {
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  rgbled v{}                        ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    let config = LedConfig::default();
    info!(
        "LED pins R={} G={} B={}, {} Hz, {}-bit",
        config.red_pin,
        config.green_pin,
        config.blue_pin,
        config.pwm_frequency_hz,
        config.duty_resolution_bits
    );

    let mut led = match RgbLed::new(LedcPwm::new(), config) {
        Ok(led) => led,
        Err(e) => {
            // Without the LED there is nothing left to do; the task
            // watchdog resets the chip.
            error!("LED init failed: {}, halting", e);
            #[allow(clippy::empty_loop)]
            loop {}
        }
    };

    led.set_color(TEAL)?;
    thread::sleep(STEP);

    led.request_blink(BlinkState::SlowBlink);
    thread::sleep(STEP);

    // Picked up on the next fade-up.
    led.set_color(PINK)?;
    led.request_blink(BlinkState::FastBlink);
    thread::sleep(STEP);

    led.request_blink(BlinkState::Constant);
    led.set_color(LEAF)?;

    for i in (0..=RESTART_COUNTDOWN_S).rev() {
        info!("Restarting in {} seconds...", i);
        thread::sleep(Duration::from_secs(1));
    }

    info!("Restarting now.");
    drop(led);
    // SAFETY: plain FFI call, never returns.
    unsafe { esp_idf_svc::sys::esp_restart() };
    Ok(())
}
