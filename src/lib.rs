//! Tri-colour PWM LED driver.
//!
//! Drives an RGB LED from three LEDC channels with a static colour or a
//! slow/fast breathing blink run by background fade tasks.  All
//! ESP-IDF-specific code is guarded by `#[cfg(target_os = "espidf")]`
//! within each module; on the host the LEDC peripheral is simulated.

#![deny(unused_must_use)]

pub mod app;
pub mod channels;
pub mod color;
pub mod config;
pub mod drivers;
pub mod error;
pub mod fade;
pub mod fsm;
pub mod pins;

pub use app::service::RgbLed;
pub use color::Color;
pub use config::LedConfig;
pub use error::{Error, Result};
pub use fsm::BlinkState;
