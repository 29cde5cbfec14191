//! Unified error types for the LED driver.
//!
//! Every fallible operation funnels into [`Error`].  All variants are
//! `Copy` so they can be passed out of the fade tasks and logged without
//! allocation.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Configuration is invalid (pins, timer, cadences).
    Config(&'static str),
    /// The LEDC peripheral rejected a call.
    Driver(DriverError),
    /// A raw blink-state value outside the known set.
    UnknownBlinkState(u8),
    /// A fade task could not be created.
    TaskSpawn(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(msg) => write!(f, "config: {msg}"),
            Self::Driver(e) => write!(f, "driver: {e}"),
            Self::UnknownBlinkState(raw) => write!(f, "unknown blink state {raw}"),
            Self::TaskSpawn(name) => write!(f, "failed to spawn task '{name}'"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Driver errors
// ---------------------------------------------------------------------------

/// LEDC calls that can fail, each with the ESP-IDF return code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverError {
    TimerConfig(i32),
    ChannelConfig { hw_channel: u32, rc: i32 },
    FadeInstall(i32),
    CallbackRegister { hw_channel: u32, rc: i32 },
    SetDuty { hw_channel: u32, rc: i32 },
    UpdateDuty { hw_channel: u32, rc: i32 },
    Fade { hw_channel: u32, rc: i32 },
}

impl fmt::Display for DriverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TimerConfig(rc) => write!(f, "timer config failed (rc={})", rc),
            Self::ChannelConfig { hw_channel, rc } => {
                write!(f, "channel {} config failed (rc={})", hw_channel, rc)
            }
            Self::FadeInstall(rc) => write!(f, "fade service install failed (rc={})", rc),
            Self::CallbackRegister { hw_channel, rc } => {
                write!(f, "channel {} callback register failed (rc={})", hw_channel, rc)
            }
            Self::SetDuty { hw_channel, rc } => {
                write!(f, "channel {} set duty failed (rc={})", hw_channel, rc)
            }
            Self::UpdateDuty { hw_channel, rc } => {
                write!(f, "channel {} update duty failed (rc={})", hw_channel, rc)
            }
            Self::Fade { hw_channel, rc } => {
                write!(f, "channel {} fade start failed (rc={})", hw_channel, rc)
            }
        }
    }
}

impl From<DriverError> for Error {
    fn from(e: DriverError) -> Self {
        Self::Driver(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

pub type Result<T> = core::result::Result<T, Error>;
