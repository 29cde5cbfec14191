//! Port traits: the boundary between the LED logic and the outside world.
//!
//! ```text
//!   LedcPwm / MockPwm ──▶ PwmDriver ──▶ PwmAdapter ──▶ RgbLed
//!   FadeTasks / mock  ──▶ FadeControl ──▶ BlinkFsm
//! ```
//!
//! The domain never touches LEDC registers directly, so the whole
//! colour/blink pipeline runs on the host against recording mocks.

use std::sync::Arc;

use crate::channels::{ChannelBinding, ChannelMap, TimerConfig};
use crate::error::DriverError;
use crate::fade::Cadence;
use crate::fade::completion::FadeCompletion;

// ───────────────────────────────────────────────────────────────
// PWM driver port (domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Raw PWM peripheral access.  Implementations do no bookkeeping beyond
/// what the hardware does; idempotency and scaling live in
/// [`PwmAdapter`](crate::drivers::pwm::PwmAdapter).
pub trait PwmDriver: Send {
    /// Configure the shared timer and every channel, and register the
    /// per-channel fade-end callback.
    fn configure(&mut self, timer: &TimerConfig, channels: &ChannelMap)
    -> Result<(), DriverError>;

    /// Stage a duty value.  Has no visible effect until [`update_duty`](Self::update_duty).
    fn set_duty(&mut self, binding: &ChannelBinding, duty: u32) -> Result<(), DriverError>;

    /// Commit the staged duty to the output.
    fn update_duty(&mut self, binding: &ChannelBinding) -> Result<(), DriverError>;

    /// Current duty of a channel.
    fn duty(&self, binding: &ChannelBinding) -> u32;

    /// Start a linear ramp to `target` over `duration_ms` and return
    /// immediately.  When the ramp ends the driver calls
    /// [`FadeCompletion::notify`] on `done` for this channel.
    fn start_fade(
        &mut self,
        binding: &ChannelBinding,
        target: u32,
        duration_ms: u32,
        done: &Arc<FadeCompletion>,
    ) -> Result<(), DriverError>;
}

// ───────────────────────────────────────────────────────────────
// Fade control port (blink FSM → fade tasks)
// ───────────────────────────────────────────────────────────────

/// Suspend/resume handle over the two fade tasks.
pub trait FadeControl {
    fn resume(&self, cadence: Cadence);
    fn suspend(&self, cadence: Cadence);
}
