//! Mock PWM driver for integration tests.
//!
//! Records every driver call so tests can assert on the full command
//! history without touching LEDC registers.  Fades never finish on their
//! own: a test releases them with [`MockPwm::complete_pending`], which is
//! what the fade-end interrupt does on hardware.
//!
//! Completion routing follows the LEDC driver: each channel has one
//! callback slot holding the completion of the last fade started on it,
//! and starting a fade on a busy channel stops the running one without
//! reporting its end.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use rgbled::app::ports::PwmDriver;
use rgbled::channels::{ChannelBinding, ChannelMap, LedChannel, TimerConfig};
use rgbled::error::DriverError;
use rgbled::fade::completion::FadeCompletion;

// ── Driver call record ────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PwmCall {
    Configure { resolution_bits: u8, frequency_hz: u32 },
    SetDuty { channel: LedChannel, duty: u32 },
    UpdateDuty { channel: LedChannel },
    Fade { channel: LedChannel, target: u32, duration_ms: u32 },
}

struct PendingFade {
    channel: LedChannel,
    target: u32,
}

#[derive(Default)]
struct MockState {
    calls: Vec<PwmCall>,
    staged: [u32; 3],
    duties: [u32; 3],
    pending: Vec<PendingFade>,
    slots: [Option<Arc<FadeCompletion>>; 3],
    superseded: usize,
    fail_configure: bool,
}

// ── MockPwm ───────────────────────────────────────────────────

/// Cloneable handle; every clone sees the same state, so the test keeps
/// one while the LED owns the other.
#[derive(Clone, Default)]
pub struct MockPwm {
    state: Arc<Mutex<MockState>>,
}

#[allow(dead_code)]
impl MockPwm {
    pub fn new() -> Self {
        Self::default()
    }

    /// A driver whose `configure` always fails.
    pub fn failing() -> Self {
        let mock = Self::new();
        mock.lock().fail_configure = true;
        mock
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap()
    }

    pub fn calls(&self) -> Vec<PwmCall> {
        self.lock().calls.clone()
    }

    pub fn configure_count(&self) -> usize {
        self.count(|c| matches!(c, PwmCall::Configure { .. }))
    }

    pub fn count(&self, pred: impl Fn(&PwmCall) -> bool) -> usize {
        self.lock().calls.iter().filter(|c| pred(c)).count()
    }

    /// Every fade command as `(channel, target, duration_ms)`.
    pub fn fades(&self) -> Vec<(LedChannel, u32, u32)> {
        self.lock()
            .calls
            .iter()
            .filter_map(|c| match *c {
                PwmCall::Fade { channel, target, duration_ms } => {
                    Some((channel, target, duration_ms))
                }
                _ => None,
            })
            .collect()
    }

    pub fn duties(&self) -> [u32; 3] {
        self.lock().duties
    }

    pub fn pending(&self) -> usize {
        self.lock().pending.len()
    }

    /// Fades stopped early because another fade took their channel.
    pub fn superseded(&self) -> usize {
        self.lock().superseded
    }

    /// Finish every in-flight fade: the duty lands on the target and the
    /// completion in the channel's slot is notified.  Returns how many finished.
    pub fn complete_pending(&self) -> usize {
        let finished: Vec<(LedChannel, Option<Arc<FadeCompletion>>)> = {
            let mut state = self.lock();
            let pending = std::mem::take(&mut state.pending);
            let mut finished = Vec::with_capacity(pending.len());
            for f in pending {
                let i = f.channel.index();
                state.duties[i] = f.target;
                finished.push((f.channel, state.slots[i].clone()));
            }
            finished
        };
        for (channel, done) in &finished {
            if let Some(done) = done {
                done.notify(*channel);
            }
        }
        finished.len()
    }

    pub fn clear_calls(&self) {
        self.lock().calls.clear();
    }
}

impl PwmDriver for MockPwm {
    fn configure(&mut self, timer: &TimerConfig, _channels: &ChannelMap) -> Result<(), DriverError> {
        let mut state = self.lock();
        state.calls.push(PwmCall::Configure {
            resolution_bits: timer.resolution_bits,
            frequency_hz: timer.frequency_hz,
        });
        if state.fail_configure {
            return Err(DriverError::TimerConfig(-1));
        }
        Ok(())
    }

    fn set_duty(&mut self, b: &ChannelBinding, duty: u32) -> Result<(), DriverError> {
        let mut state = self.lock();
        state.calls.push(PwmCall::SetDuty { channel: b.channel, duty });
        state.staged[b.channel.index()] = duty;
        Ok(())
    }

    fn update_duty(&mut self, b: &ChannelBinding) -> Result<(), DriverError> {
        let mut state = self.lock();
        state.calls.push(PwmCall::UpdateDuty { channel: b.channel });
        let i = b.channel.index();
        state.duties[i] = state.staged[i];
        Ok(())
    }

    fn duty(&self, b: &ChannelBinding) -> u32 {
        self.lock().duties[b.channel.index()]
    }

    fn start_fade(
        &mut self,
        b: &ChannelBinding,
        target: u32,
        duration_ms: u32,
        done: &Arc<FadeCompletion>,
    ) -> Result<(), DriverError> {
        let mut state = self.lock();
        state.calls.push(PwmCall::Fade {
            channel: b.channel,
            target,
            duration_ms,
        });
        let before = state.pending.len();
        state.pending.retain(|f| f.channel != b.channel);
        state.superseded += before - state.pending.len();
        state.slots[b.channel.index()] = Some(done.clone());
        state.pending.push(PendingFade {
            channel: b.channel,
            target,
        });
        Ok(())
    }
}

// ── Helpers ───────────────────────────────────────────────────

/// Poll `cond` until it holds or two seconds pass.  Fade tasks run on
/// their own threads, so their effects are only eventually visible.
#[allow(dead_code)]
pub fn wait_until(mut cond: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + Duration::from_secs(2);
    while Instant::now() < deadline {
        if cond() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(1));
    }
    cond()
}

/// Give the fade tasks a moment to do something they should not.
#[allow(dead_code)]
pub fn settle() {
    std::thread::sleep(Duration::from_millis(50));
}
