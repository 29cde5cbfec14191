//! State shared between the caller's task and the fade tasks.

use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::app::ports::PwmDriver;
use crate::color::{Color, SharedColor};
use crate::drivers::pwm::PwmAdapter;

pub struct LedShared<D> {
    /// Duty registers are only reached through this lock.
    pwm: Mutex<PwmAdapter<D>>,
    /// Last colour requested by the caller.
    color: SharedColor,
}

impl<D: PwmDriver> LedShared<D> {
    pub fn new(pwm: PwmAdapter<D>) -> Self {
        Self {
            pwm: Mutex::new(pwm),
            color: SharedColor::default(),
        }
    }

    pub fn pwm(&self) -> MutexGuard<'_, PwmAdapter<D>> {
        self.pwm.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn color(&self) -> Color {
        self.color.load()
    }

    pub fn store_color(&self, color: Color) {
        self.color.store(color);
    }
}
