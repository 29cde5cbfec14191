//! Fade-completion counting primitive.
//!
//! The LEDC fade-end callback runs in interrupt context.  It only pushes the
//! finished channel into a bounded queue (capacity = channel count) guarded
//! by a critical section; the fade task blocks until it has collected one
//! entry per channel.
//!
//! ```text
//!  fade-end ISR (R) ──┐
//!  fade-end ISR (G) ──┼──▶ FadeCompletion [cap 3] ──▶ fade task wait_all()
//!  fade-end ISR (B) ──┘
//! ```

use core::future::Future;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;

use crate::channels::{CHANNEL_COUNT, LedChannel};

pub struct FadeCompletion {
    done: Channel<CriticalSectionRawMutex, LedChannel, CHANNEL_COUNT>,
}

impl FadeCompletion {
    pub const fn new() -> Self {
        Self {
            done: Channel::new(),
        }
    }

    /// Record that `channel` finished its fade.  ISR-safe, never blocks.
    ///
    /// Returns `false` if the queue already holds one entry per channel,
    /// in which case the notification is dropped.
    pub fn notify(&self, channel: LedChannel) -> bool {
        self.done.try_send(channel).is_ok()
    }

    /// Resolve once every channel has reported completion.
    pub fn wait_all(&self) -> impl Future<Output = ()> + '_ {
        async move {
            for _ in 0..CHANNEL_COUNT {
                self.done.receive().await;
            }
        }
    }

    /// Discard stale notifications.  Returns how many were dropped.
    pub fn drain(&self) -> usize {
        let mut n = 0;
        while self.done.try_receive().is_ok() {
            n += 1;
        }
        n
    }
}

impl Default for FadeCompletion {
    fn default() -> Self {
        Self::new()
    }
}

/// Drive a future to completion on the current task.
///
/// On ESP-IDF the waker is a FreeRTOS task notification, which the
/// fade-end ISR may raise.
#[cfg(target_os = "espidf")]
pub fn block_on<F: Future>(fut: F) -> F::Output {
    esp_idf_hal::task::block_on(fut)
}

#[cfg(not(target_os = "espidf"))]
pub fn block_on<F: Future>(fut: F) -> F::Output {
    futures_lite::future::block_on(fut)
}
