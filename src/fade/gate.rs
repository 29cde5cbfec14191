//! Suspend/resume gate for a fade task.
//!
//! A fade task only issues hardware commands while holding the guard
//! returned by [`TaskGate::wait_resumed`].  [`TaskGate::suspend`] takes the
//! same lock, so once it returns the task cannot start another sub-phase.
//! A suspension also raises a signal that aborts a pending completion wait,
//! and bumps a counter so a task can tell that its cycle was interrupted
//! even when the wait finished first.

use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;

#[derive(Debug, Default)]
pub struct GateState {
    running: bool,
    shutdown: bool,
    resumes: u32,
    suspensions: u32,
}

impl GateState {
    /// Times the gate was closed since it was created.
    pub fn suspensions(&self) -> u32 {
        self.suspensions
    }
}

pub struct TaskGate {
    state: Mutex<GateState>,
    resumed: Condvar,
    suspended: Signal<CriticalSectionRawMutex, ()>,
}

impl TaskGate {
    /// New gate, starting suspended.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(GateState::default()),
            resumed: Condvar::new(),
            suspended: Signal::new(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, GateState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Let the task run.  Returns `false` if it was already running.
    pub fn resume(&self) -> bool {
        let mut state = self.lock();
        if state.running || state.shutdown {
            return false;
        }
        state.running = true;
        state.resumes += 1;
        self.resumed.notify_all();
        true
    }

    /// Stop the task before its next sub-phase.  Returns `false` if it was
    /// not running.
    pub fn suspend(&self) -> bool {
        let mut state = self.lock();
        if !state.running {
            return false;
        }
        state.running = false;
        state.suspensions += 1;
        self.suspended.signal(());
        true
    }

    /// Permanently release the task.
    pub fn shutdown(&self) {
        let mut state = self.lock();
        state.running = false;
        state.shutdown = true;
        state.suspensions += 1;
        self.suspended.signal(());
        self.resumed.notify_all();
    }

    pub fn is_running(&self) -> bool {
        self.lock().running
    }

    /// How many times the gate went from suspended to running.
    pub fn resume_count(&self) -> u32 {
        self.lock().resumes
    }

    pub fn suspensions(&self) -> u32 {
        self.lock().suspensions
    }

    /// Block until the gate is open.  Returns `None` after shutdown.
    ///
    /// Any suspension raised before this point is stale once the gate is
    /// open again, so the signal is cleared under the lock.
    pub fn wait_resumed(&self) -> Option<MutexGuard<'_, GateState>> {
        let mut state = self.lock();
        while !state.running && !state.shutdown {
            state = self
                .resumed
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }
        if state.shutdown {
            return None;
        }
        self.suspended.reset();
        Some(state)
    }

    /// Resolves when the gate is suspended (or shut down).
    pub async fn suspended(&self) {
        self.suspended.wait().await;
    }
}

impl Default for TaskGate {
    fn default() -> Self {
        Self::new()
    }
}
