//! Breathing animation: fade every channel to black, then back up to the
//! current colour, forever, at a fixed cadence.
//!
//! ```text
//!   ┌──▶ fade R,G,B → 0 ──▶ wait ×3 ──▶ fade R,G,B → colour ──▶ wait ×3 ──┐
//!   └────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each cadence (slow, fast) owns one [`FadeController`] running on its own
//! task, gated by a [`TaskGate`].  The three fade commands of a sub-phase
//! are issued together under the adapter lock and the task then blocks
//! until all three channels report completion, so the channels stay in
//! lock-step.  The colour for the fade-up sub-phase is read when that
//! sub-phase is issued, which is how a colour change reaches an active
//! blink.

pub mod completion;
pub mod gate;

use std::sync::Arc;
use std::thread::JoinHandle;

use futures_lite::future;
use log::{debug, error, info};

use crate::app::ports::{FadeControl, PwmDriver};
use crate::app::shared::LedShared;
use crate::channels::LedChannel;
use crate::color::Color;
use crate::config::{FadeTaskConfig, LedConfig};
use crate::drivers::task_pin::spawn_on_core;
use crate::error::Result;

use completion::{FadeCompletion, block_on};
use gate::TaskGate;

/// Blink speed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cadence {
    Slow,
    Fast,
}

impl Cadence {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Slow => "slow",
            Self::Fast => "fast",
        }
    }

    const fn task_name(self) -> &'static str {
        match self {
            Self::Slow => "fade-slow\0",
            Self::Fast => "fade-fast\0",
        }
    }
}

/// Half of a fade cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Every channel ramps to 0.
    Down,
    /// Every channel ramps to the current colour.
    Up,
}

/// How a sub-phase (or cycle) ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseOutcome {
    /// All three channels reported completion.
    Completed,
    /// The gate was closed during the phase; whatever was in flight is
    /// left to finish on the hardware.
    Suspended,
    Shutdown,
}

// ═══════════════════════════════════════════════════════════════════════════
//  Controller
// ═══════════════════════════════════════════════════════════════════════════

pub struct FadeController<D> {
    cadence: Cadence,
    duration_ms: u32,
    shared: Arc<LedShared<D>>,
    done: Arc<FadeCompletion>,
}

impl<D: PwmDriver> FadeController<D> {
    pub fn new(cadence: Cadence, duration_ms: u32, shared: Arc<LedShared<D>>) -> Self {
        Self {
            cadence,
            duration_ms,
            shared,
            done: Arc::new(FadeCompletion::new()),
        }
    }

    pub fn cadence(&self) -> Cadence {
        self.cadence
    }

    /// Issue one sub-phase on all channels, then wait for all of them.
    ///
    /// `since` is the gate's suspension count when the cycle started.
    /// Commands are only issued while `gate` is open and has not been
    /// closed since then; otherwise, or if a suspension arrives during the
    /// wait, the phase ends with [`PhaseOutcome::Suspended`] and the cycle
    /// restarts from the fade-down.
    pub fn run_phase(&self, phase: Phase, gate: &TaskGate, since: u32) -> Result<PhaseOutcome> {
        let Some(open) = gate.wait_resumed() else {
            return Ok(PhaseOutcome::Shutdown);
        };
        if open.suspensions() != since {
            return Ok(PhaseOutcome::Suspended);
        }

        let stale = self.done.drain();
        if stale > 0 {
            debug!("fade-{}: dropped {} stale completions", self.cadence.name(), stale);
        }

        {
            let mut pwm = self.shared.pwm();
            let target = match phase {
                Phase::Down => Color::BLACK,
                Phase::Up => self.shared.color(),
            };
            for ch in LedChannel::ALL {
                let duty = pwm.duty_for(target.channel(ch));
                pwm.fade_channel_to(ch, duty, self.duration_ms, &self.done)?;
            }
            debug!(
                "fade-{}: {:?} to {} over {}ms",
                self.cadence.name(),
                phase,
                target,
                self.duration_ms
            );
        }
        drop(open);

        Ok(self.await_phase(gate, since))
    }

    fn await_phase(&self, gate: &TaskGate, since: u32) -> PhaseOutcome {
        let outcome = block_on(future::or(
            async {
                self.done.wait_all().await;
                PhaseOutcome::Completed
            },
            async {
                gate.suspended().await;
                PhaseOutcome::Suspended
            },
        ));
        // The completion wait is polled first, so a suspension that raced
        // the last completion only shows up in the counter.
        if outcome == PhaseOutcome::Completed && gate.suspensions() != since {
            return PhaseOutcome::Suspended;
        }
        outcome
    }

    /// One full down/up cycle.
    pub fn run_cycle(&self, gate: &TaskGate) -> Result<PhaseOutcome> {
        let since = gate.suspensions();
        for phase in [Phase::Down, Phase::Up] {
            match self.run_phase(phase, gate, since)? {
                PhaseOutcome::Completed => {}
                other => return Ok(other),
            }
        }
        Ok(PhaseOutcome::Completed)
    }

    /// Task body.  Cycles while the gate is open, parks while it is
    /// closed, returns on shutdown.  A driver failure is fatal.
    pub fn run(self, gate: &TaskGate) {
        loop {
            match self.run_cycle(gate) {
                Ok(PhaseOutcome::Completed) => {}
                Ok(PhaseOutcome::Suspended) => {
                    debug!("fade-{}: suspended mid-cycle", self.cadence.name());
                }
                Ok(PhaseOutcome::Shutdown) => {
                    info!("fade-{}: shut down", self.cadence.name());
                    return;
                }
                Err(e) => {
                    error!("fade-{}: {}, halting", self.cadence.name(), e);
                    panic!("fade-{} task failed: {e}", self.cadence.name());
                }
            }
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  Tasks
// ═══════════════════════════════════════════════════════════════════════════

/// A spawned fade controller plus the gate that suspends it.
pub struct FadeTask {
    gate: Arc<TaskGate>,
    _thread: JoinHandle<()>,
}

impl FadeTask {
    /// Spawn the controller's task.  It starts suspended.
    pub fn spawn<D>(controller: FadeController<D>, task: &FadeTaskConfig) -> Result<Self>
    where
        D: PwmDriver + 'static,
    {
        let cadence = controller.cadence();
        let gate = Arc::new(TaskGate::new());
        let thread = {
            let gate = gate.clone();
            spawn_on_core(
                task.core,
                task.priority,
                task.stack_kb,
                cadence.task_name(),
                move || controller.run(&gate),
            )?
        };
        Ok(Self {
            gate,
            _thread: thread,
        })
    }

    pub fn resume(&self) -> bool {
        self.gate.resume()
    }

    pub fn suspend(&self) -> bool {
        self.gate.suspend()
    }

    pub fn is_active(&self) -> bool {
        self.gate.is_running()
    }

    /// Times this task went from suspended to running.
    pub fn resume_count(&self) -> u32 {
        self.gate.resume_count()
    }

    pub fn shutdown(&self) {
        self.gate.shutdown();
    }
}

/// The slow and fast fade tasks.
pub struct FadeTasks {
    slow: FadeTask,
    fast: FadeTask,
}

impl FadeTasks {
    pub fn spawn<D>(shared: &Arc<LedShared<D>>, config: &LedConfig) -> Result<Self>
    where
        D: PwmDriver + 'static,
    {
        let slow = FadeController::new(Cadence::Slow, config.slow_cadence_ms, shared.clone());
        let fast = FadeController::new(Cadence::Fast, config.fast_cadence_ms, shared.clone());
        Ok(Self {
            slow: FadeTask::spawn(slow, &config.fade_task)?,
            fast: FadeTask::spawn(fast, &config.fade_task)?,
        })
    }

    pub fn get(&self, cadence: Cadence) -> &FadeTask {
        match cadence {
            Cadence::Slow => &self.slow,
            Cadence::Fast => &self.fast,
        }
    }

    pub fn shutdown(&self) {
        self.slow.shutdown();
        self.fast.shutdown();
    }
}

impl FadeControl for FadeTasks {
    fn resume(&self, cadence: Cadence) {
        if self.get(cadence).resume() {
            debug!("fade-{}: resumed", cadence.name());
        }
    }

    fn suspend(&self, cadence: Cadence) {
        if self.get(cadence).suspend() {
            debug!("fade-{}: suspended", cadence.name());
        }
    }
}
