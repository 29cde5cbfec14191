//! Blink state machine.
//!
//! Same table-of-function-pointers pattern as a classic embedded FSM:
//!
//! ```text
//! ┌───────────────────────────────────────────┐
//! │  StateTable                               │
//! │  ┌───────────┬──────────────┬───────────┐ │
//! │  │ BlinkState│ on_enter     │ on_exit   │ │
//! │  ├───────────┼──────────────┼───────────┤ │
//! │  │ Constant  │ —            │ —         │ │
//! │  │ SlowBlink │ resume slow  │ suspend   │ │
//! │  │ FastBlink │ resume fast  │ suspend   │ │
//! │  └───────────┴──────────────┴───────────┘ │
//! └───────────────────────────────────────────┘
//! ```
//!
//! A transition always runs `on_exit` of the old state before `on_enter`
//! of the new one, so the outgoing cadence is suspended before the
//! incoming one is resumed and the two are never active together.
//! Transitions are driven only by the caller; there is no per-tick update.

pub mod states;

use log::{info, warn};

use crate::app::ports::FadeControl;
use crate::error::Error;
use crate::fade::Cadence;

// ---------------------------------------------------------------------------
// State identity
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum BlinkState {
    /// Static colour, no fade task running.
    #[default]
    Constant = 0,
    SlowBlink = 1,
    FastBlink = 2,
}

impl BlinkState {
    /// Total number of states, used to size the table array.
    pub const COUNT: usize = 3;

    /// The fade cadence this state runs, if any.
    pub const fn cadence(self) -> Option<Cadence> {
        match self {
            Self::Constant => None,
            Self::SlowBlink => Some(Cadence::Slow),
            Self::FastBlink => Some(Cadence::Fast),
        }
    }
}

impl TryFrom<u8> for BlinkState {
    type Error = Error;

    fn try_from(raw: u8) -> Result<Self, Error> {
        match raw {
            0 => Ok(Self::Constant),
            1 => Ok(Self::SlowBlink),
            2 => Ok(Self::FastBlink),
            other => Err(Error::UnknownBlinkState(other)),
        }
    }
}

// ---------------------------------------------------------------------------
// State descriptor (one row in the table)
// ---------------------------------------------------------------------------

/// Signature for `on_enter` and `on_exit` actions.
pub type StateActionFn<F> = fn(&F);

pub struct StateDescriptor<F> {
    pub id: BlinkState,
    pub name: &'static str,
    pub on_enter: Option<StateActionFn<F>>,
    pub on_exit: Option<StateActionFn<F>>,
}

// ---------------------------------------------------------------------------
// FSM engine
// ---------------------------------------------------------------------------

pub struct BlinkFsm<F> {
    /// Fixed-size table indexed by `BlinkState as usize`.
    table: [StateDescriptor<F>; BlinkState::COUNT],
    current: BlinkState,
    transitions: u32,
}

impl<F: FadeControl> BlinkFsm<F> {
    /// Start in [`BlinkState::Constant`].  No action runs: both fade tasks
    /// are created suspended.
    pub fn new() -> Self {
        Self {
            table: states::build_state_table(),
            current: BlinkState::Constant,
            transitions: 0,
        }
    }

    pub fn current_state(&self) -> BlinkState {
        self.current
    }

    /// Number of transitions performed so far.
    pub fn transitions(&self) -> u32 {
        self.transitions
    }

    /// Move to `target`.  Returns `false` (and does nothing) if already
    /// there.
    pub fn request(&mut self, target: BlinkState, fades: &F) -> bool {
        if target == self.current {
            return false;
        }
        self.transition(target, fades);
        true
    }

    /// Like [`request`](Self::request) for an unchecked value.  Values
    /// outside the known states are logged and ignored.
    pub fn request_raw(&mut self, raw: u8, fades: &F) -> bool {
        match BlinkState::try_from(raw) {
            Ok(target) => self.request(target, fades),
            Err(e) => {
                warn!("blink: {} ignored, staying in {}", e, self.name());
                false
            }
        }
    }

    fn name(&self) -> &'static str {
        self.table[self.current as usize].name
    }

    fn transition(&mut self, next: BlinkState, fades: &F) {
        let next_idx = next as usize;

        info!("blink: {} -> {}", self.name(), self.table[next_idx].name);

        if let Some(exit) = self.table[self.current as usize].on_exit {
            exit(fades);
        }

        self.current = self.table[next_idx].id;
        self.transitions += 1;

        if let Some(enter) = self.table[next_idx].on_enter {
            enter(fades);
        }
    }
}

impl<F: FadeControl> Default for BlinkFsm<F> {
    fn default() -> Self {
        Self::new()
    }
}
