//! Enter/exit actions and the table builder.
//!
//! ```text
//!             ┌──────────── Constant ────────────┐
//!             ▼                                  ▼
//!        SlowBlink ◀───────────────────────▶ FastBlink
//! ```
//!
//! Every state can reach every other; only the actions differ.

use super::{BlinkState, StateDescriptor};
use crate::app::ports::FadeControl;
use crate::fade::Cadence;

// ═══════════════════════════════════════════════════════════════════════════
//  Table builder
// ═══════════════════════════════════════════════════════════════════════════

pub fn build_state_table<F: FadeControl>() -> [StateDescriptor<F>; BlinkState::COUNT] {
    [
        // Index 0: Constant
        StateDescriptor {
            id: BlinkState::Constant,
            name: "Constant",
            on_enter: None,
            on_exit: None,
        },
        // Index 1: SlowBlink
        StateDescriptor {
            id: BlinkState::SlowBlink,
            name: "SlowBlink",
            on_enter: Some(slow_enter::<F>),
            on_exit: Some(slow_exit::<F>),
        },
        // Index 2: FastBlink
        StateDescriptor {
            id: BlinkState::FastBlink,
            name: "FastBlink",
            on_enter: Some(fast_enter::<F>),
            on_exit: Some(fast_exit::<F>),
        },
    ]
}

// ═══════════════════════════════════════════════════════════════════════════
//  Actions
// ═══════════════════════════════════════════════════════════════════════════

// Entering Constant does nothing: the duty stays wherever the last fade
// left it until the caller sets a colour.

fn slow_enter<F: FadeControl>(fades: &F) {
    fades.resume(Cadence::Slow);
}

fn slow_exit<F: FadeControl>(fades: &F) {
    fades.suspend(Cadence::Slow);
}

fn fast_enter<F: FadeControl>(fades: &F) {
    fades.resume(Cadence::Fast);
}

fn fast_exit<F: FadeControl>(fades: &F) {
    fades.suspend(Cadence::Fast);
}
