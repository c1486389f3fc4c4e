//! Phase transition table.
//!
//! A single pure lookup keyed by `(mode, phase)` decides what follows the
//! phase that just expired. Keeping the table out of the engine keeps the
//! mode set open for extension without touching engine internals.

use crate::config::{Mode, SessionConfig};

use super::engine::Phase;

/// Outcome of a phase expiring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Enter `phase` for `round` with a fresh countdown of `duration_ms`.
    Next {
        phase: Phase,
        round: u32,
        duration_ms: u64,
    },
    /// The session has exhausted every phase.
    Complete,
}

/// Map `(mode, phase, round)` to what comes next.
///
/// Pure; the engine calls this at phase boundaries and on warmup skip.
pub fn next(phase: Phase, round: u32, config: &SessionConfig) -> Transition {
    match phase {
        // Warmup always hands over to the first work phase.
        Phase::Warmup => Transition::Next {
            phase: Phase::Work,
            round: 1,
            duration_ms: config.work_ms(),
        },
        Phase::Work => match config.mode {
            // Single work phase; extra rounds are athlete-counted.
            Mode::ForTime | Mode::Amrap => Transition::Complete,
            Mode::Emom => next_work_or_complete(round, config),
            Mode::Tabata | Mode::Intervals => match config.rest_ms() {
                Some(rest_ms) => Transition::Next {
                    phase: Phase::Rest,
                    round,
                    duration_ms: rest_ms,
                },
                // Zero/absent rest: skip straight to the next work phase.
                None => next_work_or_complete(round, config),
            },
        },
        Phase::Rest => next_work_or_complete(round, config),
    }
}

fn next_work_or_complete(round: u32, config: &SessionConfig) -> Transition {
    if round < config.rounds {
        Transition::Next {
            phase: Phase::Work,
            round: round + 1,
            duration_ms: config.work_ms(),
        }
    } else {
        Transition::Complete
    }
}
