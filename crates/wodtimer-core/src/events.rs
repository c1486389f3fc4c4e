use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::timer::Phase;

/// Every state change in the engine produces an Event.
/// The presentation layer polls for events; a result-recording collaborator
/// consumes `Finished`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    Started {
        run_id: Uuid,
        phase: Phase,
        round: u32,
        remaining_ms: u64,
        at: DateTime<Utc>,
    },
    Paused {
        run_id: Uuid,
        remaining_ms: u64,
        at: DateTime<Utc>,
    },
    Resumed {
        run_id: Uuid,
        remaining_ms: u64,
        at: DateTime<Utc>,
    },
    /// A new phase began, either by countdown exhaustion or warmup skip.
    PhaseStarted {
        run_id: Uuid,
        phase: Phase,
        round: u32,
        duration_ms: u64,
        at: DateTime<Utc>,
    },
    /// Athlete-reported round completed (FOR_TIME/AMRAP counting).
    RoundAdded {
        run_id: Uuid,
        round: u32,
        at: DateTime<Utc>,
    },
    Reset {
        run_id: Uuid,
        at: DateTime<Utc>,
    },
    /// The run exhausted every phase. Carries the formatted result string
    /// for a result-recording collaborator to persist.
    Finished {
        run_id: Uuid,
        result: String,
        elapsed_ms: u64,
        rounds: u32,
        at: DateTime<Utc>,
    },
}
