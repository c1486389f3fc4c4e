mod cues;
mod engine;
mod scheduler;
mod transition;

pub use cues::{CompositeCues, CueDispatcher, SilentCues};
pub use engine::{Phase, RunStatus, StateSnapshot, TimerEngine};
pub use scheduler::{Clock, ManualClock, MonotonicClock, Scheduler};
pub use transition::{next, Transition};
