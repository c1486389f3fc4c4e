//! # Wodtimer Core Library
//!
//! This library provides the core business logic for the wodtimer workout
//! interval timer. It implements a CLI-first philosophy where the full timer
//! is usable from a standalone binary, with any GUI being a thin layer over
//! the same core library.
//!
//! ## Architecture
//!
//! - **Timer Engine**: a delta-driven state machine that requires the caller
//!   to periodically invoke `tick()` for progress updates
//! - **Scheduler**: computes tick deltas from a monotonic clock and corrects
//!   drift by anchoring each phase to an absolute end timestamp
//! - **Cue Dispatcher**: pluggable, best-effort audio/visual feedback sink
//! - **Result Formatter**: turns a finished run into a display string
//!
//! ## Key Components
//!
//! - [`TimerEngine`]: core timer state machine
//! - [`SessionConfig`]: validated per-mode session parameters
//! - [`Scheduler`]: clock-driven tick source
//! - [`CueDispatcher`]: trait for feedback implementations

pub mod config;
pub mod error;
pub mod events;
pub mod format;
pub mod timer;

pub use config::{Mode, SessionConfig, DEFAULT_WARMUP_MS};
pub use error::{ConfigError, Result};
pub use events::Event;
pub use format::{format_mm_ss, format_result};
pub use timer::{
    Clock, CompositeCues, CueDispatcher, ManualClock, MonotonicClock, Phase, RunStatus, Scheduler,
    SilentCues, StateSnapshot, TimerEngine, Transition,
};
