//! Timer engine implementation.
//!
//! The timer engine is a delta-driven state machine. It does not use
//! internal threads or read the clock itself - the caller (normally a
//! [`Scheduler`](super::Scheduler)) is responsible for calling `tick()`
//! with elapsed milliseconds.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running -> Paused -> Running -> ... -> Finished
//!   ^                                               |
//!   +-------------------- reset --------------------+
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = TimerEngine::new(SessionConfig::tabata_classic())?;
//! engine.start();
//! // In a loop:
//! engine.tick(delta_ms); // Returns Some(Event) at phase boundaries
//! ```

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::config::SessionConfig;
use crate::error::ConfigError;
use crate::events::Event;
use crate::format::format_result;

use super::cues::{CueDispatcher, SilentCues};
use super::transition::{self, Transition};

/// Countdown cues fire at each integer second boundary at or below this.
const COUNTDOWN_FROM_SECS: u32 = 3;

/// Run lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    Idle,
    Running,
    Paused,
    Finished,
}

/// Sub-state within a run, distinct from the lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Warmup,
    Work,
    Rest,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Phase::Warmup => "WARMUP",
            Phase::Work => "WORK",
            Phase::Rest => "REST",
        };
        f.write_str(s)
    }
}

/// Read-only state snapshot for the presentation layer.
///
/// Always internally consistent: taken between ticks, never mid-update.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateSnapshot {
    pub run_id: Uuid,
    pub mode: crate::config::Mode,
    pub status: RunStatus,
    pub phase: Phase,
    pub time_left_ms: u64,
    pub phase_total_ms: u64,
    pub elapsed_ms: u64,
    pub current_round: u32,
    pub total_rounds: u32,
    /// 0.0 .. 1.0 progress within the current phase.
    pub phase_progress: f64,
    pub at: chrono::DateTime<Utc>,
}

/// Core timer engine.
///
/// Owns the run state exclusively for the lifetime of one run. Operates on
/// caller-supplied millisecond deltas -- no internal thread, no clock.
pub struct TimerEngine {
    config: SessionConfig,
    run_id: Uuid,
    status: RunStatus,
    phase: Phase,
    /// Remaining time in milliseconds for the current phase.
    time_left_ms: u64,
    /// Full duration of the current phase.
    phase_total_ms: u64,
    /// Cumulative time spent running; survives phase changes.
    elapsed_ms: u64,
    current_round: u32,
    /// Bumped whenever the phase countdown is (re)anchored. The scheduler
    /// watches this to recompute its absolute phase-end timestamp.
    phase_seq: u64,
    cues: Box<dyn CueDispatcher>,
}

impl fmt::Debug for TimerEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimerEngine")
            .field("run_id", &self.run_id)
            .field("status", &self.status)
            .field("phase", &self.phase)
            .field("time_left_ms", &self.time_left_ms)
            .field("elapsed_ms", &self.elapsed_ms)
            .field("current_round", &self.current_round)
            .finish_non_exhaustive()
    }
}

impl TimerEngine {
    /// Create an engine for a validated config with silent cues.
    ///
    /// Starts in `Idle`/`Warmup` with the warmup countdown loaded, or, for
    /// a zero-warmup config, already in the first work phase (still `Idle`).
    pub fn new(config: SessionConfig) -> Result<Self, ConfigError> {
        Self::with_cues(config, Box::new(SilentCues))
    }

    /// Create an engine with an explicit cue dispatcher.
    pub fn with_cues(
        config: SessionConfig,
        cues: Box<dyn CueDispatcher>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut engine = Self {
            run_id: Uuid::new_v4(),
            status: RunStatus::Idle,
            phase: Phase::Warmup,
            time_left_ms: config.warmup_ms,
            phase_total_ms: config.warmup_ms,
            elapsed_ms: 0,
            current_round: 1,
            phase_seq: 0,
            config,
            cues,
        };
        engine.skip_zero_warmup();
        Ok(engine)
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub fn status(&self) -> RunStatus {
        self.status
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn time_left_ms(&self) -> u64 {
        self.time_left_ms
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms
    }

    pub fn current_round(&self) -> u32 {
        self.current_round
    }

    pub fn total_rounds(&self) -> u32 {
        self.config.rounds
    }

    pub fn phase_seq(&self) -> u64 {
        self.phase_seq
    }

    /// Build a full state snapshot.
    pub fn snapshot(&self) -> StateSnapshot {
        let progress = if self.phase_total_ms == 0 {
            0.0
        } else {
            1.0 - (self.time_left_ms as f64 / self.phase_total_ms as f64)
        };
        StateSnapshot {
            run_id: self.run_id,
            mode: self.config.mode,
            status: self.status,
            phase: self.phase,
            time_left_ms: self.time_left_ms,
            phase_total_ms: self.phase_total_ms,
            elapsed_ms: self.elapsed_ms,
            current_round: self.current_round,
            total_rounds: self.config.rounds,
            phase_progress: progress,
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────
    //
    // Out-of-sequence commands are silent no-ops returning `None`; the
    // engine never enters an undefined state from any call sequence.

    /// Begin the run. Valid only from `Idle`; use [`resume`](Self::resume)
    /// to continue a paused run.
    pub fn start(&mut self) -> Option<Event> {
        if self.status != RunStatus::Idle {
            return None;
        }
        self.status = RunStatus::Running;
        self.phase_seq += 1;
        Some(Event::Started {
            run_id: self.run_id,
            phase: self.phase,
            round: self.current_round,
            remaining_ms: self.time_left_ms,
            at: Utc::now(),
        })
    }

    /// Freeze the countdown exactly at its last-ticked value.
    pub fn pause(&mut self) -> Option<Event> {
        if self.status != RunStatus::Running {
            return None;
        }
        self.status = RunStatus::Paused;
        Some(Event::Paused {
            run_id: self.run_id,
            remaining_ms: self.time_left_ms,
            at: Utc::now(),
        })
    }

    /// Continue from `Paused` (or `Idle`) without altering the countdown.
    pub fn resume(&mut self) -> Option<Event> {
        match self.status {
            RunStatus::Paused | RunStatus::Idle => {
                self.status = RunStatus::Running;
                self.phase_seq += 1;
                Some(Event::Resumed {
                    run_id: self.run_id,
                    remaining_ms: self.time_left_ms,
                    at: Utc::now(),
                })
            }
            _ => None,
        }
    }

    /// Discard all progress and return to the initial `Idle` state for the
    /// current config. Valid from any state.
    pub fn reset(&mut self) -> Option<Event> {
        self.status = RunStatus::Idle;
        self.phase = Phase::Warmup;
        self.time_left_ms = self.config.warmup_ms;
        self.phase_total_ms = self.config.warmup_ms;
        self.elapsed_ms = 0;
        self.current_round = 1;
        self.phase_seq += 1;
        self.skip_zero_warmup();
        Some(Event::Reset {
            run_id: self.run_id,
            at: Utc::now(),
        })
    }

    /// Jump straight to the first work phase, preserving the current
    /// status. Valid only while in `Warmup`.
    pub fn skip_warmup(&mut self) -> Option<Event> {
        if self.phase != Phase::Warmup || self.status == RunStatus::Finished {
            return None;
        }
        // Warmup always yields `Next` from the transition table.
        match transition::next(Phase::Warmup, 1, &self.config) {
            Transition::Next {
                phase,
                round,
                duration_ms,
            } => {
                self.enter_phase(phase, round, duration_ms);
                Some(Event::PhaseStarted {
                    run_id: self.run_id,
                    phase,
                    round,
                    duration_ms,
                    at: Utc::now(),
                })
            }
            Transition::Complete => None,
        }
    }

    /// Log an athlete-reported round. Leaves the countdown untouched.
    ///
    /// Intended for FOR_TIME/AMRAP, where the timer never advances rounds
    /// itself. No-op during warmup or after the run has finished.
    pub fn add_round(&mut self) -> Option<Event> {
        if self.phase == Phase::Warmup || self.status == RunStatus::Finished {
            return None;
        }
        self.current_round += 1;
        self.dispatch(|c| c.on_round_added());
        Some(Event::RoundAdded {
            run_id: self.run_id,
            round: self.current_round,
            at: Utc::now(),
        })
    }

    /// Advance the run by `delta_ms` of real time.
    ///
    /// Only consumes time while `Running`; a zero delta is ignored. A
    /// coarse delta that spans a phase boundary carries its overshoot into
    /// the next phase, so total consumed time stays exact. Returns the last
    /// boundary event produced, if any.
    pub fn tick(&mut self, delta_ms: u64) -> Option<Event> {
        if self.status != RunStatus::Running || delta_ms == 0 {
            return None;
        }
        let mut budget = delta_ms;
        let mut last_event = None;
        loop {
            let step = budget.min(self.time_left_ms);
            let before = self.time_left_ms;
            self.time_left_ms -= step;
            self.elapsed_ms += step;
            budget -= step;
            self.fire_countdowns(before, self.time_left_ms);
            if self.time_left_ms > 0 {
                break;
            }
            match transition::next(self.phase, self.current_round, &self.config) {
                Transition::Next {
                    phase,
                    round,
                    duration_ms,
                } => {
                    self.enter_phase(phase, round, duration_ms);
                    last_event = Some(Event::PhaseStarted {
                        run_id: self.run_id,
                        phase,
                        round,
                        duration_ms,
                        at: Utc::now(),
                    });
                }
                Transition::Complete => {
                    self.status = RunStatus::Finished;
                    self.time_left_ms = 0;
                    self.dispatch(|c| c.on_finish());
                    let result = format_result(&self.snapshot(), &self.config);
                    return Some(Event::Finished {
                        run_id: self.run_id,
                        result,
                        elapsed_ms: self.elapsed_ms,
                        rounds: self.current_round,
                        at: Utc::now(),
                    });
                }
            }
            if budget == 0 {
                break;
            }
        }
        last_event
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn enter_phase(&mut self, phase: Phase, round: u32, duration_ms: u64) {
        self.phase = phase;
        self.current_round = round;
        self.time_left_ms = duration_ms;
        self.phase_total_ms = duration_ms;
        self.phase_seq += 1;
        self.dispatch(|c| c.on_phase_start(phase));
    }

    /// A zero warmup config starts directly in the first work phase.
    fn skip_zero_warmup(&mut self) {
        if self.phase == Phase::Warmup && self.time_left_ms == 0 {
            if let Transition::Next {
                phase,
                round,
                duration_ms,
            } = transition::next(Phase::Warmup, 1, &self.config)
            {
                self.phase = phase;
                self.current_round = round;
                self.time_left_ms = duration_ms;
                self.phase_total_ms = duration_ms;
            }
        }
    }

    /// Fire one countdown cue per integer second boundary crossed within
    /// the final seconds of a phase, whatever the tick granularity. A
    /// segment that lands exactly on phase end still fires the boundaries
    /// it crossed, ahead of the phase-start or finish cue.
    fn fire_countdowns(&mut self, before_ms: u64, after_ms: u64) {
        for secs in (1..=COUNTDOWN_FROM_SECS).rev() {
            let bound = u64::from(secs) * 1000;
            if before_ms > bound && after_ms <= bound {
                self.dispatch(|c| c.on_countdown(secs));
            }
        }
    }

    /// Invoke a cue, swallowing any panic. Cues are best-effort feedback
    /// and never part of the timing contract.
    fn dispatch(&mut self, f: impl FnOnce(&mut dyn CueDispatcher)) {
        let cues = self.cues.as_mut();
        let _ = std::panic::catch_unwind(std::panic::AssertUnwindSafe(move || f(cues)));
    }
}
