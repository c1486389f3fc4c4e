//! Shared helpers for engine integration tests.

use std::cell::RefCell;
use std::rc::Rc;

use wodtimer_core::{CueDispatcher, Phase, TimerEngine};

/// One recorded cue invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    PhaseStart(Phase),
    Countdown(u32),
    RoundAdded,
    Finish,
}

/// Cue dispatcher that records every invocation. Clones share the log.
#[derive(Clone, Default)]
pub struct RecordingCues {
    log: Rc<RefCell<Vec<Cue>>>,
}

#[allow(dead_code)]
impl RecordingCues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn log(&self) -> Vec<Cue> {
        self.log.borrow().clone()
    }

    pub fn phase_starts(&self) -> Vec<Phase> {
        self.log
            .borrow()
            .iter()
            .filter_map(|c| match c {
                Cue::PhaseStart(p) => Some(*p),
                _ => None,
            })
            .collect()
    }

    pub fn countdowns(&self) -> Vec<u32> {
        self.log
            .borrow()
            .iter()
            .filter_map(|c| match c {
                Cue::Countdown(s) => Some(*s),
                _ => None,
            })
            .collect()
    }

    pub fn finish_count(&self) -> usize {
        self.log
            .borrow()
            .iter()
            .filter(|c| matches!(c, Cue::Finish))
            .count()
    }
}

impl CueDispatcher for RecordingCues {
    fn on_phase_start(&mut self, phase: Phase) {
        self.log.borrow_mut().push(Cue::PhaseStart(phase));
    }

    fn on_countdown(&mut self, seconds_left: u32) {
        self.log.borrow_mut().push(Cue::Countdown(seconds_left));
    }

    fn on_round_added(&mut self) {
        self.log.borrow_mut().push(Cue::RoundAdded);
    }

    fn on_finish(&mut self) {
        self.log.borrow_mut().push(Cue::Finish);
    }
}

/// Apply `total_ms` of ticks in fixed `step_ms` increments.
#[allow(dead_code)]
pub fn tick_in_steps(engine: &mut TimerEngine, total_ms: u64, step_ms: u64) {
    let mut remaining = total_ms;
    while remaining > 0 {
        let step = remaining.min(step_ms);
        engine.tick(step);
        remaining -= step;
    }
}
