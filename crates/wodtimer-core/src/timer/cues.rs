//! Cue dispatcher: best-effort feedback sink.
//!
//! The engine invokes cues synchronously at phase starts, countdown ticks,
//! round increments, and finish. Cues are never part of the
//! timing-correctness contract: the engine swallows panics from
//! implementations, and implementations must not block.

use super::engine::Phase;

/// Side-effect sink for audio/visual feedback.
///
/// All methods default to no-ops so implementations override only what
/// they care about.
pub trait CueDispatcher {
    /// A phase just began (fired on transitions and warmup skip).
    fn on_phase_start(&mut self, phase: Phase) {
        let _ = phase;
    }

    /// An integer second boundary in the final 3 seconds of a phase.
    fn on_countdown(&mut self, seconds_left: u32) {
        let _ = seconds_left;
    }

    /// Athlete logged a round (FOR_TIME/AMRAP counting).
    fn on_round_added(&mut self) {}

    /// The run reached `Finished`.
    fn on_finish(&mut self) {}
}

/// Dispatcher that does nothing. The engine default.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentCues;

impl CueDispatcher for SilentCues {}

/// Fans each cue out to several dispatchers in order.
#[derive(Default)]
pub struct CompositeCues {
    inner: Vec<Box<dyn CueDispatcher>>,
}

impl CompositeCues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, cues: Box<dyn CueDispatcher>) {
        self.inner.push(cues);
    }

    pub fn with(mut self, cues: Box<dyn CueDispatcher>) -> Self {
        self.push(cues);
        self
    }
}

impl CueDispatcher for CompositeCues {
    fn on_phase_start(&mut self, phase: Phase) {
        for cues in &mut self.inner {
            cues.on_phase_start(phase);
        }
    }

    fn on_countdown(&mut self, seconds_left: u32) {
        for cues in &mut self.inner {
            cues.on_countdown(seconds_left);
        }
    }

    fn on_round_added(&mut self) {
        for cues in &mut self.inner {
            cues.on_round_added();
        }
    }

    fn on_finish(&mut self) {
        for cues in &mut self.inner {
            cues.on_finish();
        }
    }
}
