//! Clock and scheduler: the engine's tick source.
//!
//! The scheduler turns monotonic clock readings into `tick()` deltas. It
//! never feeds the engine a nominal interval; each delta is derived from an
//! absolute phase-end timestamp (`phase_end_at = anchor_now + time_left`),
//! so variable callback cadence and accumulated rounding cannot drift the
//! countdown. The anchor is recomputed whenever the engine re-arms its
//! phase countdown (transition, resume, reset), observed via
//! [`TimerEngine::phase_seq`].

use std::cell::Cell;
use std::rc::Rc;
use std::time::Instant;

use crate::events::Event;

use super::engine::{RunStatus, TimerEngine};

/// Monotonic millisecond time source.
pub trait Clock {
    fn now_ms(&self) -> u64;
}

/// Real clock backed by `std::time::Instant`.
#[derive(Debug, Clone)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now_ms(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }
}

/// Hand-driven clock for tests. Clones share the same time value.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<u64>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, delta_ms: u64) {
        self.now.set(self.now.get() + delta_ms);
    }

    pub fn set(&self, now_ms: u64) {
        self.now.set(now_ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now.get()
    }
}

#[derive(Debug, Clone, Copy)]
struct PhaseAnchor {
    phase_seq: u64,
    end_at_ms: u64,
}

/// Drives [`TimerEngine::tick`] from a clock.
///
/// Single-threaded by construction: `poll` takes `&mut self` and the
/// engine, so ticks are strictly serialized and never re-entrant. Stops
/// consuming time the moment the run leaves `Running`.
#[derive(Debug)]
pub struct Scheduler<C: Clock> {
    clock: C,
    anchor: Option<PhaseAnchor>,
}

impl<C: Clock> Scheduler<C> {
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            anchor: None,
        }
    }

    /// Call at any cadence. Computes how far the current phase should have
    /// advanced by now and ticks the engine by exactly that much.
    pub fn poll(&mut self, engine: &mut TimerEngine) -> Option<Event> {
        if engine.status() != RunStatus::Running {
            // Dropping the anchor here re-anchors on resume, so paused
            // wall time never counts against the phase.
            self.anchor = None;
            return None;
        }
        let now = self.clock.now_ms();
        let anchor = match self.anchor {
            Some(a) if a.phase_seq == engine.phase_seq() => a,
            _ => {
                let a = PhaseAnchor {
                    phase_seq: engine.phase_seq(),
                    end_at_ms: now + engine.time_left_ms(),
                };
                self.anchor = Some(a);
                a
            }
        };
        let target_left = anchor.end_at_ms.saturating_sub(now);
        // A poll landing past the phase end carries the overshoot into the
        // next phase; the engine's budget loop absorbs it.
        let overshoot = now.saturating_sub(anchor.end_at_ms);
        let delta = engine.time_left_ms().saturating_sub(target_left) + overshoot;
        if delta == 0 {
            return None;
        }
        let event = engine.tick(delta);
        // A transition re-arms the countdown; anchor the new phase to this
        // same reading so inter-poll time is never lost.
        if engine.status() == RunStatus::Running && engine.phase_seq() != anchor.phase_seq {
            self.anchor = Some(PhaseAnchor {
                phase_seq: engine.phase_seq(),
                end_at_ms: now + engine.time_left_ms(),
            });
        }
        event
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SessionConfig;

    #[test]
    fn poll_consumes_exact_wall_time() {
        let clock = ManualClock::new();
        let mut scheduler = Scheduler::new(clock.clone());
        let mut engine =
            TimerEngine::new(SessionConfig::amrap(600).with_warmup_ms(0)).unwrap();
        engine.start();
        scheduler.poll(&mut engine); // Establish the anchor.

        clock.advance(1_234);
        scheduler.poll(&mut engine);
        clock.advance(766);
        scheduler.poll(&mut engine);
        assert_eq!(engine.time_left_ms(), 600_000 - 2_000);
        assert_eq!(engine.elapsed_ms(), 2_000);
    }

    #[test]
    fn paused_wall_time_does_not_count() {
        let clock = ManualClock::new();
        let mut scheduler = Scheduler::new(clock.clone());
        let mut engine =
            TimerEngine::new(SessionConfig::amrap(600).with_warmup_ms(0)).unwrap();
        engine.start();
        scheduler.poll(&mut engine);

        clock.advance(10_000);
        scheduler.poll(&mut engine);
        engine.pause();
        clock.advance(60_000);
        scheduler.poll(&mut engine); // No-op; drops the anchor.
        engine.resume();
        scheduler.poll(&mut engine); // Re-anchor at resume time.
        clock.advance(5_000);
        scheduler.poll(&mut engine);
        assert_eq!(engine.time_left_ms(), 600_000 - 15_000);
    }

    #[test]
    fn transition_mid_poll_loses_no_time() {
        let clock = ManualClock::new();
        let mut scheduler = Scheduler::new(clock.clone());
        let config = SessionConfig::tabata(20, 10, 2).with_warmup_ms(0);
        let mut engine = TimerEngine::new(config).unwrap();
        engine.start();
        scheduler.poll(&mut engine);

        // One ragged poll far past the first work phase.
        clock.advance(23_500);
        scheduler.poll(&mut engine);
        assert_eq!(engine.phase(), crate::timer::Phase::Rest);
        assert_eq!(engine.time_left_ms(), 6_500);

        // Subsequent polls stay anchored to wall time.
        clock.advance(6_500);
        scheduler.poll(&mut engine);
        assert_eq!(engine.phase(), crate::timer::Phase::Work);
        assert_eq!(engine.current_round(), 2);
    }

    #[test]
    fn idle_engine_is_not_ticked() {
        let clock = ManualClock::new();
        let mut scheduler = Scheduler::new(clock.clone());
        let mut engine =
            TimerEngine::new(SessionConfig::for_time(120).with_warmup_ms(0)).unwrap();

        clock.advance(50_000);
        assert!(scheduler.poll(&mut engine).is_none());
        assert_eq!(engine.time_left_ms(), 120_000);
    }
}
