//! Session configuration and validation.
//!
//! A [`SessionConfig`] describes one workout before it runs: the mode plus
//! the numeric fields that mode requires. The config is immutable once a
//! run starts; the engine validates it exactly once at construction.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ConfigError;

/// Warmup countdown before the first work phase, in milliseconds.
pub const DEFAULT_WARMUP_MS: u64 = 10_000;

/// Workout mode. Decides which config fields are required and how phases
/// chain together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Fixed task, finish as fast as possible, bounded by a time cap.
    ForTime,
    /// As many rounds as possible within a fixed duration.
    Amrap,
    /// A new work interval starts every fixed period.
    Emom,
    /// Short work/rest cycles repeated a fixed number of rounds.
    Tabata,
    /// Generalized configurable work/rest cycles.
    Intervals,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Mode::ForTime => "For Time",
            Mode::Amrap => "AMRAP",
            Mode::Emom => "EMOM",
            Mode::Tabata => "Tabata",
            Mode::Intervals => "Intervals",
        };
        f.write_str(s)
    }
}

/// Parameters for one workout session.
///
/// Only the fields required by `mode` are consulted; the rest are ignored.
/// Use the per-mode constructors rather than building the struct by hand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    pub mode: Mode,
    /// Upper bound on the work phase (FOR_TIME), seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_cap_secs: Option<u32>,
    /// Fixed work-phase length (AMRAP), seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_secs: Option<u32>,
    /// Work interval length (EMOM/TABATA/INTERVALS), seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub work_secs: Option<u32>,
    /// Rest interval length (TABATA/INTERVALS), seconds. Absent or zero
    /// means the mode runs without a rest phase.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rest_secs: Option<u32>,
    /// Work/rest cycle count. Conceptually 1 for FOR_TIME/AMRAP, where
    /// rounds are athlete-counted rather than timer-driven.
    #[serde(default = "default_rounds")]
    pub rounds: u32,
    /// Warmup countdown before the first work phase. Zero skips the
    /// warmup phase entirely.
    #[serde(default = "default_warmup_ms")]
    pub warmup_ms: u64,
}

fn default_rounds() -> u32 {
    1
}

fn default_warmup_ms() -> u64 {
    DEFAULT_WARMUP_MS
}

impl SessionConfig {
    /// FOR_TIME session with the given time cap in seconds.
    pub fn for_time(time_cap_secs: u32) -> Self {
        Self {
            mode: Mode::ForTime,
            time_cap_secs: Some(time_cap_secs),
            duration_secs: None,
            work_secs: None,
            rest_secs: None,
            rounds: 1,
            warmup_ms: DEFAULT_WARMUP_MS,
        }
    }

    /// AMRAP session with the given duration in seconds.
    pub fn amrap(duration_secs: u32) -> Self {
        Self {
            mode: Mode::Amrap,
            time_cap_secs: None,
            duration_secs: Some(duration_secs),
            work_secs: None,
            rest_secs: None,
            rounds: 1,
            warmup_ms: DEFAULT_WARMUP_MS,
        }
    }

    /// EMOM session: `rounds` work intervals of `work_secs` each.
    pub fn emom(work_secs: u32, rounds: u32) -> Self {
        Self {
            mode: Mode::Emom,
            time_cap_secs: None,
            duration_secs: None,
            work_secs: Some(work_secs),
            rest_secs: None,
            rounds,
            warmup_ms: DEFAULT_WARMUP_MS,
        }
    }

    /// Tabata session with explicit work/rest/rounds.
    pub fn tabata(work_secs: u32, rest_secs: u32, rounds: u32) -> Self {
        Self {
            mode: Mode::Tabata,
            time_cap_secs: None,
            duration_secs: None,
            work_secs: Some(work_secs),
            rest_secs: Some(rest_secs),
            rounds,
            warmup_ms: DEFAULT_WARMUP_MS,
        }
    }

    /// The canonical 20s/10s x 8 Tabata protocol.
    pub fn tabata_classic() -> Self {
        Self::tabata(20, 10, 8)
    }

    /// Interval session with explicit work/rest/rounds.
    pub fn intervals(work_secs: u32, rest_secs: u32, rounds: u32) -> Self {
        Self {
            mode: Mode::Intervals,
            time_cap_secs: None,
            duration_secs: None,
            work_secs: Some(work_secs),
            rest_secs: Some(rest_secs),
            rounds,
            warmup_ms: DEFAULT_WARMUP_MS,
        }
    }

    /// Override the warmup duration (milliseconds). Zero skips warmup.
    pub fn with_warmup_ms(mut self, warmup_ms: u64) -> Self {
        self.warmup_ms = warmup_ms;
        self
    }

    /// Check that the fields required by `mode` are present and positive.
    ///
    /// Pure; called once by [`TimerEngine::new`](crate::TimerEngine::new),
    /// never mid-run.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rounds < 1 {
            return Err(ConfigError::InvalidRounds { got: self.rounds });
        }
        let require = |value: Option<u32>, field: &'static str| {
            if value.unwrap_or(0) > 0 {
                Ok(())
            } else {
                Err(ConfigError::MissingField {
                    mode: self.mode,
                    field,
                })
            }
        };
        match self.mode {
            Mode::ForTime => require(self.time_cap_secs, "time_cap_secs"),
            Mode::Amrap => require(self.duration_secs, "duration_secs"),
            Mode::Emom | Mode::Tabata | Mode::Intervals => require(self.work_secs, "work_secs"),
        }
    }

    /// Duration of the first (and, for cyclic modes, every) work phase in
    /// milliseconds. Only meaningful on a validated config.
    pub fn work_ms(&self) -> u64 {
        let secs = match self.mode {
            Mode::ForTime => self.time_cap_secs,
            Mode::Amrap => self.duration_secs,
            Mode::Emom | Mode::Tabata | Mode::Intervals => self.work_secs,
        };
        secs_to_ms(secs.unwrap_or(0))
    }

    /// Rest phase duration in milliseconds, or `None` when the mode has no
    /// rest phase. Zero rest is "no rest phase", never a zero-length one.
    pub fn rest_ms(&self) -> Option<u64> {
        match self.mode {
            Mode::Tabata | Mode::Intervals => match self.rest_secs {
                Some(secs) if secs > 0 => Some(secs_to_ms(secs)),
                _ => None,
            },
            _ => None,
        }
    }
}

fn secs_to_ms(secs: u32) -> u64 {
    u64::from(secs).saturating_mul(1000)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_validate() {
        assert!(SessionConfig::for_time(180).validate().is_ok());
        assert!(SessionConfig::amrap(600).validate().is_ok());
        assert!(SessionConfig::emom(60, 10).validate().is_ok());
        assert!(SessionConfig::tabata_classic().validate().is_ok());
        assert!(SessionConfig::intervals(90, 30, 6).validate().is_ok());
    }

    #[test]
    fn missing_required_field_is_rejected() {
        let config = SessionConfig::for_time(0);
        assert_eq!(
            config.validate(),
            Err(ConfigError::MissingField {
                mode: Mode::ForTime,
                field: "time_cap_secs",
            })
        );

        let mut config = SessionConfig::emom(60, 4);
        config.work_secs = None;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MissingField { field: "work_secs", .. })
        ));
    }

    #[test]
    fn zero_rounds_is_rejected() {
        let config = SessionConfig::emom(60, 0);
        assert_eq!(config.validate(), Err(ConfigError::InvalidRounds { got: 0 }));
    }

    #[test]
    fn zero_rest_means_no_rest_phase() {
        assert_eq!(SessionConfig::tabata(20, 0, 8).rest_ms(), None);
        assert_eq!(SessionConfig::tabata(20, 10, 8).rest_ms(), Some(10_000));
        // Rest is never consulted for EMOM.
        let mut config = SessionConfig::emom(60, 4);
        config.rest_secs = Some(15);
        assert_eq!(config.rest_ms(), None);
    }

    #[test]
    fn work_ms_is_mode_specific() {
        assert_eq!(SessionConfig::for_time(180).work_ms(), 180_000);
        assert_eq!(SessionConfig::amrap(600).work_ms(), 600_000);
        assert_eq!(SessionConfig::tabata_classic().work_ms(), 20_000);
    }
}
