//! Core error types for wodtimer-core.
//!
//! Configuration validation is the only fallible surface of the engine;
//! every other out-of-sequence command degrades to a silent no-op.

use thiserror::Error;

use crate::config::Mode;

/// Errors reported by [`SessionConfig::validate`](crate::SessionConfig::validate).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A field the chosen mode requires is absent or zero.
    #[error("{mode:?} requires '{field}' to be present and > 0")]
    MissingField { mode: Mode, field: &'static str },

    /// Round count below the minimum of one.
    #[error("rounds must be >= 1 (got {got})")]
    InvalidRounds { got: u32 },
}

/// Result type alias for configuration errors.
pub type Result<T, E = ConfigError> = std::result::Result<T, E>;
