//! Result formatting for finished runs.

use crate::config::{Mode, SessionConfig};
use crate::timer::StateSnapshot;

/// Format milliseconds as `mm:ss`, rounding partial seconds up.
pub fn format_mm_ss(ms: u64) -> String {
    let secs = ms.div_ceil(1000);
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Convert a finished run into a mode-appropriate display string.
///
/// AMRAP scores by athlete-counted rounds, FOR_TIME by elapsed time; for
/// the cyclic modes the performance itself is recorded externally, so a
/// completion label with the round count is enough.
pub fn format_result(state: &StateSnapshot, config: &SessionConfig) -> String {
    match config.mode {
        Mode::Amrap => {
            if state.current_round == 1 {
                "1 round".to_string()
            } else {
                format!("{} rounds", state.current_round)
            }
        }
        Mode::ForTime => format_mm_ss(state.elapsed_ms),
        Mode::Emom | Mode::Tabata | Mode::Intervals => {
            format!("{} complete ({} rounds)", config.mode, config.rounds)
        }
    }
}
