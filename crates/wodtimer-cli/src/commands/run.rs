use clap::Subcommand;
use std::io::Write;
use std::time::Duration;

use wodtimer_core::{
    format_mm_ss, CueDispatcher, Event, MonotonicClock, Phase, Scheduler, SessionConfig,
    StateSnapshot, TimerEngine,
};

use crate::presets;

/// Poll cadence for the live display.
const POLL_INTERVAL: Duration = Duration::from_millis(250);

#[derive(Subcommand, Clone)]
pub enum ModeSpec {
    /// Fixed task, finish as fast as possible within a time cap
    ForTime {
        /// Time cap in seconds
        #[arg(long)]
        cap: u32,
    },
    /// As many rounds as possible within a fixed duration
    Amrap {
        /// Duration in seconds
        #[arg(long)]
        duration: u32,
    },
    /// A new work interval every fixed period
    Emom {
        /// Interval length in seconds
        #[arg(long, default_value_t = 60)]
        work: u32,
        /// Number of intervals
        #[arg(long)]
        rounds: u32,
    },
    /// Short work/rest cycles (defaults to the classic 20s/10s x 8)
    Tabata {
        #[arg(long, default_value_t = 20)]
        work: u32,
        #[arg(long, default_value_t = 10)]
        rest: u32,
        #[arg(long, default_value_t = 8)]
        rounds: u32,
    },
    /// Custom work/rest cycles
    Intervals {
        #[arg(long)]
        work: u32,
        /// Rest length in seconds; 0 chains work intervals back to back
        #[arg(long, default_value_t = 0)]
        rest: u32,
        #[arg(long)]
        rounds: u32,
    },
}

impl ModeSpec {
    pub fn to_config(&self) -> SessionConfig {
        match *self {
            ModeSpec::ForTime { cap } => SessionConfig::for_time(cap),
            ModeSpec::Amrap { duration } => SessionConfig::amrap(duration),
            ModeSpec::Emom { work, rounds } => SessionConfig::emom(work, rounds),
            ModeSpec::Tabata { work, rest, rounds } => SessionConfig::tabata(work, rest, rounds),
            ModeSpec::Intervals { work, rest, rounds } => {
                SessionConfig::intervals(work, rest, rounds)
            }
        }
    }
}

#[derive(clap::Args)]
pub struct RunArgs {
    #[command(subcommand)]
    pub mode: Option<ModeSpec>,
    /// Run a saved preset instead of specifying a mode
    #[arg(long)]
    pub preset: Option<String>,
    /// Warmup countdown in seconds (0 disables)
    #[arg(long, global = true, default_value_t = 10)]
    pub warmup: u32,
    /// Stream state snapshots as JSON lines instead of a live display
    #[arg(long, global = true)]
    pub json: bool,
}

/// Terminal bell + stderr feedback.
struct TerminalCues;

impl CueDispatcher for TerminalCues {
    fn on_phase_start(&mut self, phase: Phase) {
        eprintln!("\x07>> {phase}");
    }

    fn on_countdown(&mut self, seconds_left: u32) {
        eprint!("\x07{seconds_left}.. ");
    }

    fn on_round_added(&mut self) {
        eprintln!("\x07round logged");
    }

    fn on_finish(&mut self) {
        eprintln!("\x07\x07\x07");
    }
}

fn resolve_config(args: &RunArgs) -> Result<SessionConfig, Box<dyn std::error::Error>> {
    let config = match (&args.mode, &args.preset) {
        (Some(mode), None) => mode.to_config(),
        (None, Some(name)) => {
            let store = presets::load()?;
            store
                .presets
                .get(name)
                .cloned()
                .ok_or_else(|| format!("unknown preset '{name}'"))?
        }
        _ => return Err("specify a mode subcommand or --preset (not both)".into()),
    };
    Ok(config.with_warmup_ms(u64::from(args.warmup) * 1000))
}

fn render(snapshot: &StateSnapshot) {
    print!(
        "\r{:<6} round {:>2}/{:<2}  {}   ",
        snapshot.phase.to_string(),
        snapshot.current_round,
        snapshot.total_rounds,
        format_mm_ss(snapshot.time_left_ms),
    );
    let _ = std::io::stdout().flush();
}

pub async fn run(args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = resolve_config(&args)?;
    let cues: Box<dyn CueDispatcher> = if args.json {
        Box::new(wodtimer_core::SilentCues)
    } else {
        Box::new(TerminalCues)
    };
    let mut engine = TimerEngine::with_cues(config.clone(), cues)?;
    let mut scheduler = Scheduler::new(MonotonicClock::new());
    engine.start();

    if !args.json {
        println!("{} -- Ctrl-C to stop", config.mode);
    }

    let mut interval = tokio::time::interval(POLL_INTERVAL);
    loop {
        tokio::select! {
            _ = interval.tick() => {
                let event = scheduler.poll(&mut engine);
                let snapshot = engine.snapshot();
                if args.json {
                    println!("{}", serde_json::to_string(&snapshot)?);
                } else {
                    render(&snapshot);
                }
                if let Some(Event::Finished { result, .. }) = event {
                    if !args.json {
                        println!("\nresult: {result}");
                    }
                    break;
                }
            }
            _ = tokio::signal::ctrl_c() => {
                engine.pause();
                if !args.json {
                    println!("\nstopped at {}", format_mm_ss(engine.elapsed_ms()));
                }
                break;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use wodtimer_core::Mode;

    #[test]
    fn mode_spec_builds_matching_config() {
        let config = ModeSpec::Tabata {
            work: 20,
            rest: 10,
            rounds: 8,
        }
        .to_config();
        assert_eq!(config, SessionConfig::tabata_classic());

        let config = ModeSpec::ForTime { cap: 180 }.to_config();
        assert_eq!(config.mode, Mode::ForTime);
        assert_eq!(config.time_cap_secs, Some(180));
    }

    #[test]
    fn run_requires_exactly_one_source() {
        let args = RunArgs {
            mode: None,
            preset: None,
            warmup: 10,
            json: false,
        };
        assert!(resolve_config(&args).is_err());
    }

    #[test]
    fn warmup_flag_is_applied() {
        let args = RunArgs {
            mode: Some(ModeSpec::Amrap { duration: 600 }),
            preset: None,
            warmup: 0,
            json: false,
        };
        let config = resolve_config(&args).unwrap();
        assert_eq!(config.warmup_ms, 0);
    }
}
