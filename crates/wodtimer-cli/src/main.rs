use clap::{Parser, Subcommand};

mod commands;
mod presets;

#[derive(Parser)]
#[command(name = "wodtimer", version, about = "Workout interval timer")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a workout session live in the terminal
    Run(commands::run::RunArgs),
    /// Saved session presets
    Preset {
        #[command(subcommand)]
        action: commands::preset::PresetAction,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Run(args) => commands::run::run(args).await,
        Commands::Preset { action } => commands::preset::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
