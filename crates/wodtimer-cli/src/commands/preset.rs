use clap::Subcommand;

use crate::presets;

use super::run::ModeSpec;

#[derive(Subcommand)]
pub enum PresetAction {
    /// List saved presets
    List,
    /// Print one preset as JSON
    Show { name: String },
    /// Save a preset under a name
    Save {
        name: String,
        #[command(subcommand)]
        mode: ModeSpec,
    },
    /// Delete a preset
    Delete { name: String },
}

pub fn run(action: PresetAction) -> Result<(), Box<dyn std::error::Error>> {
    let path = presets::presets_path()?;
    let mut store = presets::PresetStore::load_from(&path)?;

    match action {
        PresetAction::List => {
            if store.presets.is_empty() {
                println!("no presets saved");
            }
            for (name, config) in &store.presets {
                println!("{name}\t{}", config.mode);
            }
        }
        PresetAction::Show { name } => {
            let config = store
                .presets
                .get(&name)
                .ok_or_else(|| format!("unknown preset '{name}'"))?;
            println!("{}", serde_json::to_string_pretty(config)?);
        }
        PresetAction::Save { name, mode } => {
            store.presets.insert(name.clone(), mode.to_config());
            store.save_to(&path)?;
            println!("saved preset '{name}'");
        }
        PresetAction::Delete { name } => {
            if store.presets.remove(&name).is_none() {
                return Err(format!("unknown preset '{name}'").into());
            }
            store.save_to(&path)?;
            println!("deleted preset '{name}'");
        }
    }
    Ok(())
}
