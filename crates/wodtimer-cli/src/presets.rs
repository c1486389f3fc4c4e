//! TOML-based preset storage.
//!
//! Presets are named [`SessionConfig`]s stored at
//! `~/.config/wodtimer/presets.toml`. Set `WODTIMER_ENV=dev` to use a
//! development data directory.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use wodtimer_core::SessionConfig;

/// Named session presets, serialized to/from TOML.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct PresetStore {
    #[serde(default)]
    pub presets: BTreeMap<String, SessionConfig>,
}

impl PresetStore {
    /// Load from `path`; a missing file is an empty store.
    pub fn load_from(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&text)?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, toml::to_string_pretty(self)?)?;
        Ok(())
    }
}

/// Returns `~/.config/wodtimer[-dev]/` based on WODTIMER_ENV.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> Result<PathBuf, Box<dyn std::error::Error>> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("WODTIMER_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("wodtimer-dev")
    } else {
        base_dir.join("wodtimer")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

pub fn presets_path() -> Result<PathBuf, Box<dyn std::error::Error>> {
    Ok(data_dir()?.join("presets.toml"))
}

/// Load the preset store from the default location.
pub fn load() -> Result<PresetStore, Box<dyn std::error::Error>> {
    PresetStore::load_from(&presets_path()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wodtimer_core::Mode;

    #[test]
    fn round_trips_through_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("presets.toml");

        let mut store = PresetStore::default();
        store
            .presets
            .insert("cindy".into(), SessionConfig::amrap(1200));
        store
            .presets
            .insert("classic".into(), SessionConfig::tabata_classic());
        store.save_to(&path).unwrap();

        let loaded = PresetStore::load_from(&path).unwrap();
        assert_eq!(loaded.presets.len(), 2);
        assert_eq!(loaded.presets["cindy"].mode, Mode::Amrap);
        assert_eq!(loaded.presets["cindy"].duration_secs, Some(1200));
        assert_eq!(loaded.presets["classic"], SessionConfig::tabata_classic());
    }

    #[test]
    fn missing_file_loads_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = PresetStore::load_from(&dir.path().join("nope.toml")).unwrap();
        assert!(store.presets.is_empty());
    }
}
