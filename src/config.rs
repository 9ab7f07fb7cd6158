use crate::settings::{ConfigReader, ConfigWriter};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

const SETTINGS_FILENAME: &str = "padhaptics_settings.json";

/// Flat integer settings persisted as JSON
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JsonSettings {
    #[serde(default)]
    values: BTreeMap<String, i32>,
    #[serde(skip)]
    path: PathBuf,
}

impl JsonSettings {
    /// Settings file next to the executable
    pub fn load() -> Self {
        Self::load_from(Self::default_path())
    }

    /// Missing or unreadable files give an empty store bound to `path`
    pub fn load_from(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let mut settings = Self {
            values: BTreeMap::new(),
            path: path.clone(),
        };

        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(contents) => match serde_json::from_str::<JsonSettings>(&contents) {
                    Ok(loaded) => {
                        log::info!("Loaded settings from {:?}", path);
                        settings.values = loaded.values;
                    }
                    Err(e) => {
                        log::error!("Failed to parse settings: {}", e);
                    }
                },
                Err(e) => {
                    log::error!("Failed to read settings file: {}", e);
                }
            }
        }

        settings
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(&self.path, contents)?;
        log::info!("Saved settings to {:?}", self.path);
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn default_path() -> PathBuf {
        std::env::current_exe()
            .ok()
            .and_then(|p| p.parent().map(|p| p.to_path_buf()))
            .unwrap_or_else(|| PathBuf::from("."))
            .join(SETTINGS_FILENAME)
    }
}

impl ConfigReader for JsonSettings {
    fn get_int(&self, key: &str) -> Option<i32> {
        self.values.get(key).copied()
    }
}

impl ConfigWriter for JsonSettings {
    fn set_int(&mut self, key: &str, value: i32) -> anyhow::Result<()> {
        self.values.insert(key.to_string(), value);
        Ok(())
    }
}
