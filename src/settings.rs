use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, sync::RwLock, time::Duration};

use crate::services::SquelchConfig;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutosquelchSettings {
    /// Wait between surfacing the emote menu and sampling the bubble region,
    /// in milliseconds. Matches the host overlay's mouse-over trigger delay.
    pub hover_delay_ms: u64,
}

impl Default for AutosquelchSettings {
    fn default() -> Self {
        Self { hover_delay_ms: 250 }
    }
}

/// File-backed settings with live reload; the executor reads the delay
/// through `SquelchConfig` on every wait, so edits apply mid-attempt.
pub struct SettingsStore {
    path: PathBuf,
    data: RwLock<AutosquelchSettings>,
}

impl SettingsStore {
    pub fn new(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read settings from {}", path.display()))?;
            serde_json::from_str(&contents).unwrap_or_default()
        } else {
            AutosquelchSettings::default()
        };

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    pub fn hover_delay_ms(&self) -> u64 {
        self.data.read().unwrap().hover_delay_ms
    }

    pub fn update(&self, settings: AutosquelchSettings) -> Result<()> {
        let mut guard = self.data.write().unwrap();
        *guard = settings;
        self.persist(&guard)
    }

    pub fn reload(&self) -> Result<()> {
        let contents = fs::read_to_string(&self.path)?;
        let data: AutosquelchSettings = serde_json::from_str(&contents)?;
        *self.data.write().unwrap() = data;
        Ok(())
    }

    fn persist(&self, data: &AutosquelchSettings) -> Result<()> {
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write settings to {}", self.path.display()))
    }
}

impl SquelchConfig for SettingsStore {
    fn hover_delay(&self) -> Duration {
        Duration::from_millis(self.hover_delay_ms())
    }
}
