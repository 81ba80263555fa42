//! Persisted calculator state.
//!
//! The state file is a JSON object keyed by storage key, so a future schema
//! can live beside the current one. Stores everything needed to resume:
//! - Whether the settings panel is shown
//! - Leverage and rate settings
//! - The last entered trade inputs
//!
//! Reading never fails. A missing, unreadable or malformed file yields the
//! defaults.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::models::TradeRequest;
use crate::sizing::LeverageConfig;

/// Key of the current schema inside the state file.
pub const STORAGE_KEY: &str = "PSC_STATE_V1";

/// Everything the calculator remembers between runs.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersistedState {
    #[serde(alias = "showSettings")]
    pub show_settings_panel: bool,

    pub settings: LeverageConfig,

    #[serde(alias = "inputs")]
    pub last_inputs: TradeRequest,
}

/// JSON file holding [`PersistedState`] under [`STORAGE_KEY`].
pub struct StateStore {
    path: PathBuf,
}

impl StateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load state, falling back to defaults on any problem.
    pub fn load(&self) -> PersistedState {
        let Some(mut entries) = self.read_entries() else {
            return PersistedState::default();
        };

        let Some(value) = entries.remove(STORAGE_KEY) else {
            debug!(path = %self.path.display(), "No stored state under {}", STORAGE_KEY);
            return PersistedState::default();
        };

        match serde_json::from_value(value) {
            Ok(state) => state,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Stored state is malformed, using defaults");
                PersistedState::default()
            }
        }
    }

    /// Write state under [`STORAGE_KEY`], keeping any other keys in the file.
    pub fn save(&self, state: &PersistedState) -> Result<()> {
        let mut entries = self.read_entries().unwrap_or_default();
        entries.insert(
            STORAGE_KEY.to_string(),
            serde_json::to_value(state).context("Failed to serialize state")?,
        );

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let json = serde_json::to_string_pretty(&Value::Object(entries))
            .context("Failed to serialize state file")?;
        fs::write(&self.path, json)
            .with_context(|| format!("Failed to write {}", self.path.display()))?;

        debug!(path = %self.path.display(), "State saved");
        Ok(())
    }

    fn read_entries(&self) -> Option<Map<String, Value>> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No state file yet");
                return None;
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Failed to read state file");
                return None;
            }
        };

        match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Object(entries)) => Some(entries),
            Ok(_) => {
                warn!(path = %self.path.display(), "State file is not a JSON object");
                None
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "State file is not valid JSON");
                None
            }
        }
    }
}
