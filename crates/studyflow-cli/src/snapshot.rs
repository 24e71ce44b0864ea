//! JSON snapshot handling.
//!
//! The CLI owns persistence; the engine only ever sees the in-memory data.
//! A snapshot file carries settings, tasks, commitments, and the plan
//! collection. Settings can also be overlaid from a separate TOML file.

use std::path::Path;

use serde::{Deserialize, Serialize};
use studyflow_core::{FixedCommitment, PlanSet, PlannerSettings, Task};

/// Everything one engine pass needs, in one file.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub settings: PlannerSettings,
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub commitments: Vec<FixedCommitment>,
    #[serde(default)]
    pub plans: PlanSet,
}

impl Snapshot {
    /// Load a snapshot from a JSON file and validate its settings.
    pub fn load(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| format!("cannot read snapshot {}: {e}", path.display()))?;
        let snapshot: Snapshot = serde_json::from_str(&raw)?;
        snapshot.settings.validate()?;
        Ok(snapshot)
    }

    /// Load, overlaying settings from a TOML file when one is given.
    pub fn load_with_settings(
        path: &Path,
        settings_path: Option<&Path>,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let mut snapshot = Self::load(path)?;
        if let Some(settings_path) = settings_path {
            let raw = std::fs::read_to_string(settings_path)
                .map_err(|e| format!("cannot read settings {}: {e}", settings_path.display()))?;
            snapshot.settings = toml::from_str(&raw)?;
            snapshot.settings.validate()?;
        }
        Ok(snapshot)
    }

    /// Write the snapshot back as pretty-printed JSON.
    pub fn save(&self, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
            .map_err(|e| format!("cannot write snapshot {}: {e}", path.display()))?;
        Ok(())
    }
}
