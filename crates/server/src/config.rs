//! Plugin configuration file.
//!
//! A single JSON document. Every section and every key is optional; whatever
//! is missing takes its default.
//!
//! ```json
//! {
//!   "fragments": { "chest_spawn_chance": 0.02, "min_chests_for_fragments": 50 },
//!   "forge": { "auto_generate": true, "min_distance": 5000.0 },
//!   "altar": { "interaction_radius": 3.0 },
//!   "autosave_secs": 300
//! }
//! ```

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use testament_engine::config::{DropConfig, PlacementConfig};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AltarConfig {
    /// How far from a registered altar center a click still counts.
    pub interaction_radius: f64,
}

impl Default for AltarConfig {
    fn default() -> Self {
        Self {
            interaction_radius: 3.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PluginConfig {
    pub fragments: DropConfig,
    pub forge: PlacementConfig,
    pub altar: AltarConfig,
    pub autosave_secs: u64,
}

impl PluginConfig {
    pub fn autosave_interval(&self) -> Duration {
        Duration::from_secs(self.autosave_secs.max(1))
    }
}

impl Default for PluginConfig {
    fn default() -> Self {
        Self {
            fragments: DropConfig::default(),
            forge: PlacementConfig::default(),
            altar: AltarConfig::default(),
            autosave_secs: 300,
        }
    }
}

/// Read the config at `path`. A missing file yields the defaults.
pub fn load(path: &Path) -> Result<PluginConfig> {
    if !path.exists() {
        tracing::info!("No config at {}, using defaults", path.display());
        return Ok(PluginConfig::default());
    }
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    let config: PluginConfig = serde_json::from_str(&text)
        .with_context(|| format!("parsing config {}", path.display()))?;
    tracing::info!("Loaded config from {}", path.display());
    Ok(config)
}

/// Write `config` to `path` as pretty JSON, creating parent directories.
pub fn save(config: &PluginConfig, path: &Path) -> Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("creating config directory {}", dir.display()))?;
    }
    let text = serde_json::to_string_pretty(config).context("serializing config")?;
    std::fs::write(path, text).with_context(|| format!("writing config {}", path.display()))
}
