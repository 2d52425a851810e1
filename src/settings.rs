use anyhow::{Context, Result};
use pitchex_experiment::ExperimentConfig;
use pitchex_export::TableStoreConfig;
use serde::Deserialize;
use std::path::Path;

/// Contents of the optional TOML settings file
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub experiment: ExperimentConfig,
    pub table_store: Option<TableStoreConfig>,
}

impl Settings {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings from {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("Invalid settings in {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }
}
