//! Dashboard configuration: where the datasets live and how exports are named.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Looked up in the working directory when no path is given on the command line.
pub const DEFAULT_CONFIG_FILE: &str = "dashboard.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// The large 2017 onwards dataset.
    pub historical_path: PathBuf,
    /// The incrementally updated recent dataset.
    pub recent_path: PathBuf,
    /// Suggested file name for CSV downloads.
    pub export_file_name: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            historical_path: PathBuf::from("resale_flat_2017_2024.csv"),
            recent_path: PathBuf::from("dynamic_2025_data.csv"),
            export_file_name: "filtered_resale_data.csv".to_string(),
        }
    }
}

impl DashboardConfig {
    /// Load a JSON config file. Relative dataset paths are resolved against
    /// the directory containing the file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let mut config: DashboardConfig = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        if let Some(base) = path.parent() {
            config.historical_path = base.join(&config.historical_path);
            config.recent_path = base.join(&config.recent_path);
        }
        Ok(config)
    }

    /// Explicit path if given, else [`DEFAULT_CONFIG_FILE`] in `cwd` if it
    /// exists, else built-in defaults.
    pub fn resolve(explicit: Option<&Path>, cwd: &Path) -> Result<Self> {
        if let Some(path) = explicit {
            log::info!("Using config {}", path.display());
            return Self::load(path);
        }
        let fallback = cwd.join(DEFAULT_CONFIG_FILE);
        if fallback.is_file() {
            log::info!("Using config {}", fallback.display());
            Self::load(&fallback)
        } else {
            log::info!("No {DEFAULT_CONFIG_FILE} found, using default dataset paths");
            Ok(Self::default())
        }
    }
}
