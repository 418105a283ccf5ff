//! Configuration loading and management
//!
//! Handles parsing of `taskdash.toml` configuration files. The config is
//! optional; every field has a default.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::view::StatusFilter;

pub const CONFIG_FILE: &str = "taskdash.toml";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Storage configuration
    #[serde(default)]
    pub storage: StorageConfig,

    /// UI defaults
    #[serde(default)]
    pub ui: UiConfig,
}

/// Storage-related configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Override for the data directory holding `tasks.json`
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
}

/// UI-related configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Status filter applied when none is given (`all`, `pending`,
    /// `completed`, `overdue`)
    #[serde(default = "default_filter")]
    pub default_filter: String,
}

fn default_filter() -> String {
    "all".to_string()
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            default_filter: default_filter(),
        }
    }
}

impl Config {
    /// Load configuration from a specific file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from the platform config dir or the current
    /// directory, falling back to defaults when no file exists.
    pub fn discover() -> Self {
        for candidate in Self::candidate_paths() {
            if candidate.exists() {
                return Self::load(&candidate).unwrap_or_default();
            }
        }
        Self::default()
    }

    fn candidate_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();
        if let Some(dirs) = ProjectDirs::from("", "", "taskdash") {
            paths.push(dirs.config_dir().join(CONFIG_FILE));
        }
        paths.push(PathBuf::from(CONFIG_FILE));
        paths
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Parsed form of `ui.default_filter`.
    pub fn default_filter(&self) -> StatusFilter {
        self.ui
            .default_filter
            .parse()
            .unwrap_or(StatusFilter::All)
    }

    fn validate(&self) -> Result<()> {
        self.ui
            .default_filter
            .parse::<StatusFilter>()
            .map_err(|_| {
                Error::InvalidConfig(format!(
                    "ui.default_filter '{}' is not one of all|pending|completed|overdue",
                    self.ui.default_filter
                ))
            })?;

        if let Some(dir) = &self.storage.data_dir {
            if dir.as_os_str().is_empty() {
                return Err(Error::InvalidConfig(
                    "storage.data_dir cannot be empty".to_string(),
                ));
            }
        }

        Ok(())
    }
}
