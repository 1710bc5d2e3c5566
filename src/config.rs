use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use dirs::config_dir;
use serde::{Deserialize, Serialize};

use crate::snapshot::DEFAULT_BACKUP_FILE;

const APP_NAME: &str = "roll-call";
const CONFIG_FILE: &str = "config.json";
const DB_ENV_VAR: &str = "ROLL_CALL_DB";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// SQLite file to keep the agenda in. Defaults to the platform data dir.
    pub database_path: Option<PathBuf>,
    /// File written by `export` when no path is given.
    pub backup_file: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_path: None,
            backup_file: DEFAULT_BACKUP_FILE.to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the user's config directory, then apply
    /// environment overrides. Falls back to defaults if the file is missing
    /// or fails to parse.
    pub fn load() -> Self {
        let mut config = match get_config_path().and_then(|p| Self::load_from(&p)) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Failed to load config, using defaults: {:#}", e);
                Self::default()
            }
        };

        if let Ok(path) = std::env::var(DB_ENV_VAR) {
            if !path.is_empty() {
                config.database_path = Some(PathBuf::from(path));
            }
        }

        config
    }

    pub fn load_from(path: &PathBuf) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).context("Failed to read config file")?;

        let config = serde_json::from_str(&content).context("Failed to parse config file")?;

        Ok(config)
    }
}

fn get_config_path() -> Result<PathBuf> {
    let mut path =
        config_dir().ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
    path.push(APP_NAME);
    path.push(CONFIG_FILE);
    Ok(path)
}
