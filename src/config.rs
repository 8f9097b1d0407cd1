use std::{
    fs,
    path::{Path, PathBuf},
};

use directories::ProjectDirs;
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::{is_valid_key, PadError, Result, StorageKeys, DEFAULT_FOLDER_COLOR};

/// Application configuration settings.
///
/// Fields missing from a config file take their default value.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Directory holding the stored blobs
    pub data_dir: PathBuf,

    /// Storage key of the notes collection
    pub notes_key: String,

    /// Storage key of the folders collection
    pub folders_key: String,

    /// Storage key of the saved filter configuration
    pub filters_key: String,

    /// Color given to folders created without one
    pub default_folder_color: String,

    /// Upper bound on stored bytes; writes past it fail and are logged
    pub storage_quota_bytes: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        let keys = StorageKeys::default();
        Config {
            data_dir: default_data_dir(),
            notes_key: keys.notes,
            folders_key: keys.folders,
            filters_key: keys.filters,
            default_folder_color: DEFAULT_FOLDER_COLOR.to_string(),
            storage_quota_bytes: None,
        }
    }
}

fn default_data_dir() -> PathBuf {
    ProjectDirs::from("", "", "anotherpad")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from(".anotherpad"))
}

impl Config {
    /// Default location of the config file.
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "anotherpad").map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Reads the config at `path`, or returns defaults if the file does not exist.
    pub fn load(path: &Path) -> Result<Config> {
        if !path.exists() {
            debug!("No config at {}, using defaults", path.display());
            return Ok(Config::default());
        }

        let content = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content).map_err(|e| PadError::ConfigError {
            message: format!("{}: {}", path.display(), e),
        })?;
        config.validate()?;

        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Writes the config as pretty JSON, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        let keys = [&self.notes_key, &self.folders_key, &self.filters_key];
        if keys.iter().any(|k| k.is_empty()) {
            return Err(PadError::ConfigError {
                message: "storage keys must not be empty".to_string(),
            });
        }
        if let Some(key) = keys.iter().find(|k| !is_valid_key(k)) {
            return Err(PadError::ConfigError {
                message: format!("storage key {:?} is not a valid file name", key),
            });
        }
        if keys[0] == keys[1] || keys[0] == keys[2] || keys[1] == keys[2] {
            return Err(PadError::ConfigError {
                message: "storage keys must be distinct".to_string(),
            });
        }
        Ok(())
    }
}
