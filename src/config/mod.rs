use crate::errors::{AppError, AppResult};
use crate::ui::messages::warning;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database: String,
    #[serde(default = "default_blank_description")]
    pub blank_description: String,
    #[serde(default = "default_due_minutes")]
    pub default_due_minutes: i64,
}

fn default_blank_description() -> String {
    "No Description".to_string()
}
fn default_due_minutes() -> i64 {
    5
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: Self::database_file().to_string_lossy().to_string(),
            blank_description: default_blank_description(),
            default_due_minutes: default_due_minutes(),
        }
    }
}

impl Config {
    /// Return the standard configuration directory depending on the platform
    pub fn config_dir() -> PathBuf {
        if cfg!(target_os = "windows") {
            let appdata = env::var("APPDATA").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(appdata).join("ticktrack")
        } else {
            let home = env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".ticktrack")
        }
    }

    /// Return the full path of the config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("ticktrack.conf")
    }

    /// Return the default path of the SQLite database.
    /// Falls back to the config dir when no local data dir is available.
    pub fn database_file() -> PathBuf {
        match dirs::data_local_dir() {
            Some(data_dir) => data_dir.join("ticktrack").join("ticktrack.sqlite"),
            None => Self::config_dir().join("ticktrack.sqlite"),
        }
    }

    /// Load configuration from file, or return defaults if not found.
    /// A file that cannot be read or parsed also yields defaults with a
    /// warning; configuration trouble never aborts the process.
    pub fn load() -> Self {
        let path = Self::config_file();
        if !path.exists() {
            return Self::default();
        }
        match fs::read_to_string(&path) {
            Ok(content) => match serde_yaml::from_str(&content) {
                Ok(cfg) => cfg,
                Err(e) => {
                    warning(format!("Unreadable configuration file ({}), using defaults", e));
                    Self::default()
                }
            },
            Err(e) => {
                warning(format!("Failed to read configuration file ({}), using defaults", e));
                Self::default()
            }
        }
    }

    /// Persist the configuration, creating the config dir when missing.
    pub fn save(&self) -> AppResult<()> {
        fs::create_dir_all(Self::config_dir())?;
        let yaml = serde_yaml::to_string(self).map_err(|e| AppError::Config(e.to_string()))?;
        fs::write(Self::config_file(), yaml)?;
        Ok(())
    }

    /// Due offset applied to new tickets when the caller does not supply one.
    pub fn default_due_offset(&self) -> chrono::Duration {
        chrono::Duration::minutes(self.default_due_minutes)
    }
}
