//! Desk configuration loading.
//!
//! # Responsibility
//! - Load file paths, logging, desk credentials and reference lists from JSON.
//! - Accept a caller-supplied database path override.
//!
//! # Invariants
//! - Missing keys fall back to defaults.
//! - A loaded config always has non-empty credentials and option lists.

use crate::reference::ReferenceOptions;
use crate::session::DeskCredentials;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

const DEFAULT_DB_FILE: &str = "onspot_participants.db";
const DEFAULT_BACKUP_FILE: &str = "onspot_backup.csv";
const DEFAULT_LOG_DIR: &str = "logs";

#[derive(Debug)]
pub enum ConfigError {
    Io { path: PathBuf, source: std::io::Error },
    Parse(serde_json::Error),
    Invalid(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Parse(err) => write!(f, "invalid config JSON: {err}"),
            Self::Invalid(message) => write!(f, "invalid config: {message}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
            Self::Invalid(_) => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value)
    }
}

/// Full desk configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KioskConfig {
    pub db_path: PathBuf,
    pub backup_path: PathBuf,
    /// Relative paths are resolved against the working directory at startup.
    pub log_dir: PathBuf,
    pub log_level: Option<String>,
    pub desk: DeskCredentials,
    pub options: ReferenceOptions,
}

impl Default for KioskConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_FILE),
            backup_path: PathBuf::from(DEFAULT_BACKUP_FILE),
            log_dir: PathBuf::from(DEFAULT_LOG_DIR),
            log_level: None,
            desk: DeskCredentials {
                email: "onspot@desk.local".to_string(),
                password: "change-me".to_string(),
            },
            options: ReferenceOptions::default(),
        }
    }
}

impl KioskConfig {
    /// Reads, parses and validates a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    /// Parses and validates JSON config text.
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Replaces `db_path` with `raw` when it is present and non-blank.
    pub fn override_db_path(&mut self, raw: Option<&str>) {
        if let Some(value) = raw.map(str::trim).filter(|value| !value.is_empty()) {
            self.db_path = PathBuf::from(value);
        }
    }

    /// Checks invariants that serde defaults cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.desk.email.trim().is_empty() || self.desk.password.is_empty() {
            return Err(ConfigError::Invalid(
                "desk email and password must be non-empty".to_string(),
            ));
        }
        for (name, list) in [
            ("colleges", &self.options.colleges),
            ("departments", &self.options.departments),
            ("degrees", &self.options.degrees),
        ] {
            if list.iter().all(|option| option.trim().is_empty()) {
                return Err(ConfigError::Invalid(format!(
                    "option list `{name}` must not be empty"
                )));
            }
        }
        if self.db_path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("db_path must be non-empty".to_string()));
        }
        Ok(())
    }
}
