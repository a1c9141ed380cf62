//! Configuration management and validation.
//!
//! Settings are layered, later layers winning:
//!
//! 1. Built-in defaults
//! 2. TOML file (`--config`, or `~/.config/depot-ingest/config.toml` when present)
//! 3. Environment (`DEPOT_INGEST_DATABASE`)
//! 4. Command line overrides
//!
//! ```toml
//! [storage]
//! database_path = "/var/lib/depot-ingest/holdings.sqlite"
//!
//! [ingest]
//! max_concurrent_files = 8
//!
//! [logging]
//! level = "info"
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::constants::{
    CONFIG_DIR_NAME, CONFIG_FILE_NAME, DATABASE_ENV_VAR, DEFAULT_DATABASE_FILE,
    DEFAULT_LOG_LEVEL, DEFAULT_MAX_CONCURRENT_FILES,
};
use crate::{Error, Result};

/// Log levels accepted in `logging.level`
const LOG_LEVELS: &[&str] = &["error", "warn", "info", "debug", "trace"];

/// Storage settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StorageConfig {
    /// SQLite database holding the ingested depots
    pub database_path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from(DEFAULT_DATABASE_FILE),
        }
    }
}

/// Ingestion settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IngestConfig {
    /// Statement files ingested at the same time
    pub max_concurrent_files: usize,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            max_concurrent_files: DEFAULT_MAX_CONCURRENT_FILES,
        }
    }
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// Default level when neither `-v` nor `-q` is given
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

/// Main configuration for depot ingestion
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub storage: StorageConfig,
    pub ingest: IngestConfig,
    pub logging: LoggingConfig,
}

impl Config {
    /// Location of the per-user configuration file
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Load defaults, the configuration file and the environment
    ///
    /// An explicit `path` must exist; the per-user file is optional. The
    /// result is not validated, callers validate once all overrides are in.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_config_path().filter(|path| path.is_file()) {
                Some(path) => Self::from_file(&path)?,
                None => Self::default(),
            },
        };

        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Read a TOML configuration file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            Error::io(format!("Failed to read configuration {}", path.display()), e)
        })?;

        debug!("Loaded configuration from {}", path.display());
        Self::from_toml_str(&content)
            .map_err(|e| Error::configuration(format!("{}: {}", path.display(), e)))
    }

    /// Parse TOML configuration text; missing keys keep their defaults
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::configuration(e.to_string()))
    }

    /// Apply environment overrides using `lookup` to read variables
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(database) = lookup(DATABASE_ENV_VAR).filter(|value| !value.is_empty()) {
            debug!("Database path overridden by {}", DATABASE_ENV_VAR);
            self.storage.database_path = PathBuf::from(database);
        }
    }

    /// Check that all settings are usable
    pub fn validate(&self) -> Result<()> {
        if self.storage.database_path.as_os_str().is_empty() {
            return Err(Error::configuration("storage.database_path must not be empty"));
        }

        if self.ingest.max_concurrent_files == 0 {
            return Err(Error::configuration(
                "ingest.max_concurrent_files must be at least 1",
            ));
        }

        if !LOG_LEVELS.contains(&self.logging.level.to_lowercase().as_str()) {
            return Err(Error::configuration(format!(
                "logging.level '{}' is not one of {}",
                self.logging.level,
                LOG_LEVELS.join(", ")
            )));
        }

        Ok(())
    }

    /// Set the database path
    pub fn with_database_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.storage.database_path = path.into();
        self
    }

    /// Set maximum concurrent files
    pub fn with_max_concurrent_files(mut self, max_files: usize) -> Self {
        self.ingest.max_concurrent_files = max_files;
        self
    }
}
