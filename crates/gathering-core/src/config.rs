//! Configuration loading and typed config structures.
//!
//! Configuration lives in a YAML file (`gathering.yaml` by default). Every
//! field has a default, so a missing file or a partial file both load.
//! Environment variables override file values:
//!
//! | Variable | Field |
//! |----------|-------|
//! | `GATHERING_DATA_DIR` | `storage.data_dir` |
//! | `GATHERING_STORAGE_KEY` | `storage.key` |
//! | `GATHERING_LOG_LEVEL` | `logging.level` |
//! | `GATHERING_LOG_FORMAT` | `logging.format` |

use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Deserialize;

use crate::storage::DEFAULT_STORAGE_KEY;
use crate::store::EmptySlot;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// A value parsed but is not acceptable.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct GatheringConfig {
    /// Where and how events are persisted.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Log output settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl GatheringConfig {
    /// Load configuration from a YAML file, then apply environment
    /// overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML, or
    /// [`ConfigError::Invalid`] if an override or value is rejected.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Like [`Self::from_file`], but a missing file yields the defaults
    /// (still subject to environment overrides).
    ///
    /// # Errors
    ///
    /// Same as [`Self::from_file`], except for a missing file.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(contents) => Self::parse(&contents),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "Config file not found; using defaults");
                let mut config = Self::default();
                config.apply_env_overrides()?;
                config.validate()?;
                Ok(config)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Parse configuration from a YAML string, then apply environment
    /// overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML, or
    /// [`ConfigError::Invalid`] if an override or value is rejected.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config = Self::parse_without_env(yaml)?;
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from a YAML string, ignoring the environment.
    ///
    /// An empty document yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse_without_env(yaml: &str) -> Result<Self, ConfigError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yml::from_str(yaml)?)
    }

    /// Override fields from `GATHERING_*` environment variables when set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for an unknown log format.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides_from(|name| std::env::var(name).ok())
    }

    /// Override fields using `lookup` as the variable source.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for an unknown log format.
    pub fn apply_overrides_from(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(val) = lookup("GATHERING_DATA_DIR") {
            self.storage.data_dir = PathBuf::from(val);
        }
        if let Some(val) = lookup("GATHERING_STORAGE_KEY") {
            self.storage.key = val;
        }
        if let Some(val) = lookup("GATHERING_LOG_LEVEL") {
            self.logging.level = val;
        }
        if let Some(val) = lookup("GATHERING_LOG_FORMAT") {
            self.logging.format = val.parse()?;
        }
        Ok(())
    }

    /// Check values serde cannot.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for an empty storage key or log
    /// level.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.storage.key.trim().is_empty() {
            return Err(ConfigError::Invalid("storage.key must not be empty".to_owned()));
        }
        if self.logging.level.trim().is_empty() {
            return Err(ConfigError::Invalid("logging.level must not be empty".to_owned()));
        }
        Ok(())
    }
}

/// Storage configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StorageConfig {
    /// Directory holding snapshot files.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Snapshot key; the file is `<data_dir>/<key>.json`.
    #[serde(default = "default_storage_key")]
    pub key: String,

    /// Load the sample events when no snapshot exists yet.
    #[serde(default = "default_true")]
    pub seed_when_empty: bool,
}

impl StorageConfig {
    /// What the store should load from an empty slot.
    pub const fn empty_slot(&self) -> EmptySlot {
        if self.seed_when_empty {
            EmptySlot::Seed
        } else {
            EmptySlot::Empty
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            key: default_storage_key(),
            seed_when_empty: default_true(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level or `EnvFilter` directive (e.g. `info`, `gathering_core=debug`).
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format.
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Pretty,
    /// One JSON object per line.
    Json,
}

impl FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Invalid(format!(
                "unknown log format {other:?} (expected \"pretty\" or \"json\")"
            ))),
        }
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from(".gathering")
}

fn default_storage_key() -> String {
    DEFAULT_STORAGE_KEY.to_owned()
}

const fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_owned()
}
