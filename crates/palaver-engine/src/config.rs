//! Configuration types for palaver.
//!
//! Every field has a default, so a partial or empty config file is valid.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::backend::CommandBackend;
use crate::clock::{is_valid_timestamp_format, DEFAULT_TIMESTAMP_FORMAT};
use crate::history::HISTORY_KEY;

/// Default data directory, relative to the working directory.
pub const DEFAULT_DATA_DIR: &str = ".palaver";

/// Config file name inside the data directory.
pub const CONFIG_FILE: &str = "config.json";

/// Main configuration for palaver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Chat backend to talk to.
    #[serde(default)]
    pub backend: BackendConfig,

    /// Milliseconds between readiness checks.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Storage key for the conversation.
    #[serde(default = "default_storage_key")]
    pub storage_key: String,

    /// chrono format string for message timestamps.
    #[serde(default = "default_timestamp_format")]
    pub timestamp_format: String,
}

fn default_poll_interval_ms() -> u64 {
    300
}

fn default_storage_key() -> String {
    HISTORY_KEY.into()
}

fn default_timestamp_format() -> String {
    DEFAULT_TIMESTAMP_FORMAT.into()
}

/// Backend command configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Name shown in logs and diagnostics.
    #[serde(default = "default_backend_name")]
    pub name: String,

    /// Command and arguments to invoke the backend.
    #[serde(default = "default_command_argv")]
    pub command_argv: Vec<String>,
}

fn default_backend_name() -> String {
    "claude".into()
}

fn default_command_argv() -> Vec<String> {
    vec!["claude".into(), "-p".into()]
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            name: default_backend_name(),
            command_argv: default_command_argv(),
        }
    }
}

impl BackendConfig {
    /// Configuration for an ad-hoc command line; the program names the backend.
    pub fn from_argv(command_argv: Vec<String>) -> Self {
        let name = command_argv
            .first()
            .and_then(|p| Path::new(p).file_name())
            .map_or_else(default_backend_name, |n| n.to_string_lossy().to_string());
        Self { name, command_argv }
    }

    /// Build the backend this config describes.
    pub fn build(&self) -> CommandBackend {
        CommandBackend::new(self.name.clone(), self.command_argv.clone())
    }
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
        let config: Self = serde_json::from_str(&content).map_err(ConfigError::Parse)?;
        if !is_valid_timestamp_format(&config.timestamp_format) {
            return Err(ConfigError::InvalidTimestampFormat(config.timestamp_format));
        }
        Ok(config)
    }

    /// Load configuration, falling back to defaults if the file is missing.
    ///
    /// A file that exists but does not parse is still an error.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to a file.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self).map_err(ConfigError::Serialize)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(ConfigError::Io)?;
        }
        std::fs::write(path, content).map_err(ConfigError::Io)
    }

    /// Path of the config file inside `data_dir`.
    pub fn path_in(data_dir: &Path) -> PathBuf {
        data_dir.join(CONFIG_FILE)
    }

    /// Readiness poll interval.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: BackendConfig::default(),
            poll_interval_ms: default_poll_interval_ms(),
            storage_key: default_storage_key(),
            timestamp_format: default_timestamp_format(),
        }
    }
}

/// Errors that can occur when working with configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// I/O error reading or writing config.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error parsing config JSON.
    #[error("Parse error: {0}")]
    Parse(#[source] serde_json::Error),

    /// Error serializing config to JSON.
    #[error("Serialize error: {0}")]
    Serialize(#[source] serde_json::Error),

    /// `timestamp_format` has a specifier chrono cannot render.
    #[error("invalid timestamp format: {0:?}")]
    InvalidTimestampFormat(String),
}
