//! Configuration loading, validation, and management for mailticks.
//!
//! Loads configuration from `~/.mailticks/config.toml` with environment
//! variable overrides. Validates all settings at load time.

use mailticks_core::AnalyticsDetailLevel;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable that overrides [`MailTelemetryConfig::detail_level`].
pub const DETAIL_LEVEL_ENV: &str = "MAILTICKS_DETAIL_LEVEL";

/// The root configuration structure.
///
/// Maps directly to `~/.mailticks/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailTelemetryConfig {
    /// How much raw payload the mail event may capture
    #[serde(default)]
    pub detail_level: AnalyticsDetailLevel,

    /// Character limit for headers, body and options at the `detailed` level
    #[serde(default = "default_truncate_at")]
    pub truncate_at: usize,

    /// Appended to values cut at `truncate_at`
    #[serde(default = "default_truncation_marker")]
    pub truncation_marker: String,

    /// Replace SMTP username and password in the options blob
    #[serde(default = "default_true")]
    pub redact_credentials: bool,

    /// Resolve the transport host to an IP for the `ip` field
    #[serde(default = "default_true")]
    pub resolve_host: bool,

    /// Capacity of the in-memory event buffer
    #[serde(default = "default_max_buffered_events")]
    pub max_buffered_events: usize,
}

fn default_truncate_at() -> usize {
    512
}
fn default_truncation_marker() -> String {
    "...".into()
}
fn default_true() -> bool {
    true
}
fn default_max_buffered_events() -> usize {
    5_000
}

impl Default for MailTelemetryConfig {
    fn default() -> Self {
        Self {
            detail_level: AnalyticsDetailLevel::default(),
            truncate_at: default_truncate_at(),
            truncation_marker: default_truncation_marker(),
            redact_credentials: true,
            resolve_host: true,
            max_buffered_events: default_max_buffered_events(),
        }
    }
}

impl MailTelemetryConfig {
    /// Load configuration from the default path (~/.mailticks/config.toml).
    ///
    /// `MAILTICKS_DETAIL_LEVEL` overrides the file's `detail_level`.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_dir().join("config.toml");
        let mut config = Self::load_from(&config_path)?;
        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Apply environment overrides read through `lookup`.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(level) = lookup(DETAIL_LEVEL_ENV) {
            self.detail_level = level
                .parse()
                .map_err(|e: String| ConfigError::ValidationError(format!("{DETAIL_LEVEL_ENV}: {e}")))?;
            tracing::debug!(level = %self.detail_level, "Detail level overridden from environment");
        }
        Ok(())
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".mailticks")
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.truncate_at == 0 {
            return Err(ConfigError::ValidationError(
                "truncate_at must be > 0".into(),
            ));
        }

        if self.max_buffered_events == 0 {
            return Err(ConfigError::ValidationError(
                "max_buffered_events must be > 0".into(),
            ));
        }

        Ok(())
    }

    /// Generate a default config TOML string.
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<ConfigError> for mailticks_core::Error {
    fn from(err: ConfigError) -> Self {
        mailticks_core::Error::Config {
            message: err.to_string(),
        }
    }
}
