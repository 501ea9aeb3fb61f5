//! Configuration management for the Subnet client
//!
//! Nothing here is required: the connect dialog is always shown and every
//! value can be edited there. A config file only supplies the dialog's
//! defaults and a few window preferences.

pub mod loader;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::client::{ConnectRequest, DEFAULT_NICKNAME};

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Defaults for the connect dialog
    pub connection: ConnectionConfig,

    /// Window and transcript settings
    pub ui: UiConfig,
}

impl Config {
    /// Check every section
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.connection.validate()?;
        self.ui.validate()
    }
}

/// Connect dialog defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionConfig {
    pub host: String,
    pub port: u16,
    pub nickname: String,
    /// Seconds per connect attempt, 0 leaves it to the OS
    pub connect_timeout_secs: u64,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 2323,
            nickname: DEFAULT_NICKNAME.to_string(),
            connect_timeout_secs: 10,
        }
    }
}

impl ConnectionConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.host.trim().is_empty() {
            return Err(ConfigError::EmptyHost);
        }
        if self.port == 0 {
            return Err(ConfigError::InvalidPort);
        }
        if self.nickname.chars().any(char::is_whitespace) {
            return Err(ConfigError::InvalidNickname(self.nickname.clone()));
        }
        Ok(())
    }

    pub fn connect_timeout(&self) -> Option<Duration> {
        (self.connect_timeout_secs > 0).then(|| Duration::from_secs(self.connect_timeout_secs))
    }

    /// Request matching these defaults, as if the dialog was accepted untouched
    pub fn default_request(&self) -> ConnectRequest {
        ConnectRequest::new(self.host.clone(), self.port, &self.nickname)
    }
}

/// UI-related configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Monospace font size in points
    pub font_size: f32,

    /// Maximum number of transcript lines kept
    pub scrollback_lines: usize,

    /// Initial window dimensions
    pub window_width: f32,
    pub window_height: f32,

    /// Prefix each transcript line with its local receive time
    pub show_timestamps: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            font_size: 14.0,
            scrollback_lines: 5000,
            window_width: 900.0,
            window_height: 700.0,
            show_timestamps: false,
        }
    }
}

impl UiConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(8.0..=72.0).contains(&self.font_size) {
            return Err(ConfigError::InvalidFontSize(self.font_size));
        }
        if self.scrollback_lines == 0 || self.scrollback_lines > 100_000 {
            return Err(ConfigError::InvalidScrollbackLines(self.scrollback_lines));
        }
        if self.window_width < 400.0 || self.window_height < 300.0 {
            return Err(ConfigError::InvalidWindowSize(self.window_width, self.window_height));
        }
        Ok(())
    }
}

/// Configuration errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("Host must not be empty")]
    EmptyHost,

    #[error("Port must be between 1 and 65535")]
    InvalidPort,

    #[error("Invalid nickname: '{0}' (must not contain whitespace)")]
    InvalidNickname(String),

    #[error("Invalid font size: {0} (must be between 8 and 72)")]
    InvalidFontSize(f32),

    #[error("Invalid scrollback lines: {0} (must be between 1 and 100000)")]
    InvalidScrollbackLines(usize),

    #[error("Invalid window size: {0}x{1} (minimum 400x300)")]
    InvalidWindowSize(f32, f32),
}

/// Configuration plus where it came from
#[derive(Debug, Clone, Default)]
pub struct RuntimeConfig {
    config: Config,
    source: Option<PathBuf>,
}

impl RuntimeConfig {
    pub fn new(config: Config, source: Option<PathBuf>) -> Self {
        Self { config, source }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// File the configuration was read from, `None` for built-in defaults
    pub fn source(&self) -> Option<&std::path::Path> {
        self.source.as_deref()
    }
}
