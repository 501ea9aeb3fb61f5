//! Error types and Result aliases for the Subnet client

use std::fmt;
use std::path::PathBuf;

use crate::config::ConfigError;

/// Result type alias for Subnet client operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the Subnet client
#[derive(Debug)]
pub enum Error {
    // === Connection errors ===
    /// The socket to the chat server could not be established
    ConnectFailed {
        addr: String,
        reason: String,
    },

    /// Port entered in the connect dialog is not a valid TCP port
    InvalidPort {
        input: String,
    },

    /// A line was submitted while no connection is active
    NotConnected,

    /// Writing a line to the server failed
    WriteFailed {
        reason: String,
    },

    /// The worker thread for a connection attempt could not be started
    WorkerSpawnFailed {
        reason: String,
    },

    // === Configuration errors ===
    /// Failed to load configuration file
    ConfigLoadFailed {
        path: PathBuf,
        reason: String,
    },

    /// Failed to parse configuration
    ConfigParseFailed {
        format: String,
        reason: String,
    },

    /// Configuration values are out of range
    ConfigValidation(ConfigError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // Connection errors
            Error::ConnectFailed { addr, reason } => {
                write!(f, "Connection to {} failed: {}", addr, reason)
            }
            Error::InvalidPort { input } => {
                write!(f, "Invalid port '{}': expected a number between 1 and 65535", input)
            }
            Error::NotConnected => write!(f, "Not connected to a server"),
            Error::WriteFailed { reason } => write!(f, "Failed to send line: {}", reason),
            Error::WorkerSpawnFailed { reason } => {
                write!(f, "Failed to start connection worker: {}", reason)
            }

            // Configuration errors
            Error::ConfigLoadFailed { path, reason } => {
                write!(f, "Failed to load config from '{}': {}", path.display(), reason)
            }
            Error::ConfigParseFailed { format, reason } => {
                write!(f, "Failed to parse {} config: {}", format, reason)
            }
            Error::ConfigValidation(err) => write!(f, "Invalid configuration: {}", err),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::ConfigValidation(err) => Some(err),
            _ => None,
        }
    }
}

impl Error {
    /// Short title used when the error is shown in a notice dialog
    pub fn title(&self) -> &'static str {
        match self {
            Error::ConnectFailed { .. } | Error::WorkerSpawnFailed { .. } => "Connection failed",
            Error::InvalidPort { .. } => "Invalid port",
            Error::NotConnected => "Not connected",
            Error::WriteFailed { .. } => "Send failed",
            Error::ConfigLoadFailed { .. }
            | Error::ConfigParseFailed { .. }
            | Error::ConfigValidation(_) => "Configuration error",
        }
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Error::ConfigValidation(err)
    }
}
