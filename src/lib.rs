//! Subnet Client - a desktop chat client for line-based Subnet BBS servers
//!
//! The client connects to a chat server over plain TCP, identifies itself
//! with `/nick <name>`, sends what the user types and renders every line the
//! server sends, translating ANSI color escapes into colored text.
//!
//! ## Module Organization
//!
//! - [`ansi`] - Color table and the escape-to-colored-runs parser
//! - [`client`] - Connection lifecycle, background read loop, sending
//! - [`display`] - The [`DisplaySurface`] boundary and the transcript model
//! - [`config`] - Optional configuration file with connect-dialog defaults
//! - [`ui`] - egui rendering for the chat window
//! - [`mod@error`] - Error types and Result aliases
//!
//! ## Quick Start
//!
//! ```no_run
//! use subnet_client::{ChatClient, ColorRunParser, ConnectRequest};
//!
//! let mut client = ChatClient::new(ColorRunParser::default());
//! client.connect(ConnectRequest::new("127.0.0.1", 2323, "guest"));
//! // Call `client.pump(&mut surface)` from the UI loop to receive lines.
//! ```
//!
//! ## Architecture
//!
//! - **Main Thread:** Runs the `egui` UI loop and owns the client
//! - **Connection Thread:** One per connection; connects, then blocks on reads
//!
//! Parsed lines travel from the connection thread to the UI thread over an
//! unbounded `tokio::sync::mpsc` channel, preserving wire order.

#[macro_use]
extern crate tracing;

pub mod ansi;
pub mod client;
pub mod config;
pub mod display;
pub mod error;
pub mod ui;

// Re-exports for core functionality
pub use ansi::{parse, Color, ColorRunParser, ColorTable, TextRun};
pub use client::{ChatClient, ConnectRequest, ConnectionState, SendOutcome};
pub use config::{Config, RuntimeConfig};
pub use display::{DisplaySurface, Transcript, TranscriptLine};
pub use error::{Error, Result};

/// The current version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// The application name from Cargo.toml
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// The application description from Cargo.toml
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Build a chat client configured from `config`
///
/// The client gets the standard color table and the configured connect
/// timeout.
pub fn create_client(config: &Config) -> ChatClient {
    let parser = ColorRunParser::new(std::sync::Arc::new(ColorTable::standard()));
    ChatClient::new(parser).with_connect_timeout(config.connection.connect_timeout())
}

/// Human-readable advice for an error shown at startup
pub fn handle_startup_error(error: &Error) -> String {
    match error {
        Error::ConfigLoadFailed { path, reason } => format!(
            "Configuration Error: Failed to load config from '{}': {}\n\nTry:\n• Check file permissions\n• Remove the file to use defaults",
            path.display(),
            reason
        ),
        Error::ConfigParseFailed { format, reason } => format!(
            "Configuration Error: Failed to parse {} config: {}\n\nTry:\n• Check configuration file syntax",
            format, reason
        ),
        Error::ConfigValidation(err) => format!(
            "Configuration Error: {}\n\nTry:\n• Check configuration value",
            err
        ),
        _ => format!("Unexpected Error: {}", error),
    }
}
