//! Window-side display surface
//!
//! Plain state behind the chat window: the transcript, the input line, the
//! status bar text and a pending error notice. The egui code reads and
//! edits these fields each frame; the chat client only sees the
//! [`DisplaySurface`] trait.

use crate::ansi::TextRun;
use crate::client::ConnectionState;
use crate::display::{DisplaySurface, Transcript};

use super::dialogs::ErrorDialog;

#[derive(Debug, Clone)]
pub struct ChatSurface {
    pub transcript: Transcript,
    pub input: String,
    pub status: String,
    pub error: Option<ErrorDialog>,
}

impl ChatSurface {
    pub fn new(scrollback_lines: usize) -> Self {
        Self {
            transcript: Transcript::new(scrollback_lines),
            input: String::new(),
            status: ConnectionState::Disconnected.label().to_string(),
            error: None,
        }
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }
}

impl DisplaySurface for ChatSurface {
    fn render(&mut self, runs: Vec<TextRun>) {
        self.transcript.push(runs);
    }

    fn input_text(&self) -> String {
        self.input.clone()
    }

    fn clear_input(&mut self) {
        self.input.clear();
    }

    fn notify_error(&mut self, title: &str, message: &str) {
        self.error = Some(ErrorDialog::new(title, message));
    }

    fn set_status(&mut self, state: ConnectionState, peer: Option<&str>) {
        self.status = match (state, peer) {
            (ConnectionState::Connected, Some(peer)) => format!("Connected to {}", peer),
            (ConnectionState::Connecting, Some(peer)) => format!("Connecting to {}…", peer),
            // A finished session reads the same as never having connected
            (ConnectionState::Closed, _) => ConnectionState::Disconnected.label().to_string(),
            (state, _) => state.label().to_string(),
        };
    }
}
