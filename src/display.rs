//! Display surface boundary
//!
//! The connection loop never touches widgets directly. It talks to a
//! [`DisplaySurface`], which the egui window implements for real use and
//! tests implement with plain vectors.

use chrono::{DateTime, Local};
use std::collections::VecDeque;

use crate::ansi::TextRun;
use crate::client::ConnectionState;

/// Rendering and input collaborator driven by the chat client
pub trait DisplaySurface {
    /// Append one line of colored runs to the end of the transcript
    fn render(&mut self, runs: Vec<TextRun>);

    /// Current contents of the single-line input
    fn input_text(&self) -> String;

    /// Empty the single-line input
    fn clear_input(&mut self);

    /// Show a blocking notice (connect failures, sends without a connection)
    fn notify_error(&mut self, title: &str, message: &str);

    /// Connection status changed
    fn set_status(&mut self, _state: ConnectionState, _peer: Option<&str>) {}
}

/// One rendered transcript line
#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptLine {
    pub runs: Vec<TextRun>,
    pub received_at: DateTime<Local>,
}

impl TranscriptLine {
    pub fn new(runs: Vec<TextRun>) -> Self {
        Self {
            runs,
            received_at: Local::now(),
        }
    }

    /// Text of the line without color information
    pub fn plain_text(&self) -> String {
        self.runs.iter().map(|run| run.text.as_str()).collect()
    }
}

/// Bounded, append-only scrollback
#[derive(Debug, Clone)]
pub struct Transcript {
    lines: VecDeque<TranscriptLine>,
    max_lines: usize,
}

impl Transcript {
    pub fn new(max_lines: usize) -> Self {
        Self {
            lines: VecDeque::new(),
            max_lines: max_lines.max(1),
        }
    }

    /// Append a line, dropping the oldest once the limit is reached
    pub fn push(&mut self, runs: Vec<TextRun>) {
        if self.lines.len() >= self.max_lines {
            self.lines.pop_front();
        }
        self.lines.push_back(TranscriptLine::new(runs));
    }

    pub fn lines(&self) -> impl Iterator<Item = &TranscriptLine> {
        self.lines.iter()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn max_lines(&self) -> usize {
        self.max_lines
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }
}

impl Default for Transcript {
    fn default() -> Self {
        Self::new(5000)
    }
}
