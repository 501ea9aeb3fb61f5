//! Transcript rendering
//!
//! Turns transcript lines into egui layout jobs, one text section per
//! colored run, and shows them in a scroll area pinned to the newest line.

use eframe::egui;
use eframe::egui::epaint::text::{LayoutJob, TextFormat};

use super::colors::{ToEguiColor, UiColors};
use crate::display::{Transcript, TranscriptLine};

/// Stateless renderer for a [`Transcript`]
#[derive(Debug, Clone)]
pub struct TranscriptView {
    font_size: f32,
    show_timestamps: bool,
    colors: UiColors,
}

impl TranscriptView {
    pub fn new(font_size: f32, show_timestamps: bool) -> Self {
        Self {
            font_size,
            show_timestamps,
            colors: UiColors::default(),
        }
    }

    pub fn set_show_timestamps(&mut self, show: bool) {
        self.show_timestamps = show;
    }

    pub fn show_timestamps(&self) -> bool {
        self.show_timestamps
    }

    fn font(&self) -> egui::FontId {
        egui::FontId::monospace(self.font_size)
    }

    /// Build the layout for one line
    pub fn layout_line(&self, line: &TranscriptLine) -> LayoutJob {
        let mut job = LayoutJob::default();

        if self.show_timestamps {
            let stamp = line.received_at.format("[%H:%M:%S] ").to_string();
            job.append(
                &stamp,
                0.0,
                TextFormat {
                    font_id: self.font(),
                    color: self.colors.timestamp,
                    ..Default::default()
                },
            );
        }

        for run in &line.runs {
            job.append(
                &run.text,
                0.0,
                TextFormat {
                    font_id: self.font(),
                    color: run.color.to_egui(),
                    ..Default::default()
                },
            );
        }

        // Blank server lines still take up a row
        if job.text.is_empty() {
            job.append(
                " ",
                0.0,
                TextFormat {
                    font_id: self.font(),
                    ..Default::default()
                },
            );
        }

        job
    }

    /// Show the whole transcript, following new output
    pub fn show(&self, ui: &mut egui::Ui, transcript: &Transcript) {
        egui::ScrollArea::vertical()
            .auto_shrink([false; 2])
            .stick_to_bottom(true)
            .show(ui, |ui| {
                let width = ui.available_width();
                for line in transcript.lines() {
                    let mut job = self.layout_line(line);
                    job.wrap.max_width = width;
                    ui.label(job);
                }
            });
    }
}

impl Default for TranscriptView {
    fn default() -> Self {
        Self::new(14.0, false)
    }
}
