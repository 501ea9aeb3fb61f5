//! Color utilities for UI rendering
//!
//! Converts parser colors to egui colors and holds the fixed window palette.

use crate::ansi::Color;
use eframe::egui;

/// Extension trait to convert a parser Color to egui::Color32
pub trait ToEguiColor {
    fn to_egui(&self) -> egui::Color32;
}

impl ToEguiColor for Color {
    fn to_egui(&self) -> egui::Color32 {
        egui::Color32::from_rgb(self.r, self.g, self.b)
    }
}

/// Window palette (black terminal look with green accents)
#[derive(Debug, Clone)]
pub struct UiColors {
    pub background: egui::Color32,
    pub title: egui::Color32,
    pub status: egui::Color32,
    pub input_text: egui::Color32,
    pub timestamp: egui::Color32,
}

impl Default for UiColors {
    fn default() -> Self {
        Self {
            background: egui::Color32::BLACK,
            title: egui::Color32::GREEN,
            status: egui::Color32::LIGHT_GRAY,
            input_text: egui::Color32::GREEN,
            timestamp: egui::Color32::GRAY,
        }
    }
}
