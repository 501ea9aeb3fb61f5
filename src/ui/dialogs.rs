//! Connect and error dialogs

use eframe::egui;

use crate::client::ConnectRequest;
use crate::config::ConnectionConfig;
use crate::error::Result;

/// What the user did with the connect dialog this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogAction {
    Connect,
    Cancel,
}

/// Host / port / nickname form
///
/// Field values survive between openings, so the last nickname used is
/// offered again.
#[derive(Debug, Clone)]
pub struct ConnectDialog {
    open: bool,
    pub host: String,
    pub port: String,
    pub nickname: String,
}

impl ConnectDialog {
    pub fn new(defaults: &ConnectionConfig) -> Self {
        let request = defaults.default_request();
        Self {
            open: false,
            host: request.host,
            port: request.port.to_string(),
            nickname: request.nickname,
        }
    }

    pub fn open(&mut self) {
        self.open = true;
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Validate the form into a request
    pub fn request(&self) -> Result<ConnectRequest> {
        ConnectRequest::from_form(&self.host, &self.port, &self.nickname)
    }

    pub fn show(&mut self, ctx: &egui::Context) -> Option<DialogAction> {
        if !self.open {
            return None;
        }

        let mut action = None;
        egui::Window::new("Connect to Subnet")
            .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
            .resizable(false)
            .collapsible(false)
            .show(ctx, |ui| {
                egui::Grid::new("connect_form")
                    .num_columns(2)
                    .spacing([8.0, 6.0])
                    .show(ui, |ui| {
                        ui.label("Host:");
                        ui.text_edit_singleline(&mut self.host);
                        ui.end_row();

                        ui.label("Port:");
                        ui.text_edit_singleline(&mut self.port);
                        ui.end_row();

                        ui.label("Nickname:");
                        let nick = ui.text_edit_singleline(&mut self.nickname);
                        if nick.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                            action = Some(DialogAction::Connect);
                        }
                        ui.end_row();
                    });

                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    if ui.button("  OK  ").clicked() {
                        action = Some(DialogAction::Connect);
                    }
                    if ui.button("Cancel").clicked() {
                        action = Some(DialogAction::Cancel);
                    }
                });
            });

        if action.is_some() {
            self.open = false;
        }
        action
    }
}

/// Modal-style notice with a single OK button
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorDialog {
    pub title: String,
    pub message: String,
}

impl ErrorDialog {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
        }
    }

    /// Returns true once the user dismissed the dialog
    pub fn show(&self, ctx: &egui::Context) -> bool {
        let mut dismissed = false;
        egui::Window::new(&self.title)
            .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
            .resizable(false)
            .collapsible(false)
            .show(ctx, |ui| {
                ui.set_min_width(320.0);
                ui.horizontal(|ui| {
                    ui.label(
                        egui::RichText::new("⚠")
                            .size(28.0)
                            .color(egui::Color32::from_rgb(255, 165, 0)),
                    );
                    ui.label(egui::RichText::new(&self.message).size(14.0));
                });

                ui.add_space(10.0);
                ui.separator();
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("  OK  ").clicked() {
                        dismissed = true;
                    }
                });
            });
        dismissed
    }
}
