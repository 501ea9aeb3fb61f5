//! Main application window
//!
//! `SubnetApp` implements `eframe::App`. Each frame it drains the chat
//! client's queued socket events into the surface, then draws:
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │ File View   SUBNET CLIENT    status     │
//! ├─────────────────────────────────────────┤
//! │ Transcript (read-only, sticks to bottom)│
//! ├─────────────────────────────────────────┤
//! │ Send  Input line                        │
//! └─────────────────────────────────────────┘
//! ```

use eframe::egui;
use std::time::Duration;
use tracing::{debug, info};

use subnet_client::config::RuntimeConfig;
use subnet_client::ui::{ChatSurface, ConnectDialog, DialogAction, TranscriptView, UiColors};
use subnet_client::{ChatClient, ConnectionState, DisplaySurface};

/// Idle repaint interval; socket threads request repaints on their own
const IDLE_REPAINT: Duration = Duration::from_millis(250);

pub struct SubnetApp {
    client: ChatClient,
    surface: ChatSurface,
    connect_dialog: ConnectDialog,
    transcript_view: TranscriptView,
    colors: UiColors,
    focus_input: bool,
}

impl SubnetApp {
    pub fn new(cc: &eframe::CreationContext<'_>, runtime_config: RuntimeConfig) -> Self {
        let config = runtime_config.config();

        let mut client = subnet_client::create_client(config);
        let ctx = cc.egui_ctx.clone();
        client.set_repaint_hook(move || ctx.request_repaint());

        let mut connect_dialog = ConnectDialog::new(&config.connection);
        connect_dialog.open();

        info!("Chat window ready");
        Self {
            client,
            surface: ChatSurface::new(config.ui.scrollback_lines),
            connect_dialog,
            transcript_view: TranscriptView::new(config.ui.font_size, config.ui.show_timestamps),
            colors: UiColors::default(),
            focus_input: false,
        }
    }

    fn start_connect(&mut self) {
        match self.connect_dialog.request() {
            Ok(request) => {
                self.client.connect(request);
                self.surface.set_status(self.client.state(), self.client.peer());
                self.focus_input = true;
            }
            Err(e) => self.surface.notify_error(e.title(), &e.to_string()),
        }
    }

    fn render_header(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.menu_button("File", |ui| {
                if ui.button("Connect…").clicked() {
                    self.connect_dialog.open();
                }
                let connected = self.client.state() == ConnectionState::Connected;
                if ui.add_enabled(connected, egui::Button::new("Disconnect")).clicked() {
                    self.client.disconnect();
                    self.surface.set_status(self.client.state(), self.client.peer());
                }
                ui.separator();
                if ui.button("Quit").clicked() {
                    ui.ctx().send_viewport_cmd(egui::ViewportCommand::Close);
                }
            });

            ui.menu_button("View", |ui| {
                let mut show = self.transcript_view.show_timestamps();
                if ui.checkbox(&mut show, "Show timestamps").changed() {
                    self.transcript_view.set_show_timestamps(show);
                }
                if ui.button("Clear transcript").clicked() {
                    self.surface.transcript.clear();
                }
            });

            ui.add_space(12.0);
            ui.label(
                egui::RichText::new(" SUBNET CLIENT ")
                    .monospace()
                    .strong()
                    .color(self.colors.title),
            );

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(
                    egui::RichText::new(&self.surface.status)
                        .monospace()
                        .color(self.colors.status),
                );
            });
        });
    }

    fn render_input(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            let send_clicked = ui.button("Send").clicked();

            let response = ui.add(
                egui::TextEdit::singleline(&mut self.surface.input)
                    .desired_width(f32::INFINITY)
                    .font(egui::TextStyle::Monospace)
                    .text_color(self.colors.input_text)
                    .hint_text("Type a message and press Enter"),
            );

            if self.focus_input {
                response.request_focus();
                self.focus_input = false;
            }

            let enter_pressed =
                response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
            if enter_pressed || send_clicked {
                if let Err(e) = self.client.submit_input(&mut self.surface) {
                    debug!("Send rejected: {}", e);
                }
                response.request_focus();
            }
        });
    }
}

impl eframe::App for SubnetApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.client.pump(&mut self.surface);

        if let Some(action) = self.connect_dialog.show(ctx) {
            if action == DialogAction::Connect {
                self.start_connect();
            }
        }

        if let Some(error) = &self.surface.error {
            if error.show(ctx) {
                self.surface.dismiss_error();
            }
        }

        let frame = egui::Frame::central_panel(&ctx.style()).fill(self.colors.background);
        egui::CentralPanel::default().frame(frame).show(ctx, |ui| {
            self.render_header(ui);
            ui.separator();

            // Input pinned at the bottom, transcript fills the rest
            ui.with_layout(egui::Layout::bottom_up(egui::Align::LEFT), |ui| {
                self.render_input(ui);
                ui.separator();
                ui.with_layout(egui::Layout::top_down(egui::Align::LEFT), |ui| {
                    self.transcript_view.show(ui, &self.surface.transcript);
                });
            });
        });

        ctx.request_repaint_after(IDLE_REPAINT);
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        info!("Subnet client shutting down");
        self.client.disconnect();
    }
}
