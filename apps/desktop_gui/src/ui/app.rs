use std::time::Duration;

use crossbeam_channel::{Receiver, Sender};
use eframe::egui;
use shared::domain::{FormField, FormInput, FORM_FIELDS};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::UiEvent;
use crate::controller::orchestration::dispatch_backend_command;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum VisiblePanel {
    Form,
    Result,
}

pub struct EstimatorApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    panel: VisiblePanel,
    busy: bool,
    animating: bool,
    field_buffers: Vec<(FormField, String)>,
    /// Final rendered price, once the backend has answered.
    settled: Option<String>,
    /// Price string currently on screen while counting up.
    displayed: String,
    status: Option<String>,
    info: Option<String>,
}

impl EstimatorApp {
    pub fn new(cmd_tx: Sender<BackendCommand>, ui_rx: Receiver<UiEvent>) -> Self {
        Self {
            cmd_tx,
            ui_rx,
            panel: VisiblePanel::Form,
            busy: false,
            animating: false,
            field_buffers: FORM_FIELDS
                .iter()
                .map(|field| (*field, field.default.to_string()))
                .collect(),
            settled: None,
            displayed: String::new(),
            status: None,
            info: None,
        }
    }

    fn drain_backend_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            match event {
                UiEvent::Info(message) => self.info = Some(message),
                UiEvent::PredictionReady { rendered } => {
                    self.busy = false;
                    self.panel = VisiblePanel::Result;
                    self.animating = true;
                    self.displayed = "0".to_string();
                    self.settled = Some(rendered);
                }
                UiEvent::PriceFrame { rendered } => {
                    // Frames racing a reset can still be queued; they
                    // belong to an abandoned result.
                    if self.panel != VisiblePanel::Result {
                        continue;
                    }
                    if self.settled.as_deref() == Some(rendered.as_str()) {
                        self.animating = false;
                    }
                    self.displayed = rendered;
                }
                UiEvent::Error(err) => {
                    tracing::warn!(
                        category = ?err.category(),
                        context = ?err.context(),
                        "backend error: {}",
                        err.message()
                    );
                    self.busy = false;
                    self.panel = VisiblePanel::Form;
                    self.status = Some(err.message().to_string());
                }
            }
        }
    }

    fn submit(&mut self) {
        self.status = None;
        // The startup footer has served its purpose once the user acts.
        self.info = None;
        let mut fields = FormInput::new();
        for (field, buffer) in &self.field_buffers {
            fields.set(field.name, buffer.clone());
        }
        self.busy = true;
        dispatch_backend_command(
            &self.cmd_tx,
            BackendCommand::Predict { fields },
            &mut self.status,
        );
        if self.status.is_some() {
            // Command never left the UI thread; do not stay busy.
            self.busy = false;
        }
    }

    fn reset(&mut self) {
        self.panel = VisiblePanel::Form;
        self.info = None;
        self.settled = None;
        self.displayed.clear();
        self.animating = false;
        for (field, buffer) in &mut self.field_buffers {
            *buffer = field.default.to_string();
        }
        dispatch_backend_command(&self.cmd_tx, BackendCommand::Reset, &mut self.status);
    }

    fn show_form(&mut self, ui: &mut egui::Ui) {
        egui::Grid::new("feature_form")
            .num_columns(2)
            .spacing([12.0, 6.0])
            .show(ui, |ui| {
                for (field, buffer) in &mut self.field_buffers {
                    ui.label(field.label);
                    ui.text_edit_singleline(buffer);
                    ui.end_row();
                }
            });
        ui.add_space(10.0);

        ui.horizontal(|ui| {
            let label = if self.busy {
                "Estimating..."
            } else {
                "Estimate price"
            };
            let clicked = ui.add_enabled(!self.busy, egui::Button::new(label)).clicked();
            if self.busy {
                ui.spinner();
            }
            if clicked {
                self.submit();
            }
        });

        if let Some(status) = &self.status {
            ui.add_space(6.0);
            ui.colored_label(egui::Color32::LIGHT_RED, status);
        }
    }

    fn show_result(&mut self, ui: &mut egui::Ui) {
        ui.label("Estimated sale price");
        ui.heading(
            egui::RichText::new(format!("${}", self.displayed))
                .size(40.0)
                .strong(),
        );
        ui.add_space(14.0);
        if ui.button("New estimate").clicked() {
            self.reset();
        }
    }
}

impl eframe::App for EstimatorApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.drain_backend_events();

        if self.busy || self.animating {
            ctx.request_repaint_after(Duration::from_millis(16));
        } else {
            ctx.request_repaint_after(Duration::from_millis(100));
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("House Price Estimator");
            ui.add_space(10.0);
            match self.panel {
                VisiblePanel::Form => self.show_form(ui),
                VisiblePanel::Result => self.show_result(ui),
            }
            if let Some(info) = &self.info {
                ui.add_space(12.0);
                ui.label(egui::RichText::new(info).weak().small());
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::bounded;

    fn test_app() -> (
        EstimatorApp,
        Receiver<BackendCommand>,
        Sender<UiEvent>,
    ) {
        let (cmd_tx, cmd_rx) = bounded(8);
        let (ui_tx, ui_rx) = bounded(64);
        (EstimatorApp::new(cmd_tx, ui_rx), cmd_rx, ui_tx)
    }

    #[test]
    fn startup_footer_clears_once_the_user_acts() {
        let (mut app, _cmd_rx, ui_tx) = test_app();
        ui_tx
            .send(UiEvent::Info("Backend worker ready".to_string()))
            .expect("send");
        app.drain_backend_events();
        assert!(app.info.is_some());

        app.submit();
        assert_eq!(app.info, None);
        assert!(app.busy);
    }

    #[test]
    fn price_frames_are_ignored_while_the_form_is_showing() {
        let (mut app, _cmd_rx, ui_tx) = test_app();
        ui_tx
            .send(UiEvent::PriceFrame {
                rendered: "42,000".to_string(),
            })
            .expect("send");
        app.drain_backend_events();
        assert_eq!(app.panel, VisiblePanel::Form);
        assert_eq!(app.displayed, "");
        assert!(!app.animating);
    }
}
