mod backend_bridge;
mod config;
mod controller;
mod ui;

use crossbeam_channel::bounded;
use eframe::egui;

use backend_bridge::commands::BackendCommand;
use controller::events::UiEvent;
use ui::app::EstimatorApp;

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let settings = config::load_settings();
    tracing::info!(server_url = %settings.server_url, "starting house price estimator");

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(64);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(2048);
    backend_bridge::runtime::launch(settings.server_url, cmd_rx, ui_tx);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("House Price Estimator")
            .with_inner_size([540.0, 580.0])
            .with_min_inner_size([440.0, 480.0]),
        ..Default::default()
    };
    eframe::run_native(
        "House Price Estimator",
        options,
        Box::new(|_cc| Ok(Box::new(EstimatorApp::new(cmd_tx, ui_rx)))),
    )
}
