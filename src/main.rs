mod app;
mod color;
mod config;
mod data;
mod error;
mod state;
mod ui;

use app::DataSweeperApp;
use config::SweeperConfig;
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    let config = SweeperConfig::discover();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(config.window_size)
            .with_min_inner_size([600.0, 400.0])
            .with_drag_and_drop(true),
        ..Default::default()
    };

    eframe::run_native(
        "💿 Data Sweeper",
        options,
        Box::new(|_cc| Ok(Box::new(DataSweeperApp::new(config)))),
    )
}
