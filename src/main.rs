mod analytics;
mod app;
mod color;
mod config;
mod data;
mod export;
mod state;
mod ui;

use app::SalesPulseApp;
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    let config = match config::load_config() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Invalid configuration: {e:#}");
            std::process::exit(1);
        }
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([700.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Sales Pulse – Sales Analytics",
        options,
        Box::new(|_cc| Ok(Box::new(SalesPulseApp::new(config)))),
    )
}
