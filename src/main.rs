mod app;
mod chart;
mod color;
mod config;
mod data;
mod error;
mod map;
mod state;
mod ui;

use app::HappinessApp;
use config::AppConfig;
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    let app_config = AppConfig::from_env();
    log::info!("Data file: {}", app_config.data_path.display());

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(config::WINDOW_SIZE)
            .with_min_inner_size(config::MIN_WINDOW_SIZE),
        ..Default::default()
    };

    eframe::run_native(
        "Happiness Index Explorer",
        options,
        Box::new(move |_cc| Ok(Box::new(HappinessApp::new(&app_config)))),
    )
}
