mod app;
mod color;
mod config;
mod state;
mod ui;

use app::SummaryLabApp;
use clap::Parser;
use config::LaunchConfig;
use eframe::egui;
use state::AppState;

fn main() -> eframe::Result {
    env_logger::init();

    let config = LaunchConfig::parse();
    let state = config.initial_state().unwrap_or_else(|e| {
        log::error!("Failed to prepare start-up dataset: {e:#}");
        AppState {
            status_message: Some(format!("Error: {e:#}")),
            ..AppState::default()
        }
    });

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Summary Lab – Data Analysis Fundamentals",
        options,
        Box::new(|_cc| Ok(Box::new(SummaryLabApp::new(state)))),
    )
}
