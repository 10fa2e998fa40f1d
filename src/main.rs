mod app;
mod color;
mod config;
mod data;
mod pipeline;
mod present;
mod state;
mod ui;

use std::process::ExitCode;

use app::SalaryPandaApp;
use clap::Parser;
use config::Args;
use data::loader::load_cached;
use eframe::egui;
use state::AppState;

fn main() -> ExitCode {
    env_logger::init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e:#}");
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> anyhow::Result<()> {
    let config = Args::parse().into_config()?;

    // A dataset that cannot be loaded at startup is fatal; there is no window
    // to show without one.
    let table = load_cached(&config.data_path)?;
    let state = AppState::new(config, table);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([800.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Dashboard de Salários na Área de Dados",
        options,
        Box::new(|_cc| Ok(Box::new(SalaryPandaApp::new(state)))),
    )
    .map_err(|e| anyhow::anyhow!("UI error: {e}"))
}
