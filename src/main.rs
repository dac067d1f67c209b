mod app;
mod color;
mod state;
mod ui;

use std::path::PathBuf;

use app::DashboardApp;
use eframe::egui;
use hdb_resale_dashboard::config::DashboardConfig;

fn main() -> eframe::Result {
    env_logger::init();

    // Usage: hdb-resale-dashboard [CONFIG.json]
    let explicit = std::env::args_os().nth(1).map(PathBuf::from);
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let config = match DashboardConfig::resolve(explicit.as_deref(), &cwd) {
        Ok(config) => config,
        Err(e) => {
            log::error!("{e:#}");
            eprintln!("error: {e:#}");
            std::process::exit(2);
        }
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 900.0])
            .with_min_inner_size([720.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "HDB Resale Dashboard",
        options,
        Box::new(|_cc| Ok(Box::new(DashboardApp::new(config)))),
    )
}
