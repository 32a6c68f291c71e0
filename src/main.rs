mod app;
mod auth;
mod config;
mod data;
mod state;
mod ui;

use anyhow::anyhow;
use app::MarketViewerApp;
use auth::registry::UserRegistry;
use config::AppConfig;
use eframe::egui;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = AppConfig::from_process();
    log::info!(
        "data: {}, users: {}",
        config.data_path.display(),
        config.registry_path.display()
    );

    // A registry that cannot be created still lets the window open; every
    // login is then rejected.
    let registry = UserRegistry::open(&config.registry_path).unwrap_or_else(|e| {
        log::error!("{e}");
        UserRegistry::at(&config.registry_path)
    });

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Subsidiary Markets Analysis",
        options,
        Box::new(move |_cc| Ok(Box::new(MarketViewerApp::new(config, registry)))),
    )
    .map_err(|e| anyhow!("failed to start the viewer: {e}"))
}
