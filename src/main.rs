mod agg;
mod app;
mod color;
mod config;
mod data;
mod service;
mod state;
mod ui;

use app::LandLensApp;
use config::AppConfig;
use data::catalog::ClassCatalog;
use data::region::RegionBoundary;
use eframe::egui;
use service::RasterClient;
use state::AppState;

fn main() -> eframe::Result {
    env_logger::init();

    let config = AppConfig::load().unwrap_or_else(|e| {
        log::error!("failed to load config: {e:#}");
        AppConfig::default()
    });

    let catalog = match &config.catalog_path {
        Some(path) => ClassCatalog::from_path(path).unwrap_or_else(|e| {
            log::error!("failed to load catalog: {e:#}");
            ClassCatalog::builtin()
        }),
        None => ClassCatalog::builtin(),
    };

    let region = match &config.region_path {
        Some(path) => RegionBoundary::from_path(path).unwrap_or_else(|e| {
            log::error!("failed to load region: {e:#}");
            RegionBoundary::builtin()
        }),
        None => RegionBoundary::builtin(),
    };

    let client = match RasterClient::new(&config.service) {
        Ok(client) => client,
        Err(e) => {
            log::error!("cannot create raster service client: {e}");
            std::process::exit(1);
        }
    };

    log::info!(
        "starting with {} classes, region '{}', service {}",
        catalog.len(),
        region.name(),
        config.service.base_url
    );

    let state = AppState::new(config, catalog, region, Box::new(client));

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "LandLens – Land Cover Explorer",
        options,
        Box::new(move |_cc| Ok(Box::new(LandLensApp::new(state)))),
    )
}
