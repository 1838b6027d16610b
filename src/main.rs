mod app;
mod color;
mod config;
mod data;
mod provider;
mod state;
mod ui;

use app::ExplorerApp;
use config::Config;
use eframe::egui;
use provider::{DatasetProvider, KaggleFetcher};
use state::AppState;

fn main() -> eframe::Result {
    env_logger::init();

    let config = Config::load();
    let provider = DatasetProvider::new(
        config.cache_path(),
        config.dataset.clone(),
        KaggleFetcher::from_config(&config),
    );

    // The one blocking step: cache read or download, before the window opens.
    let mut state = AppState::default();
    match provider.load() {
        Ok(loaded) => {
            log::info!(
                "Loaded {} exoplanets with columns {:?}",
                loaded.dataset.len(),
                loaded.dataset.columns.iter().map(|c| &c.name).collect::<Vec<_>>()
            );
            state.set_loaded(loaded);
        }
        Err(e) => {
            log::error!("Failed to load dataset (cache {}): {e}", provider.cache_path().display());
            state.set_load_error(e.to_string());
        }
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([720.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Exoplanet Explorer",
        options,
        Box::new(|_cc| Ok(Box::new(ExplorerApp::new(state)))),
    )
}
