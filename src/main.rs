//! traq-view - a read-only traQ timeline viewer built with egui
//!
//! Everything runs on the egui UI thread: the entity store, signals and
//! height observers are plain single-threaded state.

use eframe::egui;

use traq_view::app::ViewerApp;
use traq_view::config::load_settings;
use traq_view::logging;
use traq_view::snapshot::load_snapshot;
use traq_view::store::EntityStore;

fn main() -> eframe::Result<()> {
    let settings = load_settings();
    logging::init(&settings.log_filter);

    let mut store = EntityStore::new();
    match settings.resolved_snapshot_path() {
        Some(path) if path.exists() => match load_snapshot(&path) {
            Ok(snapshot) => store.apply_snapshot(snapshot),
            Err(e) => tracing::error!(error = %e, "starting with an empty store"),
        },
        Some(path) => tracing::info!(path = %path.display(), "no snapshot found, starting empty"),
        None => tracing::warn!("no data directory, starting empty"),
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1000.0, 700.0])
            .with_min_inner_size([480.0, 320.0]),
        ..Default::default()
    };

    eframe::run_native(
        "traq-view",
        options,
        Box::new(|cc| Ok(Box::new(ViewerApp::new(cc, settings, store)))),
    )
}
