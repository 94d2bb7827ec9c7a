//! Core ViewerApp struct definition and initialization

use eframe::egui;

use crate::config::{save_settings, Settings};
use crate::route::Navigator;
use crate::snapshot::load_snapshot;
use crate::store::EntityStore;
use crate::ui::theme::{apply_app_style, ViewerTheme};
use crate::ui::timeline::TimelineView;

pub struct ViewerApp {
    // Entity data shown by every view
    pub store: EntityStore,

    pub settings: Settings,
    pub navigator: Navigator,
    pub timeline: TimelineView,
    pub theme: ViewerTheme,

    // UI visibility toggles
    pub show_channel_list: bool,

    /// Last status line (snapshot reloads, errors).
    pub status: Option<String>,
}

impl ViewerApp {
    pub fn new(cc: &eframe::CreationContext<'_>, settings: Settings, store: EntityStore) -> Self {
        let theme = ViewerTheme::from_name(&settings.theme);
        apply_app_style(&cc.egui_ctx, &theme);
        Self::with_store(settings, store)
    }

    /// Build the app without a window, used by `new` and by tests.
    pub fn with_store(settings: Settings, store: EntityStore) -> Self {
        let navigator = Navigator::new(&settings.start_path);
        let timeline = TimelineView::new(navigator.path_signal());
        Self {
            store,
            theme: ViewerTheme::from_name(&settings.theme),
            settings,
            navigator,
            timeline,
            show_channel_list: true,
            status: None,
        }
    }

    /// Re-read the snapshot and replace the store contents.
    pub fn reload_snapshot(&mut self) {
        let Some(path) = self.settings.resolved_snapshot_path() else {
            self.status = Some("No snapshot location available".into());
            return;
        };
        match load_snapshot(&path) {
            Ok(snapshot) => {
                self.store.clear();
                self.store.apply_snapshot(snapshot);
                self.status = Some(format!("Reloaded {}", path.display()));
            }
            Err(e) => {
                tracing::warn!(error = %e, "snapshot reload failed");
                self.status = Some(e.to_string());
            }
        }
    }

    pub fn toggle_theme(&mut self, ctx: &egui::Context) {
        self.settings.theme = if self.settings.theme == "light" { "dark" } else { "light" }.to_string();
        self.theme = ViewerTheme::from_name(&self.settings.theme);
        ctx.set_visuals(self.theme.visuals());
        self.save_settings();
    }

    pub(super) fn save_settings(&self) {
        if let Err(e) = save_settings(&self.settings) {
            tracing::warn!(error = %e, "failed to save settings");
        }
    }
}
