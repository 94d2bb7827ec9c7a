//! Main update loop and global shortcuts

use eframe::egui;

use super::ViewerApp;
use crate::route::Route;
use crate::ui;

impl eframe::App for ViewerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        ctx.input(|i| {
            // Ctrl+B: Toggle channel list
            if i.modifiers.ctrl && i.key_pressed(egui::Key::B) {
                self.show_channel_list = !self.show_channel_list;
            }
            // Alt+Home: Back to the home view
            if i.modifiers.alt && i.key_pressed(egui::Key::Home) {
                self.navigator.go(Route::Home);
            }
        });
        if ctx.input(|i| i.key_pressed(egui::Key::F5)) {
            self.reload_snapshot();
        }

        self.timeline.show_route(self.navigator.current(), &self.store);

        self.render_menu_bar(ctx);
        if self.show_channel_list {
            ui::sidebar::render_channel_list(
                ctx,
                &self.store,
                &self.navigator,
                self.timeline.channel(),
                &self.theme,
            );
        }
        self.render_status_bar(ctx);

        egui::CentralPanel::default()
            .frame(egui::Frame::new().fill(self.theme.surface[2]).inner_margin(egui::Margin::same(8)))
            .show(ctx, |ui| {
                self.timeline.render(ui, &self.store, &self.theme);
            });
    }
}

impl ViewerApp {
    fn render_menu_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("menu_bar")
            .frame(
                egui::Frame::new()
                    .fill(self.theme.surface[1])
                    .inner_margin(egui::Margin::symmetric(8, 4))
                    .stroke(egui::Stroke::new(1.0, self.theme.border_medium)),
            )
            .show(ctx, |ui| {
                egui::menu::bar(ui, |ui| {
                    ui.menu_button("View", |ui| {
                        if ui.button("Home").clicked() {
                            self.navigator.go(Route::Home);
                            ui.close_menu();
                        }
                        if ui.checkbox(&mut self.show_channel_list, "Channel list").clicked() {
                            ui.close_menu();
                        }
                        if ui.button("Toggle theme").clicked() {
                            self.toggle_theme(ctx);
                            ui.close_menu();
                        }
                    });
                    ui.menu_button("Data", |ui| {
                        if ui.button("Reload snapshot (F5)").clicked() {
                            self.reload_snapshot();
                            ui.close_menu();
                        }
                    });
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.label(
                            egui::RichText::new(self.navigator.current_path())
                                .monospace()
                                .color(self.theme.text_muted),
                        );
                    });
                });
            });
    }

    fn render_status_bar(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar")
            .frame(egui::Frame::new().fill(self.theme.surface[1]).inner_margin(egui::Margin::symmetric(8, 2)))
            .show(ctx, |ui| {
                let text = self
                    .status
                    .clone()
                    .unwrap_or_else(|| self.store.summary());
                ui.label(egui::RichText::new(text).small().color(self.theme.text_muted));
            });
    }
}
