//! Channel list panel.

use eframe::egui::{self, Stroke};

use crate::ids::ChannelId;
use crate::route::{Navigator, Route};
use crate::store::EntityStore;
use crate::ui::theme::ViewerTheme;

/// Parent chains deeper than this are treated as broken.
const MAX_CHANNEL_DEPTH: usize = 32;

/// Full `parent/child` path of a channel. Missing parents end the walk, the
/// store does not guarantee they exist.
pub fn channel_path(store: &EntityStore, id: ChannelId) -> Option<String> {
    let mut names = Vec::new();
    let mut current = store.channels.get(&id)?;
    loop {
        names.push(current.name.as_str());
        let Some(parent_id) = current.parent_id else { break };
        let Some(parent) = store.channels.get(&parent_id) else { break };
        if names.len() >= MAX_CHANNEL_DEPTH {
            tracing::warn!(channel = %id, "channel parent chain too deep");
            break;
        }
        current = parent;
    }
    names.reverse();
    Some(names.join("/"))
}

/// Non-archived channels sorted by path.
pub fn sorted_channels(store: &EntityStore) -> Vec<(ChannelId, String)> {
    let mut channels: Vec<(ChannelId, String)> = store
        .channels
        .values()
        .filter(|ch| !ch.archived)
        .filter_map(|ch| channel_path(store, ch.id).map(|path| (ch.id, path)))
        .collect();
    channels.sort_by(|a, b| a.1.cmp(&b.1));
    channels
}

pub fn render_channel_list(
    ctx: &egui::Context,
    store: &EntityStore,
    navigator: &Navigator,
    active: Option<ChannelId>,
    theme: &ViewerTheme,
) {
    egui::SidePanel::left("channel_list")
        .resizable(true)
        .default_width(220.0)
        .min_width(160.0)
        .frame(
            egui::Frame::new()
                .fill(theme.surface[1])
                .inner_margin(egui::Margin::symmetric(8, 12))
                .stroke(Stroke::new(1.0, theme.border_medium)),
        )
        .show(ctx, |ui| {
            ui.label(
                egui::RichText::new("CHANNELS")
                    .text_style(egui::TextStyle::Name("section_header".into()))
                    .strong()
                    .color(theme.text_muted),
            );
            ui.add_space(6.0);

            egui::ScrollArea::vertical().show(ui, |ui| {
                let channels = sorted_channels(store);
                if channels.is_empty() {
                    ui.label(egui::RichText::new("No channels loaded").color(theme.text_muted));
                }
                for (id, path) in channels {
                    let selected = active == Some(id);
                    let label = egui::RichText::new(format!("#{}", path)).color(if selected {
                        theme.text_primary
                    } else {
                        theme.text_secondary
                    });
                    if ui.selectable_label(selected, label).clicked() && !selected {
                        navigator.go(Route::Channel(id));
                    }
                }
            });
        });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::Channel;

    fn channel(name: &str, parent_id: Option<ChannelId>) -> Channel {
        Channel {
            id: ChannelId::random(),
            parent_id,
            archived: false,
            force: false,
            topic: String::new(),
            name: name.into(),
            children: vec![],
        }
    }

    #[test]
    fn test_channel_path_walks_parents() {
        let mut store = EntityStore::new();
        let root = channel("general", None);
        let child = channel("random", Some(root.id));
        store.upsert(root.clone());
        store.upsert(child.clone());
        assert_eq!(channel_path(&store, child.id).as_deref(), Some("general/random"));
    }

    #[test]
    fn test_channel_path_with_missing_parent() {
        let mut store = EntityStore::new();
        let orphan = channel("lost", Some(ChannelId::random()));
        store.upsert(orphan.clone());
        assert_eq!(channel_path(&store, orphan.id).as_deref(), Some("lost"));
        assert_eq!(channel_path(&store, ChannelId::random()), None);
    }

    #[test]
    fn test_cycle_terminates() {
        let mut store = EntityStore::new();
        let mut a = channel("a", None);
        let b = channel("b", Some(a.id));
        a.parent_id = Some(b.id);
        store.upsert(a.clone());
        store.upsert(b);
        let path = channel_path(&store, a.id).unwrap();
        assert_eq!(path.split('/').count(), MAX_CHANNEL_DEPTH);
    }

    #[test]
    fn test_sorted_skips_archived() {
        let mut store = EntityStore::new();
        let mut old = channel("old", None);
        old.archived = true;
        store.upsert(old);
        store.upsert(channel("zeta", None));
        store.upsert(channel("alpha", None));
        let names: Vec<String> = sorted_channels(&store).into_iter().map(|(_, p)| p).collect();
        assert_eq!(names, vec!["alpha", "zeta"]);
    }
}
