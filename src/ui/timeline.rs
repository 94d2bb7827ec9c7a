//! Channel timeline: renders messages and keeps the scroll position stable
//! while message elements change height.

use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::Local;
use crossbeam_channel::{unbounded, Receiver, Sender};
use eframe::egui::{self, Color32};

use crate::embeds::embedded_file_ids;
use crate::entities::{FileInfo, Message};
use crate::ids::{ChannelId, FileId, MessageId};
use crate::observer::{BoundObserver, ObserverEvent, ObserverInputs, RenderObserver};
use crate::resize::ElementLayout;
use crate::route::Route;
use crate::scroll::ScrollAnchor;
use crate::signal::Signal;
use crate::store::EntityStore;
use crate::ui::theme::{render_avatar, user_color, ViewerTheme};

/// Horizontal / vertical inner margin of a message element.
const MESSAGE_MARGIN: (i8, i8) = (16, 6);
const MAX_PREVIEW_WIDTH: f32 = 320.0;

/// A rendered message and its height observer.
struct MessageElement {
    inputs: ObserverInputs,
    observer: BoundObserver,
}

impl MessageElement {
    fn new(id: MessageId, route_path: &Signal<String>, events: Sender<ObserverEvent>) -> Self {
        let inputs = ObserverInputs::new(route_path.clone());
        let observer = RenderObserver::new(element_id(id), events).bind(&inputs);
        Self { inputs, observer }
    }
}

pub fn element_id(id: MessageId) -> egui::Id {
    egui::Id::new(("message", id))
}

pub struct TimelineView {
    route_path: Signal<String>,
    events_tx: Sender<ObserverEvent>,
    events_rx: Receiver<ObserverEvent>,
    elements: HashMap<MessageId, MessageElement>,
    anchor: ScrollAnchor,
    channel: Option<ChannelId>,
    entry: Option<MessageId>,
    route: Option<Route>,
    viewport_top: f32,
}

impl TimelineView {
    pub fn new(route_path: Signal<String>) -> Self {
        let (events_tx, events_rx) = unbounded();
        Self {
            route_path,
            events_tx,
            events_rx,
            elements: HashMap::new(),
            anchor: ScrollAnchor::new(),
            channel: None,
            entry: None,
            route: None,
            viewport_top: 0.0,
        }
    }

    pub fn channel(&self) -> Option<ChannelId> {
        self.channel
    }

    pub fn entry(&self) -> Option<MessageId> {
        self.entry
    }

    /// Point the timeline at `route`. Rebuilds all message elements when the
    /// route changed.
    pub fn show_route(&mut self, route: Route, store: &EntityStore) {
        if self.route == Some(route) {
            // A permalink may resolve once its message arrives in the store
            if let (Route::Message(id), None) = (route, self.channel) {
                self.channel = store.messages.get(&id).map(|m| m.channel_id);
            }
            return;
        }
        self.route = Some(route);
        self.elements.clear();
        self.anchor.reset();
        // Events from the previous route's elements are stale
        self.events_rx.try_iter().for_each(drop);

        let (channel, entry) = match route {
            Route::Home => (None, None),
            Route::Channel(id) => (Some(id), None),
            Route::Message(id) => (store.messages.get(&id).map(|m| m.channel_id), Some(id)),
        };
        tracing::debug!(?channel, ?entry, "timeline route changed");
        self.channel = channel;
        self.entry = entry;
    }

    fn drain_events(&mut self) {
        for event in self.events_rx.try_iter() {
            self.anchor.handle(&event, self.viewport_top);
        }
    }

    pub fn render(&mut self, ui: &mut egui::Ui, store: &EntityStore, theme: &ViewerTheme) {
        self.drain_events();

        let Some(channel_id) = self.channel else {
            let text = match self.entry {
                Some(_) => "Message not found",
                None => "Select a channel",
            };
            ui.centered_and_justified(|ui| {
                ui.label(egui::RichText::new(text).color(theme.text_muted));
            });
            return;
        };

        render_header(ui, store, channel_id, theme);

        let messages = store.channel_messages(channel_id);
        let mut area = egui::ScrollArea::vertical()
            .id_salt(("timeline", channel_id))
            .auto_shrink([false; 2]);
        if let Some(offset) = self.anchor.take_request() {
            area = area.vertical_scroll_offset(offset);
        } else if self.entry.is_none() {
            area = area.stick_to_bottom(true);
        }

        let output = area.show(ui, |ui| {
            let parent_top = ui.min_rect().top();
            for msg in &messages {
                self.render_message(ui, store, msg, parent_top, theme);
            }
            if messages.is_empty() {
                ui.label(egui::RichText::new("No messages yet").color(theme.text_muted));
            }
        });

        self.anchor.sync_offset(output.state.offset.y);
        self.viewport_top = output.inner_rect.top();

        // Messages deleted from the store lose their element
        let live: HashSet<MessageId> = messages.iter().map(|m| m.id).collect();
        self.elements.retain(|id, _| live.contains(id));
    }

    fn render_message(
        &mut self,
        ui: &mut egui::Ui,
        store: &EntityStore,
        msg: &Message,
        parent_top: f32,
        theme: &ViewerTheme,
    ) {
        let is_entry = self.entry == Some(msg.id);
        let route_path = &self.route_path;
        let events = &self.events_tx;
        let element = self
            .elements
            .entry(msg.id)
            .or_insert_with(|| MessageElement::new(msg.id, route_path, events.clone()));

        let file_ids = embedded_file_ids(&msg.content);
        element.inputs.file_ids.set(file_ids.clone());
        element.inputs.is_entry_message.set(is_entry);
        element.observer.set_message_date(Some(msg.created_at));

        let fill = if is_entry { theme.entry_highlight } else { Color32::TRANSPARENT };
        let (mx, my) = MESSAGE_MARGIN;
        let inner = egui::Frame::new()
            .fill(fill)
            .inner_margin(egui::Margin::symmetric(mx, my))
            .show(ui, |ui| {
                ui.set_width(ui.available_width());
                render_body(ui, store, msg, &file_ids, theme);
            });

        let border = inner.response.rect;
        let content = border.shrink2(egui::vec2(mx as f32, my as f32));
        element
            .observer
            .layout(&ElementLayout::new(border, content).with_parent_top(parent_top));
    }
}

fn render_header(ui: &mut egui::Ui, store: &EntityStore, channel_id: ChannelId, theme: &ViewerTheme) {
    let (name, topic) = match store.channels.get(&channel_id) {
        Some(ch) => (format!("#{}", ch.name), ch.topic.clone()),
        None => ("#unknown".to_string(), String::new()),
    };
    ui.horizontal(|ui| {
        ui.heading(egui::RichText::new(name).color(theme.text_primary));
        if !topic.is_empty() {
            ui.label(egui::RichText::new(topic).color(theme.text_muted));
        }
    });
    ui.separator();
}

fn render_body(
    ui: &mut egui::Ui,
    store: &EntityStore,
    msg: &Message,
    file_ids: &[FileId],
    theme: &ViewerTheme,
) {
    let (name, display_name) = match store.users.get(&msg.user_id) {
        Some(user) => (user.name.as_str(), user.display_name.as_str()),
        None => ("?", "unknown user"),
    };

    ui.horizontal_top(|ui| {
        render_avatar(ui, name, 32.0);
        ui.vertical(|ui| {
            ui.horizontal(|ui| {
                ui.label(egui::RichText::new(display_name).strong().color(user_color(name)));
                ui.label(egui::RichText::new(format!("@{}", name)).color(theme.text_muted));
                let at = msg.created_at.with_timezone(&Local).format("%Y/%m/%d %H:%M");
                ui.label(
                    egui::RichText::new(at.to_string())
                        .text_style(egui::TextStyle::Name("timestamp".into()))
                        .color(theme.text_muted),
                );
                if msg.pinned {
                    ui.label(egui::RichText::new("pinned").color(theme.accent));
                }
            });
            ui.add(egui::Label::new(egui::RichText::new(&msg.content).color(theme.text_secondary)).wrap());

            for file_id in file_ids {
                match store.file_meta_data.get(file_id) {
                    Some(file) => render_attachment(ui, msg.id, file, theme),
                    None => {
                        ui.label(egui::RichText::new("loading file...").small().color(theme.text_muted));
                    }
                }
            }

            let stamps = stamp_totals(store, msg);
            if !stamps.is_empty() {
                ui.horizontal_wrapped(|ui| {
                    for (stamp, count) in stamps {
                        ui.label(
                            egui::RichText::new(format!(":{}: {}", stamp, count))
                                .small()
                                .color(theme.text_secondary),
                        );
                    }
                });
            }
        });
    });
}

fn render_attachment(ui: &mut egui::Ui, message: MessageId, file: &FileInfo, theme: &ViewerTheme) {
    egui::Frame::new()
        .fill(theme.surface[3])
        .stroke(egui::Stroke::new(1.0, theme.border_medium))
        .corner_radius(egui::CornerRadius::same(6))
        .inner_margin(egui::Margin::same(8))
        .show(ui, |ui| {
            egui::CollapsingHeader::new(egui::RichText::new(&file.name).color(theme.text_primary))
                .id_salt(("attachment", message, file.id))
                .default_open(true)
                .show(ui, |ui| {
                    ui.label(
                        egui::RichText::new(format!("{} · {}", file.mime, file.display_size()))
                            .small()
                            .color(theme.text_muted),
                    );
                    if let Some(size) = preview_size(file) {
                        let (rect, _) = ui.allocate_exact_size(size, egui::Sense::hover());
                        ui.painter().rect_filled(rect, 4.0, theme.surface[4]);
                    }
                });
        });
}

/// Placeholder size for a thumbnail, scaled down to the preview width.
fn preview_size(file: &FileInfo) -> Option<egui::Vec2> {
    let thumb = file.thumbnails.first()?;
    let (w, h) = (thumb.width? as f32, thumb.height? as f32);
    if w <= 0.0 || h <= 0.0 {
        return None;
    }
    let scale = (MAX_PREVIEW_WIDTH / w).min(1.0);
    Some(egui::vec2(w * scale, h * scale))
}

/// Stamp name -> total count on one message.
fn stamp_totals<'a>(store: &'a EntityStore, msg: &Message) -> BTreeMap<&'a str, u32> {
    let mut totals = BTreeMap::new();
    for stamp in &msg.stamps {
        let name = store
            .stamps
            .get(&stamp.stamp_id)
            .map(|s| s.name.as_str())
            .unwrap_or("unknown");
        *totals.entry(name).or_insert(0) += stamp.count;
    }
    totals
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{MessageStamp, Stamp, Thumbnail};
    use crate::ids::{StampId, UserId};
    use chrono::Utc;

    fn file(width: Option<u32>, height: Option<u32>) -> FileInfo {
        FileInfo {
            id: FileId::random(),
            name: "shot.png".into(),
            mime: "image/png".into(),
            size: 10,
            md5: String::new(),
            is_animated_image: false,
            created_at: Utc::now(),
            thumbnails: vec![Thumbnail {
                kind: "image".into(),
                mime: "image/webp".into(),
                width,
                height,
            }],
            channel_id: None,
            uploader_id: None,
        }
    }

    #[test]
    fn test_preview_size_scales_down() {
        assert_eq!(preview_size(&file(Some(640), Some(480))), Some(egui::vec2(320.0, 240.0)));
        assert_eq!(preview_size(&file(Some(100), Some(50))), Some(egui::vec2(100.0, 50.0)));
        assert_eq!(preview_size(&file(None, Some(50))), None);
    }

    #[test]
    fn test_stamp_totals() {
        let mut store = EntityStore::new();
        let stamp = Stamp {
            id: StampId::random(),
            name: "good".into(),
            creator_id: UserId::random(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
            file_id: FileId::random(),
            is_unicode: false,
        };
        store.upsert(stamp.clone());
        let now = Utc::now();
        let stamped = |stamp_id, count| MessageStamp {
            user_id: UserId::random(),
            stamp_id,
            count,
            created_at: now,
            updated_at: now,
        };
        let msg = Message {
            id: MessageId::random(),
            user_id: UserId::random(),
            channel_id: ChannelId::random(),
            content: String::new(),
            created_at: now,
            updated_at: now,
            pinned: false,
            stamps: vec![stamped(stamp.id, 2), stamped(stamp.id, 3), stamped(StampId::random(), 1)],
            thread_id: None,
        };
        let totals = stamp_totals(&store, &msg);
        assert_eq!(totals.get("good"), Some(&5));
        assert_eq!(totals.get("unknown"), Some(&1));
    }

    #[test]
    fn test_show_route_resolves_entry_channel() {
        let mut store = EntityStore::new();
        let now = Utc::now();
        let msg = Message {
            id: MessageId::random(),
            user_id: UserId::random(),
            channel_id: ChannelId::random(),
            content: String::new(),
            created_at: now,
            updated_at: now,
            pinned: false,
            stamps: vec![],
            thread_id: None,
        };

        let mut view = TimelineView::new(Signal::new(String::from("/")));
        view.show_route(Route::Message(msg.id), &store);
        assert_eq!(view.channel(), None);
        assert_eq!(view.entry(), Some(msg.id));

        store.upsert(msg.clone());
        view.show_route(Route::Message(msg.id), &store);
        assert_eq!(view.channel(), Some(msg.channel_id));

        view.show_route(Route::Home, &store);
        assert_eq!(view.channel(), None);
        assert_eq!(view.entry(), None);
    }
}
