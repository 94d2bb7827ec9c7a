//! Client-side entity store.
//!
//! `EntityStore` holds one normalized mapping per entity kind. It performs no
//! validation and keeps no cross-mapping integrity: a message may point at a
//! channel that is not (yet) present, and callers handle the `None`.

use std::collections::hash_map;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

use crate::entities::{
    Channel, FileInfo, Message, Stamp, StampPalette, Tag, User, UserGroup, Webhook,
};
use crate::ids::{
    ChannelId, FileId, MessageId, StampId, StampPaletteId, TagId, UserGroupId, UserId, WebhookId,
};

/// Names the nine mappings of the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Users,
    Messages,
    Channels,
    UserGroups,
    Stamps,
    StampPalettes,
    Webhooks,
    FileMetaData,
    Tags,
}

impl EntityKind {
    pub const ALL: [EntityKind; 9] = [
        EntityKind::Users,
        EntityKind::Messages,
        EntityKind::Channels,
        EntityKind::UserGroups,
        EntityKind::Stamps,
        EntityKind::StampPalettes,
        EntityKind::Webhooks,
        EntityKind::FileMetaData,
        EntityKind::Tags,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            EntityKind::Users => "users",
            EntityKind::Messages => "messages",
            EntityKind::Channels => "channels",
            EntityKind::UserGroups => "userGroups",
            EntityKind::Stamps => "stamps",
            EntityKind::StampPalettes => "stampPalettes",
            EntityKind::Webhooks => "webhooks",
            EntityKind::FileMetaData => "fileMetaData",
            EntityKind::Tags => "tags",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A record that lives in exactly one mapping of the store.
pub trait Entity: Clone {
    type Id: Copy + Eq + Hash + fmt::Debug + fmt::Display;

    const KIND: EntityKind;

    fn id(&self) -> Self::Id;

    fn map(store: &EntityStore) -> &EntityMap<Self>;

    fn map_mut(store: &mut EntityStore) -> &mut EntityMap<Self>;
}

macro_rules! impl_entity {
    ($entity:ty, $id:ty, $kind:ident, $field:ident) => {
        impl Entity for $entity {
            type Id = $id;

            const KIND: EntityKind = EntityKind::$kind;

            fn id(&self) -> Self::Id {
                self.id
            }

            fn map(store: &EntityStore) -> &EntityMap<Self> {
                &store.$field
            }

            fn map_mut(store: &mut EntityStore) -> &mut EntityMap<Self> {
                &mut store.$field
            }
        }
    };
}

impl_entity!(User, UserId, Users, users);
impl_entity!(Message, MessageId, Messages, messages);
impl_entity!(Channel, ChannelId, Channels, channels);
impl_entity!(UserGroup, UserGroupId, UserGroups, user_groups);
impl_entity!(Stamp, StampId, Stamps, stamps);
impl_entity!(StampPalette, StampPaletteId, StampPalettes, stamp_palettes);
impl_entity!(Webhook, WebhookId, Webhooks, webhooks);
impl_entity!(FileInfo, FileId, FileMetaData, file_meta_data);
impl_entity!(Tag, TagId, Tags, tags);

/// Keyed collection of one entity kind.
pub struct EntityMap<E: Entity> {
    entries: HashMap<E::Id, E>,
}

impl<E: Entity> Default for EntityMap<E> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<E: Entity + fmt::Debug> fmt::Debug for EntityMap<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.entries.iter()).finish()
    }
}

impl<E: Entity> Clone for EntityMap<E> {
    fn clone(&self) -> Self {
        Self {
            entries: self.entries.clone(),
        }
    }
}

impl<E: Entity> EntityMap<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &E::Id) -> Option<&E> {
        self.entries.get(id)
    }

    /// Insert or overwrite the entry at `id`, returning the replaced one.
    pub fn set(&mut self, id: E::Id, entity: E) -> Option<E> {
        self.entries.insert(id, entity)
    }

    /// Insert or overwrite keyed by the entity's own id.
    pub fn upsert(&mut self, entity: E) -> Option<E> {
        self.entries.insert(entity.id(), entity)
    }

    pub fn delete(&mut self, id: &E::Id) -> Option<E> {
        self.entries.remove(id)
    }

    pub fn contains(&self, id: &E::Id) -> bool {
        self.entries.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn values(&self) -> hash_map::Values<'_, E::Id, E> {
        self.entries.values()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl<E: Entity> Extend<E> for EntityMap<E> {
    fn extend<I: IntoIterator<Item = E>>(&mut self, iter: I) {
        for entity in iter {
            self.upsert(entity);
        }
    }
}

impl<E: Entity> FromIterator<E> for EntityMap<E> {
    fn from_iter<I: IntoIterator<Item = E>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

/// Session-wide table of every normalized entity the client knows about.
#[derive(Debug, Default, Clone)]
pub struct EntityStore {
    pub users: EntityMap<User>,
    pub messages: EntityMap<Message>,
    pub channels: EntityMap<Channel>,
    pub user_groups: EntityMap<UserGroup>,
    pub stamps: EntityMap<Stamp>,
    pub stamp_palettes: EntityMap<StampPalette>,
    pub webhooks: EntityMap<Webhook>,
    pub file_meta_data: EntityMap<FileInfo>,
    pub tags: EntityMap<Tag>,
}

impl EntityStore {
    /// Create a store with every mapping empty.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get<E: Entity>(&self, id: &E::Id) -> Option<&E> {
        E::map(self).get(id)
    }

    pub fn set<E: Entity>(&mut self, id: E::Id, entity: E) {
        tracing::trace!(kind = %E::KIND, %id, "set entity");
        E::map_mut(self).set(id, entity);
    }

    pub fn upsert<E: Entity>(&mut self, entity: E) {
        let id = entity.id();
        self.set(id, entity);
    }

    pub fn delete<E: Entity>(&mut self, id: &E::Id) {
        if E::map_mut(self).delete(id).is_some() {
            tracing::trace!(kind = %E::KIND, %id, "deleted entity");
        }
    }

    pub fn contains<E: Entity>(&self, id: &E::Id) -> bool {
        E::map(self).contains(id)
    }

    /// Bulk upsert, e.g. the list returned by an API call.
    pub fn extend<E: Entity, I: IntoIterator<Item = E>>(&mut self, entities: I) {
        E::map_mut(self).extend(entities);
    }

    /// Number of entries in the mapping named by `kind`.
    pub fn len_of(&self, kind: EntityKind) -> usize {
        match kind {
            EntityKind::Users => self.users.len(),
            EntityKind::Messages => self.messages.len(),
            EntityKind::Channels => self.channels.len(),
            EntityKind::UserGroups => self.user_groups.len(),
            EntityKind::Stamps => self.stamps.len(),
            EntityKind::StampPalettes => self.stamp_palettes.len(),
            EntityKind::Webhooks => self.webhooks.len(),
            EntityKind::FileMetaData => self.file_meta_data.len(),
            EntityKind::Tags => self.tags.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        EntityKind::ALL.iter().all(|kind| self.len_of(*kind) == 0)
    }

    /// Empty every mapping.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Messages of one channel, oldest first.
    pub fn channel_messages(&self, channel_id: ChannelId) -> Vec<&Message> {
        let mut messages: Vec<&Message> = self
            .messages
            .values()
            .filter(|m| m.channel_id == channel_id)
            .collect();
        messages.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        messages
    }

    /// One-line summary of mapping sizes for diagnostics.
    pub fn summary(&self) -> String {
        EntityKind::ALL
            .iter()
            .map(|kind| format!("{}={}", kind, self.len_of(*kind)))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn user(name: &str) -> User {
        User {
            id: UserId::random(),
            name: name.into(),
            display_name: name.to_uppercase(),
            icon_file_id: FileId::random(),
            bot: false,
            state: Default::default(),
            updated_at: Utc::now(),
        }
    }

    fn message(channel_id: ChannelId, secs: i64) -> Message {
        let at = Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap();
        Message {
            id: MessageId::random(),
            user_id: UserId::random(),
            channel_id,
            content: format!("at {}", secs),
            created_at: at,
            updated_at: at,
            pinned: false,
            stamps: vec![],
            thread_id: None,
        }
    }

    fn tag(name: &str) -> Tag {
        Tag {
            id: TagId::random(),
            tag: name.into(),
            users: vec![],
        }
    }

    #[test]
    fn test_new_store_is_empty() {
        let store = EntityStore::new();
        assert!(store.is_empty());
        for kind in EntityKind::ALL {
            assert_eq!(store.len_of(kind), 0);
        }
    }

    #[test]
    fn test_set_then_get() {
        let mut store = EntityStore::new();
        let alice = user("alice");
        store.set(alice.id, alice.clone());
        assert_eq!(store.get::<User>(&alice.id), Some(&alice));

        let t = tag("rust");
        store.set(t.id, t.clone());
        assert_eq!(store.tags.get(&t.id), Some(&t));
    }

    /// set -> get -> delete -> get on one mapping, through the generic API.
    fn round_trip<E: Entity + PartialEq + fmt::Debug>(store: &mut EntityStore, entity: E) {
        let id = entity.id();
        let before = store.len_of(E::KIND);

        store.set(id, entity.clone());
        assert_eq!(store.get::<E>(&id), Some(&entity), "get after set on {}", E::KIND);
        assert_eq!(E::map(store).get(&id), Some(&entity));
        assert_eq!(store.len_of(E::KIND), before + 1, "len of {}", E::KIND);

        store.delete::<E>(&id);
        assert_eq!(store.get::<E>(&id), None, "get after delete on {}", E::KIND);
        assert_eq!(store.len_of(E::KIND), before, "len of {}", E::KIND);
    }

    #[test]
    fn test_round_trip_every_mapping() {
        let mut store = EntityStore::new();
        let now = Utc::now();

        round_trip(&mut store, user("alice"));
        round_trip(&mut store, message(ChannelId::random(), 5));
        round_trip(
            &mut store,
            Channel {
                id: ChannelId::random(),
                parent_id: None,
                archived: false,
                force: false,
                topic: "chat".into(),
                name: "general".into(),
                children: vec![],
            },
        );
        round_trip(
            &mut store,
            UserGroup {
                id: UserGroupId::random(),
                name: "team".into(),
                description: String::new(),
                group_type: "grade".into(),
                icon: FileId::random(),
                members: vec![],
                created_at: now,
                updated_at: now,
                admins: vec![UserId::random()],
            },
        );
        round_trip(
            &mut store,
            Stamp {
                id: StampId::random(),
                name: "good".into(),
                creator_id: UserId::random(),
                created_at: now,
                updated_at: now,
                file_id: FileId::random(),
                is_unicode: false,
            },
        );
        round_trip(
            &mut store,
            StampPalette {
                id: StampPaletteId::random(),
                name: "favorites".into(),
                stamps: vec![StampId::random()],
                creator_id: UserId::random(),
                created_at: now,
                updated_at: now,
                description: String::new(),
            },
        );
        round_trip(
            &mut store,
            Webhook {
                id: WebhookId::random(),
                bot_user_id: UserId::random(),
                display_name: "ci".into(),
                description: String::new(),
                secure: true,
                channel_id: ChannelId::random(),
                owner_id: UserId::random(),
                created_at: now,
                updated_at: now,
            },
        );
        round_trip(
            &mut store,
            FileInfo {
                id: FileId::random(),
                name: "a.png".into(),
                mime: "image/png".into(),
                size: 1,
                md5: String::new(),
                is_animated_image: false,
                created_at: now,
                thumbnails: vec![],
                channel_id: None,
                uploader_id: None,
            },
        );
        round_trip(&mut store, tag("rust"));

        assert!(store.is_empty());
    }

    #[test]
    fn test_set_overwrites() {
        let mut store = EntityStore::new();
        let mut alice = user("alice");
        store.upsert(alice.clone());
        alice.display_name = "Alice".into();
        store.upsert(alice.clone());
        assert_eq!(store.users.len(), 1);
        assert_eq!(store.get::<User>(&alice.id).unwrap().display_name, "Alice");
    }

    #[test]
    fn test_delete_then_get() {
        let mut store = EntityStore::new();
        let alice = user("alice");
        store.upsert(alice.clone());
        store.delete::<User>(&alice.id);
        assert!(store.get::<User>(&alice.id).is_none());
        // Deleting again is harmless
        store.delete::<User>(&alice.id);
    }

    #[test]
    fn test_absent_key_is_none() {
        let store = EntityStore::new();
        assert!(store.get::<Channel>(&ChannelId::random()).is_none());
    }

    #[test]
    fn test_no_referential_integrity() {
        let mut store = EntityStore::new();
        let orphan = message(ChannelId::random(), 0);
        store.upsert(orphan.clone());
        assert!(store.contains::<Message>(&orphan.id));
        assert!(store.get::<Channel>(&orphan.channel_id).is_none());
    }

    #[test]
    fn test_channel_messages_sorted() {
        let mut store = EntityStore::new();
        let channel = ChannelId::random();
        let late = message(channel, 50);
        let early = message(channel, 10);
        store.extend(vec![late.clone(), early.clone(), message(ChannelId::random(), 0)]);

        let ids: Vec<MessageId> = store.channel_messages(channel).iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![early.id, late.id]);
    }

    #[test]
    fn test_clear_and_summary() {
        let mut store = EntityStore::new();
        store.extend(vec![tag("a"), tag("b")]);
        assert!(store.summary().contains("tags=2"));
        store.clear();
        assert!(store.is_empty());
    }
}
