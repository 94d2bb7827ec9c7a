//! Loading the store from a JSON snapshot.
//!
//! The snapshot mirrors the store's mappings as lists of API records, e.g.
//! `{ "users": [...], "messages": [...], "fileMetaData": [...] }`. Missing
//! lists are treated as empty.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::entities::{
    Channel, FileInfo, Message, Stamp, StampPalette, Tag, User, UserGroup, Webhook,
};
use crate::store::EntityStore;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("failed to read snapshot {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid snapshot {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StoreSnapshot {
    pub users: Vec<User>,
    pub messages: Vec<Message>,
    pub channels: Vec<Channel>,
    pub user_groups: Vec<UserGroup>,
    pub stamps: Vec<Stamp>,
    pub stamp_palettes: Vec<StampPalette>,
    pub webhooks: Vec<Webhook>,
    pub file_meta_data: Vec<FileInfo>,
    pub tags: Vec<Tag>,
}

impl StoreSnapshot {
    pub fn from_json(data: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(data)
    }

    /// Capture the store's current contents.
    pub fn capture(store: &EntityStore) -> Self {
        Self {
            users: store.users.values().cloned().collect(),
            messages: store.messages.values().cloned().collect(),
            channels: store.channels.values().cloned().collect(),
            user_groups: store.user_groups.values().cloned().collect(),
            stamps: store.stamps.values().cloned().collect(),
            stamp_palettes: store.stamp_palettes.values().cloned().collect(),
            webhooks: store.webhooks.values().cloned().collect(),
            file_meta_data: store.file_meta_data.values().cloned().collect(),
            tags: store.tags.values().cloned().collect(),
        }
    }
}

pub fn load_snapshot(path: &Path) -> Result<StoreSnapshot, SnapshotError> {
    let data = fs::read_to_string(path).map_err(|source| SnapshotError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    StoreSnapshot::from_json(&data).map_err(|source| SnapshotError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

impl EntityStore {
    /// Upsert every record of `snapshot`.
    pub fn apply_snapshot(&mut self, snapshot: StoreSnapshot) {
        self.extend(snapshot.users);
        self.extend(snapshot.messages);
        self.extend(snapshot.channels);
        self.extend(snapshot.user_groups);
        self.extend(snapshot.stamps);
        self.extend(snapshot.stamp_palettes);
        self.extend(snapshot.webhooks);
        self.extend(snapshot.file_meta_data);
        self.extend(snapshot.tags);
        tracing::info!(summary = %self.summary(), "snapshot applied");
    }
}
