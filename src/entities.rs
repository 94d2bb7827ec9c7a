//! Entity records as delivered by the traQ API.
//!
//! Field names follow the API's camelCase JSON; timestamps are RFC 3339.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{
    ChannelId, FileId, MessageId, StampId, StampPaletteId, TagId, UserGroupId, UserId, WebhookId,
};

/// Account state, encoded as an integer on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(try_from = "u8", into = "u8")]
pub enum UserAccountState {
    Deactivated,
    #[default]
    Active,
    Suspended,
}

impl TryFrom<u8> for UserAccountState {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Deactivated),
            1 => Ok(Self::Active),
            2 => Ok(Self::Suspended),
            other => Err(format!("unknown user account state {}", other)),
        }
    }
}

impl From<UserAccountState> for u8 {
    fn from(state: UserAccountState) -> Self {
        match state {
            UserAccountState::Deactivated => 0,
            UserAccountState::Active => 1,
            UserAccountState::Suspended => 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub display_name: String,
    pub icon_file_id: FileId,
    pub bot: bool,
    #[serde(default)]
    pub state: UserAccountState,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageStamp {
    pub user_id: UserId,
    pub stamp_id: StampId,
    pub count: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: MessageId,
    pub user_id: UserId,
    pub channel_id: ChannelId,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub pinned: bool,
    #[serde(default)]
    pub stamps: Vec<MessageStamp>,
    #[serde(default)]
    pub thread_id: Option<ChannelId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Channel {
    pub id: ChannelId,
    #[serde(default)]
    pub parent_id: Option<ChannelId>,
    #[serde(default)]
    pub archived: bool,
    #[serde(default)]
    pub force: bool,
    #[serde(default)]
    pub topic: String,
    pub name: String,
    #[serde(default)]
    pub children: Vec<ChannelId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserGroupMember {
    pub id: UserId,
    #[serde(default)]
    pub role: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserGroup {
    pub id: UserGroupId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type", default)]
    pub group_type: String,
    pub icon: FileId,
    #[serde(default)]
    pub members: Vec<UserGroupMember>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub admins: Vec<UserId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stamp {
    pub id: StampId,
    pub name: String,
    pub creator_id: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub file_id: FileId,
    #[serde(default)]
    pub is_unicode: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StampPalette {
    pub id: StampPaletteId,
    pub name: String,
    #[serde(default)]
    pub stamps: Vec<StampId>,
    pub creator_id: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Webhook {
    pub id: WebhookId,
    pub bot_user_id: UserId,
    pub display_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub secure: bool,
    pub channel_id: ChannelId,
    pub owner_id: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Thumbnail {
    #[serde(rename = "type")]
    pub kind: String,
    pub mime: String,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
}

/// Metadata of an uploaded file (`fileMetaData` in the store).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileInfo {
    pub id: FileId,
    pub name: String,
    pub mime: String,
    pub size: u64,
    #[serde(default)]
    pub md5: String,
    #[serde(default)]
    pub is_animated_image: bool,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub thumbnails: Vec<Thumbnail>,
    #[serde(default)]
    pub channel_id: Option<ChannelId>,
    #[serde(default)]
    pub uploader_id: Option<UserId>,
}

impl FileInfo {
    /// Human readable size, e.g. `12.3 KiB`.
    pub fn display_size(&self) -> String {
        const UNITS: [&str; 4] = ["B", "KiB", "MiB", "GiB"];
        let mut size = self.size as f64;
        let mut unit = 0;
        while size >= 1024.0 && unit < UNITS.len() - 1 {
            size /= 1024.0;
            unit += 1;
        }
        if unit == 0 {
            format!("{} {}", self.size, UNITS[0])
        } else {
            format!("{:.1} {}", size, UNITS[unit])
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    pub id: TagId,
    pub tag: String,
    #[serde(default)]
    pub users: Vec<UserId>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_from_api_json() {
        let json = r#"{
            "id": "0186f3c2-5d6b-7a1e-9c3f-2b4d6e8f0a1b",
            "userId": "0186f3c2-0000-7a1e-9c3f-2b4d6e8f0a1b",
            "channelId": "0186f3c2-1111-7a1e-9c3f-2b4d6e8f0a1b",
            "content": "hello",
            "createdAt": "2024-05-01T12:00:00Z",
            "updatedAt": "2024-05-01T12:00:00Z",
            "pinned": false,
            "stamps": [],
            "threadId": null
        }"#;
        let msg: Message = serde_json::from_str(json).unwrap();
        assert_eq!(msg.content, "hello");
        assert!(msg.thread_id.is_none());
    }

    #[test]
    fn test_user_state_wire_format() {
        assert_eq!(serde_json::to_string(&UserAccountState::Suspended).unwrap(), "2");
        assert!(serde_json::from_str::<UserAccountState>("7").is_err());
    }

    #[test]
    fn test_file_display_size() {
        let file = FileInfo {
            id: FileId::random(),
            name: "a.png".into(),
            mime: "image/png".into(),
            size: 2048,
            md5: String::new(),
            is_animated_image: false,
            created_at: Utc::now(),
            thumbnails: vec![],
            channel_id: None,
            uploader_id: None,
        };
        assert_eq!(file.display_size(), "2.0 KiB");
    }
}
