//! Typed entity identifiers.
//!
//! Every entity kind gets its own UUID newtype so a `ChannelId` can never be
//! used to look up a user.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Fresh random id (v4).
            pub fn random() -> Self {
                Self(Uuid::new_v4())
            }
        }

        impl From<Uuid> for $name {
            fn from(id: Uuid) -> Self {
                Self(id)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s).map(Self)
            }
        }
    };
}

entity_id!(
    /// Identifies a user account (humans and bots).
    UserId
);
entity_id!(MessageId);
entity_id!(ChannelId);
entity_id!(UserGroupId);
entity_id!(StampId);
entity_id!(StampPaletteId);
entity_id!(WebhookId);
entity_id!(
    /// Identifies an uploaded file; also used for icons and stamp images.
    FileId
);
entity_id!(TagId);
