use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Privilege level, ordered so `>=` means "at least as privileged as".
///
/// Serialized as its numeric ordinal on the wire and in the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "i16", try_from = "i16")]
pub enum Rights {
    User = 1,
    Admin = 2,
}

impl Rights {
    pub fn ordinal(self) -> i16 {
        self as i16
    }
}

impl From<Rights> for i16 {
    fn from(rights: Rights) -> i16 {
        rights as i16
    }
}

impl TryFrom<i16> for Rights {
    type Error = String;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Rights::User),
            2 => Ok(Rights::Admin),
            other => Err(format!("unknown rights ordinal: {other}")),
        }
    }
}

/// User snapshot (safe for client responses -- no password digest).
///
/// Wire names match what the web client expects (`firstName`, `creationTime`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub rights: Rights,
    #[serde(rename = "creationTime")]
    pub created_at: DateTime<Utc>,
}
