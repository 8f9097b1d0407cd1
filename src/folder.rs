//! The folder record.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Color given to folders created without one.
pub const DEFAULT_FOLDER_COLOR: &str = "#10b981";

/// A named group that notes can point at through `Note::folder_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Folder {
    pub id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl Folder {
    pub fn new(id: String, name: String, color: String, now: DateTime<Utc>) -> Self {
        Folder {
            id,
            name,
            created_at: now,
            color: Some(color),
        }
    }
}
