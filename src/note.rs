//! The note record.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Title used when a note is created without one.
pub const DEFAULT_NOTE_TITLE: &str = "Untitled Note";

/// Represents a single note in our system
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    /// Unique identifier for the note
    pub id: String,
    /// Note title
    pub title: String,
    /// Free-text body
    pub content: String,
    /// When the note was created
    pub created_at: DateTime<Utc>,
    /// Last modification time
    pub updated_at: DateTime<Utc>,
    /// Tags for organization, in the order they were given
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub is_pinned: bool,
    /// Soft reference to a folder id; never validated against the folder store
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folder_id: Option<String>,
}

impl Note {
    /// Creates a new unpinned, untagged note stamped with `now`
    pub fn new(
        id: String,
        title: String,
        content: String,
        folder_id: Option<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Note {
            id,
            title,
            content,
            created_at: now,
            updated_at: now,
            tags: Vec::new(),
            is_pinned: false,
            folder_id,
        }
    }

    /// Sets `updated_at`, never letting it fall behind `created_at`.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now.max(self.created_at);
    }

    /// Case-insensitive substring match against title, content or any tag.
    /// `needle` must already be lowercased.
    pub(crate) fn matches_search(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle)
            || self.content.to_lowercase().contains(needle)
            || self
                .tags
                .iter()
                .any(|tag| tag.to_lowercase().contains(needle))
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};

    use super::*;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    #[test]
    fn new_note_has_equal_timestamps_and_defaults() {
        let note = Note::new("n1".into(), "Title".into(), String::new(), None, at(0));
        assert_eq!(note.created_at, note.updated_at);
        assert!(note.tags.is_empty());
        assert!(!note.is_pinned);
        assert!(note.folder_id.is_none());
    }

    #[test]
    fn touch_never_moves_before_creation() {
        let mut note = Note::new("n1".into(), "T".into(), String::new(), None, at(10));
        note.touch(at(5));
        assert_eq!(note.updated_at, note.created_at);

        note.touch(at(10) + Duration::seconds(3));
        assert_eq!(note.updated_at, at(13));
    }

    #[test]
    fn serializes_with_camel_case_and_iso_timestamps() {
        let mut note = Note::new("n1".into(), "T".into(), "c".into(), Some("f1".into()), at(0));
        note.is_pinned = true;
        let value = serde_json::to_value(&note).unwrap();

        assert_eq!(value["isPinned"], true);
        assert_eq!(value["folderId"], "f1");
        assert_eq!(value["createdAt"], "2023-11-14T22:13:20Z");
        assert!(value.get("created_at").is_none());
    }

    #[test]
    fn missing_optional_fields_take_defaults() {
        let json = r#"{
            "id": "n1",
            "title": "Old",
            "content": "",
            "createdAt": "2024-01-01T00:00:00.000Z",
            "updatedAt": "2024-01-02T00:00:00.000Z"
        }"#;
        let note: Note = serde_json::from_str(json).unwrap();
        assert!(note.tags.is_empty());
        assert!(!note.is_pinned);
        assert_eq!(note.folder_id, None);
        assert!(note.updated_at > note.created_at);
    }

    #[test]
    fn search_checks_title_content_and_tags() {
        let mut note = Note::new(
            "n1".into(),
            String::new(),
            "Team Meeting Notes".into(),
            None,
            at(0),
        );
        assert!(note.matches_search("meeting"));
        assert!(!note.matches_search("budget"));

        note.tags.push("Budget-2024".into());
        assert!(note.matches_search("budget"));
    }
}
