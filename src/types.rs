//! Shared data structures for the anotherpad library.
//!
//! This module holds the filter configuration, the partial-update patches
//! accepted by the stores, and the command-line subcommands.
use std::fmt;

use clap::{Subcommand, ValueEnum};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{Folder, Note, PadError};

/// A specialized Result type for anotherpad operations.
pub type Result<T> = std::result::Result<T, PadError>;

/// Field used to order the filtered view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "camelCase")]
pub enum SortBy {
    #[default]
    UpdatedAt,
    CreatedAt,
    Title,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

/// Folder restriction of the filtered view.
///
/// `Unset` and `All` both leave the view unrestricted. They are kept apart
/// because they persist differently: `Unset` omits `folderId`, `All` stores
/// `null`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FolderFilter {
    #[default]
    Unset,
    All,
    Only(String),
}

impl FolderFilter {
    pub fn is_unset(&self) -> bool {
        matches!(self, FolderFilter::Unset)
    }

    /// The folder id the view is restricted to, if any.
    pub fn restriction(&self) -> Option<&str> {
        match self {
            FolderFilter::Only(id) => Some(id),
            FolderFilter::Unset | FolderFilter::All => None,
        }
    }
}

impl Serialize for FolderFilter {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            FolderFilter::Only(id) => serializer.serialize_str(id),
            FolderFilter::Unset | FolderFilter::All => serializer.serialize_none(),
        }
    }
}

impl<'de> Deserialize<'de> for FolderFilter {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        Ok(match Option::<String>::deserialize(deserializer)? {
            Some(id) => FolderFilter::Only(id),
            None => FolderFilter::All,
        })
    }
}

/// The active filter and sort configuration of the note list.
///
/// Every field falls back to its default when missing from a stored blob, so
/// older or partial blobs still load into a complete configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NoteFilters {
    /// Case-insensitive substring query; empty means no filter
    pub search: String,
    /// Exact tag restriction
    pub tag: Option<String>,
    pub sort_by: SortBy,
    pub sort_order: SortOrder,
    pub show_pinned_only: bool,
    #[serde(skip_serializing_if = "FolderFilter::is_unset")]
    pub folder_id: FolderFilter,
}

impl Default for NoteFilters {
    fn default() -> Self {
        NoteFilters {
            search: String::new(),
            tag: None,
            sort_by: SortBy::UpdatedAt,
            sort_order: SortOrder::Desc,
            show_pinned_only: false,
            folder_id: FolderFilter::Unset,
        }
    }
}

impl fmt::Display for NoteFilters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let folder = match &self.folder_id {
            FolderFilter::Unset => "-".to_string(),
            FolderFilter::All => "all".to_string(),
            FolderFilter::Only(id) => id.clone(),
        };
        write!(
            f,
            "search={:?} tag={} folder={} sort={:?}/{:?} pinned-only={}",
            self.search,
            self.tag.as_deref().unwrap_or("-"),
            folder,
            self.sort_by,
            self.sort_order,
            self.show_pinned_only
        )
    }
}

/// Partial update for a note. `None` leaves a field as it is.
///
/// `id` and `created_at` are immutable and `updated_at` is always stamped by
/// the store, so none of them can be patched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotePatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub tags: Option<Vec<String>>,
    pub is_pinned: Option<bool>,
    /// `Some(None)` detaches the note from its folder
    pub folder_id: Option<Option<String>>,
}

impl NotePatch {
    pub(crate) fn apply_to(self, note: &mut Note) {
        if let Some(title) = self.title {
            note.title = title;
        }
        if let Some(content) = self.content {
            note.content = content;
        }
        if let Some(tags) = self.tags {
            note.tags = tags;
        }
        if let Some(is_pinned) = self.is_pinned {
            note.is_pinned = is_pinned;
        }
        if let Some(folder_id) = self.folder_id {
            note.folder_id = folder_id;
        }
    }
}

/// Partial update for a folder.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FolderPatch {
    pub name: Option<String>,
    /// `Some(None)` removes the color
    pub color: Option<Option<String>>,
}

impl FolderPatch {
    pub(crate) fn apply_to(self, folder: &mut Folder) {
        if let Some(name) = self.name {
            folder.name = name;
        }
        if let Some(color) = self.color {
            folder.color = color;
        }
    }
}

/// Available subcommands for the anotherpad application
#[derive(Subcommand)]
pub enum Commands {
    /// Create a new note
    New {
        /// Title of the note
        #[clap(short = 'T', long)]
        title: Option<String>,

        /// Content of the note
        #[clap(short, long)]
        content: Option<String>,

        /// Folder the note belongs to
        #[clap(short, long)]
        folder: Option<String>,

        /// Tags to associate with the note (comma-separated)
        #[clap(short = 't', long)]
        tags: Option<String>,
    },

    /// List notes through the saved filters, with optional one-off overrides
    List {
        /// Search query text
        #[clap(short, long)]
        search: Option<String>,

        /// Only notes carrying this tag
        #[clap(short, long)]
        tag: Option<String>,

        /// Only notes in this folder
        #[clap(short, long, conflicts_with = "all_folders")]
        folder: Option<String>,

        /// Ignore any saved folder restriction
        #[clap(long)]
        all_folders: bool,

        /// Field to sort by
        #[clap(long, value_enum)]
        sort_by: Option<SortBy>,

        /// Sort direction
        #[clap(long, value_enum)]
        order: Option<SortOrder>,

        /// Only show pinned notes
        #[clap(short, long)]
        pinned: bool,

        /// Format output as JSON
        #[clap(short, long)]
        json: bool,
    },

    /// View a note by ID
    Show {
        /// ID of the note to view
        id: String,

        /// Format output as raw JSON
        #[clap(short, long)]
        json: bool,
    },

    /// Edit an existing note
    Edit {
        /// ID of the note to edit
        id: String,

        /// New title for the note
        #[clap(short = 'T', long)]
        title: Option<String>,

        /// New content for the note
        #[clap(short, long)]
        content: Option<String>,

        /// Replace the note's tags (comma-separated)
        #[clap(short = 't', long)]
        tags: Option<String>,

        /// Move the note into this folder
        #[clap(short, long, conflicts_with = "no_folder")]
        folder: Option<String>,

        /// Detach the note from its folder
        #[clap(long)]
        no_folder: bool,
    },

    /// Delete a note by ID
    Delete {
        /// ID of the note to delete
        id: String,

        /// Skip confirmation prompt
        #[clap(short, long)]
        force: bool,
    },

    /// Pin or unpin a note
    Pin {
        /// ID of the note to toggle
        id: String,
    },

    /// List every tag in use
    Tags,

    /// Show or change the saved filter configuration
    Filter {
        #[clap(short, long)]
        search: Option<String>,

        #[clap(short, long)]
        tag: Option<String>,

        /// Drop the saved tag restriction
        #[clap(long, conflicts_with = "tag")]
        no_tag: bool,

        #[clap(short, long, conflicts_with = "all_folders")]
        folder: Option<String>,

        /// Save an explicit "all folders" restriction
        #[clap(long)]
        all_folders: bool,

        #[clap(long, value_enum)]
        sort_by: Option<SortBy>,

        #[clap(long, value_enum)]
        order: Option<SortOrder>,

        /// Toggle pinned-only mode on or off
        #[clap(long)]
        pinned_only: Option<bool>,

        /// Reset to defaults before applying other flags
        #[clap(short, long)]
        reset: bool,
    },

    /// Folder operations
    #[clap(subcommand)]
    Folder(FolderCommands),
}

#[derive(Subcommand)]
pub enum FolderCommands {
    /// Create a folder
    Create {
        name: String,

        /// Display color, e.g. "#3b82f6"
        #[clap(short, long)]
        color: Option<String>,
    },

    /// List folders
    List {
        #[clap(short, long)]
        json: bool,
    },

    /// Rename a folder
    Rename { id: String, name: String },

    /// Change a folder's display color
    Color { id: String, color: String },

    /// Delete a folder; notes inside keep their folder reference
    Delete {
        id: String,

        /// Skip confirmation prompt
        #[clap(short, long)]
        force: bool,
    },
}
