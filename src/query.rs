//! Derived views over a notes collection.
//!
//! Everything here is a pure function of its inputs: the source slice is never
//! reordered and the result is recomputed on every call.
use std::{cmp::Ordering, collections::BTreeSet};

use log::trace;

use crate::{Note, NoteFilters, SortBy, SortOrder};

/// Filters and sorts `notes` according to `filters`.
///
/// Filters apply in order: search, tag, folder, pinned-only. The sort is
/// stable, puts pinned notes first regardless of direction, and only reverses
/// the field comparison for [`SortOrder::Desc`].
pub fn filter_notes(notes: &[Note], filters: &NoteFilters) -> Vec<Note> {
    let needle = filters.search.to_lowercase();
    let folder = filters.folder_id.restriction();

    let mut filtered: Vec<Note> = notes
        .iter()
        .filter(|note| needle.is_empty() || note.matches_search(&needle))
        .filter(|note| match &filters.tag {
            Some(tag) if !tag.is_empty() => note.tags.iter().any(|t| t == tag),
            _ => true,
        })
        .filter(|note| match folder {
            Some(folder_id) => note.folder_id.as_deref() == Some(folder_id),
            None => true,
        })
        .filter(|note| !filters.show_pinned_only || note.is_pinned)
        .cloned()
        .collect();

    filtered.sort_by(|a, b| compare_notes(a, b, filters.sort_by, filters.sort_order));

    trace!(
        "Filtered {} notes down to {} ({})",
        notes.len(),
        filtered.len(),
        filters
    );
    filtered
}

/// Display order of two notes.
pub fn compare_notes(a: &Note, b: &Note, sort_by: SortBy, sort_order: SortOrder) -> Ordering {
    // Pin precedence is not subject to sort_order
    match (a.is_pinned, b.is_pinned) {
        (true, false) => return Ordering::Less,
        (false, true) => return Ordering::Greater,
        _ => {}
    }

    let cmp = match sort_by {
        SortBy::Title => a
            .title
            .to_lowercase()
            .cmp(&b.title.to_lowercase())
            .then_with(|| a.title.cmp(&b.title)),
        SortBy::CreatedAt => a.created_at.cmp(&b.created_at),
        SortBy::UpdatedAt => a.updated_at.cmp(&b.updated_at),
    };

    match sort_order {
        SortOrder::Asc => cmp,
        SortOrder::Desc => cmp.reverse(),
    }
}

/// Every distinct tag across `notes`, sorted lexicographically.
pub fn collect_tags(notes: &[Note]) -> Vec<String> {
    notes
        .iter()
        .flat_map(|note| note.tags.iter().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
