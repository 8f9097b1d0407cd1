//! The note store: notes collection, current selection and the active filter
//! configuration.
use std::collections::HashSet;

use log::{debug, error, info, warn};

use crate::{
    collect_tags, filter_notes, load_json, save_json, Note, NoteFilters, NotePatch, StoreContext,
    DEFAULT_NOTE_TITLE,
};

/// Owns the notes collection and everything derived from it.
///
/// Storage order is most-recent-first: [`NoteStore::create_note`] inserts at
/// the front. Every mutation rewrites the whole collection to storage; a
/// failed write is logged and the in-memory state stays authoritative.
pub struct NoteStore {
    ctx: StoreContext,
    notes: Vec<Note>,
    /// Always names a note present in `notes`
    current_note_id: Option<String>,
    filters: NoteFilters,
}

impl NoteStore {
    /// Creates the store and loads persisted notes and filters.
    pub fn open(ctx: StoreContext) -> Self {
        let mut store = NoteStore {
            ctx,
            notes: Vec::new(),
            current_note_id: None,
            filters: NoteFilters::default(),
        };
        store.load_notes();
        store.load_filters();
        info!(
            "Note store ready: {} notes, filters {}",
            store.notes.len(),
            store.filters
        );
        store
    }

    /// Replaces the collection with the persisted one.
    ///
    /// A missing blob leaves the collection as it is; an unreadable one is
    /// logged and also leaves it as it is. Returns the resulting note count.
    pub fn load_notes(&mut self) -> usize {
        match load_json::<Vec<Note>>(self.ctx.storage.as_ref(), &self.ctx.keys.notes) {
            Ok(Some(notes)) => {
                self.notes = sanitize_loaded(notes);
                if let Some(id) = &self.current_note_id {
                    if !self.notes.iter().any(|n| &n.id == id) {
                        debug!("Selected note {} vanished on reload", id);
                        self.current_note_id = None;
                    }
                }
                debug!("Loaded {} notes", self.notes.len());
            }
            Ok(None) => debug!("No stored notes under {}", self.ctx.keys.notes),
            Err(e) => error!("Error loading notes: {}", e),
        }
        self.notes.len()
    }

    /// Merges the persisted filter configuration over the defaults.
    pub fn load_filters(&mut self) {
        match load_json::<NoteFilters>(self.ctx.storage.as_ref(), &self.ctx.keys.filters) {
            Ok(Some(filters)) => self.filters = filters,
            Ok(None) => {}
            Err(e) => error!("Error loading filters: {}", e),
        }
    }

    fn save_notes(&self) {
        if let Err(e) = save_json(self.ctx.storage.as_ref(), &self.ctx.keys.notes, &self.notes) {
            error!("Error saving notes: {}", e);
        }
    }

    fn save_filters(&self) {
        if let Err(e) = save_json(self.ctx.storage.as_ref(), &self.ctx.keys.filters, &self.filters)
        {
            error!("Error saving filters: {}", e);
        }
    }

    fn allocate_id(&self) -> String {
        loop {
            let id = self.ctx.ids.next_id();
            if !self.notes.iter().any(|n| n.id == id) {
                return id;
            }
            warn!("Id generator returned existing note id {}, retrying", id);
        }
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.notes.iter().position(|n| n.id == id)
    }

    /// Creates a note at the head of the collection and selects it.
    ///
    /// `title` defaults to "Untitled Note" and `content` to empty.
    pub fn create_note(
        &mut self,
        title: Option<&str>,
        content: Option<&str>,
        folder_id: Option<&str>,
    ) -> Note {
        let note = Note::new(
            self.allocate_id(),
            title.unwrap_or(DEFAULT_NOTE_TITLE).to_string(),
            content.unwrap_or_default().to_string(),
            folder_id.map(str::to_string),
            self.ctx.clock.now(),
        );
        info!("Creating note {}", note.id);

        self.notes.insert(0, note.clone());
        self.current_note_id = Some(note.id.clone());
        self.save_notes();
        note
    }

    /// Merges `patch` into the note and stamps `updated_at`, even for an empty
    /// patch. Unknown ids are a no-op returning `None`.
    pub fn update_note(&mut self, id: &str, patch: NotePatch) -> Option<Note> {
        let Some(index) = self.position(id) else {
            debug!("update_note: no note {}", id);
            return None;
        };

        let now = self.ctx.clock.now();
        let note = &mut self.notes[index];
        patch.apply_to(note);
        note.touch(now);
        let updated = note.clone();

        debug!("Updated note {}", id);
        self.save_notes();
        Some(updated)
    }

    /// Removes the note. If it was selected, the new head (or nothing) is
    /// selected. Unknown ids are a no-op returning `None`.
    pub fn delete_note(&mut self, id: &str) -> Option<Note> {
        let index = self.position(id)?;
        let removed = self.notes.remove(index);

        if self.current_note_id.as_deref() == Some(id) {
            self.current_note_id = self.notes.first().map(|n| n.id.clone());
        }

        info!("Deleted note {}", id);
        self.save_notes();
        Some(removed)
    }

    /// Flips the pin state with a single write. Returns the new state, or
    /// `None` for an unknown id.
    pub fn toggle_pin(&mut self, id: &str) -> Option<bool> {
        let pinned = !self.notes[self.position(id)?].is_pinned;
        self.update_note(
            id,
            NotePatch {
                is_pinned: Some(pinned),
                ..Default::default()
            },
        )
        .map(|note| note.is_pinned)
    }

    /// Selects an existing note. Unknown ids leave the selection unchanged.
    pub fn select_note(&mut self, id: &str) -> bool {
        if self.position(id).is_none() {
            return false;
        }
        self.current_note_id = Some(id.to_string());
        true
    }

    pub fn clear_selection(&mut self) {
        self.current_note_id = None;
    }

    pub fn current_note_id(&self) -> Option<&str> {
        self.current_note_id.as_deref()
    }

    pub fn current_note(&self) -> Option<&Note> {
        let id = self.current_note_id.as_deref()?;
        self.notes.iter().find(|n| n.id == id)
    }

    /// All notes in storage order.
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn get_note(&self, id: &str) -> Option<&Note> {
        self.notes.iter().find(|n| n.id == id)
    }

    /// Every distinct tag in use, sorted.
    pub fn all_tags(&self) -> Vec<String> {
        collect_tags(&self.notes)
    }

    /// The collection filtered and sorted by the active configuration.
    pub fn filtered_notes(&self) -> Vec<Note> {
        filter_notes(&self.notes, &self.filters)
    }

    /// Like [`NoteStore::filtered_notes`] but with an arbitrary configuration;
    /// the active one is left alone.
    pub fn query_notes(&self, filters: &NoteFilters) -> Vec<Note> {
        filter_notes(&self.notes, filters)
    }

    pub fn filters(&self) -> &NoteFilters {
        &self.filters
    }

    /// Replaces the active configuration, persisting it if it changed.
    pub fn set_filters(&mut self, filters: NoteFilters) {
        if filters == self.filters {
            return;
        }
        debug!("Filters changed to {}", filters);
        self.filters = filters;
        self.save_filters();
    }

    /// Edits the active configuration in place, persisting it if it changed.
    pub fn update_filters(&mut self, edit: impl FnOnce(&mut NoteFilters)) {
        let mut filters = self.filters.clone();
        edit(&mut filters);
        self.set_filters(filters);
    }

    pub fn reset_filters(&mut self) {
        self.set_filters(NoteFilters::default());
    }
}

/// Drops duplicate ids (first occurrence wins) and repairs timestamps that
/// went backwards.
fn sanitize_loaded(notes: Vec<Note>) -> Vec<Note> {
    let mut seen = HashSet::with_capacity(notes.len());
    notes
        .into_iter()
        .filter(|note| {
            let fresh = seen.insert(note.id.clone());
            if !fresh {
                warn!("Dropping stored note with duplicate id {}", note.id);
            }
            fresh
        })
        .map(|mut note| {
            if note.updated_at < note.created_at {
                warn!("Note {} was updated before it was created, clamping", note.id);
                note.updated_at = note.created_at;
            }
            note
        })
        .collect()
}
