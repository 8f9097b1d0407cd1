//! CLI module for the anotherpad application
//!
//! This module handles the command-line interface for interacting with the
//! note and folder stores.
use std::{
    collections::HashMap,
    io::{stdin, stdout, Write},
    sync::Arc,
};

use log::{info, warn};

use crate::{
    parse_tags, Commands, Config, FileStore, FolderCommands, FolderFilter, FolderPatch,
    FolderStore, Note, NoteFilters, NotePatch, NoteStore, PadError, Result, SortBy, SortOrder,
    StoreContext,
};

/// CLI Application handler - processes CLI commands against the stores
pub struct App {
    notes: NoteStore,
    folders: FolderStore,

    /// Whether to display verbose output
    verbose: bool,
}

/// One-off overrides applied on top of the saved filters by `list`.
struct ListOverrides {
    search: Option<String>,
    tag: Option<String>,
    folder: Option<String>,
    all_folders: bool,
    sort_by: Option<SortBy>,
    order: Option<SortOrder>,
    pinned: bool,
}

/// Changes to the saved filters requested by `filter`.
struct FilterChanges {
    search: Option<String>,
    tag: Option<String>,
    no_tag: bool,
    folder: Option<String>,
    all_folders: bool,
    sort_by: Option<SortBy>,
    order: Option<SortOrder>,
    pinned_only: Option<bool>,
    reset: bool,
}

impl FilterChanges {
    fn is_empty(&self) -> bool {
        self.search.is_none()
            && self.tag.is_none()
            && !self.no_tag
            && self.folder.is_none()
            && !self.all_folders
            && self.sort_by.is_none()
            && self.order.is_none()
            && self.pinned_only.is_none()
            && !self.reset
    }
}

impl App {
    /// Create a new CLI application over already opened stores
    pub fn new(notes: NoteStore, folders: FolderStore, verbose: bool) -> Self {
        Self {
            notes,
            folders,
            verbose,
        }
    }

    /// Opens the file-backed stores described by `config`
    pub fn open(config: &Config, verbose: bool) -> Result<Self> {
        let storage = FileStore::open(&config.data_dir, config.storage_quota_bytes)?;
        let ctx = StoreContext::from_config(config, Arc::new(storage));
        Ok(Self::new(
            NoteStore::open(ctx.clone()),
            FolderStore::open(ctx),
            verbose,
        ))
    }

    pub fn notes(&self) -> &NoteStore {
        &self.notes
    }

    pub fn folders(&self) -> &FolderStore {
        &self.folders
    }

    /// Run the CLI application with the given command
    pub fn run(&mut self, command: Commands) -> Result<()> {
        match command {
            Commands::New {
                title,
                content,
                folder,
                tags,
            } => self.create_note(title, content, folder, tags)?,

            Commands::List {
                search,
                tag,
                folder,
                all_folders,
                sort_by,
                order,
                pinned,
                json,
            } => {
                let overrides = ListOverrides {
                    search,
                    tag,
                    folder,
                    all_folders,
                    sort_by,
                    order,
                    pinned,
                };
                self.list_notes(overrides, json)?
            }

            Commands::Show { id, json } => self.show_note(&id, json)?,

            Commands::Edit {
                id,
                title,
                content,
                tags,
                folder,
                no_folder,
            } => {
                let patch = NotePatch {
                    title,
                    content,
                    tags: tags.map(|t| parse_tags(Some(t))),
                    is_pinned: None,
                    folder_id: match (folder, no_folder) {
                        (Some(folder), _) => Some(Some(folder)),
                        (None, true) => Some(None),
                        (None, false) => None,
                    },
                };
                self.edit_note(&id, patch)?
            }

            Commands::Delete { id, force } => self.handle_delete(&id, force)?,

            Commands::Pin { id } => match self.notes.toggle_pin(&id) {
                Some(true) => println!("Pinned note {}", id),
                Some(false) => println!("Unpinned note {}", id),
                None => return Err(PadError::NoteNotFound { id }),
            },

            Commands::Tags => self.list_tags(),

            Commands::Filter {
                search,
                tag,
                no_tag,
                folder,
                all_folders,
                sort_by,
                order,
                pinned_only,
                reset,
            } => self.handle_filter(FilterChanges {
                search,
                tag,
                no_tag,
                folder,
                all_folders,
                sort_by,
                order,
                pinned_only,
                reset,
            }),

            Commands::Folder(command) => self.handle_folder(command)?,
        }

        Ok(())
    }

    fn warn_unknown_folder(&self, folder_id: &str) {
        if self.folders.get_folder(folder_id).is_none() {
            warn!("Folder {} does not exist", folder_id);
            eprintln!("Warning: no folder with ID {}", folder_id);
        }
    }

    fn create_note(
        &mut self,
        title: Option<String>,
        content: Option<String>,
        folder: Option<String>,
        tags: Option<String>,
    ) -> Result<()> {
        if let Some(folder_id) = &folder {
            self.warn_unknown_folder(folder_id);
        }

        let mut note =
            self.notes
                .create_note(title.as_deref(), content.as_deref(), folder.as_deref());

        let parsed_tags = parse_tags(tags);
        if !parsed_tags.is_empty() {
            let patch = NotePatch {
                tags: Some(parsed_tags),
                ..Default::default()
            };
            if let Some(updated) = self.notes.update_note(&note.id, patch) {
                note = updated;
            }
        }

        info!("Created note {}", note.id);
        println!("Note created with ID: {}", note.id);
        Ok(())
    }

    fn list_notes(&self, overrides: ListOverrides, json: bool) -> Result<()> {
        let mut filters: NoteFilters = self.notes.filters().clone();
        if let Some(search) = overrides.search {
            filters.search = search;
        }
        if let Some(tag) = overrides.tag {
            filters.tag = Some(tag);
        }
        if let Some(folder) = overrides.folder {
            filters.folder_id = FolderFilter::Only(folder);
        } else if overrides.all_folders {
            filters.folder_id = FolderFilter::All;
        }
        if let Some(sort_by) = overrides.sort_by {
            filters.sort_by = sort_by;
        }
        if let Some(order) = overrides.order {
            filters.sort_order = order;
        }
        if overrides.pinned {
            filters.show_pinned_only = true;
        }

        if self.verbose {
            println!("Filters: {}", filters);
        }

        let notes = self.notes.query_notes(&filters);
        self.display_notes(&notes, json, false)
    }

    fn show_note(&self, id: &str, json: bool) -> Result<()> {
        let note = self
            .notes
            .get_note(id)
            .ok_or_else(|| PadError::NoteNotFound { id: id.to_string() })?;

        if json {
            println!("{}", serde_json::to_string_pretty(note)?);
        } else {
            self.display_notes_text(std::slice::from_ref(note), true);
        }
        Ok(())
    }

    fn edit_note(&mut self, id: &str, patch: NotePatch) -> Result<()> {
        if let Some(Some(folder_id)) = &patch.folder_id {
            self.warn_unknown_folder(folder_id);
        }

        let note = self
            .notes
            .update_note(id, patch)
            .ok_or_else(|| PadError::NoteNotFound { id: id.to_string() })?;
        println!("Note {} updated successfully", note.id);
        Ok(())
    }

    fn handle_delete(&mut self, id: &str, force: bool) -> Result<()> {
        let note = self
            .notes
            .get_note(id)
            .cloned()
            .ok_or_else(|| PadError::NoteNotFound { id: id.to_string() })?;

        if !force {
            println!("You are about to delete the following note:");
            println!("ID:     {}", note.id);
            println!("Title:  {}", note.title);
            println!("Tags:   {}", note.tags.join(", "));
            println!("Created: {}", note.created_at.format("%Y-%m-%d %H:%M:%S"));

            if !confirm("Are you sure you want to delete this note?")? {
                println!("Deletion cancelled.");
                return Ok(());
            }
        }

        self.notes.delete_note(id);
        println!("Note '{}' ({}) has been deleted.", note.title, note.id);
        Ok(())
    }

    fn list_tags(&self) {
        let tags = self.notes.all_tags();
        if tags.is_empty() {
            println!("No tags in use.");
            return;
        }

        let mut counts: HashMap<&str, usize> = HashMap::new();
        for note in self.notes.notes() {
            for tag in &note.tags {
                *counts.entry(tag.as_str()).or_default() += 1;
            }
        }
        for tag in &tags {
            println!(
                "{} ({})",
                console::style(format!("#{}", tag)).cyan(),
                counts.get(tag.as_str()).copied().unwrap_or(0)
            );
        }
    }

    fn handle_filter(&mut self, changes: FilterChanges) {
        if changes.is_empty() {
            println!("{}", self.notes.filters());
            return;
        }

        self.notes.update_filters(|filters| {
            if changes.reset {
                *filters = NoteFilters::default();
            }
            if let Some(search) = changes.search {
                filters.search = search;
            }
            if let Some(tag) = changes.tag {
                filters.tag = Some(tag);
            } else if changes.no_tag {
                filters.tag = None;
            }
            if let Some(folder) = changes.folder {
                filters.folder_id = FolderFilter::Only(folder);
            } else if changes.all_folders {
                filters.folder_id = FolderFilter::All;
            }
            if let Some(sort_by) = changes.sort_by {
                filters.sort_by = sort_by;
            }
            if let Some(order) = changes.order {
                filters.sort_order = order;
            }
            if let Some(pinned_only) = changes.pinned_only {
                filters.show_pinned_only = pinned_only;
            }
        });
        println!("Filters saved: {}", self.notes.filters());
    }

    fn handle_folder(&mut self, command: FolderCommands) -> Result<()> {
        match command {
            FolderCommands::Create { name, color } => {
                let folder = self.folders.create_folder(&name, color.as_deref());
                println!("Folder created with ID: {}", folder.id);
            }

            FolderCommands::List { json } => {
                let folders = self.folders.folders();
                if json {
                    println!("{}", serde_json::to_string_pretty(folders)?);
                } else if folders.is_empty() {
                    println!("No folders.");
                } else {
                    for folder in folders {
                        let count = self
                            .notes
                            .notes()
                            .iter()
                            .filter(|n| n.folder_id.as_deref() == Some(folder.id.as_str()))
                            .count();
                        println!(
                            "{} | {} {} ({} notes)",
                            folder.id,
                            console::style(&folder.name).bold(),
                            folder.color.as_deref().unwrap_or(""),
                            count
                        );
                    }
                }
            }

            FolderCommands::Rename { id, name } => {
                let patch = FolderPatch {
                    name: Some(name),
                    ..Default::default()
                };
                self.folders
                    .update_folder(&id, patch)
                    .ok_or(PadError::FolderNotFound { id })?;
                println!("Folder renamed");
            }

            FolderCommands::Color { id, color } => {
                let patch = FolderPatch {
                    color: Some(Some(color)),
                    ..Default::default()
                };
                self.folders
                    .update_folder(&id, patch)
                    .ok_or(PadError::FolderNotFound { id })?;
                println!("Folder color updated");
            }

            FolderCommands::Delete { id, force } => {
                let folder = self
                    .folders
                    .get_folder(&id)
                    .cloned()
                    .ok_or_else(|| PadError::FolderNotFound { id: id.clone() })?;
                let referencing = self
                    .notes
                    .notes()
                    .iter()
                    .filter(|n| n.folder_id.as_deref() == Some(id.as_str()))
                    .count();

                if !force {
                    println!("You are about to delete folder '{}' ({}).", folder.name, folder.id);
                    if referencing > 0 {
                        println!("{} notes will keep pointing at it.", referencing);
                    }
                    if !confirm("Are you sure you want to delete this folder?")? {
                        println!("Deletion cancelled.");
                        return Ok(());
                    }
                }

                self.folders.delete_folder(&id);
                println!("Folder '{}' ({}) has been deleted.", folder.name, folder.id);
            }
        }
        Ok(())
    }

    /// Display notes in the requested format
    fn display_notes(&self, notes: &[Note], json: bool, detailed: bool) -> Result<()> {
        if json {
            println!("{}", serde_json::to_string_pretty(notes)?);
            return Ok(());
        }

        if notes.is_empty() {
            println!("No notes found matching the criteria.");
            return Ok(());
        }

        self.display_notes_text(notes, detailed);
        println!(
            "\nFound {} note{}",
            notes.len(),
            if notes.len() == 1 { "" } else { "s" }
        );
        Ok(())
    }

    /// Display notes in text format
    fn display_notes_text(&self, notes: &[Note], detailed: bool) {
        let term_width = terminal_size::terminal_size()
            .map(|(w, _)| w.0 as usize)
            .unwrap_or(80);

        for (i, note) in notes.iter().enumerate() {
            if i > 0 {
                println!("{}", "-".repeat(term_width.min(50)));
            }

            let updated_at = note.updated_at.format("%Y-%m-%d %H:%M");
            let pin = if note.is_pinned {
                console::style("* ").yellow().to_string()
            } else {
                String::new()
            };
            println!("ID: {} | Updated: {}", note.id, updated_at);
            println!("Title: {}{}", pin, console::style(&note.title).bold());

            if let Some(folder_id) = &note.folder_id {
                match self.folders.get_folder(folder_id) {
                    Some(folder) => println!("Folder: {}", folder.name),
                    None => println!("Folder: {} (missing)", folder_id),
                }
            }

            if !note.tags.is_empty() {
                let tags = note
                    .tags
                    .iter()
                    .map(|tag| format!("#{}", tag))
                    .collect::<Vec<_>>()
                    .join(" ");
                println!("Tags: {}", console::style(tags).cyan());
            }

            if detailed {
                println!("\n{}", note.content);
            } else {
                let preview = content_preview(&note.content, 100);
                if !preview.is_empty() {
                    println!("\n{}", preview);
                }
            }
        }
    }
}

/// First non-empty line, cut to `max_chars` characters
fn content_preview(content: &str, max_chars: usize) -> String {
    let first_line = content
        .lines()
        .find(|line| !line.trim().is_empty())
        .unwrap_or("");

    if first_line.chars().count() <= max_chars {
        first_line.to_string()
    } else {
        let cut: String = first_line.chars().take(max_chars).collect();
        format!("{}...", cut)
    }
}

fn confirm(question: &str) -> Result<bool> {
    print!("{} [y/N]: ", question);
    stdout().flush().map_err(PadError::Io)?;

    let mut input = String::new();
    stdin().read_line(&mut input).map_err(PadError::Io)?;
    let input = input.trim().to_lowercase();
    Ok(input == "y" || input == "yes")
}
