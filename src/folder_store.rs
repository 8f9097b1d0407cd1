//! The folder store: folders collection and the current folder selection.
use std::collections::HashSet;

use log::{debug, error, info, warn};

use crate::{load_json, save_json, Folder, FolderPatch, StoreContext};

/// Owns the folders collection. Folders are kept in creation order.
///
/// Notes refer to folders by id only; nothing here looks at notes, so deleting
/// a folder leaves notes pointing at it untouched.
pub struct FolderStore {
    ctx: StoreContext,
    folders: Vec<Folder>,
    /// Not validated: may name a folder that does not exist
    current_folder_id: Option<String>,
}

impl FolderStore {
    /// Creates the store and loads persisted folders.
    pub fn open(ctx: StoreContext) -> Self {
        let mut store = FolderStore {
            ctx,
            folders: Vec::new(),
            current_folder_id: None,
        };
        store.load_folders();
        info!("Folder store ready: {} folders", store.folders.len());
        store
    }

    /// Replaces the collection with the persisted one; failures are logged and
    /// leave the collection as it is.
    pub fn load_folders(&mut self) -> usize {
        match load_json::<Vec<Folder>>(self.ctx.storage.as_ref(), &self.ctx.keys.folders) {
            Ok(Some(folders)) => {
                let mut seen = HashSet::with_capacity(folders.len());
                self.folders = folders
                    .into_iter()
                    .filter(|folder| {
                        let fresh = seen.insert(folder.id.clone());
                        if !fresh {
                            warn!("Dropping stored folder with duplicate id {}", folder.id);
                        }
                        fresh
                    })
                    .collect();
                debug!("Loaded {} folders", self.folders.len());
            }
            Ok(None) => debug!("No stored folders under {}", self.ctx.keys.folders),
            Err(e) => error!("Error loading folders: {}", e),
        }
        self.folders.len()
    }

    fn save_folders(&self) {
        if let Err(e) = save_json(self.ctx.storage.as_ref(), &self.ctx.keys.folders, &self.folders)
        {
            error!("Error saving folders: {}", e);
        }
    }

    fn allocate_id(&self) -> String {
        loop {
            let id = self.ctx.ids.next_id();
            if !self.folders.iter().any(|f| f.id == id) {
                return id;
            }
            warn!("Id generator returned existing folder id {}, retrying", id);
        }
    }

    /// Appends a new folder. `color` falls back to the configured default.
    pub fn create_folder(&mut self, name: &str, color: Option<&str>) -> Folder {
        let folder = Folder::new(
            self.allocate_id(),
            name.to_string(),
            color
                .unwrap_or(self.ctx.default_folder_color.as_str())
                .to_string(),
            self.ctx.clock.now(),
        );
        info!("Creating folder {} ({})", folder.id, folder.name);

        self.folders.push(folder.clone());
        self.save_folders();
        folder
    }

    /// Merges `patch` into the folder. Unknown ids are a no-op returning `None`.
    pub fn update_folder(&mut self, id: &str, patch: FolderPatch) -> Option<Folder> {
        let folder = self.folders.iter_mut().find(|f| f.id == id)?;
        patch.apply_to(folder);
        let updated = folder.clone();

        debug!("Updated folder {}", id);
        self.save_folders();
        Some(updated)
    }

    /// Removes the folder and clears the selection if it pointed here.
    /// Unknown ids are a no-op returning `None`.
    pub fn delete_folder(&mut self, id: &str) -> Option<Folder> {
        let index = self.folders.iter().position(|f| f.id == id)?;
        let removed = self.folders.remove(index);

        if self.current_folder_id.as_deref() == Some(id) {
            self.current_folder_id = None;
        }

        info!("Deleted folder {}", id);
        self.save_folders();
        Some(removed)
    }

    /// Sets the selection without checking that the folder exists.
    pub fn select_folder(&mut self, id: Option<&str>) {
        self.current_folder_id = id.map(str::to_string);
    }

    pub fn current_folder_id(&self) -> Option<&str> {
        self.current_folder_id.as_deref()
    }

    /// The selected folder, if the selection names one that exists.
    pub fn current_folder(&self) -> Option<&Folder> {
        let id = self.current_folder_id.as_deref()?;
        self.get_folder(id)
    }

    pub fn folders(&self) -> &[Folder] {
        &self.folders
    }

    pub fn get_folder(&self, id: &str) -> Option<&Folder> {
        self.folders.iter().find(|f| f.id == id)
    }
}
