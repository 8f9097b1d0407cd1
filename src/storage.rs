//! Key-value persistence backends.
//!
//! Each store keeps its whole collection under a single key, so a backend only
//! needs to read, overwrite and remove string blobs. Writes either succeed or
//! fail immediately; there are no retries.
use std::{
    collections::HashMap,
    fs,
    io::Write,
    path::{Path, PathBuf},
    sync::Mutex,
};

use log::{debug, error, info, trace};
use tempfile::NamedTempFile;

use crate::{PadError, Result};

/// A synchronous string key-value store.
pub trait KeyValueStore {
    /// Returns the blob stored under `key`, or `None` if nothing is stored.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Overwrites the blob stored under `key`.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Removes `key`; removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<()>;
}

/// In-memory backend, with an optional quota on the total stored bytes.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
    quota: Option<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store that rejects writes once keys plus values exceed `quota` bytes.
    pub fn with_quota(quota: usize) -> Self {
        MemoryStore {
            entries: Mutex::new(HashMap::new()),
            quota: Some(quota),
        }
    }

    /// Total bytes currently held, counting keys and values.
    pub fn used_bytes(&self) -> usize {
        self.entries
            .lock()
            .map(|entries| entries.iter().map(|(k, v)| k.len() + v.len()).sum())
            .unwrap_or(0)
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.entries
            .lock()
            .map_err(|_| PadError::LockAcquisitionFailed {
                message: "Failed to acquire lock on memory store".to_string(),
            })
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.lock()?;

        if let Some(quota) = self.quota {
            let others: usize = entries
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(k, v)| k.len() + v.len())
                .sum();
            let needed = others + key.len() + value.len();
            if needed > quota {
                return Err(PadError::StorageFull {
                    key: key.to_string(),
                    needed,
                    quota,
                });
            }
        }

        entries.insert(key.to_string(), value.to_string());
        trace!("Stored {} bytes under {}", value.len(), key);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.lock()?.remove(key);
        Ok(())
    }
}

/// Whether `key` can name a blob on every backend: a single file name made of
/// ASCII alphanumerics, `-`, `_` and `.`.
pub fn is_valid_key(key: &str) -> bool {
    !key.is_empty()
        && key != "."
        && key != ".."
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}

/// Directory backend: one `<key>.json` file per key.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
    quota: Option<usize>,
}

impl FileStore {
    /// Opens (creating if needed) a store rooted at `dir`.
    pub fn open(dir: impl Into<PathBuf>, quota: Option<usize>) -> Result<Self> {
        let dir = dir.into();
        if !dir.exists() {
            debug!("Storage directory does not exist, creating: {}", dir.display());
            fs::create_dir_all(&dir).map_err(|e| {
                error!("Failed to create storage directory {}: {}", dir.display(), e);
                PadError::Io(e)
            })?;
        }
        info!("Opened file store at {}", dir.display());
        Ok(FileStore { dir, quota })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Helper method to get the file path for a key
    fn key_path(&self, key: &str) -> Result<PathBuf> {
        if !is_valid_key(key) {
            return Err(PadError::InvalidKey {
                key: key.to_string(),
            });
        }
        Ok(self.dir.join(format!("{}.json", key)))
    }

    /// Bytes used by every stored key except `skip`.
    fn used_bytes_except(&self, skip: &Path) -> Result<usize> {
        let mut total = 0;
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path == skip || !path.extension().is_some_and(|ext| ext == "json") {
                continue;
            }
            total += fs::metadata(&path)?.len() as usize;
        }
        Ok(total)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.key_path(key)?;
        if !path.exists() {
            trace!("No stored blob for {}", key);
            return Ok(None);
        }
        let content = fs::read_to_string(&path).map_err(|e| {
            error!("Failed to read {}: {}", path.display(), e);
            PadError::Io(e)
        })?;
        Ok(Some(content))
    }

    /// Writes through a temporary file in the same directory, then renames it
    /// over the target so readers never see a partial blob.
    fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.key_path(key)?;

        if let Some(quota) = self.quota {
            let needed = self.used_bytes_except(&path)? + value.len();
            if needed > quota {
                return Err(PadError::StorageFull {
                    key: key.to_string(),
                    needed,
                    quota,
                });
            }
        }

        let mut temp_file = NamedTempFile::new_in(&self.dir).map_err(|e| {
            error!("Failed to create temporary file: {}", e);
            PadError::Io(e)
        })?;
        temp_file.write_all(value.as_bytes())?;
        temp_file.flush()?;

        temp_file.persist(&path).map_err(|e| {
            error!("Failed to persist file {}: {}", path.display(), e.error);
            PadError::Io(e.error)
        })?;

        trace!("Wrote {} bytes to {}", value.len(), path.display());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let path = self.key_path(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(PadError::Io(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn memory_store_round_trips_and_removes() {
        let store = MemoryStore::new();
        assert_eq!(store.get("k").unwrap(), None);

        store.set("k", "[1,2]").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("[1,2]"));

        store.remove("k").unwrap();
        store.remove("k").unwrap();
        assert_eq!(store.get("k").unwrap(), None);
    }

    #[test]
    fn memory_store_enforces_quota_on_total_size() {
        let store = MemoryStore::with_quota(10);
        store.set("a", "1234").unwrap();

        let err = store.set("b", "123456").unwrap_err();
        assert!(matches!(err, PadError::StorageFull { needed: 12, quota: 10, .. }));
        assert_eq!(store.get("b").unwrap(), None);

        // Overwriting an existing key only counts the new value.
        store.set("a", "12345678").unwrap();
        assert_eq!(store.used_bytes(), 9);
    }

    #[test]
    fn file_store_writes_one_file_per_key() {
        let dir = tempdir().unwrap();
        let store = FileStore::open(dir.path().join("data"), None).unwrap();

        store.set("anotherpad-notes", "[]").unwrap();
        assert!(dir.path().join("data/anotherpad-notes.json").exists());
        assert_eq!(store.get("anotherpad-notes").unwrap().as_deref(), Some("[]"));

        store.set("anotherpad-notes", "[{}]").unwrap();
        assert_eq!(store.get("anotherpad-notes").unwrap().as_deref(), Some("[{}]"));

        store.remove("anotherpad-notes").unwrap();
        assert_eq!(store.get("anotherpad-notes").unwrap(), None);
    }

    #[test]
    fn file_store_rejects_path_like_keys() {
        let dir = tempdir().unwrap();
        let store = FileStore::open(dir.path(), None).unwrap();

        for key in ["", "..", "a/b", "../escape", "with space"] {
            assert!(
                matches!(store.set(key, "x"), Err(PadError::InvalidKey { .. })),
                "key {:?} should be rejected",
                key
            );
        }
    }

    #[test]
    fn file_store_quota_leaves_previous_blob_in_place() {
        let dir = tempdir().unwrap();
        let store = FileStore::open(dir.path(), Some(8)).unwrap();

        store.set("k", "1234").unwrap();
        let err = store.set("k", "123456789").unwrap_err();
        assert!(matches!(err, PadError::StorageFull { .. }));
        assert_eq!(store.get("k").unwrap().as_deref(), Some("1234"));
    }
}
