use log::{debug, trace};
use serde::{de::DeserializeOwned, Serialize};

use crate::{KeyValueStore, Result};

/// Reads and parses the JSON blob stored under `key`.
///
/// Returns `Ok(None)` when nothing is stored; read and parse failures are
/// returned so the caller can decide to keep its current state.
pub fn load_json<T: DeserializeOwned>(storage: &dyn KeyValueStore, key: &str) -> Result<Option<T>> {
    debug!("Loading blob: {}", key);
    let Some(content) = storage.get(key)? else {
        trace!("Nothing stored under {}", key);
        return Ok(None);
    };

    let value = serde_json::from_str(&content)?;
    Ok(Some(value))
}

/// Serializes `value` and overwrites the blob stored under `key`.
pub fn save_json<T: Serialize + ?Sized>(
    storage: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<()> {
    trace!("Serializing blob {}", key);
    let json = serde_json::to_string(value)?;
    storage.set(key, &json)?;
    debug!("Saved blob {} ({} bytes)", key, json.len());
    Ok(())
}

// Helper method for parsing tags
pub fn parse_tags(tags: Option<String>) -> Vec<String> {
    tags.map(|t| {
        t.split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    })
    .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MemoryStore, PadError};

    #[test]
    fn load_json_missing_key_is_none() {
        let store = MemoryStore::new();
        let loaded: Option<Vec<String>> = load_json(&store, "absent").unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn save_then_load() {
        let store = MemoryStore::new();
        save_json(&store, "k", &vec!["a", "b"]).unwrap();
        let loaded: Option<Vec<String>> = load_json(&store, "k").unwrap();
        assert_eq!(loaded, Some(vec!["a".to_string(), "b".to_string()]));
    }

    #[test]
    fn corrupt_blob_is_a_serialization_error() {
        let store = MemoryStore::new();
        store.set("k", "{not json").unwrap();
        let err = load_json::<Vec<String>>(&store, "k").unwrap_err();
        assert!(matches!(err, PadError::Serialization(_)));
    }

    #[test]
    fn parse_tags_trims_and_drops_empties() {
        assert_eq!(
            parse_tags(Some(" work, ideas ,,urgent ".to_string())),
            vec!["work", "ideas", "urgent"]
        );
        assert!(parse_tags(None).is_empty());
    }
}
