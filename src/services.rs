//! Collaborators injected into the stores: storage handle, clock and id
//! generator, bundled as a [`StoreContext`].
use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc, Mutex,
};

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::{Config, KeyValueStore, DEFAULT_FOLDER_COLOR};

/// Source of the current time.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock in UTC.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        ManualClock {
            now: Mutex::new(start),
        }
    }

    pub fn set(&self, to: DateTime<Utc>) {
        if let Ok(mut now) = self.now.lock() {
            *now = to;
        }
    }

    pub fn advance(&self, by: Duration) {
        if let Ok(mut now) = self.now.lock() {
            *now += by;
        }
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        self.now
            .lock()
            .map(|now| *now)
            .unwrap_or_else(|poisoned| *poisoned.into_inner())
    }
}

/// Produces opaque record identifiers.
pub trait IdGenerator {
    fn next_id(&self) -> String;
}

/// Random v4 UUIDs.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn next_id(&self) -> String {
        Uuid::new_v4().to_string()
    }
}

/// `<prefix>-1`, `<prefix>-2`, ... Deterministic ids for tests and fixtures.
#[derive(Debug)]
pub struct SequentialIds {
    prefix: String,
    counter: AtomicU64,
}

impl SequentialIds {
    pub fn new(prefix: impl Into<String>) -> Self {
        SequentialIds {
            prefix: prefix.into(),
            counter: AtomicU64::new(0),
        }
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&self) -> String {
        let n = self.counter.fetch_add(1, Ordering::Relaxed) + 1;
        format!("{}-{}", self.prefix, n)
    }
}

/// Storage keys of the three persisted blobs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageKeys {
    pub notes: String,
    pub folders: String,
    pub filters: String,
}

impl Default for StorageKeys {
    fn default() -> Self {
        StorageKeys {
            notes: "anotherpad-notes".to_string(),
            folders: "anotherpad-folders".to_string(),
            filters: "anotherpad-filters".to_string(),
        }
    }
}

/// Everything a store needs from the outside world. Cloning shares the
/// underlying handles.
#[derive(Clone)]
pub struct StoreContext {
    pub storage: Arc<dyn KeyValueStore>,
    pub clock: Arc<dyn Clock>,
    pub ids: Arc<dyn IdGenerator>,
    pub keys: StorageKeys,
    pub default_folder_color: String,
}

impl StoreContext {
    /// System clock, UUID ids and the default keys over `storage`.
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        StoreContext {
            storage,
            clock: Arc::new(SystemClock),
            ids: Arc::new(UuidGenerator),
            keys: StorageKeys::default(),
            default_folder_color: DEFAULT_FOLDER_COLOR.to_string(),
        }
    }

    /// Takes keys and folder color from `config`.
    pub fn from_config(config: &Config, storage: Arc<dyn KeyValueStore>) -> Self {
        StoreContext {
            keys: StorageKeys {
                notes: config.notes_key.clone(),
                folders: config.folders_key.clone(),
                filters: config.filters_key.clone(),
            },
            default_folder_color: config.default_folder_color.clone(),
            ..Self::new(storage)
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_ids(mut self, ids: Arc<dyn IdGenerator>) -> Self {
        self.ids = ids;
        self
    }
}
