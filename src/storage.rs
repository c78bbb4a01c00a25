//! Durable key-value storage for the session credential.
//!
//! The session core persists exactly two keys (the bearer token and the user
//! id) through this boundary so the state survives a restart. The contract is
//! deliberately the same as browser local storage: infallible from the
//! caller's side, last-write-wins, no concurrency guarantees beyond that.
//!
//! Two implementations are provided: [`MemoryStorage`] for tests and
//! ephemeral sessions, and [`FileStorage`], a JSON map on disk.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Durable string key-value storage.
///
/// Writes are best-effort: an implementation that cannot persist logs the
/// failure and keeps the in-memory value, mirroring how the rest of the core
/// treats storage as a cache of last resort rather than a source of errors.
pub trait KeyValueStorage: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

/// In-memory storage. Not durable; used by tests and throwaway sessions.
#[derive(Default)]
pub struct MemoryStorage {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.values.lock().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.values.lock().insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.values.lock().remove(key);
    }
}

/// File-backed storage: a flat JSON object at a fixed path.
///
/// The whole map is rewritten on every mutation. That is fine here; the
/// session core stores two short strings.
pub struct FileStorage {
    path: PathBuf,
    values: Mutex<HashMap<String, String>>,
}

impl FileStorage {
    /// Open the store at `path`, loading any existing contents.
    ///
    /// A missing file starts empty; an unreadable or corrupt file is logged
    /// and treated as empty rather than failing the process.
    pub fn open(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let values = match std::fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(map) => map,
                Err(e) => {
                    tracing::warn!("ignoring corrupt session file {}: {}", path.display(), e);
                    HashMap::new()
                }
            },
            Err(_) => HashMap::new(),
        };
        Self {
            path,
            values: Mutex::new(values),
        }
    }

    fn persist(&self, values: &HashMap<String, String>) {
        let contents = match serde_json::to_string_pretty(values) {
            Ok(contents) => contents,
            Err(e) => {
                tracing::warn!("failed to encode session file: {}", e);
                return;
            }
        };
        if let Err(e) = std::fs::write(&self.path, contents) {
            tracing::warn!("failed to write session file {}: {}", self.path.display(), e);
        }
    }
}

impl KeyValueStorage for FileStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.values.lock().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        let mut values = self.values.lock();
        values.insert(key.to_string(), value.to_string());
        self.persist(&values);
    }

    fn remove(&self, key: &str) {
        let mut values = self.values.lock();
        if values.remove(key).is_some() {
            self.persist(&values);
        }
    }
}
