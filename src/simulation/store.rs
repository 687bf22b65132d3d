//! Key-value persistence for networks and UI configuration.
//!
//! Values are JSON strings. Storage failures are deliberately swallowed into
//! "no value present": losing a save falls back to a random population,
//! which is an acceptable degraded mode.

use std::collections::HashMap;
use std::path::PathBuf;

use serde::Serialize;
use serde::de::DeserializeOwned;

/// Persisted snapshot of the best network seen so far.
pub const BEST_NETWORK: &str = "best-network";
/// Manually saved backup network slot.
pub const BACKUP_NETWORK: &str = "backup-network";
/// Mutation rate chosen in the UI.
pub const MUTATION_RATE: &str = "mutation-rate";
/// Population size chosen in the UI.
pub const CARS_QUANTITY: &str = "cars-quantity";
/// Hidden-layer sizes as comma-separated ints.
pub const NEURONS: &str = "neurons";

/// Key-value store with JSON-encoded values.
pub trait KeyValueStore: Send {
    /// Returns the raw JSON for a key, if present.
    fn get_raw(&self, key: &str) -> Option<String>;
    /// Writes the raw JSON for a key.
    fn set_raw(&mut self, key: &str, value: String);
    /// Removes a key; true when a value was present.
    fn remove(&mut self, key: &str) -> bool;
}

/// Reads and decodes a value; decode failures read as absent.
pub fn get_json<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Option<T> {
    let raw = store.get_raw(key)?;
    serde_json::from_str(&raw).ok()
}

/// Encodes and writes a value.
pub fn set_json<T: Serialize>(store: &mut dyn KeyValueStore, key: &str, value: &T) {
    match serde_json::to_string(value) {
        Ok(raw) => store.set_raw(key, raw),
        Err(e) => eprintln!("store: failed to encode {key}: {e}"),
    }
}

/// In-memory store used by tests and as a fallback.
#[derive(Debug, Default)]
pub struct MemoryStore {
    map: HashMap<String, String>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_raw(&self, key: &str) -> Option<String> {
        self.map.get(key).cloned()
    }

    fn set_raw(&mut self, key: &str, value: String) {
        self.map.insert(key.to_string(), value);
    }

    fn remove(&mut self, key: &str) -> bool {
        self.map.remove(key).is_some()
    }
}

/// File-backed store: one JSON object holding every key.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    map: HashMap<String, String>,
}

impl FileStore {
    /// Opens the store, reading any existing file. A missing or corrupt
    /// file yields an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let map = std::fs::read_to_string(&path)
            .ok()
            .and_then(|json| serde_json::from_str(&json).ok())
            .unwrap_or_default();
        Self { path, map }
    }

    fn flush(&self) {
        match serde_json::to_string_pretty(&self.map) {
            Ok(json) => {
                if let Err(e) = std::fs::write(&self.path, json) {
                    eprintln!("store: failed to write {}: {e}", self.path.display());
                }
            }
            Err(e) => eprintln!("store: failed to encode store file: {e}"),
        }
    }
}

impl KeyValueStore for FileStore {
    fn get_raw(&self, key: &str) -> Option<String> {
        self.map.get(key).cloned()
    }

    fn set_raw(&mut self, key: &str, value: String) {
        self.map.insert(key.to_string(), value);
        self.flush();
    }

    fn remove(&mut self, key: &str) -> bool {
        let removed = self.map.remove(key).is_some();
        if removed {
            self.flush();
        }
        removed
    }
}
