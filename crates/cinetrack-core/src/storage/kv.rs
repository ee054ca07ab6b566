//! Persistent key-value store
//!
//! A browser-local-storage equivalent: one JSON file holding a string-keyed
//! map of serialized values. The file is the sole source of truth; every
//! mutation performs a full read-modify-write cycle and replaces the file
//! atomically (write to temp file, then rename).
//!
//! Concurrent writers are not coordinated. Two processes mutating the store
//! at the same time race with last-writer-wins semantics, matching the
//! shared-storage model this store reproduces. Do not "fix" this by adding
//! locking without also changing the documented concurrency contract.
//!
//! A missing or unparseable store file reads as empty. A value that fails to
//! deserialize is treated as absent rather than an error.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

use crate::config::Config;
use crate::storage::error::{StorageError, StorageResult};

/// File-backed string-keyed store
#[derive(Debug, Clone)]
pub struct KvStore {
    path: PathBuf,
}

impl KvStore {
    /// Create a store backed by the given file path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Create a store at the configured location, ensuring the data
    /// directory exists
    pub fn open(config: &Config) -> StorageResult<Self> {
        let path = config.store_path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| StorageError::CreateDirectory {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        Ok(Self::new(path))
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get the raw string value for a key
    pub fn get(&self, key: &str) -> Option<String> {
        self.read_map().remove(key)
    }

    /// Set the raw string value for a key
    pub fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let mut map = self.read_map();
        map.insert(key.to_string(), value.to_string());
        self.write_map(&map)
    }

    /// Remove a key; removing an absent key is a no-op
    pub fn remove(&self, key: &str) -> StorageResult<()> {
        let mut map = self.read_map();
        if map.remove(key).is_some() {
            self.write_map(&map)?;
        }
        Ok(())
    }

    /// Check whether a key is present
    pub fn contains(&self, key: &str) -> bool {
        self.read_map().contains_key(key)
    }

    /// Remove every key
    pub fn clear_all(&self) -> StorageResult<()> {
        self.write_map(&BTreeMap::new())
    }

    /// Deserialize the value stored under a key
    ///
    /// Returns `None` for an absent key, and also for a value that fails to
    /// parse: corrupt data is reset-on-read, never a fatal error.
    pub fn get_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.get(key)?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(err) => {
                warn!(key, %err, "discarding corrupt stored value");
                None
            }
        }
    }

    /// Serialize a value and store it under a key
    pub fn set_json<T: Serialize>(&self, key: &str, value: &T) -> StorageResult<()> {
        let raw = serde_json::to_string(value).map_err(|source| StorageError::Serialize {
            key: key.to_string(),
            source,
        })?;
        self.set(key, &raw)
    }

    /// Read the full map, treating a missing or corrupt file as empty
    fn read_map(&self) -> BTreeMap<String, String> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(_) => return BTreeMap::new(),
        };
        match serde_json::from_str(&raw) {
            Ok(map) => map,
            Err(err) => {
                warn!(path = %self.path.display(), %err, "store file is corrupt, starting empty");
                BTreeMap::new()
            }
        }
    }

    /// Serialize and atomically replace the backing file
    fn write_map(&self, map: &BTreeMap<String, String>) -> StorageResult<()> {
        let raw = serde_json::to_vec_pretty(map).map_err(|source| StorageError::Serialize {
            key: "(store)".to_string(),
            source,
        })?;
        atomic_write(&self.path, &raw)
    }
}

/// Write data to a file atomically
///
/// Writes to a temporary file in the same directory, syncs it, then renames
/// it over the target path so the file is never left half-written.
fn atomic_write(path: &Path, data: &[u8]) -> StorageResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| StorageError::CreateDirectory {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let temp_path = path.with_extension("tmp");

    let mut file = File::create(&temp_path)
        .map_err(|source| StorageError::from_io(source, temp_path.clone()))?;
    file.write_all(data)
        .map_err(|source| StorageError::from_io(source, temp_path.clone()))?;
    file.sync_all()
        .map_err(|source| StorageError::from_io(source, temp_path.clone()))?;

    fs::rename(&temp_path, path).map_err(|source| StorageError::AtomicRename {
        from: temp_path,
        to: path.to_path_buf(),
        source,
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use tempfile::TempDir;

    fn test_store(temp_dir: &TempDir) -> KvStore {
        KvStore::new(temp_dir.path().join("store.json"))
    }

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Sample {
        name: String,
        count: u32,
    }

    #[test]
    fn test_get_missing_key() {
        let temp_dir = TempDir::new().unwrap();
        let store = test_store(&temp_dir);

        assert!(store.get("absent").is_none());
        assert!(!store.contains("absent"));
    }

    #[test]
    fn test_set_and_get() {
        let temp_dir = TempDir::new().unwrap();
        let store = test_store(&temp_dir);

        store.set("theme", "dark").unwrap();
        assert_eq!(store.get("theme"), Some("dark".to_string()));
        assert!(store.contains("theme"));
    }

    #[test]
    fn test_set_overwrites() {
        let temp_dir = TempDir::new().unwrap();
        let store = test_store(&temp_dir);

        store.set("theme", "dark").unwrap();
        store.set("theme", "light").unwrap();
        assert_eq!(store.get("theme"), Some("light".to_string()));
    }

    #[test]
    fn test_remove() {
        let temp_dir = TempDir::new().unwrap();
        let store = test_store(&temp_dir);

        store.set("theme", "dark").unwrap();
        store.remove("theme").unwrap();
        assert!(store.get("theme").is_none());

        // Removing an absent key is a no-op
        store.remove("theme").unwrap();
    }

    #[test]
    fn test_clear_all() {
        let temp_dir = TempDir::new().unwrap();
        let store = test_store(&temp_dir);

        store.set("a", "1").unwrap();
        store.set("b", "2").unwrap();
        store.clear_all().unwrap();

        assert!(store.get("a").is_none());
        assert!(store.get("b").is_none());
    }

    #[test]
    fn test_json_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let store = test_store(&temp_dir);

        let sample = Sample {
            name: "watchlist".to_string(),
            count: 3,
        };
        store.set_json("sample", &sample).unwrap();

        let loaded: Sample = store.get_json("sample").unwrap();
        assert_eq!(loaded, sample);
    }

    #[test]
    fn test_corrupt_value_reads_as_absent() {
        let temp_dir = TempDir::new().unwrap();
        let store = test_store(&temp_dir);

        store.set("sample", "{not json").unwrap();
        let loaded: Option<Sample> = store.get_json("sample");
        assert!(loaded.is_none());

        // The raw value is still there for other readers
        assert!(store.get("sample").is_some());
    }

    #[test]
    fn test_corrupt_file_reads_as_empty() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("store.json");
        fs::write(&path, "not a json map at all").unwrap();

        let store = KvStore::new(&path);
        assert!(store.get("anything").is_none());

        // Writing through the corrupt state starts fresh
        store.set("theme", "dark").unwrap();
        assert_eq!(store.get("theme"), Some("dark".to_string()));
    }

    #[test]
    fn test_values_persist_across_reopens() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("store.json");

        {
            let store = KvStore::new(&path);
            store.set("language", "ar").unwrap();
        }

        let store = KvStore::new(&path);
        assert_eq!(store.get("language"), Some("ar".to_string()));
    }

    #[test]
    fn test_keys_are_independent() {
        let temp_dir = TempDir::new().unwrap();
        let store = test_store(&temp_dir);

        store.set("theme", "dark").unwrap();
        store.set("language", "en").unwrap();
        store.remove("theme").unwrap();

        assert_eq!(store.get("language"), Some("en".to_string()));
    }

    #[test]
    fn test_atomic_write_creates_parent_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("a").join("b").join("store.json");

        let store = KvStore::new(&nested);
        store.set("key", "value").unwrap();

        assert!(nested.exists());
        assert_eq!(store.get("key"), Some("value".to_string()));
    }
}
