//! Key-value persistence for the catalog.
//!
//! The whole catalog lives in one JSON document under one key:
//!
//! ```text
//! {
//!   "files":   [ { id, name, type, size, data, folderId, uploadedBy, uploadedAt, comments }, ... ],
//!   "folders": [ { id, name, createdBy, createdAt, parentFolderId }, ... ]
//! }
//! ```
//!
//! Every save rewrites the full document. Loading never fails: a missing or
//! unreadable slot yields the empty document.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::notify::{Notifier, QUOTA_EXCEEDED_MESSAGE};

use super::folder::Folder;
use super::metadata::FileItem;
use super::STORAGE_KEY;

/// The persisted `{files, folders}` document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogDocument {
    pub files: Vec<FileItem>,
    pub folders: Vec<Folder>,
}

/// Errors raised by a key-value store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The write would exceed the store's capacity.
    #[error("quota exceeded: {needed} bytes needed, capacity is {capacity} bytes")]
    QuotaExceeded { needed: u64, capacity: u64 },

    /// The key cannot be used as a slot name.
    #[error("invalid key: {0:?}")]
    InvalidKey(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Durable string slots addressed by key.
pub trait KeyValueStore {
    /// Read a slot. `Ok(None)` when the slot has never been written.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Overwrite a slot.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// In-process store with an optional capacity.
///
/// Usage is counted as key bytes plus value bytes over all slots.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    slots: HashMap<String, String>,
    capacity: Option<u64>,
}

impl MemoryStore {
    /// Create an unbounded store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that rejects writes beyond `capacity` bytes.
    pub fn with_capacity(capacity: u64) -> Self {
        Self {
            slots: HashMap::new(),
            capacity: Some(capacity),
        }
    }

    /// Bytes used by all slots except `key`.
    fn used_except(&self, key: &str) -> u64 {
        self.slots
            .iter()
            .filter(|(k, _)| k.as_str() != key)
            .map(|(k, v)| (k.len() + v.len()) as u64)
            .sum()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.slots.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        if let Some(capacity) = self.capacity {
            let needed = self.used_except(key) + (key.len() + value.len()) as u64;
            if needed > capacity {
                return Err(StoreError::QuotaExceeded { needed, capacity });
            }
        }
        self.slots.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Directory-backed store: one file per slot, bounded total size.
///
/// ```text
/// {root}/
/// └── pastis_12_12_storage
/// ```
///
/// Writes go through a hidden temporary file that is renamed into place.
#[derive(Debug, Clone)]
pub struct DirStore {
    root: PathBuf,
    capacity: u64,
}

impl DirStore {
    /// Open a store rooted at `root`, creating the directory if needed.
    pub fn new(root: impl Into<PathBuf>, capacity: u64) -> Result<Self, StoreError> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root, capacity })
    }

    /// Get the root directory of this store.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Capacity in bytes.
    pub fn capacity(&self) -> u64 {
        self.capacity
    }

    fn slot_path(&self, key: &str) -> Result<PathBuf, StoreError> {
        let valid = !key.is_empty()
            && !key.starts_with('.')
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));
        if !valid {
            return Err(StoreError::InvalidKey(key.to_string()));
        }
        Ok(self.root.join(key))
    }

    /// Bytes used by all slots except `key`. Temporary files are ignored.
    fn used_except(&self, key: &str) -> Result<u64, StoreError> {
        let mut used = 0;
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            let name = entry.file_name();
            let name = name.to_string_lossy();
            if name.starts_with('.') || name == key {
                continue;
            }
            let metadata = entry.metadata()?;
            if metadata.is_file() {
                used += metadata.len();
            }
        }
        Ok(used)
    }
}

impl KeyValueStore for DirStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.slot_path(key)?;
        match fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        let path = self.slot_path(key)?;

        let needed = self.used_except(key)? + value.len() as u64;
        if needed > self.capacity {
            return Err(StoreError::QuotaExceeded {
                needed,
                capacity: self.capacity,
            });
        }

        let tmp_path = self.root.join(format!(".{key}.tmp"));
        fs::write(&tmp_path, value)?;
        if let Err(e) = fs::rename(&tmp_path, &path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(e.into());
        }
        Ok(())
    }
}

/// Result of a save.
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// The document was written.
    Saved,
    /// The store was full; the user has been notified.
    QuotaExceeded,
    /// Any other failure; logged only.
    Failed,
}

impl SaveOutcome {
    pub fn is_saved(&self) -> bool {
        matches!(self, SaveOutcome::Saved)
    }
}

impl fmt::Display for SaveOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SaveOutcome::Saved => write!(f, "saved"),
            SaveOutcome::QuotaExceeded => write!(f, "storage quota exceeded"),
            SaveOutcome::Failed => write!(f, "write failed"),
        }
    }
}

/// Loads and saves the catalog document in one slot of a [`KeyValueStore`].
pub struct StoreAdapter<S, N> {
    store: S,
    notifier: N,
    key: String,
}

impl<S: KeyValueStore, N: Notifier> StoreAdapter<S, N> {
    /// Create an adapter using the default slot key.
    pub fn new(store: S, notifier: N) -> Self {
        Self::with_key(store, notifier, STORAGE_KEY)
    }

    /// Create an adapter using a custom slot key.
    pub fn with_key(store: S, notifier: N, key: impl Into<String>) -> Self {
        Self {
            store,
            notifier,
            key: key.into(),
        }
    }

    /// Slot key in use.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Get the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Get the notifier used for user-facing failures.
    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// Read the document. Absent or unparsable content gives the empty
    /// document; the failure is logged, never returned.
    pub fn load(&self) -> CatalogDocument {
        let raw = match self.store.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                tracing::debug!(key = %self.key, "Storage slot is empty");
                return CatalogDocument::default();
            }
            Err(e) => {
                tracing::error!(key = %self.key, error = %e, "Failed to read storage slot");
                return CatalogDocument::default();
            }
        };

        match serde_json::from_str(&raw) {
            Ok(document) => document,
            Err(e) => {
                tracing::error!(key = %self.key, error = %e, "Failed to parse stored catalog");
                CatalogDocument::default()
            }
        }
    }

    /// Serialize and overwrite the slot.
    ///
    /// A full store is reported to the user through the notifier. Nothing is
    /// retried and the previous slot content is left as it was.
    pub fn save(&mut self, document: &CatalogDocument) -> SaveOutcome {
        let raw = match serde_json::to_string(document) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::error!(error = %e, "Failed to serialize catalog");
                return SaveOutcome::Failed;
            }
        };

        match self.store.set(&self.key, &raw) {
            Ok(()) => {
                tracing::debug!(key = %self.key, bytes = raw.len(), "Catalog saved");
                SaveOutcome::Saved
            }
            Err(e @ StoreError::QuotaExceeded { .. }) => {
                tracing::error!(key = %self.key, error = %e, "Failed to save catalog");
                self.notifier.alert(QUOTA_EXCEEDED_MESSAGE);
                SaveOutcome::QuotaExceeded
            }
            Err(e) => {
                tracing::error!(key = %self.key, error = %e, "Failed to save catalog");
                SaveOutcome::Failed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::MemoryNotifier;
    use tempfile::TempDir;

    fn sample_document() -> CatalogDocument {
        CatalogDocument {
            files: vec![FileItem::new("d1", "anis.pdf")
                .with_folder("f1")
                .with_uploader("Jan")
                .with_size(3)
                .with_media_type("application/pdf")
                .with_data("data:application/pdf;base64,AAAA")
                .with_uploaded_at("2024-01-01T10:00:00.000Z")],
            folders: vec![Folder::new("f1", "Recettes").with_creator("Hugues")],
        }
    }

    #[test]
    fn test_load_absent_slot() {
        let notifier = MemoryNotifier::new();
        let adapter = StoreAdapter::new(MemoryStore::new(), &notifier);
        assert_eq!(adapter.load(), CatalogDocument::default());
    }

    #[test]
    fn test_load_invalid_json() {
        let mut store = MemoryStore::new();
        store.set(STORAGE_KEY, "{not json").unwrap();

        let notifier = MemoryNotifier::new();
        let adapter = StoreAdapter::new(store, &notifier);
        let document = adapter.load();

        assert!(document.files.is_empty());
        assert!(document.folders.is_empty());
        assert!(notifier.messages().is_empty());
    }

    #[test]
    fn test_load_wrong_shape() {
        let mut store = MemoryStore::new();
        store.set(STORAGE_KEY, r#"{"files": 42}"#).unwrap();

        let adapter = StoreAdapter::new(store, MemoryNotifier::new());
        assert_eq!(adapter.load(), CatalogDocument::default());
    }

    #[test]
    fn test_load_partial_document() {
        let mut store = MemoryStore::new();
        store
            .set(STORAGE_KEY, r#"{"folders":[{"id":"f1","name":"Recettes"}]}"#)
            .unwrap();

        let adapter = StoreAdapter::new(store, MemoryNotifier::new());
        let document = adapter.load();
        assert!(document.files.is_empty());
        assert_eq!(document.folders[0].name, "Recettes");
    }

    #[test]
    fn test_save_then_load_roundtrip() {
        let mut adapter = StoreAdapter::new(MemoryStore::new(), MemoryNotifier::new());
        let document = sample_document();

        assert_eq!(adapter.save(&document), SaveOutcome::Saved);
        assert_eq!(adapter.load(), document);
    }

    #[test]
    fn test_save_overwrites() {
        let mut adapter = StoreAdapter::new(MemoryStore::new(), MemoryNotifier::new());
        assert!(adapter.save(&sample_document()).is_saved());
        assert!(adapter.save(&CatalogDocument::default()).is_saved());
        assert_eq!(adapter.load(), CatalogDocument::default());
    }

    #[test]
    fn test_saved_layout() {
        let mut adapter = StoreAdapter::new(MemoryStore::new(), MemoryNotifier::new());
        let _ = adapter.save(&sample_document());

        let raw = adapter.store().get(STORAGE_KEY).unwrap().unwrap();
        let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(json["files"][0]["folderId"], "f1");
        assert_eq!(json["files"][0]["type"], "application/pdf");
        assert!(json["folders"][0]["parentFolderId"].is_null());
    }

    #[test]
    fn test_save_quota_exceeded_notifies_and_keeps_previous() {
        let notifier = MemoryNotifier::new();
        let mut adapter = StoreAdapter::new(MemoryStore::with_capacity(200), &notifier);

        assert!(adapter.save(&CatalogDocument::default()).is_saved());

        let mut big = sample_document();
        big.files[0].data = "x".repeat(500);
        assert_eq!(adapter.save(&big), SaveOutcome::QuotaExceeded);

        assert_eq!(notifier.messages(), vec![QUOTA_EXCEEDED_MESSAGE]);
        assert_eq!(adapter.load(), CatalogDocument::default());
    }

    #[test]
    fn test_save_other_failure_is_silent() {
        let notifier = MemoryNotifier::new();
        let dir = TempDir::new().unwrap();
        let mut adapter =
            StoreAdapter::with_key(DirStore::new(dir.path(), 1024).unwrap(), &notifier, "../x");

        assert_eq!(adapter.key(), "../x");
        assert_eq!(
            adapter.save(&CatalogDocument::default()),
            SaveOutcome::Failed
        );
        assert!(notifier.messages().is_empty());
    }

    #[test]
    fn test_memory_store_capacity_excludes_replaced_slot() {
        let mut store = MemoryStore::with_capacity(20);
        store.set("k", "0123456789").unwrap();
        store.set("k", "abcdefghij").unwrap();
        assert!(matches!(
            store.set("other", "0123456789"),
            Err(StoreError::QuotaExceeded { .. })
        ));
    }

    #[test]
    fn test_dir_store_get_missing() {
        let dir = TempDir::new().unwrap();
        let store = DirStore::new(dir.path(), 1024).unwrap();
        assert!(store.get(STORAGE_KEY).unwrap().is_none());
    }

    #[test]
    fn test_dir_store_set_and_get() {
        let dir = TempDir::new().unwrap();
        let mut store = DirStore::new(dir.path().join("nested"), 1024).unwrap();

        store.set(STORAGE_KEY, "hello").unwrap();
        assert_eq!(store.get(STORAGE_KEY).unwrap().as_deref(), Some("hello"));
        assert!(store.root().join(STORAGE_KEY).exists());
        assert!(!store.root().join(format!(".{STORAGE_KEY}.tmp")).exists());
    }

    #[test]
    fn test_dir_store_quota() {
        let dir = TempDir::new().unwrap();
        let mut store = DirStore::new(dir.path(), 10).unwrap();

        store.set("a", "12345").unwrap();
        store.set("a", "1234567890").unwrap();

        let err = store.set("b", "1").unwrap_err();
        assert!(matches!(
            err,
            StoreError::QuotaExceeded {
                needed: 11,
                capacity: 10
            }
        ));
        assert!(store.get("b").unwrap().is_none());
        assert_eq!(store.get("a").unwrap().as_deref(), Some("1234567890"));
    }

    #[test]
    fn test_dir_store_rejects_bad_keys() {
        let dir = TempDir::new().unwrap();
        let mut store = DirStore::new(dir.path(), 1024).unwrap();

        assert!(matches!(store.get(""), Err(StoreError::InvalidKey(_))));
        assert!(matches!(
            store.set("../escape", "x"),
            Err(StoreError::InvalidKey(_))
        ));
        assert!(matches!(
            store.set(".hidden", "x"),
            Err(StoreError::InvalidKey(_))
        ));
    }

    #[test]
    fn test_dir_store_adapter_roundtrip() {
        let dir = TempDir::new().unwrap();
        let store = DirStore::new(dir.path(), 1024 * 1024).unwrap();
        let mut adapter = StoreAdapter::new(store, MemoryNotifier::new());

        let _ = adapter.save(&sample_document());

        let reopened = StoreAdapter::new(
            DirStore::new(dir.path(), 1024 * 1024).unwrap(),
            MemoryNotifier::new(),
        );
        assert_eq!(reopened.load(), sample_document());
    }
}
