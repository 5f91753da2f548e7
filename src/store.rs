// File-backed JSON storage for the three curated pick lists.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to access storage file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("storage file {path} is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode storage document: {0}")]
    Encode(#[source] serde_json::Error),
}

// ---------------------------------------------------------------------------
// Pick records
// ---------------------------------------------------------------------------

/// A user-curated pick. Beyond the identifier the record is an opaque bag of
/// caller-supplied fields (name, position, notes, ...); the store never
/// inspects anything but the identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PickRecord(pub Map<String, Value>);

impl PickRecord {
    /// Canonical identifier key.
    pub const ID_KEY: &'static str = "player_id";

    /// Identifier key used by older callers, accepted on input.
    pub const LEGACY_ID_KEY: &'static str = "id";

    /// The record's identifier, under the canonical key or the legacy one.
    pub fn player_id(&self) -> Option<&Value> {
        self.0
            .get(Self::ID_KEY)
            .or_else(|| self.0.get(Self::LEGACY_ID_KEY))
    }

    /// Rewrite a legacy `id` key to the canonical `player_id`. A record that
    /// already carries `player_id` is returned unchanged (any `id` field it
    /// also has is treated as an ordinary pass-through field).
    pub fn canonicalize(mut self) -> Self {
        if !self.0.contains_key(Self::ID_KEY) {
            if let Some(value) = self.0.remove(Self::LEGACY_ID_KEY) {
                self.0.insert(Self::ID_KEY.to_string(), value);
            }
        }
        self
    }
}

impl From<Map<String, Value>> for PickRecord {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}

// ---------------------------------------------------------------------------
// Storage document
// ---------------------------------------------------------------------------

/// The single persisted aggregate: three named, ordered pick lists.
///
/// Every key defaults to empty on read, so documents written by older
/// versions that lack a key still load; every write emits all three keys.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StorageDocument {
    #[serde(default)]
    pub ideal_picks: Vec<PickRecord>,
    #[serde(default)]
    pub drafted_players: Vec<PickRecord>,
    #[serde(default)]
    pub priority_list: Vec<PickRecord>,
}

// ---------------------------------------------------------------------------
// Storage trait
// ---------------------------------------------------------------------------

/// Storage abstraction over the persisted document, so the list service can
/// run against an in-memory fake in tests and the file backend in production.
pub trait Storage: Send {
    /// Load the current document. A backend with no document yet returns the
    /// default (all-empty) one without creating it.
    fn read(&self) -> Result<StorageDocument, StoreError>;

    /// Persist the full document, replacing whatever was stored before.
    fn write(&self, doc: &StorageDocument) -> Result<(), StoreError>;
}

impl<T: Storage + ?Sized> Storage for Box<T> {
    fn read(&self) -> Result<StorageDocument, StoreError> {
        (**self).read()
    }

    fn write(&self, doc: &StorageDocument) -> Result<(), StoreError> {
        (**self).write(doc)
    }
}

// ---------------------------------------------------------------------------
// File-backed storage
// ---------------------------------------------------------------------------

/// JSON-file storage. The document is pretty-printed and replaced wholesale
/// on every write via a sibling temp file and rename, so a reader never
/// observes a torn write.
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut os = self.path.as_os_str().to_os_string();
        os.push(".tmp");
        PathBuf::from(os)
    }
}

impl Storage for FileStore {
    fn read(&self) -> Result<StorageDocument, StoreError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(StorageDocument::default());
            }
            Err(e) => {
                return Err(StoreError::Io {
                    path: self.path.clone(),
                    source: e,
                });
            }
        };

        serde_json::from_str(&text).map_err(|e| StoreError::Corrupt {
            path: self.path.clone(),
            source: e,
        })
    }

    fn write(&self, doc: &StorageDocument) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(doc).map_err(StoreError::Encode)?;

        let tmp = self.temp_path();
        fs::write(&tmp, json).map_err(|e| StoreError::Io {
            path: tmp.clone(),
            source: e,
        })?;
        fs::rename(&tmp, &self.path).map_err(|e| StoreError::Io {
            path: self.path.clone(),
            source: e,
        })
    }
}

// ---------------------------------------------------------------------------
// In-memory storage
// ---------------------------------------------------------------------------

/// In-memory storage backend, primarily for tests.
#[derive(Default)]
pub struct MemoryStore {
    doc: Mutex<StorageDocument>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with an existing document.
    pub fn with_document(doc: StorageDocument) -> Self {
        Self {
            doc: Mutex::new(doc),
        }
    }
}

impl Storage for MemoryStore {
    fn read(&self) -> Result<StorageDocument, StoreError> {
        Ok(self.doc.lock().expect("storage mutex poisoned").clone())
    }

    fn write(&self, doc: &StorageDocument) -> Result<(), StoreError> {
        *self.doc.lock().expect("storage mutex poisoned") = doc.clone();
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    /// Helper: build a PickRecord from a JSON object literal.
    fn record(value: Value) -> PickRecord {
        match value {
            Value::Object(map) => PickRecord(map),
            other => panic!("expected JSON object, got: {other}"),
        }
    }

    // ------------------------------------------------------------------
    // PickRecord
    // ------------------------------------------------------------------

    #[test]
    fn player_id_reads_canonical_key() {
        let r = record(json!({"player_id": 12, "name": "A"}));
        assert_eq!(r.player_id(), Some(&json!(12)));
    }

    #[test]
    fn player_id_falls_back_to_legacy_key() {
        let r = record(json!({"id": "abc"}));
        assert_eq!(r.player_id(), Some(&json!("abc")));
    }

    #[test]
    fn player_id_missing() {
        let r = record(json!({"name": "A"}));
        assert!(r.player_id().is_none());
    }

    #[test]
    fn canonicalize_renames_legacy_key() {
        let r = record(json!({"id": 7, "name": "A"})).canonicalize();
        assert_eq!(r.0.get("player_id"), Some(&json!(7)));
        assert!(!r.0.contains_key("id"));
        assert_eq!(r.0.get("name"), Some(&json!("A")));
    }

    #[test]
    fn canonicalize_keeps_existing_canonical_key() {
        let r = record(json!({"player_id": 7, "id": 99})).canonicalize();
        assert_eq!(r.0.get("player_id"), Some(&json!(7)));
        // The id field is an ordinary pass-through field here.
        assert_eq!(r.0.get("id"), Some(&json!(99)));
    }

    // ------------------------------------------------------------------
    // StorageDocument serde
    // ------------------------------------------------------------------

    #[test]
    fn missing_keys_default_fill_on_read() {
        let doc: StorageDocument =
            serde_json::from_str(r#"{"ideal_picks": [{"player_id": 1}]}"#).unwrap();
        assert_eq!(doc.ideal_picks.len(), 1);
        assert!(doc.drafted_players.is_empty());
        assert!(doc.priority_list.is_empty());
    }

    #[test]
    fn all_keys_present_after_serialize() {
        let json = serde_json::to_value(StorageDocument::default()).unwrap();
        assert_eq!(json["ideal_picks"], json!([]));
        assert_eq!(json["drafted_players"], json!([]));
        assert_eq!(json["priority_list"], json!([]));
    }

    // ------------------------------------------------------------------
    // FileStore
    // ------------------------------------------------------------------

    #[test]
    fn read_missing_file_returns_default_without_creating_it() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("draft_data.json");
        let store = FileStore::new(&path);

        let doc = store.read().unwrap();
        assert_eq!(doc, StorageDocument::default());
        assert!(!path.exists(), "read should not create the file");
    }

    #[test]
    fn write_then_read_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("draft_data.json"));

        let mut doc = StorageDocument::default();
        doc.ideal_picks
            .push(record(json!({"player_id": 12, "position": "HOK", "name": "A"})));
        doc.priority_list.push(record(json!({"player_id": 3})));

        store.write(&doc).unwrap();
        assert_eq!(store.read().unwrap(), doc);
    }

    #[test]
    fn write_replaces_previous_document() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("draft_data.json"));

        let mut first = StorageDocument::default();
        first.drafted_players.push(record(json!({"player_id": 1})));
        store.write(&first).unwrap();

        let second = StorageDocument::default();
        store.write(&second).unwrap();

        assert_eq!(store.read().unwrap(), second);
    }

    #[test]
    fn write_is_pretty_printed_and_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("draft_data.json");
        let store = FileStore::new(&path);

        store.write(&StorageDocument::default()).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains('\n'), "document should be pretty-printed");
        assert!(!store.temp_path().exists());
    }

    #[test]
    fn corrupt_file_fails_with_corrupt_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("draft_data.json");
        fs::write(&path, "{ not json").unwrap();

        let err = FileStore::new(&path).read().unwrap_err();
        match err {
            StoreError::Corrupt { path: p, .. } => assert_eq!(p, path),
            other => panic!("expected Corrupt, got: {other}"),
        }
    }

    #[test]
    fn wrong_shape_is_corrupt_too() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("draft_data.json");
        // Valid JSON, but not the expected structure.
        fs::write(&path, r#"{"ideal_picks": 42}"#).unwrap();

        let err = FileStore::new(&path).read().unwrap_err();
        assert!(matches!(err, StoreError::Corrupt { .. }));
    }

    // ------------------------------------------------------------------
    // MemoryStore
    // ------------------------------------------------------------------

    #[test]
    fn memory_store_round_trips() {
        let store = MemoryStore::new();
        assert_eq!(store.read().unwrap(), StorageDocument::default());

        let mut doc = StorageDocument::default();
        doc.ideal_picks.push(record(json!({"player_id": 5})));
        store.write(&doc).unwrap();

        assert_eq!(store.read().unwrap(), doc);
    }
}
