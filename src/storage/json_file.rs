//! File-backed store: one JSON document mapping each namespace to a sorted list of ids.
//!
//! ```json
//! { "collected_cards": ["gold", "icy"] }
//! ```
//!
//! Writes go to a sibling temp file that is then renamed over the original, so a
//! crash mid-write leaves the previous document intact.

use super::{KeyValueStore, StorageError};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::debug;

type Document = BTreeMap<String, BTreeSet<String>>;

#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    // Serializes read-modify-write cycles on the document.
    lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_document(&self) -> Result<Document, StorageError> {
        match fs::read(&self.path) {
            Ok(bytes) if bytes.is_empty() => Ok(Document::new()),
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Document::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn write_document(&self, document: &Document) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(document)?)?;
        fs::rename(&tmp, &self.path)?;
        debug!(path = %self.path.display(), "Store written");
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn read_set(&self, key: &str) -> Result<Option<BTreeSet<String>>, StorageError> {
        let _guard = self.lock.lock().map_err(|_| StorageError::Poisoned)?;
        Ok(self.read_document()?.remove(key))
    }

    fn write_set(&self, key: &str, ids: &BTreeSet<String>) -> Result<(), StorageError> {
        let _guard = self.lock.lock().map_err(|_| StorageError::Poisoned)?;
        let mut document = self.read_document()?;
        document.insert(key.to_string(), ids.clone());
        self.write_document(&document)
    }
}
