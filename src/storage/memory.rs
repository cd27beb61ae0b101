use super::{KeyValueStore, StorageError};
use std::collections::{BTreeSet, HashMap};
use std::sync::Mutex;

/// In-process store. Share it through an `Arc` to simulate a restart: a second
/// `CollectionStore` loaded from the same instance sees what the first one wrote.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Mutex<HashMap<String, BTreeSet<String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn read_set(&self, key: &str) -> Result<Option<BTreeSet<String>>, StorageError> {
        let records = self.records.lock().map_err(|_| StorageError::Poisoned)?;
        Ok(records.get(key).cloned())
    }

    fn write_set(&self, key: &str, ids: &BTreeSet<String>) -> Result<(), StorageError> {
        let mut records = self.records.lock().map_err(|_| StorageError::Poisoned)?;
        records.insert(key.to_string(), ids.clone());
        Ok(())
    }
}
