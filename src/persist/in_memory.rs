use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use super::{SessionStore, StorageError};

/// In-memory session store backed by a HashMap. Clone-friendly via Arc, so a
/// test can hand the same storage to two stores and observe rehydration.
#[derive(Clone, Default)]
pub struct InMemorySessionStore {
    records: Arc<RwLock<HashMap<String, String>>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        InMemorySessionStore::default()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.records
            .read()
            .map(|records| records.contains_key(name))
            .unwrap_or(false)
    }
}

impl SessionStore for InMemorySessionStore {
    fn get(&self, name: &str) -> Result<Option<String>, StorageError> {
        let records = self
            .records
            .read()
            .map_err(|_| StorageError::Backend("lock poisoned".to_string()))?;
        Ok(records.get(name).cloned())
    }

    fn put(&self, name: &str, value: &str) -> Result<(), StorageError> {
        let mut records = self
            .records
            .write()
            .map_err(|_| StorageError::Backend("lock poisoned".to_string()))?;
        records.insert(name.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, name: &str) -> Result<bool, StorageError> {
        let mut records = self
            .records
            .write()
            .map_err(|_| StorageError::Backend("lock poisoned".to_string()))?;
        Ok(records.remove(name).is_some())
    }
}
