use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use checkin_core::error::{Result, StorageError};

use crate::kv::KeyValueStore;

/// In-memory key-value store for testing and short-lived runs.
///
/// Thread-safe via `RwLock`. All data is lost when the store is dropped.
pub struct MemoryKeyValueStore {
    data: RwLock<HashMap<String, String>>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self {
            data: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for MemoryKeyValueStore {
    fn default() -> Self {
        Self::new()
    }
}

fn poisoned() -> StorageError {
    StorageError::Unavailable("memory store lock poisoned".into())
}

#[async_trait]
impl KeyValueStore for MemoryKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let data = self.data.read().map_err(|_| poisoned())?;
        Ok(data.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut data = self.data.write().map_err(|_| poisoned())?;
        data.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let mut data = self.data.write().map_err(|_| poisoned())?;
        data.remove(key);
        Ok(())
    }
}
