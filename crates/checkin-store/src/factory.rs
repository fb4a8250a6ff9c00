use std::sync::Arc;

use checkin_core::config::{Backend, StoreConfig};
use checkin_core::error::Result;

use crate::file::FileKeyValueStore;
use crate::kv::KeyValueStore;
use crate::memory::MemoryKeyValueStore;
use crate::sqlite::SqliteKeyValueStore;

/// Open the key-value backend selected by `config`.
pub fn open_backend(config: &StoreConfig) -> Result<Arc<dyn KeyValueStore>> {
    let backend: Arc<dyn KeyValueStore> = match config.backend {
        Backend::Memory => Arc::new(MemoryKeyValueStore::new()),
        Backend::File => Arc::new(FileKeyValueStore::new(&config.data_dir)?),
        Backend::Sqlite => Arc::new(SqliteKeyValueStore::new(config.sqlite_path())?),
    };
    tracing::info!(backend = %config.backend, "opened check-in backend");
    Ok(backend)
}
