use std::sync::Arc;

use checkin_store::memory::MemoryKeyValueStore;
use checkin_store::store::CheckinStore;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub store: CheckinStore,
}

impl AppState {
    pub fn new(store: CheckinStore) -> Self {
        Self { store }
    }

    /// State over a fresh in-memory store (for testing).
    pub fn in_memory() -> Self {
        Self::new(CheckinStore::new(
            Arc::new(MemoryKeyValueStore::new()),
            checkin_core::config::DEFAULT_STORAGE_KEY,
        ))
    }
}
