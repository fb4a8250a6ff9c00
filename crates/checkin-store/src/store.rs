use std::future::Future;
use std::sync::Arc;

use tokio::sync::{Mutex, OwnedMutexGuard};

use checkin_core::config::{StoreConfig, WriteDiscipline};
use checkin_core::error::{CheckinError, Result, StorageError};
use checkin_core::types::{new_checkin_id, CheckinRecord, NewCheckin};

use crate::codec::{decode_collection, encode_collection};
use crate::factory::open_backend;
use crate::kv::KeyValueStore;

struct Inner {
    backend: Arc<dyn KeyValueStore>,
    key: String,
    discipline: WriteDiscipline,
    writer: Arc<Mutex<()>>,
}

impl Inner {
    async fn write_guard(&self) -> Option<OwnedMutexGuard<()>> {
        match self.discipline {
            WriteDiscipline::Serialized => Some(self.writer.clone().lock_owned().await),
            WriteDiscipline::Unserialized => None,
        }
    }

    async fn read(&self) -> Result<Vec<CheckinRecord>> {
        match self.backend.get(&self.key).await? {
            Some(blob) => decode_collection(&blob),
            None => Ok(Vec::new()),
        }
    }

    async fn write(&self, records: &[CheckinRecord]) -> Result<()> {
        let blob = encode_collection(records)?;
        self.backend.set(&self.key, &blob).await
    }

    async fn create(&self, input: NewCheckin) -> Result<CheckinRecord> {
        let mut records = self.read().await?;
        let mut id = new_checkin_id();
        while records.iter().any(|r| r.id == id) {
            id = new_checkin_id();
        }
        let record = CheckinRecord::from_input(id, input);
        records.insert(0, record.clone());
        self.write(&records).await?;

        tracing::debug!(
            key = %self.key,
            id = %record.id,
            count = records.len(),
            "created check-in"
        );
        Ok(record)
    }

    async fn delete_one(&self, id: &str) -> Result<bool> {
        let mut records = self.read().await?;
        let before = records.len();
        records.retain(|r| r.id != id);
        if records.len() == before {
            tracing::debug!(key = %self.key, id, "delete of unknown check-in");
            return Ok(false);
        }
        self.write(&records).await?;

        tracing::debug!(key = %self.key, id, count = records.len(), "deleted check-in");
        Ok(true)
    }

    async fn delete_all(&self) -> Result<()> {
        self.backend.remove(&self.key).await?;
        tracing::debug!(key = %self.key, "cleared check-ins");
        Ok(())
    }
}

/// The persisted check-in collection, newest first.
///
/// The whole collection lives under one key and every mutation is a full
/// read-modify-write of that value. Under [`WriteDiscipline::Serialized`]
/// mutations hold a single writer lock for the entire cycle, so concurrent
/// callers never overwrite each other's changes. Reads never take the lock.
///
/// Each mutation runs on its own task and owns its lock guard, so it runs to
/// completion even if the caller stops waiting for it.
///
/// Cloning is cheap; clones share the backend and the writer lock.
///
/// Two families of operations are exposed:
/// - `try_*` return a [`Result`] and distinguish invalid input, storage
///   faults and corrupt data.
/// - `list`, `create`, `delete_one`, `delete_all` never fail visibly: faults
///   are logged and collapsed to an empty list or `false`.
#[derive(Clone)]
pub struct CheckinStore {
    inner: Arc<Inner>,
}

impl CheckinStore {
    pub fn new(backend: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self::with_discipline(backend, key, WriteDiscipline::default())
    }

    pub fn with_discipline(
        backend: Arc<dyn KeyValueStore>,
        key: impl Into<String>,
        discipline: WriteDiscipline,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                backend,
                key: key.into(),
                discipline,
                writer: Arc::new(Mutex::new(())),
            }),
        }
    }

    /// Open the backend named by `config` and wrap it.
    pub fn open(config: &StoreConfig) -> Result<Self> {
        let backend = open_backend(config)?;
        Ok(Self::with_discipline(
            backend,
            config.storage_key.clone(),
            config.discipline,
        ))
    }

    pub fn storage_key(&self) -> &str {
        &self.inner.key
    }

    pub fn discipline(&self) -> WriteDiscipline {
        self.inner.discipline
    }

    /// Run one mutation on a detached task under the writer lock and wait for it.
    async fn mutate<T, F, Fut>(&self, op: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(Arc<Inner>) -> Fut + Send + 'static,
        Fut: Future<Output = Result<T>> + Send + 'static,
    {
        let inner = self.inner.clone();
        tokio::spawn(async move {
            let _guard = inner.write_guard().await;
            op(inner).await
        })
        .await
        .map_err(|e| CheckinError::from(StorageError::Task(format!("mutation: {e}"))))?
    }

    /// Current collection. A key that was never written reads as empty.
    pub async fn try_list(&self) -> Result<Vec<CheckinRecord>> {
        self.inner.read().await
    }

    /// Validate `input`, assign a fresh id and prepend the record.
    ///
    /// Invalid input is rejected before storage is touched. If the stored
    /// collection cannot be read or decoded, nothing is written.
    pub async fn try_create(&self, input: NewCheckin) -> Result<CheckinRecord> {
        let input = input.validate()?;
        self.mutate(move |inner| async move { inner.create(input).await })
            .await
    }

    /// Remove every record with `id`. Returns whether anything was removed;
    /// an unknown id is not an error and writes nothing.
    pub async fn try_delete_one(&self, id: &str) -> Result<bool> {
        let id = id.to_owned();
        self.mutate(move |inner| async move { inner.delete_one(&id).await })
            .await
    }

    /// Drop the whole collection by removing its key.
    pub async fn try_delete_all(&self) -> Result<()> {
        self.mutate(|inner| async move { inner.delete_all().await })
            .await
    }

    /// Current collection, or empty if it cannot be read.
    pub async fn list(&self) -> Vec<CheckinRecord> {
        self.try_list().await.unwrap_or_else(|e| {
            tracing::warn!(key = %self.inner.key, error = %e, "failed to read check-ins");
            Vec::new()
        })
    }

    /// Create a check-in; `false` on any fault.
    pub async fn create(&self, input: NewCheckin) -> bool {
        match self.try_create(input).await {
            Ok(_) => true,
            Err(e) => {
                tracing::warn!(key = %self.inner.key, error = %e, "failed to create check-in");
                false
            }
        }
    }

    /// Delete one check-in; `true` also when `id` was not present.
    pub async fn delete_one(&self, id: &str) -> bool {
        match self.try_delete_one(id).await {
            Ok(_) => true,
            Err(e) => {
                tracing::warn!(key = %self.inner.key, id, error = %e, "failed to delete check-in");
                false
            }
        }
    }

    /// Clear every check-in; `false` on any fault.
    pub async fn delete_all(&self) -> bool {
        match self.try_delete_all().await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(key = %self.inner.key, error = %e, "failed to clear check-ins");
                false
            }
        }
    }
}
