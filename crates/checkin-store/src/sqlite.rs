use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};

use checkin_core::error::{CheckinError, Result, StorageError};

use crate::kv::KeyValueStore;

/// SQLite-backed key-value store for durable persistence.
///
/// Thread-safe via `Arc<Mutex<Connection>>`. All SQLite operations are
/// dispatched to a blocking thread via `tokio::task::spawn_blocking`.
pub struct SqliteKeyValueStore {
    conn: Arc<Mutex<Connection>>,
}

fn sqlite_err(context: &str, e: rusqlite::Error) -> CheckinError {
    StorageError::Sqlite(format!("{context}: {e}")).into()
}

fn task_err(e: tokio::task::JoinError) -> CheckinError {
    StorageError::Task(format!("spawn_blocking: {e}")).into()
}

fn lock(conn: &Mutex<Connection>) -> Result<MutexGuard<'_, Connection>> {
    conn.lock()
        .map_err(|_| StorageError::Unavailable("sqlite connection lock poisoned".into()).into())
}

impl SqliteKeyValueStore {
    /// Open (or create) a SQLite database at the given path.
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path).map_err(|e| sqlite_err("failed to open database", e))?;
        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        store.create_table()?;
        Ok(store)
    }

    /// Create an in-memory SQLite database (useful for tests).
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| sqlite_err("failed to open in-memory db", e))?;
        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        store.create_table()?;
        Ok(store)
    }

    fn create_table(&self) -> Result<()> {
        let conn = lock(&self.conn)?;
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS kv (
                key TEXT PRIMARY KEY NOT NULL,
                value TEXT NOT NULL
            );",
        )
        .map_err(|e| sqlite_err("failed to create table", e))?;
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for SqliteKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let conn = Arc::clone(&self.conn);
        let key = key.to_owned();
        tokio::task::spawn_blocking(move || {
            let conn = lock(&conn)?;
            conn.query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
                row.get::<_, String>(0)
            })
            .optional()
            .map_err(|e| sqlite_err("query", e))
        })
        .await
        .map_err(task_err)?
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let conn = Arc::clone(&self.conn);
        let key = key.to_owned();
        let value = value.to_owned();
        tokio::task::spawn_blocking(move || {
            let conn = lock(&conn)?;
            conn.execute(
                "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
                params![key, value],
            )
            .map_err(|e| sqlite_err("upsert", e))?;
            Ok(())
        })
        .await
        .map_err(task_err)?
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let conn = Arc::clone(&self.conn);
        let key = key.to_owned();
        tokio::task::spawn_blocking(move || {
            let conn = lock(&conn)?;
            conn.execute("DELETE FROM kv WHERE key = ?1", params![key])
                .map_err(|e| sqlite_err("delete", e))?;
            Ok(())
        })
        .await
        .map_err(task_err)?
    }
}
