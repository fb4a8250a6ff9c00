use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use uuid::Uuid;

use checkin_core::error::{CheckinError, Result, StorageError};

use crate::kv::KeyValueStore;

/// File-backed key-value store: one JSON file per key under a directory.
///
/// Writes go to a uniquely named temp file that is fsynced and then renamed
/// over the target, so readers see either the previous value or the new one.
/// File I/O runs on `tokio::task::spawn_blocking`.
pub struct FileKeyValueStore {
    dir: PathBuf,
}

impl FileKeyValueStore {
    /// Use `dir` as the storage root, creating it if needed.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file holding `key`.
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", encode_key(key)))
    }
}

/// Percent-encode anything outside `[A-Za-z0-9_-]` so every key maps to a distinct file name.
fn encode_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    for b in key.bytes() {
        if b.is_ascii_alphanumeric() || b == b'-' || b == b'_' {
            out.push(b as char);
        } else {
            out.push_str(&format!("%{b:02X}"));
        }
    }
    out
}

fn task_err(e: tokio::task::JoinError) -> CheckinError {
    StorageError::Task(format!("spawn_blocking: {e}")).into()
}

/// Write to a temp file, fsync, then rename over `path`.
fn atomic_write(path: &Path, data: &[u8]) -> std::io::Result<()> {
    let temp_name = format!(
        ".{}.{}.tmp",
        path.file_name().and_then(|n| n.to_str()).unwrap_or("value"),
        Uuid::new_v4()
    );
    let temp_path = path.with_file_name(temp_name);

    let written = (|| {
        let mut file = std::fs::File::create(&temp_path)?;
        file.write_all(data)?;
        file.sync_all()?;
        std::fs::rename(&temp_path, path)
    })();
    if written.is_err() {
        let _ = std::fs::remove_file(&temp_path);
        return written;
    }

    #[cfg(unix)]
    {
        // Best effort: makes the rename itself durable.
        if let Some(parent) = path.parent() {
            if let Ok(dir) = std::fs::File::open(parent) {
                let _ = dir.sync_all();
            }
        }
    }

    Ok(())
}

#[async_trait]
impl KeyValueStore for FileKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        tokio::task::spawn_blocking(move || match std::fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(CheckinError::from(e)),
        })
        .await
        .map_err(task_err)?
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key);
        let value = value.to_owned();
        tokio::task::spawn_blocking(move || {
            atomic_write(&path, value.as_bytes()).map_err(CheckinError::from)
        })
        .await
        .map_err(task_err)?
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let path = self.path_for(key);
        tokio::task::spawn_blocking(move || match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(CheckinError::from(e)),
        })
        .await
        .map_err(task_err)?
    }
}
