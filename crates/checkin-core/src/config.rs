use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::CheckinError;

/// Default key the collection is persisted under.
pub const DEFAULT_STORAGE_KEY: &str = "checkins";

pub const ENV_DATA_DIR: &str = "CHECKIN_DATA_DIR";
pub const ENV_BACKEND: &str = "CHECKIN_BACKEND";
pub const ENV_STORAGE_KEY: &str = "CHECKIN_STORAGE_KEY";

/// Which key-value backend holds the collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Backend {
    Memory,
    #[default]
    File,
    Sqlite,
}

impl FromStr for Backend {
    type Err = CheckinError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(Backend::Memory),
            "file" => Ok(Backend::File),
            "sqlite" => Ok(Backend::Sqlite),
            other => Err(CheckinError::Config(format!("unknown backend: {other}"))),
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Backend::Memory => "memory",
            Backend::File => "file",
            Backend::Sqlite => "sqlite",
        };
        f.write_str(name)
    }
}

/// How concurrent mutations are ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WriteDiscipline {
    /// One read-modify-write cycle in flight at a time.
    #[default]
    Serialized,
    /// Mutations interleave freely and may lose updates. Compatibility testing only.
    Unserialized,
}

/// Configuration for opening a check-in store.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Key the whole collection is stored under.
    pub storage_key: String,
    /// Directory for the file and SQLite backends.
    pub data_dir: PathBuf,
    pub backend: Backend,
    pub discipline: WriteDiscipline,
}

impl Default for StoreConfig {
    fn default() -> Self {
        let data_dir = dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".checkin");
        Self {
            storage_key: DEFAULT_STORAGE_KEY.into(),
            data_dir,
            backend: Backend::default(),
            discipline: WriteDiscipline::default(),
        }
    }
}

impl StoreConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults overlaid with `CHECKIN_DATA_DIR`, `CHECKIN_BACKEND` and `CHECKIN_STORAGE_KEY`.
    pub fn from_env() -> Result<Self, CheckinError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`StoreConfig::from_env`] with an explicit variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, CheckinError> {
        let mut config = Self::default();
        if let Some(dir) = lookup(ENV_DATA_DIR).filter(|v| !v.is_empty()) {
            config.data_dir = PathBuf::from(dir);
        }
        if let Some(backend) = lookup(ENV_BACKEND).filter(|v| !v.is_empty()) {
            config.backend = backend.parse()?;
        }
        if let Some(key) = lookup(ENV_STORAGE_KEY) {
            let key = key.trim();
            if key.is_empty() {
                return Err(CheckinError::Config(format!("{ENV_STORAGE_KEY} is empty")));
            }
            config.storage_key = key.to_owned();
        }
        tracing::debug!(
            backend = %config.backend,
            data_dir = %config.data_dir.display(),
            key = %config.storage_key,
            "loaded store config"
        );
        Ok(config)
    }

    pub fn with_storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = key.into();
        self
    }

    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = dir.into();
        self
    }

    pub fn with_backend(mut self, backend: Backend) -> Self {
        self.backend = backend;
        self
    }

    pub fn with_discipline(mut self, discipline: WriteDiscipline) -> Self {
        self.discipline = discipline;
        self
    }

    /// Path of the SQLite database file inside `data_dir`.
    pub fn sqlite_path(&self) -> PathBuf {
        self.data_dir.join("checkins.db")
    }
}
