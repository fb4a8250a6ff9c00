use thiserror::Error;

/// Top-level error type for check-in operations.
#[derive(Debug, Error)]
pub enum CheckinError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Corrupt collection: {0}")]
    Corrupt(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Faults raised by a key-value backend.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("SQLite error: {0}")]
    Sqlite(String),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    #[error("Background task failed: {0}")]
    Task(String),
}

impl From<std::io::Error> for CheckinError {
    fn from(e: std::io::Error) -> Self {
        CheckinError::Storage(StorageError::Io(e))
    }
}

impl CheckinError {
    /// Returns `true` for faults the caller caused (bad input), as opposed to storage faults.
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, CheckinError::InvalidInput(_))
    }
}

pub type Result<T> = std::result::Result<T, CheckinError>;
