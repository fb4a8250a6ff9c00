pub mod config;
pub mod error;
pub mod types;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::config::{Backend, StoreConfig, WriteDiscipline};
    pub use crate::error::{CheckinError, Result, StorageError};
    pub use crate::types::{markers, new_checkin_id, CheckinRecord, MapMarker, NewCheckin};
}
