pub mod codec;
pub mod factory;
pub mod file;
pub mod kv;
pub mod memory;
pub mod sqlite;
pub mod store;

pub mod prelude {
    pub use crate::codec::{decode_collection, encode_collection};
    pub use crate::factory::open_backend;
    pub use crate::file::FileKeyValueStore;
    pub use crate::kv::KeyValueStore;
    pub use crate::memory::MemoryKeyValueStore;
    pub use crate::sqlite::SqliteKeyValueStore;
    pub use crate::store::CheckinStore;
}
