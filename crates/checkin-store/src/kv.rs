use async_trait::async_trait;

use checkin_core::error::Result;

/// Async whole-value storage keyed by string.
///
/// Every `set` replaces the entire value for a key in one step; there is no
/// partial update. Implementations must be thread-safe (`Send + Sync`).
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`, or `None` if nothing was ever written.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove `key`. Removing a missing key succeeds.
    async fn remove(&self, key: &str) -> Result<()>;
}
