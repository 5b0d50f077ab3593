//! Backend trait for the presence store.
//!
//! Defines the capability every time-bounded key-value backend implements
//! (memory, redb, Redis, blob directory). The registry only ever talks to
//! this trait.

use anyhow::Result;
use async_trait::async_trait;
use std::time::Duration;

/// Backend trait for time-bounded key-value storage.
///
/// All backends must be thread-safe (`Send + Sync`) for use with tokio.
/// Backends that can't express a TTL natively emulate it by storing the
/// deadline next to the value and filtering on read.
///
/// # Example
///
/// ```ignore
/// use pulse::store::{MemoryBackend, StoreBackend};
/// use std::time::Duration;
///
/// let backend = MemoryBackend::new();
/// backend.put("srv_pub_a3a9e1ed9732", b"{}".to_vec(), Some(Duration::from_secs(300))).await?;
/// let value = backend.get("srv_pub_a3a9e1ed9732").await?;
/// ```
#[async_trait]
pub trait StoreBackend: Send + Sync + 'static {
    /// Retrieves a value by key.
    ///
    /// Returns `Ok(None)` if the key doesn't exist or has expired. "Not
    /// found" is never reported as an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying storage operation fails.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Stores a value, replacing any previous one.
    ///
    /// With `Some(ttl)` the key becomes unreadable after roughly `ttl`.
    /// Precision is backend-defined; callers must not rely on sub-second
    /// accuracy. With `None` the key never expires.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying storage operation fails.
    async fn put(&self, key: &str, value: Vec<u8>, ttl: Option<Duration>) -> Result<()>;

    /// Deletes a key.
    ///
    /// Returns `Ok(true)` if the key existed. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying storage operation fails.
    async fn delete(&self, key: &str) -> Result<bool>;

    /// Short backend name for logs.
    fn name(&self) -> &'static str;
}
