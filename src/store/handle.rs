//! High-level `PresenceStore` handle over backend implementations.

use super::backend::StoreBackend;
use super::blob::BlobBackend;
use super::memory::MemoryBackend;
use super::redb::RedbBackend;
use crate::config::{BackendKind, StoreConfig};
use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;

/// Handle to the presence store.
///
/// Wraps a [`StoreBackend`] and is what the heartbeat ingestor and badge
/// renderer hold. It is constructed once at startup and passed in; nothing in
/// the crate reaches for a global store.
///
/// `PresenceStore` is `Clone`; clones share the backend.
#[derive(Clone)]
pub struct PresenceStore {
    backend: Arc<dyn StoreBackend>,
}

impl PresenceStore {
    /// Creates a store backed by process memory.
    pub fn memory() -> Self {
        Self::custom(MemoryBackend::new())
    }

    /// Creates a store backed by a redb database file.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or created.
    pub fn redb<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        Ok(Self::custom(RedbBackend::open(path)?))
    }

    /// Creates a store backed by a blob directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn blob<P: AsRef<std::path::Path>>(dir: P) -> Result<Self> {
        Ok(Self::custom(BlobBackend::open(dir)?))
    }

    /// Connects a store backed by Redis.
    ///
    /// # Errors
    ///
    /// Returns an error if the server cannot be reached.
    #[cfg(feature = "redis")]
    pub async fn redis(url: &str, namespace: &str) -> Result<Self> {
        Ok(Self::custom(
            super::redis::RedisBackend::connect(url, namespace).await?,
        ))
    }

    /// Creates a store with a custom backend.
    pub fn custom<B: StoreBackend>(backend: B) -> Self {
        Self {
            backend: Arc::new(backend),
        }
    }

    /// Builds the backend selected in configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be opened, or if Redis is
    /// selected in a build without the `redis` feature.
    pub async fn from_config(config: &StoreConfig) -> Result<Self> {
        match config.backend {
            BackendKind::Memory => Ok(Self::memory()),
            BackendKind::Redb => {
                let path = config.redb_path()?;
                Self::redb(&path)
                    .with_context(|| format!("Failed to open redb store at {}", path.display()))
            },
            BackendKind::Blob => {
                let dir = config.blob_dir()?;
                Self::blob(&dir)
                    .with_context(|| format!("Failed to open blob store at {}", dir.display()))
            },
            BackendKind::Redis => Self::redis_from_config(config).await,
        }
    }

    #[cfg(feature = "redis")]
    async fn redis_from_config(config: &StoreConfig) -> Result<Self> {
        let url = config
            .url
            .as_deref()
            .context("store.url is required for the redis backend")?;
        Self::redis(url, &config.namespace).await
    }

    #[cfg(not(feature = "redis"))]
    async fn redis_from_config(_config: &StoreConfig) -> Result<Self> {
        anyhow::bail!("pulse was built without the `redis` feature")
    }

    /// Short backend name for logs.
    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    /// Retrieves a value by key; `Ok(None)` if absent or expired.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying storage operation fails.
    pub async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        self.backend.get(key).await
    }

    /// Stores a value with an optional TTL.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying storage operation fails.
    pub async fn put(&self, key: &str, value: &[u8], ttl: Option<Duration>) -> Result<()> {
        self.backend.put(key, value.to_vec(), ttl).await
    }

    /// Deletes a key. Returns `Ok(true)` if it existed.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying storage operation fails.
    pub async fn delete(&self, key: &str) -> Result<bool> {
        self.backend.delete(key).await
    }
}

impl std::fmt::Debug for PresenceStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PresenceStore")
            .field("backend", &self.backend.name())
            .finish()
    }
}
