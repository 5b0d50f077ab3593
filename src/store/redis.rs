//! Redis-backed presence backend.
//!
//! Uses native `SET ... EX` expiry. Keys are namespaced as
//! `<namespace>:<key>` so several deployments can share one server.

use super::backend::StoreBackend;
use anyhow::{Context, Result};
use async_trait::async_trait;
use redis::AsyncCommands;
use redis::aio::ConnectionManager;
use std::time::Duration;

/// Redis-backed presence backend.
///
/// Holds a [`ConnectionManager`], which reconnects on its own and is cheap to
/// clone; each operation works on its own clone.
#[derive(Clone)]
pub struct RedisBackend {
    namespace: String,
    connection: ConnectionManager,
}

impl RedisBackend {
    /// Connects to the Redis server at `redis_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the first connection fails.
    pub async fn connect(redis_url: &str, namespace: impl Into<String>) -> Result<Self> {
        let client = redis::Client::open(redis_url).context("Invalid Redis URL")?;
        let connection = client
            .get_connection_manager()
            .await
            .context("Failed to connect to Redis")?;
        Ok(Self {
            namespace: namespace.into(),
            connection,
        })
    }

    fn key(&self, key: &str) -> String {
        format!("{}:{key}", self.namespace)
    }
}

/// Redis expiry is whole seconds and `EX 0` is rejected, so round up.
fn ttl_secs(ttl: Duration) -> u64 {
    let secs = ttl.as_secs();
    if ttl.subsec_nanos() > 0 {
        secs + 1
    } else {
        secs.max(1)
    }
}

#[async_trait]
impl StoreBackend for RedisBackend {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let mut conn = self.connection.clone();
        let value: Option<Vec<u8>> = conn
            .get(self.key(key))
            .await
            .with_context(|| format!("Failed to read key '{key}' from Redis"))?;
        Ok(value)
    }

    async fn put(&self, key: &str, value: Vec<u8>, ttl: Option<Duration>) -> Result<()> {
        let mut conn = self.connection.clone();
        let namespaced = self.key(key);
        match ttl {
            Some(ttl) => {
                let _: () = conn
                    .set_ex(namespaced, value, ttl_secs(ttl))
                    .await
                    .with_context(|| format!("Failed to write key '{key}' to Redis"))?;
            },
            None => {
                let _: () = conn
                    .set(namespaced, value)
                    .await
                    .with_context(|| format!("Failed to write key '{key}' to Redis"))?;
            },
        }
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool> {
        let mut conn = self.connection.clone();
        let removed: i64 = conn
            .del(self.key(key))
            .await
            .with_context(|| format!("Failed to delete key '{key}' from Redis"))?;
        Ok(removed > 0)
    }

    fn name(&self) -> &'static str {
        "redis"
    }
}
