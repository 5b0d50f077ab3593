//! In-memory presence backend.
//!
//! Non-persistent storage using DashMap for concurrent access. Suited to
//! single-instance deployments, development and tests.

use super::backend::StoreBackend;
use anyhow::Result;
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Expired entries are swept once every this many writes.
const SWEEP_EVERY_WRITES: u64 = 1024;

/// Entry stored in the memory backend with optional expiration.
#[derive(Clone)]
struct MemoryEntry {
    value: Vec<u8>,
    expires_at: Option<Instant>,
}

impl MemoryEntry {
    fn new(value: Vec<u8>, ttl: Option<Duration>) -> Self {
        Self {
            value,
            expires_at: ttl.map(|d| Instant::now() + d),
        }
    }

    fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|exp| Instant::now() >= exp)
    }
}

/// In-memory presence backend.
///
/// All data is lost when the process exits, which is fine for presence data
/// that expires within minutes anyway. Expired entries are evicted lazily on
/// access and swept periodically from `put`, so ids that are never read
/// again don't pile up.
///
/// `MemoryBackend` is `Clone`; clones share the same map.
#[derive(Clone, Default)]
pub struct MemoryBackend {
    data: Arc<DashMap<String, MemoryEntry>>,
    writes: Arc<AtomicU64>,
}

impl MemoryBackend {
    /// Creates a new empty in-memory backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of entries held (including expired ones not yet
    /// evicted).
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if no entries are held.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Removes all expired entries.
    ///
    /// Runs automatically every few writes; call it directly for an
    /// immediate sweep.
    pub fn cleanup_expired(&self) {
        self.data.retain(|_, entry| !entry.is_expired());
    }
}

#[async_trait]
impl StoreBackend for MemoryBackend {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        if let Some(entry) = self.data.get(key) {
            if entry.is_expired() {
                drop(entry);
                // A put may have replaced the entry since the read
                self.data.remove_if(key, |_, entry| entry.is_expired());
                Ok(None)
            } else {
                Ok(Some(entry.value.clone()))
            }
        } else {
            Ok(None)
        }
    }

    async fn put(&self, key: &str, value: Vec<u8>, ttl: Option<Duration>) -> Result<()> {
        self.data
            .insert(key.to_string(), MemoryEntry::new(value, ttl));

        if self.writes.fetch_add(1, Ordering::Relaxed) % SWEEP_EVERY_WRITES
            == SWEEP_EVERY_WRITES - 1
        {
            self.cleanup_expired();
        }
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool> {
        Ok(self.data.remove(key).is_some())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
