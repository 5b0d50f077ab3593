//! Redb-backed presence backend.
//!
//! A durable, namespaced embedded store. redb has no native expiry, so each
//! value is wrapped in a [`StoredEntry`] carrying its deadline; expired
//! entries are filtered and removed on read.

use super::backend::StoreBackend;
use super::types::{StoredEntry, now_millis};
use anyhow::{Context, Result};
use async_trait::async_trait;
use redb::{Database, ReadableDatabase, TableDefinition};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// Table holding presence entries.
const PRESENCE_TABLE: TableDefinition<'static, &'static str, &'static [u8]> =
    TableDefinition::new("presence");

/// Redb-backed presence backend.
///
/// `RedbBackend` is `Clone`; clones share the same database handle.
#[derive(Clone)]
pub struct RedbBackend {
    db: Arc<Database>,
}

impl RedbBackend {
    /// Opens or creates a redb database at the given path.
    ///
    /// Creates parent directories if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Parent directory cannot be created
    /// - Database file cannot be opened or created
    /// - Initialization transaction fails to begin or commit
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create presence directory: {}", parent.display())
            })?;
        }

        let db = Database::create(path)
            .with_context(|| format!("Failed to open presence database: {}", path.display()))?;

        // Create the table up front so the first read doesn't fail
        let write_txn = db
            .begin_write()
            .context("Failed to begin initialization transaction")?;
        {
            let _table = write_txn
                .open_table(PRESENCE_TABLE)
                .context("Failed to initialize presence table")?;
        }
        write_txn
            .commit()
            .context("Failed to commit initialization transaction")?;

        Ok(Self { db: Arc::new(db) })
    }

    fn get_sync(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let read_txn = self
            .db
            .begin_read()
            .context("Failed to begin read transaction")?;

        let table = read_txn
            .open_table(PRESENCE_TABLE)
            .context("Failed to open presence table")?;

        let entry = match table
            .get(key)
            .with_context(|| format!("Failed to read key '{key}'"))?
        {
            Some(guard) => StoredEntry::from_json(guard.value())
                .with_context(|| format!("Failed to decode entry for key '{key}'"))?,
            None => return Ok(None),
        };

        if entry.is_expired_at(now_millis()) {
            // Drop read transaction before starting write
            drop(table);
            drop(read_txn);

            return self.evict_expired_sync(key);
        }

        Ok(Some(entry.value))
    }

    /// Removes `key` only if the entry is still expired inside the write
    /// transaction. A put that landed after the read is kept and returned.
    fn evict_expired_sync(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let write_txn = self
            .db
            .begin_write()
            .context("Failed to begin write transaction")?;

        let current = {
            let mut table = write_txn
                .open_table(PRESENCE_TABLE)
                .context("Failed to open presence table")?;

            let removed = table
                .remove(key)
                .with_context(|| format!("Failed to remove key '{key}'"))?
                .map(|guard| guard.value().to_vec());
            removed
        };

        let entry = match current {
            Some(bytes) => StoredEntry::from_json(&bytes)
                .with_context(|| format!("Failed to decode entry for key '{key}'"))?,
            None => {
                write_txn
                    .abort()
                    .context("Failed to abort eviction transaction")?;
                return Ok(None);
            },
        };

        if entry.is_expired_at(now_millis()) {
            write_txn
                .commit()
                .context("Failed to commit eviction transaction")?;
            Ok(None)
        } else {
            // Rolling back restores the fresh entry
            write_txn
                .abort()
                .context("Failed to abort eviction transaction")?;
            Ok(Some(entry.value))
        }
    }

    fn put_sync(&self, key: &str, value: Vec<u8>, ttl: Option<Duration>) -> Result<()> {
        let json = StoredEntry::new(value, ttl, now_millis()).to_json()?;

        let write_txn = self
            .db
            .begin_write()
            .context("Failed to begin write transaction")?;
        {
            let mut table = write_txn
                .open_table(PRESENCE_TABLE)
                .context("Failed to open presence table")?;

            table
                .insert(key, json.as_slice())
                .with_context(|| format!("Failed to insert key '{key}'"))?;
        }
        write_txn
            .commit()
            .context("Failed to commit put transaction")?;

        Ok(())
    }

    fn delete_sync(&self, key: &str) -> Result<bool> {
        let write_txn = self
            .db
            .begin_write()
            .context("Failed to begin write transaction")?;

        let removed = {
            let mut table = write_txn
                .open_table(PRESENCE_TABLE)
                .context("Failed to open presence table")?;

            table
                .remove(key)
                .with_context(|| format!("Failed to remove key '{key}'"))?
                .is_some()
        };

        write_txn
            .commit()
            .context("Failed to commit delete transaction")?;

        Ok(removed)
    }
}

#[async_trait]
impl StoreBackend for RedbBackend {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let backend = self.clone();
        let key = key.to_string();
        tokio::task::spawn_blocking(move || backend.get_sync(&key))
            .await
            .context("Task join error")?
    }

    async fn put(&self, key: &str, value: Vec<u8>, ttl: Option<Duration>) -> Result<()> {
        let backend = self.clone();
        let key = key.to_string();
        tokio::task::spawn_blocking(move || backend.put_sync(&key, value, ttl))
            .await
            .context("Task join error")?
    }

    async fn delete(&self, key: &str) -> Result<bool> {
        let backend = self.clone();
        let key = key.to_string();
        tokio::task::spawn_blocking(move || backend.delete_sync(&key))
            .await
            .context("Task join error")?
    }

    fn name(&self) -> &'static str {
        "redb"
    }
}
