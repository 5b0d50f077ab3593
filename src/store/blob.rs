//! Filesystem blob presence backend.
//!
//! Each key is one JSON file in the store directory. Blob stores don't
//! expire objects on their own, so the value is wrapped in a
//! [`StoredEntry`] carrying its deadline and filtered on read. Writes go to a
//! temporary file first and are renamed into place, so readers never see a
//! partially written blob.

use super::backend::StoreBackend;
use super::types::{StoredEntry, now_millis};
use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

/// Filesystem blob presence backend.
#[derive(Clone)]
pub struct BlobBackend {
    dir: Arc<PathBuf>,
}

impl BlobBackend {
    /// Opens (creating if needed) a blob store rooted at `dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn open<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create blob directory: {}", dir.display()))?;
        Ok(Self { dir: Arc::new(dir) })
    }

    /// Directory holding the blobs.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn blob_path(&self, key: &str) -> Result<PathBuf> {
        validate_key(key)?;
        Ok(self.dir.join(format!("{key}.json")))
    }

    fn get_sync(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let path = self.blob_path(key)?;

        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read blob '{key}'"));
            },
        };

        let entry = StoredEntry::from_json(&bytes)
            .with_context(|| format!("Failed to decode blob '{key}'"))?;

        // Expired blobs are left for the next overwrite or delete
        if entry.is_expired_at(now_millis()) {
            return Ok(None);
        }

        Ok(Some(entry.value))
    }

    fn put_sync(&self, key: &str, value: Vec<u8>, ttl: Option<Duration>) -> Result<()> {
        let path = self.blob_path(key)?;
        let json = StoredEntry::new(value, ttl, now_millis()).to_json()?;

        let mut tmp = tempfile::NamedTempFile::new_in(self.dir.as_path())
            .context("Failed to create temporary blob")?;
        tmp.write_all(&json)
            .with_context(|| format!("Failed to write blob '{key}'"))?;
        tmp.persist(&path)
            .with_context(|| format!("Failed to publish blob '{key}'"))?;

        Ok(())
    }

    fn delete_sync(&self, key: &str) -> Result<bool> {
        let path = self.blob_path(key)?;
        remove_if_present(&path).with_context(|| format!("Failed to delete blob '{key}'"))
    }
}

/// Keys become file names: reject anything that could escape the directory.
fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() {
        bail!("Blob key cannot be empty");
    }
    if key.starts_with('.') {
        bail!("Blob key cannot start with '.': {key}");
    }
    if !key
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'_' | b'-' | b'.'))
    {
        bail!("Blob key contains unsupported characters: {key}");
    }
    Ok(())
}

fn remove_if_present(path: &Path) -> std::io::Result<bool> {
    match fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e),
    }
}

#[async_trait]
impl StoreBackend for BlobBackend {
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
        "blob"
    }
}
