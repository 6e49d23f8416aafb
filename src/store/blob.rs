//! Asynchronous large-value tier for background image payloads.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::fs;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::foundation::error::{FlyerError, FlyerResult};
use crate::store::settings::validate_key;

/// Key -> string store sized for image data URLs.
///
/// Entries are never garbage-collected: superseded payloads stay behind as orphans.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Resolve `key`. A miss is `Ok(None)`, not an error.
    async fn get(&self, key: &str) -> FlyerResult<Option<String>>;
    /// Write `value` under `key`, replacing any previous entry.
    async fn put(&self, key: &str, value: &str) -> FlyerResult<()>;
    /// Release the underlying handle. Later calls may fail.
    async fn close(&self) -> FlyerResult<()> {
        Ok(())
    }
}

/// In-process blob tier.
#[derive(Debug, Default)]
pub struct MemoryBlobStore {
    entries: RwLock<HashMap<String, String>>,
    closed: RwLock<bool>,
    fail_writes: RwLock<bool>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every entry, as when the user clears site data.
    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// Make every subsequent `put` fail with a storage error.
    pub async fn set_fail_writes(&self, fail: bool) {
        *self.fail_writes.write().await = fail;
    }

    async fn ensure_open(&self) -> FlyerResult<()> {
        if *self.closed.read().await {
            return Err(FlyerError::storage("blob store is closed"));
        }
        Ok(())
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn get(&self, key: &str) -> FlyerResult<Option<String>> {
        self.ensure_open().await?;
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn put(&self, key: &str, value: &str) -> FlyerResult<()> {
        self.ensure_open().await?;
        if *self.fail_writes.read().await {
            return Err(FlyerError::storage(format!("write of blob '{key}' rejected")));
        }
        self.entries
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn close(&self) -> FlyerResult<()> {
        *self.closed.write().await = true;
        Ok(())
    }
}

/// Blob tier backed by one file per key.
#[derive(Debug)]
pub struct FsBlobStore {
    base_path: PathBuf,
    closed: AtomicBool,
}

impl FsBlobStore {
    pub async fn open(base_path: PathBuf) -> FlyerResult<Self> {
        fs::create_dir_all(&base_path).await.map_err(|e| {
            FlyerError::storage(format!(
                "failed to create blob directory '{}': {e}",
                base_path.display()
            ))
        })?;
        info!(path = %base_path.display(), "blob store opened");
        Ok(Self {
            base_path,
            closed: AtomicBool::new(false),
        })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn blob_path(&self, key: &str) -> FlyerResult<PathBuf> {
        if self.closed.load(Ordering::Acquire) {
            return Err(FlyerError::storage("blob store is closed"));
        }
        validate_key(key)?;
        Ok(self.base_path.join(format!("{key}.blob")))
    }
}

#[async_trait]
impl BlobStore for FsBlobStore {
    async fn get(&self, key: &str) -> FlyerResult<Option<String>> {
        let path = self.blob_path(key)?;
        match fs::read_to_string(&path).await {
            Ok(data) => {
                debug!(key, size = data.len(), "blob read");
                Ok(Some(data))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(FlyerError::storage(format!("failed to read blob '{key}': {e}"))),
        }
    }

    async fn put(&self, key: &str, value: &str) -> FlyerResult<()> {
        let path = self.blob_path(key)?;
        fs::write(&path, value)
            .await
            .map_err(|e| FlyerError::storage(format!("failed to write blob '{key}': {e}")))?;
        debug!(key, size = value.len(), "blob written");
        Ok(())
    }

    async fn close(&self) -> FlyerResult<()> {
        self.closed.store(true, Ordering::Release);
        debug!(path = %self.base_path.display(), "blob store closed");
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/store/blob.rs"]
mod tests;
