//! Two-tier persistence: a small synchronous settings tier and a large asynchronous blob tier.

/// Asynchronous key -> data-URL tier.
pub mod blob;
/// Synchronous, quota-limited key -> JSON tier.
pub mod settings;

use std::sync::Arc;

use tracing::info;

use crate::foundation::config::EditorConfig;
use crate::foundation::error::FlyerResult;
use crate::store::blob::{BlobStore, FsBlobStore, MemoryBlobStore};
use crate::store::settings::{FileSettingsStore, MemorySettingsStore, SettingsStore};

/// Handle over both storage tiers, shared by the persister and the session.
#[derive(Clone)]
pub struct StorageClient {
    settings: Arc<dyn SettingsStore>,
    blobs: Arc<dyn BlobStore>,
}

impl std::fmt::Debug for StorageClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageClient").finish_non_exhaustive()
    }
}

impl StorageClient {
    /// Open the file-backed tiers under `cfg.store_dir`.
    pub async fn open(cfg: &EditorConfig) -> FlyerResult<Self> {
        let settings = FileSettingsStore::open(cfg.settings_dir(), cfg.settings_quota)?;
        let blobs = FsBlobStore::open(cfg.blob_dir()).await?;
        info!(dir = %cfg.store_dir.display(), "storage opened");
        Ok(Self::from_parts(Arc::new(settings), Arc::new(blobs)))
    }

    /// Both tiers in memory. Nothing survives the process.
    pub fn in_memory(settings_quota: usize) -> Self {
        Self::from_parts(
            Arc::new(MemorySettingsStore::new(settings_quota)),
            Arc::new(MemoryBlobStore::new()),
        )
    }

    pub fn from_parts(settings: Arc<dyn SettingsStore>, blobs: Arc<dyn BlobStore>) -> Self {
        Self { settings, blobs }
    }

    pub fn settings(&self) -> &dyn SettingsStore {
        self.settings.as_ref()
    }

    pub fn blobs(&self) -> &dyn BlobStore {
        self.blobs.as_ref()
    }

    /// Release the blob handle. Settings need no teardown.
    pub async fn close(&self) -> FlyerResult<()> {
        self.blobs.close().await
    }
}
