//! Export pipeline: rasterize the mounted flyer and hand the PNG to a download sink.
//!
//! Phases run `Idle -> Capturing -> (Idle | Failed -> Idle)`. There is no queue and no retry: a
//! request made while capturing is rejected as [`ExportOutcome::Busy`].

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use crate::assets::media::decode_data_url;
use crate::foundation::config::EditorConfig;
use crate::foundation::error::{FlyerError, FlyerResult};
use crate::layout::tree::FlyerTree;

/// Alert shown whenever an export does not produce a file.
pub const EXPORT_FAILED_ALERT: &str = "Could not download the flyer. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RasterOptions {
    /// Pixel-density multiplier over the 1x canvas.
    pub pixel_ratio: f32,
    /// Encoder quality in `[0, 1]`.
    pub quality: f32,
}

impl Default for RasterOptions {
    fn default() -> Self {
        Self {
            pixel_ratio: 2.0,
            quality: 1.0,
        }
    }
}

/// Turns a visual tree into an image `data:` URL.
#[async_trait]
pub trait Rasterizer: Send + Sync {
    async fn rasterize(&self, tree: &FlyerTree, opts: RasterOptions) -> FlyerResult<String>;
}

/// Blocking, user-facing alert channel. Separate from the transient notice channel.
pub trait AlertSink: Send + Sync {
    fn alert(&self, message: &str);
}

/// Alert sink that keeps every message, in order.
#[derive(Debug, Default)]
pub struct RecordingAlerts {
    messages: std::sync::Mutex<Vec<String>>,
}

impl RecordingAlerts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages
            .lock()
            .map(|m| m.clone())
            .unwrap_or_default()
    }
}

impl AlertSink for RecordingAlerts {
    fn alert(&self, message: &str) {
        if let Ok(mut m) = self.messages.lock() {
            m.push(message.to_string());
        }
    }
}

/// Destination of a finished export ("save as file").
#[async_trait]
pub trait DownloadSink: Send + Sync {
    async fn save(&self, file_name: &str, bytes: &[u8]) -> FlyerResult<PathBuf>;
}

/// Saves exports into a directory.
#[derive(Debug, Clone)]
pub struct DirDownloadSink {
    dir: PathBuf,
}

impl DirDownloadSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[async_trait]
impl DownloadSink for DirDownloadSink {
    async fn save(&self, file_name: &str, bytes: &[u8]) -> FlyerResult<PathBuf> {
        tokio::fs::create_dir_all(&self.dir).await.map_err(|e| {
            FlyerError::export(format!(
                "failed to create export directory '{}': {e}",
                self.dir.display()
            ))
        })?;
        let path = self.dir.join(file_name);
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| FlyerError::export(format!("failed to write '{}': {e}", path.display())))?;
        Ok(path)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportPhase {
    Idle,
    Capturing,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    Saved(PathBuf),
    /// Another export is capturing; this request did nothing.
    Busy,
    Failed(String),
}

/// Counters over the exporter's lifetime.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExportStats {
    pub requests: u64,
    pub captures_started: u64,
    pub saved: u64,
    pub busy: u64,
    pub failed: u64,
}

#[derive(Debug, Default)]
struct Counters {
    requests: AtomicU64,
    captures_started: AtomicU64,
    saved: AtomicU64,
    busy: AtomicU64,
    failed: AtomicU64,
}

/// Export options; see [`EditorConfig`] for defaults.
#[derive(Debug, Clone)]
pub struct ExportOpts {
    pub raster: RasterOptions,
    pub file_name: String,
}

impl ExportOpts {
    pub fn from_config(cfg: &EditorConfig) -> Self {
        Self {
            raster: RasterOptions {
                pixel_ratio: cfg.pixel_ratio,
                quality: cfg.quality,
            },
            file_name: cfg.export_file_name.clone(),
        }
    }
}

pub struct Exporter {
    rasterizer: Option<Arc<dyn Rasterizer>>,
    downloads: Arc<dyn DownloadSink>,
    alerts: Arc<dyn AlertSink>,
    opts: ExportOpts,
    phase: watch::Sender<ExportPhase>,
    counters: Counters,
}

impl std::fmt::Debug for Exporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Exporter")
            .field("has_rasterizer", &self.rasterizer.is_some())
            .field("opts", &self.opts)
            .field("phase", &*self.phase.borrow())
            .finish()
    }
}

impl Exporter {
    /// `rasterizer` may be absent; exports then fail as a configuration error.
    pub fn new(
        rasterizer: Option<Arc<dyn Rasterizer>>,
        downloads: Arc<dyn DownloadSink>,
        alerts: Arc<dyn AlertSink>,
        opts: ExportOpts,
    ) -> Self {
        let (phase, _) = watch::channel(ExportPhase::Idle);
        Self {
            rasterizer,
            downloads,
            alerts,
            opts,
            phase,
            counters: Counters::default(),
        }
    }

    pub fn phase(&self) -> ExportPhase {
        *self.phase.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<ExportPhase> {
        self.phase.subscribe()
    }

    pub fn stats(&self) -> ExportStats {
        let c = &self.counters;
        ExportStats {
            requests: c.requests.load(Ordering::Relaxed),
            captures_started: c.captures_started.load(Ordering::Relaxed),
            saved: c.saved.load(Ordering::Relaxed),
            busy: c.busy.load(Ordering::Relaxed),
            failed: c.failed.load(Ordering::Relaxed),
        }
    }

    /// Export `node`, the tree currently mounted in the preview.
    #[tracing::instrument(level = "info", skip_all)]
    pub async fn request_export(&self, node: Option<&FlyerTree>) -> ExportOutcome {
        self.counters.requests.fetch_add(1, Ordering::Relaxed);
        if self.phase() == ExportPhase::Capturing {
            debug!("export already capturing");
            self.counters.busy.fetch_add(1, Ordering::Relaxed);
            return ExportOutcome::Busy;
        }

        let (node, rasterizer) = match (node, self.rasterizer.as_ref()) {
            (Some(n), Some(r)) => (n, r),
            (None, _) => return self.fail("flyer node is not mounted".to_string()),
            (_, None) => return self.fail("rasterizer is not available".to_string()),
        };

        let claimed = self.phase.send_if_modified(|p| {
            if *p == ExportPhase::Capturing {
                false
            } else {
                *p = ExportPhase::Capturing;
                true
            }
        });
        if !claimed {
            self.counters.busy.fetch_add(1, Ordering::Relaxed);
            return ExportOutcome::Busy;
        }
        self.counters.captures_started.fetch_add(1, Ordering::Relaxed);

        match self.capture(node, rasterizer.as_ref()).await {
            Ok(path) => {
                info!(path = %path.display(), "flyer exported");
                self.counters.saved.fetch_add(1, Ordering::Relaxed);
                self.phase.send_replace(ExportPhase::Idle);
                ExportOutcome::Saved(path)
            }
            Err(e) => self.fail(e.to_string()),
        }
    }

    async fn capture(&self, node: &FlyerTree, rasterizer: &dyn Rasterizer) -> FlyerResult<PathBuf> {
        let url = rasterizer.rasterize(node, self.opts.raster).await?;
        let image = decode_data_url(&url)?;
        if !image.mime.starts_with("image/") {
            return Err(FlyerError::export(format!(
                "rasterizer returned {} instead of an image",
                image.mime
            )));
        }
        self.downloads.save(&self.opts.file_name, &image.bytes).await
    }

    fn fail(&self, reason: String) -> ExportOutcome {
        if self.phase() == ExportPhase::Idle {
            warn!(%reason, "export not started");
        } else {
            error!(%reason, "export failed");
        }
        self.counters.failed.fetch_add(1, Ordering::Relaxed);
        self.phase.send_replace(ExportPhase::Failed);
        self.alerts.alert(EXPORT_FAILED_ALERT);
        self.phase.send_replace(ExportPhase::Idle);
        ExportOutcome::Failed(reason)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/export.rs"]
mod tests;
