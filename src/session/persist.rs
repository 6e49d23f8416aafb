//! Save and load of the editor state across the two storage tiers.
//!
//! Saving dehydrates: inline image payloads go to the blob tier and the settings document only
//! ever references them by key. Loading validates the settings document and falls back to
//! defaults on anything unusable; payloads are reattached later by the session.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use tracing::{debug, info, warn};
use xxhash_rust::xxh3::xxh3_64;

use crate::foundation::error::FlyerError;
use crate::scene::model::{AppState, BackgroundMedia};
use crate::schema::validate::{InvalidKind, PersistedDocument, validate_document};
use crate::session::notice::Notifier;
use crate::store::StorageClient;

pub const SAVE_FAILED_NOTICE: &str = "Could not save changes. The data might be too large.";
pub const BLOB_WRITE_FAILED_NOTICE: &str =
    "Background image could not be saved; it will not survive a reload.";

/// Prefix of keys minted for uploaded backgrounds.
pub const BLOB_KEY_PREFIX: &str = "bg-media-";

/// Reacts to every committed state change.
#[async_trait]
pub trait StateObserver: Send + Sync {
    async fn state_changed(&self, state: &AppState);
}

/// What a save pass did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SaveReport {
    /// Key every format's background was rewritten to, if any.
    pub key: Option<String>,
    pub blob_written: bool,
    pub settings_written: bool,
}

#[derive(Debug, Clone)]
struct Mirrored {
    fingerprint: u64,
    key: String,
}

pub struct Persister {
    storage: Arc<StorageClient>,
    notifier: Notifier,
    settings_key: String,
    mirrored: Mutex<Option<Mirrored>>,
    last_minted: AtomicI64,
}

impl std::fmt::Debug for Persister {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Persister")
            .field("settings_key", &self.settings_key)
            .finish_non_exhaustive()
    }
}

impl Persister {
    pub fn new(
        storage: Arc<StorageClient>,
        notifier: Notifier,
        settings_key: impl Into<String>,
    ) -> Self {
        Self {
            storage,
            notifier,
            settings_key: settings_key.into(),
            mirrored: Mutex::new(None),
            last_minted: AtomicI64::new(0),
        }
    }

    pub fn settings_key(&self) -> &str {
        &self.settings_key
    }

    /// Read and validate the settings document.
    ///
    /// Never fails: absent, unreadable and invalid documents all yield the default state.
    /// Unparseable documents are also removed so they are not re-read next time.
    pub fn load(&self) -> AppState {
        let raw = match self.storage.settings().get(&self.settings_key) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!(key = %self.settings_key, "no saved state; using defaults");
                return AppState::default();
            }
            Err(e) => {
                warn!(error = %e, "settings read failed; using defaults");
                return AppState::default();
            }
        };

        match validate_document(&raw) {
            PersistedDocument::Valid(state) => {
                info!(active = %state.active_aspect_ratio, "restored saved state");
                state
            }
            PersistedDocument::Invalid {
                kind: InvalidKind::Corrupt,
                errors,
            } => {
                warn!(%errors, "saved state is corrupt; discarding");
                if let Err(e) = self.storage.settings().remove(&self.settings_key) {
                    warn!(error = %e, "failed to remove corrupt state");
                }
                AppState::default()
            }
            PersistedDocument::Invalid {
                kind: InvalidKind::SchemaMismatch,
                errors,
            } => {
                info!(%errors, "saved state does not match the current schema; using defaults");
                AppState::default()
            }
        }
    }

    /// Copy of `state` with every background replaced by a reference to `key`, or cleared.
    pub fn dehydrate(state: &AppState, key: Option<&str>) -> AppState {
        let mut out = state.clone();
        for format in out.flyer_states.iter_mut() {
            format.background_media = key.map(BackgroundMedia::keyed);
        }
        out
    }

    /// Run one save pass against `state`.
    #[tracing::instrument(level = "debug", skip_all)]
    pub async fn save(&self, state: &AppState) -> SaveReport {
        let mut report = SaveReport::default();
        let active = state.active().background_media.as_ref();
        let (key, blob_written) = self.resolve_key(active).await;
        report.key = key;
        report.blob_written = blob_written;

        let doc = Self::dehydrate(state, report.key.as_deref());
        let written = serde_json::to_string(&doc)
            .map_err(FlyerError::from)
            .and_then(|json| self.storage.settings().set(&self.settings_key, &json));
        match written {
            Ok(()) => report.settings_written = true,
            Err(e) => {
                warn!(error = %e, "settings write failed");
                self.notifier.error(SAVE_FAILED_NOTICE);
            }
        }
        report
    }

    /// Decide the durable key for the active background and write its resident payload there.
    ///
    /// The payload is rewritten on every pass so a cleared blob tier heals on the next save.
    async fn resolve_key(&self, active: Option<&BackgroundMedia>) -> (Option<String>, bool) {
        let Some(media) = active else {
            return (None, false);
        };
        let Some(url) = media.url() else {
            return (media.blob_key().map(str::to_string), false);
        };

        let fingerprint = xxh3_64(url.as_bytes());
        let mirrored = self.mirrored_snapshot();
        let key = match (media.blob_key(), &mirrored) {
            (Some(k), _) => k.to_string(),
            (None, Some(m)) if m.fingerprint == fingerprint => m.key.clone(),
            (None, _) => self.mint_key(),
        };

        match self.storage.blobs().put(&key, url).await {
            Ok(()) => {
                debug!(%key, bytes = url.len(), "background mirrored to blob store");
                *self.mirrored.lock().unwrap_or_else(PoisonError::into_inner) = Some(Mirrored {
                    fingerprint,
                    key: key.clone(),
                });
                (Some(key), true)
            }
            Err(e) => {
                warn!(%key, error = %e, "blob write failed; saving without background");
                self.notifier.error(BLOB_WRITE_FAILED_NOTICE);
                (None, false)
            }
        }
    }

    fn mirrored_snapshot(&self) -> Option<Mirrored> {
        self.mirrored
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// `bg-media-<unix millis>`, strictly increasing within this persister.
    fn mint_key(&self) -> String {
        let now = chrono::Utc::now().timestamp_millis();
        let prev = self
            .last_minted
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
                Some(now.max(last + 1))
            })
            .unwrap_or_else(|p| p);
        format!("{BLOB_KEY_PREFIX}{}", now.max(prev + 1))
    }
}

#[async_trait]
impl StateObserver for Persister {
    async fn state_changed(&self, state: &AppState) {
        self.save(state).await;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/persist.rs"]
mod tests;
