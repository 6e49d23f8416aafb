//! The synchronization engine: sole writer of [`AppState`].
//!
//! Content, design, and background are shared by all three formats. Every edit reads the active
//! format, builds one [`SharedUpdate`] and writes it into every slot, then notifies observers
//! (persistence, preview) in registration order.

use std::sync::Arc;

use futures::stream::{FuturesUnordered, StreamExt};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::assets::media::image_data_url;
use crate::foundation::config::EditorConfig;
use crate::foundation::core::AspectRatio;
use crate::foundation::error::FlyerResult;
use crate::layout::compose::compose_format;
use crate::layout::tree::FlyerTree;
use crate::scene::model::{
    AppState, BackgroundMedia, ContentField, DesignEdit, FontEdit, FormatState, PaletteEdit,
    SharedUpdate,
};
use crate::scene::templates::Template;
use crate::session::fetch::{ImageFetcher, fetch_data_url};
use crate::session::notice::Notifier;
use crate::session::persist::{Persister, StateObserver};
use crate::store::StorageClient;

pub const APPLYING_TEMPLATE_NOTICE: &str = "Applying template...";
pub const TEMPLATE_IMAGE_FAILED_NOTICE: &str = "Could not load template image.";

/// Observable, non-persisted session flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStatus {
    /// A template is being applied (its background may still be downloading).
    pub template_loading: bool,
}

/// Result of the hydration reattach pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReattachReport {
    pub attempted: usize,
    pub resolved: usize,
}

pub struct FlyerSession {
    state: AppState,
    storage: Arc<StorageClient>,
    fetcher: Arc<dyn ImageFetcher>,
    notifier: Notifier,
    persister: Arc<Persister>,
    observers: Vec<Arc<dyn StateObserver>>,
    status: watch::Sender<SessionStatus>,
}

impl std::fmt::Debug for FlyerSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FlyerSession")
            .field("active", &self.state.active_aspect_ratio)
            .field("observers", &self.observers.len())
            .finish_non_exhaustive()
    }
}

impl FlyerSession {
    /// Load saved state (or defaults), then reattach background payloads from the blob tier.
    #[tracing::instrument(level = "info", skip_all)]
    pub async fn open(
        storage: Arc<StorageClient>,
        fetcher: Arc<dyn ImageFetcher>,
        cfg: &EditorConfig,
    ) -> Self {
        let notifier = Notifier::new(cfg.notice_ttl);
        let persister = Arc::new(Persister::new(
            Arc::clone(&storage),
            notifier.clone(),
            cfg.settings_key.clone(),
        ));
        let state = persister.load();
        let (status, _) = watch::channel(SessionStatus::default());

        let mut session = Self {
            state,
            storage,
            fetcher,
            notifier,
            persister: Arc::clone(&persister),
            observers: vec![persister as Arc<dyn StateObserver>],
            status,
        };
        let report = session.reattach_backgrounds().await;
        info!(
            active = %session.state.active_aspect_ratio,
            reattached = report.resolved,
            "session opened"
        );
        session
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn active(&self) -> &FormatState {
        self.state.active()
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    pub fn persister(&self) -> &Persister {
        &self.persister
    }

    pub fn status(&self) -> watch::Receiver<SessionStatus> {
        self.status.subscribe()
    }

    /// Register an observer. It is called after every later state change.
    pub fn subscribe(&mut self, observer: Arc<dyn StateObserver>) {
        self.observers.push(observer);
    }

    /// Visual tree of the active format.
    pub fn render_active(&self) -> FlyerTree {
        compose_format(self.state.active())
    }

    /// Apply a shared transformation to all formats and notify observers.
    pub async fn update(&mut self, f: impl FnOnce(&FormatState) -> SharedUpdate) {
        self.state.apply_shared(f);
        self.commit().await;
    }

    pub async fn set_content(&mut self, field: ContentField, value: impl Into<String>) {
        let value = value.into();
        self.update(|s| {
            let mut u = SharedUpdate::from_state(s);
            *u.flyer_content.field_mut(field) = value;
            u
        })
        .await;
    }

    pub async fn set_design(&mut self, edit: DesignEdit) {
        self.update(|s| {
            let mut u = SharedUpdate::from_state(s);
            u.flyer_design.apply(edit);
            u
        })
        .await;
    }

    /// Rejected edits (a non-finite opacity) leave the state untouched and post an error notice.
    pub async fn set_color(&mut self, edit: PaletteEdit) -> FlyerResult<()> {
        let mut design = self.state.active().flyer_design.clone();
        if let Err(e) = design.apply_palette(edit) {
            warn!(error = %e, "palette edit rejected");
            self.notifier.error(e.to_string());
            return Err(e);
        }
        self.update(|s| SharedUpdate {
            flyer_design: design,
            ..SharedUpdate::from_state(s)
        })
        .await;
        Ok(())
    }

    pub async fn set_font(&mut self, edit: FontEdit) {
        self.update(|s| {
            let mut u = SharedUpdate::from_state(s);
            u.flyer_design.apply_font(edit);
            u
        })
        .await;
    }

    pub async fn set_background(&mut self, media: Option<BackgroundMedia>) {
        self.update(|s| SharedUpdate {
            background: Some(media),
            ..SharedUpdate::from_state(s)
        })
        .await;
    }

    /// Inline uploaded image bytes and make them the background of every format.
    pub async fn upload_background(
        &mut self,
        bytes: &[u8],
        declared_type: Option<&str>,
    ) -> FlyerResult<()> {
        let url = image_data_url(bytes, declared_type)?;
        self.set_background(Some(BackgroundMedia::inline(url))).await;
        Ok(())
    }

    /// Replace content and design with the template's, and the background with its image.
    ///
    /// A failed image download degrades to no background; the template text still applies.
    #[tracing::instrument(level = "info", skip_all, fields(template = %template.name))]
    pub async fn apply_template(&mut self, template: &Template) {
        self.status.send_replace(SessionStatus {
            template_loading: true,
        });
        self.notifier.success(APPLYING_TEMPLATE_NOTICE);

        let background = match template.background_image_url.as_deref() {
            None => None,
            Some(url) => match fetch_data_url(self.fetcher.as_ref(), url).await {
                Ok(data_url) => Some(BackgroundMedia::inline(data_url)),
                Err(e) => {
                    warn!(%url, error = %e, "template background unavailable");
                    self.notifier.error(TEMPLATE_IMAGE_FAILED_NOTICE);
                    None
                }
            },
        };

        self.update(|_| SharedUpdate {
            flyer_content: template.flyer_content.clone(),
            flyer_design: template.flyer_design.clone(),
            background: Some(background),
        })
        .await;

        self.status.send_replace(SessionStatus {
            template_loading: false,
        });
    }

    /// Switch which format is shown. Content is not touched.
    pub async fn set_active_aspect_ratio(&mut self, ratio: AspectRatio) {
        if self.state.active_aspect_ratio == ratio {
            return;
        }
        self.state.active_aspect_ratio = ratio;
        self.commit().await;
    }

    /// Fetch payloads for every keyed-but-unresolved background.
    ///
    /// Lookups complete in any order; each one updates only its own format. A miss or error
    /// leaves that format keyed and unresolved.
    pub async fn reattach_backgrounds(&mut self) -> ReattachReport {
        let mut pending = FuturesUnordered::new();
        for format in self.state.flyer_states.iter() {
            let Some(key) = format
                .background_media
                .as_ref()
                .filter(|m| m.needs_reattach())
                .and_then(BackgroundMedia::blob_key)
            else {
                continue;
            };
            let key = key.to_string();
            let ratio = format.aspect_ratio;
            let storage = Arc::clone(&self.storage);
            pending.push(async move {
                let result = storage.blobs().get(&key).await;
                (ratio, key, result)
            });
        }

        let mut report = ReattachReport {
            attempted: pending.len(),
            resolved: 0,
        };
        while let Some((ratio, key, result)) = pending.next().await {
            let url = match result {
                Ok(Some(url)) => url,
                Ok(None) => {
                    debug!(%ratio, %key, "background payload missing");
                    continue;
                }
                Err(e) => {
                    warn!(%ratio, %key, error = %e, "background payload lookup failed");
                    continue;
                }
            };

            let slot = self.state.flyer_states.get_mut(ratio);
            let still_waiting = slot
                .background_media
                .as_ref()
                .is_some_and(|m| m.needs_reattach() && m.blob_key() == Some(key.as_str()));
            if !still_waiting {
                continue;
            }
            slot.background_media = slot.background_media.as_ref().map(|m| m.with_url(url));
            report.resolved += 1;
            self.commit().await;
        }
        report
    }

    /// Release storage handles.
    pub async fn close(self) -> FlyerResult<()> {
        self.storage.close().await
    }

    async fn commit(&self) {
        for observer in &self.observers {
            observer.state_changed(&self.state).await;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/engine.rs"]
mod tests;
