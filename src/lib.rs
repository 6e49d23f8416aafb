//! Flyerkit is the core of a flyer editor.
//!
//! One piece of marketing copy is edited once and rendered into three fixed output shapes
//! (square post, tall story, wide thumbnail). The crate provides:
//!
//! - A [`FlyerSession`] that owns the editing state and keeps all formats in sync
//! - Two-tier persistence through a [`StorageClient`]
//! - A pure layout compositor ([`compose`]) and a PNG rasterizer ([`SvgRasterizer`])
//! - An [`Exporter`] state machine that saves the rendered flyer to a file
#![forbid(unsafe_code)]

mod foundation;

pub mod assets;
/// Export pipeline.
pub mod encode;
pub mod layout;
pub mod render;
/// Editing state model and template catalog.
pub mod scene;
pub mod schema;
pub mod session;
pub mod store;

pub use crate::foundation::config::{EXPORT_FILE_NAME, EditorConfig, SETTINGS_KEY};
pub use crate::foundation::core::{AspectRatio, Canvas, Point, Rect, Size};
pub use crate::foundation::error::{FlyerError, FlyerResult};

pub use crate::encode::export::{
    AlertSink, DirDownloadSink, DownloadSink, EXPORT_FAILED_ALERT, ExportOpts, ExportOutcome,
    ExportPhase, ExportStats, Exporter, RasterOptions, Rasterizer, RecordingAlerts,
};
pub use crate::layout::compose::{compose, compose_format};
pub use crate::layout::tree::FlyerTree;
pub use crate::render::raster::SvgRasterizer;
pub use crate::scene::model::{
    AppState, BackgroundMedia, BodyFont, ColorPalette, ColorSlot, ContentField, CtaAnimation,
    DesignEdit, FlyerContent, FlyerDesign, FontEdit, FontPairing, FormatState, HeadlineFont,
    ImageMedia, LayoutStyle, PaletteEdit, SharedUpdate,
};
pub use crate::scene::templates::{Template, catalog, find as find_template};
pub use crate::schema::validate::{InvalidKind, PersistedDocument, validate_document};
pub use crate::session::engine::{
    APPLYING_TEMPLATE_NOTICE, FlyerSession, ReattachReport, SessionStatus,
    TEMPLATE_IMAGE_FAILED_NOTICE,
};
#[cfg(feature = "http")]
pub use crate::session::fetch::HttpFetcher;
pub use crate::session::fetch::{FetchedImage, ImageFetcher, OfflineFetcher};
pub use crate::session::notice::{Notice, Notifier, Severity};
pub use crate::session::persist::{
    BLOB_WRITE_FAILED_NOTICE, Persister, SAVE_FAILED_NOTICE, SaveReport, StateObserver,
};
pub use crate::session::preview::PreviewObserver;
pub use crate::store::StorageClient;
pub use crate::store::blob::{BlobStore, FsBlobStore, MemoryBlobStore};
pub use crate::store::settings::{FileSettingsStore, MemorySettingsStore, SettingsStore};
