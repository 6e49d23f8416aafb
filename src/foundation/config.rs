//! Editor configuration.
//!
//! Every setting has a default so a session can start with zero configuration. The binary
//! layers environment variables and then command-line flags on top.

use std::path::PathBuf;
use std::time::Duration;

/// Settings Store key holding the persisted document. The suffix is the schema version: bumping
/// it orphans every previously saved document and the next load falls back to defaults.
pub const SETTINGS_KEY: &str = "flyerkitState_v8";

/// Fixed file name used when an export is saved.
pub const EXPORT_FILE_NAME: &str = "high-conversion-ad.png";

/// Editor and storage configuration.
#[derive(Debug, Clone)]
pub struct EditorConfig {
    /// Root directory of the file-backed storage tiers.
    /// Env: `FLYERKIT_STORE_DIR`
    /// Default: `./.flyerkit`
    pub store_dir: PathBuf,

    /// Key the settings document is written under.
    pub settings_key: String,

    /// Capacity of the synchronous settings tier in bytes.
    /// Env: `FLYERKIT_SETTINGS_QUOTA`
    /// Default: 5 MiB
    pub settings_quota: usize,

    /// How long a transient notice stays visible.
    pub notice_ttl: Duration,

    /// Directory exports are saved into.
    /// Env: `FLYERKIT_EXPORT_DIR`
    /// Default: `.`
    pub export_dir: PathBuf,

    /// Export file name.
    pub export_file_name: String,

    /// Pixel-density multiplier handed to the rasterizer.
    pub pixel_ratio: f32,

    /// Encoder quality handed to the rasterizer (0..=1).
    pub quality: f32,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            store_dir: PathBuf::from("./.flyerkit"),
            settings_key: SETTINGS_KEY.to_string(),
            settings_quota: 5 * 1024 * 1024,
            notice_ttl: Duration::from_secs(5),
            export_dir: PathBuf::from("."),
            export_file_name: EXPORT_FILE_NAME.to_string(),
            pixel_ratio: 2.0,
            quality: 1.0,
        }
    }
}

impl EditorConfig {
    /// Defaults overlaid with `FLYERKIT_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut cfg = Self::default();

        if let Some(dir) = lookup("FLYERKIT_STORE_DIR").filter(|s| !s.is_empty()) {
            cfg.store_dir = PathBuf::from(dir);
        }
        if let Some(raw) = lookup("FLYERKIT_SETTINGS_QUOTA") {
            match raw.trim().parse::<usize>() {
                Ok(q) if q > 0 => cfg.settings_quota = q,
                _ => tracing::warn!(value = %raw, "ignoring invalid FLYERKIT_SETTINGS_QUOTA"),
            }
        }
        if let Some(dir) = lookup("FLYERKIT_EXPORT_DIR").filter(|s| !s.is_empty()) {
            cfg.export_dir = PathBuf::from(dir);
        }

        cfg
    }

    /// Directory of the settings tier.
    pub fn settings_dir(&self) -> PathBuf {
        self.store_dir.join("settings")
    }

    /// Directory of the blob tier.
    pub fn blob_dir(&self) -> PathBuf {
        self.store_dir.join("blobs")
    }
}
