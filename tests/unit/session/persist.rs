use super::*;
use crate::foundation::config::SETTINGS_KEY;
use crate::foundation::core::AspectRatio;
use crate::scene::model::ContentField;
use crate::session::notice::Severity;
use crate::store::blob::{BlobStore, MemoryBlobStore};
use crate::store::settings::{MemorySettingsStore, SettingsStore};
use std::time::Duration;

struct Fixture {
    settings: Arc<MemorySettingsStore>,
    blobs: Arc<MemoryBlobStore>,
    notifier: Notifier,
    persister: Persister,
}

fn fixture(quota: usize) -> Fixture {
    let settings = Arc::new(MemorySettingsStore::new(quota));
    let blobs = Arc::new(MemoryBlobStore::new());
    let storage = Arc::new(StorageClient::from_parts(settings.clone(), blobs.clone()));
    let notifier = Notifier::new(Duration::from_secs(5));
    let persister = Persister::new(storage, notifier.clone(), SETTINGS_KEY);
    Fixture {
        settings,
        blobs,
        notifier,
        persister,
    }
}

fn with_background(bg: Option<BackgroundMedia>) -> AppState {
    let mut state = AppState::default();
    state.apply_shared(|s| crate::scene::model::SharedUpdate {
        background: Some(bg),
        ..crate::scene::model::SharedUpdate::from_state(s)
    });
    state
}

#[tokio::test]
async fn inline_background_is_moved_to_blob_tier() {
    let f = fixture(1 << 20);
    let state = with_background(Some(BackgroundMedia::inline("data:image/png;base64,AA==")));

    let report = f.persister.save(&state).await;
    let key = report.key.clone().unwrap();
    assert!(key.starts_with(BLOB_KEY_PREFIX));
    assert!(report.blob_written && report.settings_written);
    assert_eq!(
        f.blobs.get(&key).await.unwrap().as_deref(),
        Some("data:image/png;base64,AA==")
    );

    let raw = f.settings.get(SETTINGS_KEY).unwrap().unwrap();
    assert!(!raw.contains("base64"));
    let doc: serde_json::Value = serde_json::from_str(&raw).unwrap();
    for ratio in ["1:1", "9:16", "16:9"] {
        assert_eq!(
            doc["flyerStates"][ratio]["backgroundMedia"],
            serde_json::json!({ "type": "image", "idbKey": key })
        );
    }
}

#[tokio::test]
async fn unchanged_payload_reuses_key_and_rewrites_blob() {
    let f = fixture(1 << 20);
    let state = with_background(Some(BackgroundMedia::inline("data:image/png;base64,AA==")));
    let first = f.persister.save(&state).await;
    let second = f.persister.save(&state).await;
    assert_eq!(first.key, second.key);
    assert!(second.blob_written);
    assert_eq!(f.blobs.len().await, 1);
}

#[tokio::test]
async fn cleared_blob_tier_is_refilled_by_next_save() {
    let f = fixture(1 << 20);
    let state = with_background(Some(BackgroundMedia::inline("data:image/png;base64,AA==")));
    let first = f.persister.save(&state).await;
    f.blobs.clear().await;

    let second = f.persister.save(&state).await;
    assert_eq!(first.key, second.key);
    assert!(second.blob_written);
    let key = second.key.unwrap();
    assert_eq!(
        f.blobs.get(&key).await.unwrap().as_deref(),
        Some("data:image/png;base64,AA==")
    );
}

#[tokio::test]
async fn existing_key_is_reused_for_resident_payload() {
    let f = fixture(1 << 20);
    let media = BackgroundMedia::keyed("bg-media-7").with_url("data:image/png;base64,AA==");
    let report = f.persister.save(&with_background(Some(media))).await;
    assert_eq!(report.key.as_deref(), Some("bg-media-7"));
    assert!(report.blob_written);
}

#[tokio::test]
async fn key_only_background_skips_blob_tier() {
    let f = fixture(1 << 20);
    let report = f
        .persister
        .save(&with_background(Some(BackgroundMedia::keyed("bg-media-9"))))
        .await;
    assert_eq!(report.key.as_deref(), Some("bg-media-9"));
    assert!(!report.blob_written);
    assert!(f.blobs.is_empty().await);
}

#[tokio::test]
async fn blob_failure_saves_without_background_and_warns() {
    let f = fixture(1 << 20);
    f.blobs.set_fail_writes(true).await;
    let state = with_background(Some(BackgroundMedia::inline("data:image/png;base64,AA==")));

    let report = f.persister.save(&state).await;
    assert_eq!(report.key, None);
    assert!(report.settings_written);
    let notice = f.notifier.current().unwrap();
    assert_eq!(notice.message, BLOB_WRITE_FAILED_NOTICE);
    assert_eq!(notice.severity, Severity::Error);

    let restored = f.persister.load();
    assert!(restored.flyer_states.iter().all(|s| s.background_media.is_none()));
}

#[tokio::test]
async fn settings_quota_failure_is_reported_and_state_untouched() {
    let f = fixture(64);
    let state = AppState::default();
    let before = state.clone();
    let report = f.persister.save(&state).await;
    assert!(!report.settings_written);
    assert_eq!(f.notifier.current().unwrap().message, SAVE_FAILED_NOTICE);
    assert_eq!(state, before);
    assert_eq!(f.settings.get(SETTINGS_KEY).unwrap(), None);
}

#[tokio::test]
async fn load_round_trips_content_and_design() {
    let f = fixture(1 << 20);
    let mut state = AppState::default();
    state.apply_shared(|s| {
        let mut u = crate::scene::model::SharedUpdate::from_state(s);
        *u.flyer_content.field_mut(ContentField::Headline) = "NEW".into();
        u
    });
    state.active_aspect_ratio = AspectRatio::Landscape;
    f.persister.save(&state).await;

    let restored = f.persister.load();
    assert_eq!(restored, state);
}

#[test]
fn missing_document_loads_defaults() {
    let f = fixture(1 << 20);
    assert_eq!(f.persister.load(), AppState::default());
}

#[test]
fn corrupt_document_is_removed() {
    let f = fixture(1 << 20);
    f.settings.set(SETTINGS_KEY, "{not json").unwrap();
    assert_eq!(f.persister.load(), AppState::default());
    assert_eq!(f.settings.get(SETTINGS_KEY).unwrap(), None);
    assert!(f.notifier.current().is_none());
}

#[test]
fn mismatched_document_is_kept_but_ignored() {
    let f = fixture(1 << 20);
    f.settings
        .set(SETTINGS_KEY, r#"{"flyerStates":{},"activeAspectRatio":"1:1"}"#)
        .unwrap();
    assert_eq!(f.persister.load(), AppState::default());
    assert!(f.settings.get(SETTINGS_KEY).unwrap().is_some());
}

#[test]
fn minted_keys_are_unique() {
    let f = fixture(1 << 20);
    let a = f.persister.mint_key();
    let b = f.persister.mint_key();
    assert_ne!(a, b);
}

#[test]
fn dehydrate_never_keeps_inline_payloads() {
    let state = with_background(Some(BackgroundMedia::inline("data:x")));
    let doc = Persister::dehydrate(&state, None);
    assert!(doc.flyer_states.iter().all(|s| s.background_media.is_none()));
    assert_eq!(doc.flyer_states.iter().count(), 3);
}
