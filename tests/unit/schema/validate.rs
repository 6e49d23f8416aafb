use super::*;
use crate::scene::model::{BackgroundMedia, SharedUpdate};
use serde_json::json;

fn valid_json() -> Value {
    serde_json::to_value(AppState::default()).unwrap()
}

fn invalid_errors(doc: PersistedDocument) -> (InvalidKind, String) {
    match doc {
        PersistedDocument::Invalid { kind, errors } => (kind, errors.to_string()),
        PersistedDocument::Valid(_) => panic!("expected invalid document"),
    }
}

#[test]
fn default_state_validates() {
    let raw = serde_json::to_string(&AppState::default()).unwrap();
    let state = validate_document(&raw).into_state().unwrap();
    assert_eq!(state, AppState::default());
}

#[test]
fn keyed_backgrounds_survive_validation() {
    let mut state = AppState::default();
    state.apply_shared(|cur| SharedUpdate {
        background: Some(Some(BackgroundMedia::keyed("bg-media-42"))),
        ..SharedUpdate::from_state(cur)
    });
    let raw = serde_json::to_string(&state).unwrap();
    let back = validate_document(&raw).into_state().unwrap();
    assert_eq!(back, state);
}

#[test]
fn garbage_is_corrupt() {
    let (kind, msg) = invalid_errors(validate_document("{not json"));
    assert_eq!(kind, InvalidKind::Corrupt);
    assert!(msg.contains("not valid JSON"));
}

#[test]
fn missing_slot_and_content_are_reported_with_paths() {
    let mut v = valid_json();
    v["flyerStates"].as_object_mut().unwrap().remove("9:16");
    v["flyerStates"]["16:9"]
        .as_object_mut()
        .unwrap()
        .remove("flyerContent");

    let (kind, msg) = invalid_errors(validate_document(&v.to_string()));
    assert_eq!(kind, InvalidKind::SchemaMismatch);
    assert!(msg.contains("$.flyerStates[\"9:16\"]: format slot is missing"));
    assert!(msg.contains("$.flyerStates[\"16:9\"].flyerContent"));
}

#[test]
fn unknown_active_ratio_is_rejected() {
    let mut v = valid_json();
    v["activeAspectRatio"] = json!("4:3");
    let (kind, msg) = invalid_errors(validate_document(&v.to_string()));
    assert_eq!(kind, InvalidKind::SchemaMismatch);
    assert!(msg.contains("activeAspectRatio"));
}

#[test]
fn older_document_shapes_are_rejected() {
    let legacy = json!({
        "flyerContent": {"headline": "x"},
        "flyerDesign": {},
    });
    let (kind, _) = invalid_errors(validate_document(&legacy.to_string()));
    assert_eq!(kind, InvalidKind::SchemaMismatch);
}

#[test]
fn typed_errors_surface_after_shape_checks() {
    let mut v = valid_json();
    v["flyerStates"]["1:1"]["flyerDesign"]["layoutStyle"] = json!("free-form");
    let (kind, msg) = invalid_errors(validate_document(&v.to_string()));
    assert_eq!(kind, InvalidKind::SchemaMismatch);
    assert!(msg.contains("free-form"));
}

#[test]
fn mis_tagged_slots_are_rejected() {
    let mut v = valid_json();
    v["flyerStates"]["9:16"]["aspectRatio"] = json!("1:1");
    let (_, msg) = invalid_errors(validate_document(&v.to_string()));
    assert!(msg.contains("tagged \"1:1\""));
}
