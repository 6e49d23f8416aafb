use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        FlyerError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(FlyerError::storage("x").to_string().contains("storage error:"));
    assert!(FlyerError::fetch("x").to_string().contains("fetch error:"));
    assert!(
        FlyerError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
    assert!(FlyerError::export("x").to_string().contains("export error:"));
}

#[test]
fn quota_error_reports_both_sizes() {
    let err = FlyerError::QuotaExceeded {
        needed: 12,
        quota: 10,
    };
    let msg = err.to_string();
    assert!(msg.starts_with("quota exceeded:"));
    assert!(msg.contains("12"));
    assert!(msg.contains("10"));
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = FlyerError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn json_errors_map_to_serde() {
    let err: FlyerError = serde_json::from_str::<u32>("nope").unwrap_err().into();
    assert!(matches!(err, FlyerError::Serde(_)));
}
