//! Tests for API response models

use emwos_allocator::runtime::{health, ErrorResponse, WarningResponse};

#[test]
fn test_health() {
    assert!(health().ok);
}

#[test]
fn test_not_found_body() {
    let body = serde_json::to_value(ErrorResponse::not_found()).unwrap();
    assert_eq!(body, serde_json::json!({"error": "Not Found"}));
}

#[test]
fn test_warning_body() {
    let body = serde_json::to_value(WarningResponse {
        warning: "Job not found or already released".into(),
    })
    .unwrap();
    assert_eq!(
        body,
        serde_json::json!({"warning": "Job not found or already released"})
    );
}
