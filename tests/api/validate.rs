//! Tests for POST /validate-key.

use axum::http::StatusCode;
use serde_json::json;

use crate::common::*;

#[tokio::test]
async fn test_validate_success_returns_iso_expiry() {
    let state = create_test_app_state();
    let license = create_test_license(&state, "A1B2C3D4E5F6", 2, 60);

    let (status, json) = validate_key(app(state), "A1B2C3D4E5F6", "device-a").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "success");
    assert_eq!(json["message"], "Key valid");
    assert_eq!(
        json["expiry"],
        keyward::util::to_iso8601(license.expires_at())
    );
    assert!(json["expiry"].as_str().unwrap().ends_with('Z'));
}

#[tokio::test]
async fn test_validate_missing_key_is_400() {
    let state = create_test_app_state();

    let (status, json) = post_json(
        app(state.clone()),
        "/validate-key",
        json!({ "deviceId": "device-a" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["status"], "error");
    assert_eq!(json["message"], "No key provided");

    let (status, _) = validate_key(app(state), "", "device-a").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_validate_missing_device_is_400() {
    let state = create_test_app_state();
    create_test_license(&state, "A1B2C3D4E5F6", 120, 0);

    let (status, json) =
        post_json(app(state), "/validate-key", json!({ "key": "A1B2C3D4E5F6" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["status"], "error");
}

#[tokio::test]
async fn test_validate_unknown_key_without_device_is_403() {
    let state = create_test_app_state();

    let (status, json) =
        post_json(app(state), "/validate-key", json!({ "key": "ZZZZZZZZZZZZ" })).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(json["message"], "Invalid or deleted license key");
}

#[tokio::test]
async fn test_validate_unknown_key_is_403() {
    let state = create_test_app_state();

    let (status, json) = validate_key(app(state), "ZZZZZZZZZZZZ", "device-a").await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(json["status"], "error");
    assert_eq!(json["message"], "Invalid or deleted license key");
}

#[tokio::test]
async fn test_validate_expired_key_is_403_and_unchanged() {
    let state = create_test_app_state();
    // Two-minute key created three minutes ago
    let license = create_test_license(&state, "A1B2C3D4E5F6", 2, 180);

    let (status, json) = validate_key(app(state.clone()), "A1B2C3D4E5F6", "device-a").await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(json["message"], "Key expired");

    let stored = state.store.find_by_id(license.id).unwrap().unwrap();
    assert!(!stored.is_logged_in);
    assert!(stored.device_id.is_none());
}

#[tokio::test]
async fn test_validate_binds_first_device() {
    let state = create_test_app_state();
    let license = create_test_license(&state, "A1B2C3D4E5F6", 120, 0);

    let (status, _) = validate_key(app(state.clone()), "A1B2C3D4E5F6", "device-a").await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = validate_key(app(state.clone()), "A1B2C3D4E5F6", "device-a").await;
    assert_eq!(status, StatusCode::OK, "holder can re-validate");

    let (status, json) = validate_key(app(state.clone()), "A1B2C3D4E5F6", "device-b").await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(
        json["message"],
        "This license is already logged in on another device."
    );

    let stored = state.store.find_by_id(license.id).unwrap().unwrap();
    assert!(stored.is_logged_in);
    assert_eq!(stored.device_id.as_deref(), Some("device-a"));
}

#[tokio::test]
async fn test_validate_malformed_body_is_400() {
    let state = create_test_app_state();

    let response = tower::ServiceExt::oneshot(
        app(state),
        axum::http::Request::builder()
            .method("POST")
            .uri("/validate-key")
            .header("content-type", "application/json")
            .body(axum::body::Body::from("not json"))
            .unwrap(),
    )
    .await
    .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["status"], "error");
}

#[tokio::test]
async fn test_health() {
    let state = create_test_app_state();
    let response = tower::ServiceExt::oneshot(
        app(state),
        axum::http::Request::builder()
            .uri("/health")
            .body(axum::body::Body::empty())
            .unwrap(),
    )
    .await
    .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
}
