//! Tests for the admin endpoints: key generation, deletion, unbinding, listing.

use axum::{
    body::Body,
    http::{Request, StatusCode, header},
};
use tower::ServiceExt;

use crate::common::*;

fn location(response: &axum::response::Response) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

#[tokio::test]
async fn test_generate_key_redirects_to_admin() {
    let state = create_test_app_state();

    let response = post_form(app(state.clone()), "/generate-key", "duration=2_hours").await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/admin");

    let licenses = state.store.list_all().unwrap();
    assert_eq!(licenses.len(), 1);
    assert_eq!(licenses[0].expiration_minutes, 120);
    assert_eq!(licenses[0].key.len(), 12);
    assert!(!licenses[0].is_logged_in);
}

#[tokio::test]
async fn test_generate_key_defaults_to_two_minutes() {
    let state = create_test_app_state();

    let response = post_form(app(state.clone()), "/generate-key", "").await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let licenses = state.store.list_all().unwrap();
    assert_eq!(licenses.len(), 1);
    assert_eq!(licenses[0].expiration_minutes, 2);
}

#[tokio::test]
async fn test_generate_key_rejects_unknown_duration() {
    let state = create_test_app_state();

    let response = post_form(app(state.clone()), "/generate-key", "duration=bogus").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(state.store.list_all().unwrap().is_empty());
}

#[tokio::test]
async fn test_generated_keys_are_unique() {
    let state = create_test_app_state();

    for _ in 0..20 {
        let response = post_form(app(state.clone()), "/generate-key", "duration=1_day").await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
    }

    let mut keys: Vec<String> = state
        .store
        .list_all()
        .unwrap()
        .into_iter()
        .map(|l| l.key)
        .collect();
    keys.sort();
    keys.dedup();
    assert_eq!(keys.len(), 20);
}

#[tokio::test]
async fn test_delete_key_then_validate_is_invalid() {
    let state = create_test_app_state();
    let license = create_test_license(&state, "A1B2C3D4E5F6", 120, 0);

    let response = post_form(app(state.clone()), &format!("/delete_key/{}", license.id), "").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/admin");

    let (status, json) = validate_key(app(state.clone()), "A1B2C3D4E5F6", "device-a").await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(json["message"], "Invalid or deleted license key");
}

#[tokio::test]
async fn test_delete_missing_key_still_redirects() {
    let state = create_test_app_state();

    let response = post_form(app(state), "/delete_key/9999", "").await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn test_unbind_key_allows_another_device() {
    let state = create_test_app_state();
    let license = create_test_license(&state, "A1B2C3D4E5F6", 120, 0);

    let (status, _) = validate_key(app(state.clone()), "A1B2C3D4E5F6", "device-a").await;
    assert_eq!(status, StatusCode::OK);

    let response = post_form(app(state.clone()), &format!("/unbind_key/{}", license.id), "").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let (status, _) = validate_key(app(state.clone()), "A1B2C3D4E5F6", "device-b").await;
    assert_eq!(status, StatusCode::OK);

    let stored = state.store.find_by_id(license.id).unwrap().unwrap();
    assert_eq!(stored.device_id.as_deref(), Some("device-b"));
}

#[tokio::test]
async fn test_unbind_missing_key_is_404() {
    let state = create_test_app_state();

    let response = post_form(app(state), "/unbind_key/9999", "").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_admin_page_lists_keys() {
    let state = create_test_app_state();
    create_test_license(&state, "AAAAAAAAAAAA", 120, 0);
    create_test_license(&state, "BBBBBBBBBBBB", 2, 600);

    let response = app(state)
        .oneshot(
            Request::builder()
                .uri("/admin")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("AAAAAAAAAAAA"));
    assert!(html.contains("BBBBBBBBBBBB"));
    assert!(html.contains("Active"));
    assert!(html.contains("Expired"));
}
