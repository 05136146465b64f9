//! Assertion helpers for tests.

use axum::http::StatusCode;
use pretty_assertions::assert_eq;

use super::app::TestResponse;

/// Assert response has expected status code
pub fn assert_status(response: &TestResponse, expected: StatusCode) {
    assert_eq!(
        response.status,
        expected,
        "Expected status {}, got {}. Body: {}",
        expected,
        response.status,
        response.text()
    );
}

/// Assert response is OK (200)
pub fn assert_ok(response: &TestResponse) {
    assert_status(response, StatusCode::OK);
}

/// Assert response is a PNG preview served without caching
pub fn assert_png(response: &TestResponse) {
    assert_ok(response);
    assert!(
        response.is_png(),
        "Expected PNG image, got {} bytes starting with {:?}",
        response.body.len(),
        &response.body[..8.min(response.body.len())]
    );
    assert_eq!(
        response.content_type(),
        Some("image/png"),
        "Expected Content-Type: image/png"
    );
}

/// Assert an error body carries the expected HTTP status
pub fn assert_error(response: &TestResponse, expected: StatusCode) {
    assert_status(response, expected);
    let json: serde_json::Value = response.json();
    assert_eq!(
        json["status"].as_u64(),
        Some(expected.as_u16() as u64),
        "Full response: {json}"
    );
    assert!(json["error"].is_string(), "Expected error message");
}

/// Assert the `state` object of a response (or the body itself) has `status`
pub fn assert_pipeline_status(state: &serde_json::Value, expected: &str) {
    assert_eq!(
        state["status"].as_str(),
        Some(expected),
        "Full state: {}",
        serde_json::to_string_pretty(state).unwrap()
    );
}
