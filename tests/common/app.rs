//! Test application factory for integration tests.

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use std::sync::Arc;
use tower::ServiceExt;

use pixdrop::models::AppConfig;
use pixdrop::server::{build_router, create_app_state, create_app_state_with_client, AppState};
use pixdrop::services::{PipelineCoordinator, ProcessingClient};

use super::fixtures::BOUNDARY;

/// Test application with router and direct access to the coordinator
pub struct TestApp {
    router: axum::Router,
    pub coordinator: Arc<PipelineCoordinator>,
}

impl TestApp {
    /// Create a test application backed by an in-process client
    pub fn with_client(client: Arc<dyn ProcessingClient>) -> Self {
        Self::with_config_and_client(AppConfig::default(), client)
    }

    pub fn with_config_and_client(config: AppConfig, client: Arc<dyn ProcessingClient>) -> Self {
        let state = create_app_state_with_client(Arc::new(config), client)
            .expect("Failed to create app state");
        Self::from_state(state)
    }

    /// Create a test application talking HTTP to `endpoint`
    pub fn with_endpoint(endpoint: &str) -> Self {
        let config = AppConfig {
            endpoint: endpoint.to_string(),
            request_timeout_secs: 5,
            ..AppConfig::default()
        };
        let state = create_app_state(Arc::new(config)).expect("Failed to create app state");
        Self::from_state(state)
    }

    fn from_state(state: AppState) -> Self {
        let coordinator = state.coordinator.clone();
        // Same router as production
        let router = build_router(state);
        Self {
            router,
            coordinator,
        }
    }

    /// Router clone for requests whose body never ends (SSE)
    pub fn router(&self) -> axum::Router {
        self.router.clone()
    }

    /// Make a GET request to the given path
    pub async fn get(&self, path: &str) -> TestResponse {
        self.request(Request::get(path).body(Body::empty()).unwrap())
            .await
    }

    /// Make a DELETE request to the given path
    pub async fn delete(&self, path: &str) -> TestResponse {
        self.request(Request::delete(path).body(Body::empty()).unwrap())
            .await
    }

    /// Make a POST request without a body
    pub async fn post(&self, path: &str) -> TestResponse {
        self.request(Request::post(path).body(Body::empty()).unwrap())
            .await
    }

    /// Make a POST request with JSON body
    pub async fn post_json(&self, path: &str, body: serde_json::Value) -> TestResponse {
        let request = Request::post(path)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.request(request).await
    }

    /// Make a POST request with a multipart body built by the fixtures
    pub async fn post_multipart(&self, path: &str, body: Vec<u8>) -> TestResponse {
        let request = Request::post(path)
            .header(
                "Content-Type",
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap();
        self.request(request).await
    }

    /// Send a request to the router
    async fn request(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Request failed");

        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes()
            .to_vec();

        TestResponse {
            status,
            headers,
            body,
        }
    }

    /// Set a numeric control through the API
    pub async fn set_control(&self, control: &str, value: Option<f64>) -> TestResponse {
        self.post_json(
            "/api/controls",
            serde_json::json!({ "control": control, "value": value }),
        )
        .await
    }
}

/// Test response with convenience methods
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: axum::http::HeaderMap,
    pub body: Vec<u8>,
}

impl TestResponse {
    /// Parse body as JSON
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> T {
        serde_json::from_slice(&self.body).expect("Failed to parse JSON response")
    }

    /// Get body as string
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).to_string()
    }

    pub fn content_type(&self) -> Option<&str> {
        self.headers
            .get("content-type")
            .and_then(|v| v.to_str().ok())
    }

    /// Check if response is a PNG image
    pub fn is_png(&self) -> bool {
        self.body.len() >= 8 && &self.body[0..8] == b"\x89PNG\r\n\x1a\n"
    }
}
