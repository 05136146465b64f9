//! HTTP view bridge setup.
//!
//! This module provides the router and application state used by both
//! the `serve` command and integration tests.

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::api;
use crate::models::AppConfig;
use crate::services::{
    HttpProcessingClient, PipelineCoordinator, PipelineOptions, ProcessingClient, SelectionStore,
};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub coordinator: Arc<PipelineCoordinator>,
    /// Body limit of the image upload route
    pub max_upload_bytes: usize,
}

/// Create application state talking to the configured processing endpoint.
pub fn create_app_state(config: Arc<AppConfig>) -> anyhow::Result<AppState> {
    let client = HttpProcessingClient::new(config.endpoint.clone(), config.request_timeout())
        .map_err(|e| anyhow::anyhow!("Failed to create processing client: {e}"))?;
    create_app_state_with_client(config, Arc::new(client))
}

/// Create application state with an explicit processing client.
pub fn create_app_state_with_client(
    config: Arc<AppConfig>,
    client: Arc<dyn ProcessingClient>,
) -> anyhow::Result<AppState> {
    let selection = Arc::new(SelectionStore::new(config.default_extension.clone()));
    let coordinator =
        PipelineCoordinator::new(client, selection, PipelineOptions::from(config.as_ref()))
            .map_err(|e| anyhow::anyhow!("Failed to create pipeline coordinator: {e}"))?;

    Ok(AppState {
        coordinator,
        max_upload_bytes: config.max_upload_bytes,
    })
}

/// Build the API router with all endpoints and middleware.
pub fn build_router(state: AppState) -> Router {
    let upload_limit = DefaultBodyLimit::max(state.max_upload_bytes);

    Router::new()
        .route("/api/state", get(api::handle_state))
        .route("/api/events", get(api::handle_events))
        .route(
            "/api/selection",
            post(api::handle_select)
                .delete(api::handle_clear)
                .layer(upload_limit),
        )
        .route("/api/selection/image", get(api::handle_source_image))
        .route("/api/selection/data-url", get(api::handle_source_data_url))
        .route("/api/controls", post(api::handle_control))
        .route("/api/directives", post(api::handle_directive))
        .route("/api/refresh", post(api::handle_refresh))
        .route("/api/preview", get(api::handle_preview))
        .route("/api/preview/data-url", get(api::handle_preview_data_url))
        // Health check
        .route("/health", get(|| async { "OK" }))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
