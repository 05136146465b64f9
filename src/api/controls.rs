use axum::{extract::State, response::Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::state::StateResponse;
use crate::error::ApiError;
use crate::models::Control;
use crate::server::AppState;

/// Numeric control change
#[derive(Debug, Deserialize, ToSchema)]
pub struct ControlRequest {
    /// width, height or contrast
    pub control: String,
    /// New slider value; null (or 0) unsets the control
    #[serde(default)]
    pub value: Option<f64>,
}

/// Generic directive change
#[derive(Debug, Deserialize, ToSchema)]
pub struct DirectiveRequest {
    /// Directive kind including the colon, e.g. `blur:`
    pub prefix: String,
    /// Parameters; null or empty removes the directive
    #[serde(default)]
    pub payload: Option<String>,
}

/// Result of a transform change
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ChangeResponse {
    /// Whether the directive list changed (and processing was re-triggered
    /// if an image is selected)
    pub changed: bool,
    pub state: StateResponse,
}

/// Change a numeric control
#[utoipa::path(
    post,
    path = "/api/controls",
    request_body = ControlRequest,
    responses(
        (status = 200, description = "Control applied", body = ChangeResponse),
        (status = 400, description = "Unknown control"),
    ),
    tag = "Transforms"
)]
pub async fn handle_control(
    State(state): State<AppState>,
    Json(request): Json<ControlRequest>,
) -> Result<Json<ChangeResponse>, ApiError> {
    let control: Control = request.control.parse()?;
    let changed = state.coordinator.set_control(control, request.value).await;

    Ok(Json(ChangeResponse {
        changed,
        state: StateResponse::from(&state.coordinator.snapshot()),
    }))
}

/// Set or remove an arbitrary directive
#[utoipa::path(
    post,
    path = "/api/directives",
    request_body = DirectiveRequest,
    responses(
        (status = 200, description = "Directive applied", body = ChangeResponse),
        (status = 422, description = "Malformed prefix or payload"),
    ),
    tag = "Transforms"
)]
pub async fn handle_directive(
    State(state): State<AppState>,
    Json(request): Json<DirectiveRequest>,
) -> Result<Json<ChangeResponse>, ApiError> {
    let changed = state
        .coordinator
        .upsert_directive(&request.prefix, request.payload.as_deref())
        .await?;

    Ok(Json(ChangeResponse {
        changed,
        state: StateResponse::from(&state.coordinator.snapshot()),
    }))
}

/// Re-run processing with the current image and directives
#[utoipa::path(
    post,
    path = "/api/refresh",
    responses(
        (status = 200, description = "Processing re-triggered", body = ChangeResponse),
        (status = 404, description = "No image selected"),
    ),
    tag = "Transforms"
)]
pub async fn handle_refresh(
    State(state): State<AppState>,
) -> Result<Json<ChangeResponse>, ApiError> {
    if !state.coordinator.refresh().await {
        return Err(ApiError::NoSelection);
    }

    Ok(Json(ChangeResponse {
        changed: false,
        state: StateResponse::from(&state.coordinator.snapshot()),
    }))
}
