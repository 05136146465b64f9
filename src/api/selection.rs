use axum::{
    extract::{Multipart, State},
    http::header,
    response::{IntoResponse, Json},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use super::state::StateResponse;
use crate::error::ApiError;
use crate::server::AppState;
use crate::services::SelectionChange;

/// Multipart field carrying the dropped file
const IMAGE_FIELD: &str = "image";

/// Result of a selection event
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SelectionResponse {
    /// selected, unchanged or cleared
    pub change: String,
    pub state: StateResponse,
}

fn change_name(change: SelectionChange) -> &'static str {
    match change {
        SelectionChange::Selected => "selected",
        SelectionChange::Unchanged => "unchanged",
        SelectionChange::Cleared => "cleared",
    }
}

/// Select a source image
///
/// Expects a multipart form with an `image` file field. A request without
/// a usable file clears the selection.
#[utoipa::path(
    post,
    path = "/api/selection",
    request_body(content_type = "multipart/form-data", description = "`image` file field"),
    responses(
        (status = 200, description = "Selection updated", body = SelectionResponse),
        (status = 400, description = "Malformed multipart body"),
    ),
    tag = "Selection"
)]
pub async fn handle_select(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<SelectionResponse>, ApiError> {
    let mut upload: Option<(Vec<u8>, Option<String>)> = None;

    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(IMAGE_FIELD) {
            continue;
        }
        let filename = field.file_name().map(str::to_string);
        let bytes = field.bytes().await?;
        upload = Some((bytes.to_vec(), filename));
    }

    let (payload, filename) = match upload {
        Some((bytes, filename)) if !bytes.is_empty() => (Some(Arc::<[u8]>::from(bytes)), filename),
        _ => (None, None),
    };

    let change = state
        .coordinator
        .select_file(payload, filename.as_deref())
        .await;
    tracing::info!(change = change_name(change), filename = ?filename, "Selection event");

    Ok(Json(SelectionResponse {
        change: change_name(change).to_string(),
        state: StateResponse::from(&state.coordinator.snapshot()),
    }))
}

/// Clear the selected image
#[utoipa::path(
    delete,
    path = "/api/selection",
    responses(
        (status = 200, description = "Selection cleared", body = SelectionResponse),
    ),
    tag = "Selection"
)]
pub async fn handle_clear(State(state): State<AppState>) -> Json<SelectionResponse> {
    state.coordinator.clear().await;
    Json(SelectionResponse {
        change: change_name(SelectionChange::Cleared).to_string(),
        state: StateResponse::from(&state.coordinator.snapshot()),
    })
}

/// Raw bytes of the selected source image
#[utoipa::path(
    get,
    path = "/api/selection/image",
    responses(
        (status = 200, description = "Source image", content_type = "image/*"),
        (status = 404, description = "No image selected"),
    ),
    tag = "Selection"
)]
pub async fn handle_source_image(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let selection = state
        .coordinator
        .selection_store()
        .current()
        .await
        .ok_or(ApiError::NoSelection)?;

    Ok((
        [(header::CONTENT_TYPE, selection.mime_type())],
        selection.payload().to_vec(),
    ))
}

/// Source image as a `data:` URL
#[utoipa::path(
    get,
    path = "/api/selection/data-url",
    responses(
        (status = 200, description = "data: URL of the source image", content_type = "text/plain"),
        (status = 404, description = "No image selected"),
    ),
    tag = "Selection"
)]
pub async fn handle_source_data_url(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let selection = state
        .coordinator
        .selection_store()
        .current()
        .await
        .ok_or(ApiError::NoSelection)?;

    Ok(selection.data_url().to_string())
}
