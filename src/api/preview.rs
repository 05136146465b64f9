use axum::{
    extract::State,
    http::header,
    response::IntoResponse,
};

use crate::error::ApiError;
use crate::server::AppState;

/// Current processed preview
///
/// Always the artifact of the latest successful request; the `generation`
/// query parameter advertised in the state is only a cache buster.
#[utoipa::path(
    get,
    path = "/api/preview",
    responses(
        (status = 200, description = "Processed image", content_type = "image/*"),
        (status = 404, description = "No preview available"),
    ),
    tag = "Preview"
)]
pub async fn handle_preview(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let artifact = state
        .coordinator
        .selection_store()
        .artifact()
        .await
        .ok_or(ApiError::NoPreview)?;

    Ok((
        [
            (header::CONTENT_TYPE, artifact.mime.clone()),
            (header::CACHE_CONTROL, "no-store".to_string()),
        ],
        artifact.bytes.to_vec(),
    ))
}

/// Current preview as a `data:` URL
#[utoipa::path(
    get,
    path = "/api/preview/data-url",
    responses(
        (status = 200, description = "data: URL of the processed image", content_type = "text/plain"),
        (status = 404, description = "No preview available"),
    ),
    tag = "Preview"
)]
pub async fn handle_preview_data_url(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let artifact = state
        .coordinator
        .selection_store()
        .artifact()
        .await
        .ok_or(ApiError::NoPreview)?;

    Ok(artifact.data_url.clone())
}
