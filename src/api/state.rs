use axum::{
    extract::State,
    response::{
        sse::{Event, KeepAlive, Sse},
        Json,
    },
};
use futures_util::stream::Stream;
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use tokio_stream::{wrappers::WatchStream, StreamExt};
use utoipa::ToSchema;

use crate::models::PipelineSnapshot;
use crate::server::AppState;

/// Published pipeline state
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StateResponse {
    /// idle, ready, processing, ready_with_artifact or error
    pub status: String,
    /// Latest request generation
    pub generation: u64,
    /// Active directives in the order they are applied
    pub transforms: Vec<String>,
    pub selection: Option<SelectionInfo>,
    pub artifact: Option<ArtifactInfo>,
    pub error: Option<ErrorInfo>,
}

/// Selected source image
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SelectionInfo {
    pub filename: String,
    pub extension: String,
    pub size: usize,
}

/// Current processed preview
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ArtifactInfo {
    pub generation: u64,
    pub mime: String,
    pub size: usize,
    pub transforms: Vec<String>,
    /// RFC 3339 timestamp
    pub created_at: String,
    /// Where the preview bytes can be fetched
    pub url: String,
}

/// Failure of the latest request
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorInfo {
    /// transport or decode
    pub kind: String,
    pub message: String,
}

impl From<&PipelineSnapshot> for StateResponse {
    fn from(snapshot: &PipelineSnapshot) -> Self {
        Self {
            status: snapshot.status.to_string(),
            generation: snapshot.generation,
            transforms: snapshot.transforms.clone(),
            selection: snapshot.selection.as_ref().map(|s| SelectionInfo {
                filename: s.filename.clone(),
                extension: s.extension.clone(),
                size: s.size,
            }),
            artifact: snapshot.artifact.as_ref().map(|a| ArtifactInfo {
                generation: a.generation,
                mime: a.mime.clone(),
                size: a.size(),
                transforms: a.transforms.clone(),
                created_at: a.created_at.to_rfc3339(),
                url: format!("/api/preview?generation={}", a.generation),
            }),
            error: snapshot.failure.as_ref().map(|f| ErrorInfo {
                kind: f.kind.to_string(),
                message: f.message.clone(),
            }),
        }
    }
}

/// Current pipeline state
#[utoipa::path(
    get,
    path = "/api/state",
    responses(
        (status = 200, description = "Current pipeline state", body = StateResponse),
    ),
    tag = "State"
)]
pub async fn handle_state(State(state): State<AppState>) -> Json<StateResponse> {
    Json(StateResponse::from(&state.coordinator.snapshot()))
}

/// Stream of pipeline state changes
///
/// Sends one `state` event with the current state on connect, then one per
/// transition.
#[utoipa::path(
    get,
    path = "/api/events",
    responses(
        (status = 200, description = "Server-sent `state` events", content_type = "text/event-stream"),
    ),
    tag = "State"
)]
pub async fn handle_events(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = state.coordinator.subscribe();

    let stream = WatchStream::new(rx).map(|snapshot| {
        let body = StateResponse::from(&snapshot);
        Ok(Event::default()
            .event("state")
            .data(serde_json::to_string(&body).unwrap_or_default()))
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}
