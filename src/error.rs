use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::models::FailureKind;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("No image selected")]
    NoSelection,

    #[error("No preview available")]
    NoPreview,

    #[error("Invalid upload: {message}")]
    Upload { status: StatusCode, message: String },

    #[error("Directive error: {0}")]
    Directive(#[from] transform_directives::DirectiveError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<axum::extract::multipart::MultipartError> for ApiError {
    fn from(e: axum::extract::multipart::MultipartError) -> Self {
        ApiError::Upload {
            status: e.status(),
            message: e.body_text(),
        }
    }
}

impl From<crate::models::UnknownControl> for ApiError {
    fn from(e: crate::models::UnknownControl) -> Self {
        ApiError::BadRequest(e.to_string())
    }
}

/// Failure of one processing request, caught at the coordinator boundary
#[derive(Debug, Clone, Error, PartialEq)]
pub enum PipelineError {
    #[error("Selection contains no usable file")]
    SelectionInvalid,

    #[error("Transport failure: {0}")]
    Transport(String),

    #[error("Processing service returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Decode failure: {0}")]
    Decode(String),
}

impl PipelineError {
    /// Stage the failure is reported under
    pub fn kind(&self) -> FailureKind {
        match self {
            PipelineError::Decode(_) => FailureKind::Decode,
            PipelineError::SelectionInvalid
            | PipelineError::Transport(_)
            | PipelineError::Status { .. } => FailureKind::Transport,
        }
    }
}

impl From<reqwest::Error> for PipelineError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            PipelineError::Transport(format!("request timed out: {e}"))
        } else {
            PipelineError::Transport(e.to_string())
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            ApiError::NoSelection => (StatusCode::NOT_FOUND, self.to_string()),
            ApiError::NoPreview => (StatusCode::NOT_FOUND, self.to_string()),
            ApiError::Upload { status, .. } => (*status, self.to_string()),
            ApiError::Directive(_) => (StatusCode::UNPROCESSABLE_ENTITY, self.to_string()),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()),
        };

        let body = Json(json!({
            "status": status.as_u16(),
            "error": message,
        }));

        (status, body).into_response()
    }
}
