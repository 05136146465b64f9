//! Client side of the remote image processing call.
//!
//! The coordinator only sees the [`ProcessingClient`] trait; the HTTP
//! implementation posts a multipart form to the processing endpoint.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use std::sync::Arc;
use std::time::Duration;

use crate::error::PipelineError;

/// Longest error body kept in a transport failure message
const MAX_ERROR_BODY: usize = 256;

/// One processing request, captured at trigger time
#[derive(Debug, Clone)]
pub struct ProcessRequest {
    /// Request generation this call belongs to
    pub generation: u64,
    pub image: Arc<[u8]>,
    pub filename: String,
    pub mime: String,
    /// Value of the `imageExtension` field
    pub extension: String,
    /// Ordered directives
    pub directives: Vec<String>,
    /// Directives joined into the `transforms` field
    pub transforms: String,
}

/// Raw successful response of the processing service
#[derive(Debug, Clone)]
pub struct ProcessedImage {
    pub bytes: Vec<u8>,
    /// Declared `Content-Type`, if any
    pub content_type: Option<String>,
}

/// Remote procedure that applies directives to an image
#[async_trait]
pub trait ProcessingClient: Send + Sync {
    async fn process(&self, request: ProcessRequest) -> Result<ProcessedImage, PipelineError>;
}

/// [`ProcessingClient`] talking to the `/img/process` HTTP endpoint
pub struct HttpProcessingClient {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpProcessingClient {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, PipelineError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn build_form(request: &ProcessRequest) -> Result<Form, PipelineError> {
        let image = Part::bytes(request.image.to_vec())
            .file_name(request.filename.clone())
            .mime_str(&request.mime)?;

        Ok(Form::new()
            .part("image", image)
            .text("imageExtension", request.extension.clone())
            .text("transforms", request.transforms.clone()))
    }
}

#[async_trait]
impl ProcessingClient for HttpProcessingClient {
    async fn process(&self, request: ProcessRequest) -> Result<ProcessedImage, PipelineError> {
        let form = Self::build_form(&request)?;

        tracing::debug!(
            endpoint = %self.endpoint,
            generation = request.generation,
            size = request.image.len(),
            extension = %request.extension,
            transforms = %request.transforms,
            "Sending processing request"
        );

        let response = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message: String = body.chars().take(MAX_ERROR_BODY).collect();
            return Err(PipelineError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = response.bytes().await?.to_vec();

        tracing::debug!(
            generation = request.generation,
            size = bytes.len(),
            content_type = ?content_type,
            "Processing response received"
        );

        Ok(ProcessedImage {
            bytes,
            content_type,
        })
    }
}
