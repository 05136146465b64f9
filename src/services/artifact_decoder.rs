//! Turns a processing response into a displayable artifact.

use chrono::Utc;
use std::sync::Arc;

use crate::error::PipelineError;
use crate::models::selection::data_url;
use crate::models::ProcessedArtifact;
use crate::services::process_client::ProcessedImage;

/// Decode a processing response into an artifact.
///
/// The MIME type is sniffed from the magic bytes; a declared `image/*`
/// content type is only trusted when sniffing finds nothing.
pub fn decode_artifact(
    response: ProcessedImage,
    generation: u64,
    transforms: Vec<String>,
) -> Result<ProcessedArtifact, PipelineError> {
    if response.bytes.is_empty() {
        return Err(PipelineError::Decode("empty response body".to_string()));
    }

    let mime = sniff_mime(&response.bytes, response.content_type.as_deref())?;
    let data_url = data_url(&mime, &response.bytes);

    Ok(ProcessedArtifact {
        generation,
        mime,
        bytes: Arc::from(response.bytes),
        data_url,
        transforms,
        created_at: Utc::now(),
    })
}

fn sniff_mime(bytes: &[u8], declared: Option<&str>) -> Result<String, PipelineError> {
    if let Some(kind) = infer::get(bytes) {
        if kind.matcher_type() == infer::MatcherType::Image {
            return Ok(kind.mime_type().to_string());
        }
        return Err(PipelineError::Decode(format!(
            "response is {}, not an image",
            kind.mime_type()
        )));
    }

    // Content types may carry parameters (`image/svg+xml; charset=utf-8`)
    let declared = declared
        .and_then(|ct| ct.split(';').next())
        .map(|ct| ct.trim().to_ascii_lowercase())
        .filter(|ct| ct.starts_with("image/"));

    declared.ok_or_else(|| PipelineError::Decode("response is not a recognizable image".to_string()))
}
