use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::path::Path;
use std::sync::{Arc, OnceLock};

use crate::error::PipelineError;

/// The currently chosen source image.
///
/// The payload is shared, so two selections can be compared by identity
/// ([`ImageSelection::is_same_payload`]) without touching the bytes.
#[derive(Debug, Clone)]
pub struct ImageSelection {
    payload: Arc<[u8]>,
    filename: String,
    extension: String,
    data_url: Arc<OnceLock<String>>,
}

impl ImageSelection {
    /// An empty payload is not a usable selection.
    pub fn new(
        payload: Arc<[u8]>,
        filename: Option<&str>,
        default_extension: &str,
    ) -> Result<Self, PipelineError> {
        if payload.is_empty() {
            return Err(PipelineError::SelectionInvalid);
        }
        let filename = filename.unwrap_or_default().to_string();
        let extension = infer_extension(&filename, default_extension);
        Ok(Self {
            payload,
            filename,
            extension,
            data_url: Arc::new(OnceLock::new()),
        })
    }

    pub fn payload(&self) -> &Arc<[u8]> {
        &self.payload
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Filename used for the upload part (`image.<ext>` when unknown)
    pub fn upload_name(&self) -> String {
        if self.filename.is_empty() {
            format!("image.{}", self.extension)
        } else {
            self.filename.clone()
        }
    }

    /// Lower-case extension sent as `imageExtension`
    pub fn extension(&self) -> &str {
        &self.extension
    }

    pub fn size(&self) -> usize {
        self.payload.len()
    }

    /// MIME type guessed from the extension
    pub fn mime_type(&self) -> String {
        mime_for_extension(&self.extension)
    }

    /// `data:` URL of the source image, computed on first use and cached
    /// for the lifetime of this selection.
    pub fn data_url(&self) -> &str {
        self.data_url
            .get_or_init(|| data_url(&self.mime_type(), &self.payload))
    }

    /// True when both selections share the very same payload allocation
    pub fn is_same_payload(&self, payload: &Arc<[u8]>) -> bool {
        Arc::ptr_eq(&self.payload, payload)
    }
}

/// Extension of `filename`, lower-cased; `default` when there is none.
pub fn infer_extension(filename: &str, default: &str) -> String {
    Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(|ext| ext.to_ascii_lowercase())
        .unwrap_or_else(|| default.to_string())
}

pub fn mime_for_extension(extension: &str) -> String {
    match extension {
        "jpg" | "jpeg" => "image/jpeg".to_string(),
        "svg" => "image/svg+xml".to_string(),
        "tif" => "image/tiff".to_string(),
        other => format!("image/{other}"),
    }
}

/// Encode bytes as a base64 `data:` URL
pub fn data_url(mime: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime, STANDARD.encode(bytes))
}
