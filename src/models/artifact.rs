use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Decoded, displayable result of a processing call
#[derive(Debug, Clone)]
pub struct ProcessedArtifact {
    /// Generation of the request that produced it
    pub generation: u64,
    /// Sniffed MIME type (`image/png`)
    pub mime: String,
    /// Raw processed bytes
    pub bytes: Arc<[u8]>,
    /// `data:` URL ready to be used as an image source
    pub data_url: String,
    /// Directives the request was made with
    pub transforms: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl ProcessedArtifact {
    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}
