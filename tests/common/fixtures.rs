//! Test fixtures and constants.

use pixdrop::services::ProcessedImage;
use std::sync::Arc;

/// Smallest byte strings `infer` recognizes for each format
pub mod images {
    pub const PNG_A: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR-A";
    pub const PNG_B: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR-B";
    pub const PNG_C: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR-C";
    pub const JPEG: &[u8] = b"\xFF\xD8\xFF\xE0\0\x10JFIF\0";
}

/// Multipart boundary used by [`multipart_image`]
pub const BOUNDARY: &str = "pixdrop-test-boundary";

/// Fresh payload allocation for a selection event
pub fn payload(bytes: &[u8]) -> Arc<[u8]> {
    Arc::from(bytes.to_vec())
}

/// Successful processing response carrying `bytes` as a PNG
pub fn png_response(bytes: &[u8]) -> ProcessedImage {
    ProcessedImage {
        bytes: bytes.to_vec(),
        content_type: Some("image/png".to_string()),
    }
}

/// Body of a multipart form with a single `image` file field
pub fn multipart_image(filename: &str, content_type: &str, bytes: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
    body.extend_from_slice(
        format!("Content-Disposition: form-data; name=\"image\"; filename=\"{filename}\"\r\n")
            .as_bytes(),
    );
    body.extend_from_slice(format!("Content-Type: {content_type}\r\n\r\n").as_bytes());
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    body
}

/// Multipart form without any file field
pub fn multipart_empty() -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
    body.extend_from_slice(b"Content-Disposition: form-data; name=\"note\"\r\n\r\nnothing\r\n");
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}
