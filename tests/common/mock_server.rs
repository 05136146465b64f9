//! Mock image processing service.

use wiremock::{
    matchers::{method, path},
    Mock, MockServer, ResponseTemplate,
};

/// Path the processing service listens on
pub const PROCESS_PATH: &str = "/img/process";

/// Wrapper around wiremock MockServer with convenience methods
pub struct MockProcessingServer {
    pub server: MockServer,
}

impl MockProcessingServer {
    /// Start a new mock processing service
    pub async fn start() -> Self {
        let server = MockServer::start().await;
        Self { server }
    }

    /// Full URL of the processing endpoint
    pub fn endpoint(&self) -> String {
        format!("{}{}", self.server.uri(), PROCESS_PATH)
    }

    /// Answer every processing call with `bytes` as `content_type`
    pub async fn mock_image(&self, bytes: &[u8], content_type: &str) {
        Mock::given(method("POST"))
            .and(path(PROCESS_PATH))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_bytes(bytes.to_vec())
                    .insert_header("content-type", content_type),
            )
            .mount(&self.server)
            .await;
    }

    /// Answer every processing call with an error status
    pub async fn mock_error(&self, status: u16, body: &str) {
        Mock::given(method("POST"))
            .and(path(PROCESS_PATH))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(&self.server)
            .await;
    }

    /// Bodies of every request received so far, lossily decoded
    pub async fn request_bodies(&self) -> Vec<String> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .map(|r| String::from_utf8_lossy(&r.body).to_string())
            .collect()
    }
}

/// Value of the multipart text field `name` in a raw form body
pub fn form_field(body: &str, name: &str) -> Option<String> {
    let marker = format!("name=\"{name}\"");
    let start = body.find(&marker)? + marker.len();
    let rest = &body[start..];
    let value_start = rest.find("\r\n\r\n")? + 4;
    let value = &rest[value_start..];
    let end = value.find("\r\n--")?;
    Some(value[..end].to_string())
}
