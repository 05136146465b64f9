use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use transform_directives::{validate_delimiter, DirectiveError, DEFAULT_DELIMITER};

/// Default processing endpoint of the local image service
pub const DEFAULT_ENDPOINT: &str = "http://localhost:6060/img/process";

/// Camera photos routinely exceed axum's 2 MB default body limit
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 32 * 1024 * 1024;

/// Application configuration loaded from config.yaml
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// URL of the processing endpoint (multipart POST)
    pub endpoint: String,

    /// Timeout for a single processing call
    pub request_timeout_secs: u64,

    /// Extension sent when the filename has none
    pub default_extension: String,

    /// Largest accepted image upload on the view bridge
    pub max_upload_bytes: usize,

    /// Character joining directives into the `transforms` form field
    pub directive_delimiter: char,

    /// Abort superseded in-flight requests instead of letting them finish
    pub cancel_superseded: bool,

    /// Keep the last good preview visible when a newer request fails
    pub keep_artifact_on_error: bool,

    /// Slider ranges
    pub controls: ControlLimits,
}

/// Accepted range of each numeric control
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ControlLimits {
    pub width: Range<u32>,
    pub height: Range<u32>,
    pub contrast: Range<f64>,
}

/// Inclusive range
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
pub struct Range<T> {
    pub min: T,
    pub max: T,
}

/// Configuration error
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Invalid directive delimiter: {0}")]
    Delimiter(#[from] DirectiveError),

    #[error("Invalid range for {control}: [{min}, {max}]")]
    Range {
        control: &'static str,
        min: String,
        max: String,
    },
}

impl AppConfig {
    /// Parse and validate configuration from YAML text
    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a file, falling back to defaults when the
    /// file is missing or invalid.
    pub fn load(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            tracing::debug!("No config file configured, using defaults");
            return Self::default();
        };

        let result = std::fs::read_to_string(path)
            .map_err(ConfigError::from)
            .and_then(|content| Self::from_yaml_str(&content));

        match result {
            Ok(config) => {
                tracing::info!(
                    path = %path.display(),
                    endpoint = %config.endpoint,
                    "Loaded configuration"
                );
                config
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), %e, "Failed to load config, using defaults");
                Self::default()
            }
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        validate_delimiter(self.directive_delimiter)?;

        let limits = &self.controls;
        if limits.width.min > limits.width.max {
            return Err(range_error("width", limits.width));
        }
        if limits.height.min > limits.height.max {
            return Err(range_error("height", limits.height));
        }
        if !limits.contrast.min.is_finite()
            || !limits.contrast.max.is_finite()
            || limits.contrast.min > limits.contrast.max
        {
            return Err(range_error("contrast", limits.contrast));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

fn range_error<T: std::fmt::Display>(control: &'static str, range: Range<T>) -> ConfigError {
    ConfigError::Range {
        control,
        min: range.min.to_string(),
        max: range.max.to_string(),
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            request_timeout_secs: 30,
            default_extension: "jpg".to_string(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            directive_delimiter: DEFAULT_DELIMITER,
            cancel_superseded: true,
            keep_artifact_on_error: false,
            controls: ControlLimits::default(),
        }
    }
}

impl Default for ControlLimits {
    fn default() -> Self {
        Self {
            width: Range { min: 1, max: 1920 },
            height: Range { min: 1, max: 1080 },
            contrast: Range {
                min: -10.0,
                max: 10.0,
            },
        }
    }
}
