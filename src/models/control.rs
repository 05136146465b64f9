use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use transform_directives::{CONTRAST_PREFIX, RESIZE_PREFIX};
use utoipa::ToSchema;

use super::config::ControlLimits;

/// A numeric control of the transform panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Control {
    /// Resize width in pixels
    Width,
    /// Resize height in pixels
    Height,
    /// Contrast adjustment, 0 means none
    Contrast,
}

impl Control {
    /// Registry prefix of the directive this control feeds
    pub fn prefix(&self) -> &'static str {
        match self {
            Control::Width | Control::Height => RESIZE_PREFIX,
            Control::Contrast => CONTRAST_PREFIX,
        }
    }
}

impl fmt::Display for Control {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Control::Width => write!(f, "width"),
            Control::Height => write!(f, "height"),
            Control::Contrast => write!(f, "contrast"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown control: {0}")]
pub struct UnknownControl(pub String);

impl FromStr for Control {
    type Err = UnknownControl;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "width" => Ok(Control::Width),
            "height" => Ok(Control::Height),
            "contrast" => Ok(Control::Contrast),
            other => Err(UnknownControl(other.to_string())),
        }
    }
}

/// Last accepted value of every control.
///
/// `None` means the control is unset and contributes no directive.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ControlState {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub contrast: Option<f64>,
}

impl ControlState {
    /// Record a raw slider value, normalizing it against `limits`.
    pub fn set(&mut self, control: Control, value: Option<f64>, limits: &ControlLimits) {
        match control {
            Control::Width => self.width = pixels(value, limits.width.min, limits.width.max),
            Control::Height => self.height = pixels(value, limits.height.min, limits.height.max),
            Control::Contrast => {
                self.contrast = value
                    .filter(|v| v.is_finite() && *v != 0.0)
                    .map(|v| v.clamp(limits.contrast.min, limits.contrast.max))
                    .filter(|v| *v != 0.0);
            }
        }
    }

    /// Directive payload for the kind `control` belongs to, `None` when the
    /// directive should be absent.
    pub fn payload(&self, control: Control) -> Option<String> {
        match control {
            Control::Width | Control::Height => match (self.width, self.height) {
                (Some(w), Some(h)) => Some(format!("{w},{h}")),
                _ => None,
            },
            Control::Contrast => self.contrast.map(|v| format!("{v}")),
        }
    }
}

/// Width/height are whole pixels; anything below one pixel means unset.
fn pixels(value: Option<f64>, min: u32, max: u32) -> Option<u32> {
    let v = value.filter(|v| v.is_finite())?.round();
    if v < 1.0 {
        return None;
    }
    Some((v.min(u32::MAX as f64) as u32).clamp(min.max(1), max.max(1)))
}
