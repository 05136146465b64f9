use std::fmt;
use std::sync::Arc;

use super::artifact::ProcessedArtifact;

/// Lifecycle state of the preview pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStatus {
    /// No image selected
    Idle,
    /// Image selected, nothing requested yet
    Ready,
    /// A processing call is in flight
    Processing,
    /// The latest call succeeded and its artifact is published
    ReadyWithArtifact,
    /// The latest call failed
    Error,
}

impl PipelineStatus {
    /// Whether the pipeline is waiting for a result
    pub fn is_pending(&self) -> bool {
        matches!(self, PipelineStatus::Ready | PipelineStatus::Processing)
    }
}

impl fmt::Display for PipelineStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineStatus::Idle => write!(f, "idle"),
            PipelineStatus::Ready => write!(f, "ready"),
            PipelineStatus::Processing => write!(f, "processing"),
            PipelineStatus::ReadyWithArtifact => write!(f, "ready_with_artifact"),
            PipelineStatus::Error => write!(f, "error"),
        }
    }
}

/// Which stage of a failed request broke
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Transport,
    Decode,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::Transport => write!(f, "transport"),
            FailureKind::Decode => write!(f, "decode"),
        }
    }
}

/// Failure of the latest request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineFailure {
    pub kind: FailureKind,
    pub message: String,
}

/// What the view layer needs to know about the selected source image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionSummary {
    pub filename: String,
    pub extension: String,
    pub size: usize,
}

/// State published to subscribers after every transition
#[derive(Debug, Clone)]
pub struct PipelineSnapshot {
    pub status: PipelineStatus,
    /// Latest issued request generation
    pub generation: u64,
    /// Current ordered directives
    pub transforms: Vec<String>,
    pub selection: Option<SelectionSummary>,
    pub artifact: Option<Arc<ProcessedArtifact>>,
    pub failure: Option<PipelineFailure>,
}

impl PipelineSnapshot {
    pub fn idle() -> Self {
        Self {
            status: PipelineStatus::Idle,
            generation: 0,
            transforms: Vec::new(),
            selection: None,
            artifact: None,
            failure: None,
        }
    }
}

impl Default for PipelineSnapshot {
    fn default() -> Self {
        Self::idle()
    }
}
