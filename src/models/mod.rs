pub mod artifact;
pub mod config;
pub mod control;
pub mod selection;
pub mod snapshot;

pub use artifact::ProcessedArtifact;
pub use config::{AppConfig, ConfigError, ControlLimits, Range, DEFAULT_ENDPOINT};
pub use control::{Control, ControlState, UnknownControl};
pub use selection::ImageSelection;
pub use snapshot::{
    FailureKind, PipelineFailure, PipelineSnapshot, PipelineStatus, SelectionSummary,
};
