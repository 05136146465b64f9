pub mod artifact_decoder;
pub mod pipeline_coordinator;
pub mod process_client;
pub mod selection_store;

pub use artifact_decoder::decode_artifact;
pub use pipeline_coordinator::{PipelineCoordinator, PipelineOptions, PipelineStats};
pub use process_client::{HttpProcessingClient, ProcessRequest, ProcessedImage, ProcessingClient};
pub use selection_store::{SelectionChange, SelectionStore};
