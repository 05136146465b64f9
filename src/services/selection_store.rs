use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::PipelineError;
use crate::models::{ImageSelection, ProcessedArtifact};

/// What a call to [`SelectionStore::select`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionChange {
    /// A new image is selected
    Selected,
    /// The payload is the one already selected; nothing happened
    Unchanged,
    /// The selection (and its artifact) was discarded
    Cleared,
}

#[derive(Default)]
struct StoreState {
    selection: Option<ImageSelection>,
    artifact: Option<Arc<ProcessedArtifact>>,
}

/// Holds the single selected source image and its latest processed artifact
pub struct SelectionStore {
    state: RwLock<StoreState>,
    default_extension: String,
}

impl SelectionStore {
    pub fn new(default_extension: impl Into<String>) -> Self {
        Self {
            state: RwLock::new(StoreState::default()),
            default_extension: default_extension.into(),
        }
    }

    /// Select a new source image.
    ///
    /// A missing or empty payload clears the selection. Selecting the payload
    /// that is already selected (same allocation) changes nothing.
    pub async fn select(
        &self,
        payload: Option<Arc<[u8]>>,
        filename: Option<&str>,
    ) -> SelectionChange {
        let selection = match payload
            .ok_or(PipelineError::SelectionInvalid)
            .and_then(|p| ImageSelection::new(p, filename, &self.default_extension))
        {
            Ok(selection) => selection,
            Err(e) => {
                tracing::debug!(error = %e, "Selection gesture yielded no file, clearing");
                self.clear().await;
                return SelectionChange::Cleared;
            }
        };

        let mut state = self.state.write().await;
        if let Some(current) = &state.selection {
            if current.is_same_payload(selection.payload()) {
                return SelectionChange::Unchanged;
            }
        }

        tracing::debug!(
            filename = %selection.filename(),
            extension = %selection.extension(),
            size = selection.size(),
            "Image selected"
        );
        state.selection = Some(selection);
        state.artifact = None;
        SelectionChange::Selected
    }

    /// Discard the selection and any cached artifact
    pub async fn clear(&self) {
        let mut state = self.state.write().await;
        state.selection = None;
        state.artifact = None;
    }

    /// The live selection, if any
    pub async fn current(&self) -> Option<ImageSelection> {
        self.state.read().await.selection.clone()
    }

    /// The cached artifact for the live selection
    pub async fn artifact(&self) -> Option<Arc<ProcessedArtifact>> {
        self.state.read().await.artifact.clone()
    }

    /// Replace the cached artifact; the previous one is dropped
    pub async fn store_artifact(&self, artifact: Arc<ProcessedArtifact>) {
        let mut state = self.state.write().await;
        if state.selection.is_some() {
            state.artifact = Some(artifact);
        }
    }

    pub async fn clear_artifact(&self) {
        self.state.write().await.artifact = None;
    }
}

impl Default for SelectionStore {
    fn default() -> Self {
        Self::new("jpg")
    }
}
