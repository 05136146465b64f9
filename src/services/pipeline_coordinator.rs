//! Transform-pipeline coordinator.
//!
//! Ties selection and transform changes to remote processing calls and
//! publishes the resulting preview. Every trigger issues a new request
//! generation; a result is only published if its generation is still the
//! latest when it completes, so out-of-order responses can never overwrite
//! a newer preview.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use transform_directives::{validate, DirectiveError, TransformRegistry};

use crate::error::PipelineError;
use crate::models::{
    AppConfig, Control, ControlLimits, ControlState, PipelineFailure, PipelineSnapshot,
    PipelineStatus, ProcessedArtifact, SelectionSummary,
};
use crate::services::artifact_decoder::decode_artifact;
use crate::services::process_client::{ProcessRequest, ProcessingClient};
use crate::services::selection_store::{SelectionChange, SelectionStore};

/// Coordinator behaviour knobs
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    pub delimiter: char,
    pub cancel_superseded: bool,
    pub keep_artifact_on_error: bool,
    pub limits: ControlLimits,
}

impl From<&AppConfig> for PipelineOptions {
    fn from(config: &AppConfig) -> Self {
        Self {
            delimiter: config.directive_delimiter,
            cancel_superseded: config.cancel_superseded,
            keep_artifact_on_error: config.keep_artifact_on_error,
            limits: config.controls.clone(),
        }
    }
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self::from(&AppConfig::default())
    }
}

/// Request counters.
///
/// `discarded` counts every superseded request, whether its stale result
/// arrived and was dropped or its task was aborted first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineStats {
    pub triggered: u64,
    pub published: u64,
    pub failed: u64,
    pub discarded: u64,
}

#[derive(Default)]
struct Counters {
    triggered: AtomicU64,
    published: AtomicU64,
    failed: AtomicU64,
    discarded: AtomicU64,
}

/// Counts a request as discarded unless it settles into a published outcome
struct StaleGuard<'a> {
    counters: &'a Counters,
    generation: u64,
    settled: bool,
}

impl<'a> StaleGuard<'a> {
    fn new(counters: &'a Counters, generation: u64) -> Self {
        Self {
            counters,
            generation,
            settled: false,
        }
    }

    fn settle(&mut self) {
        self.settled = true;
    }
}

impl Drop for StaleGuard<'_> {
    fn drop(&mut self) {
        if !self.settled {
            tracing::debug!(generation = self.generation, "Discarding stale processing result");
            self.counters.discarded.fetch_add(1, Ordering::Relaxed);
        }
    }
}

/// Mutable coordinator state, only touched under the lock
struct CoordinatorState {
    registry: TransformRegistry,
    controls: ControlState,
    generation: u64,
    status: PipelineStatus,
    failure: Option<PipelineFailure>,
    in_flight: Option<JoinHandle<()>>,
}

pub struct PipelineCoordinator {
    client: Arc<dyn ProcessingClient>,
    selection: Arc<SelectionStore>,
    options: PipelineOptions,
    state: Mutex<CoordinatorState>,
    publisher: watch::Sender<PipelineSnapshot>,
    counters: Counters,
}

impl PipelineCoordinator {
    pub fn new(
        client: Arc<dyn ProcessingClient>,
        selection: Arc<SelectionStore>,
        options: PipelineOptions,
    ) -> Result<Arc<Self>, DirectiveError> {
        let registry = TransformRegistry::with_delimiter(options.delimiter)?;
        let (publisher, _) = watch::channel(PipelineSnapshot::idle());

        Ok(Arc::new(Self {
            client,
            selection,
            options,
            state: Mutex::new(CoordinatorState {
                registry,
                controls: ControlState::default(),
                generation: 0,
                status: PipelineStatus::Idle,
                failure: None,
                in_flight: None,
            }),
            publisher,
            counters: Counters::default(),
        }))
    }

    /// Subscribe to published state
    pub fn subscribe(&self) -> watch::Receiver<PipelineSnapshot> {
        self.publisher.subscribe()
    }

    /// Latest published state
    pub fn snapshot(&self) -> PipelineSnapshot {
        self.publisher.borrow().clone()
    }

    pub fn selection_store(&self) -> &Arc<SelectionStore> {
        &self.selection
    }

    pub fn stats(&self) -> PipelineStats {
        PipelineStats {
            triggered: self.counters.triggered.load(Ordering::Relaxed),
            published: self.counters.published.load(Ordering::Relaxed),
            failed: self.counters.failed.load(Ordering::Relaxed),
            discarded: self.counters.discarded.load(Ordering::Relaxed),
        }
    }

    /// "File selected" event. `None` (or an empty payload) clears.
    pub async fn select_file(
        self: &Arc<Self>,
        payload: Option<Arc<[u8]>>,
        filename: Option<&str>,
    ) -> SelectionChange {
        let mut state = self.state.lock().await;
        let change = self.selection.select(payload, filename).await;

        match change {
            SelectionChange::Selected => {
                state.status = PipelineStatus::Ready;
                state.failure = None;
                self.publish(&state).await;
                self.trigger(&mut state).await;
            }
            SelectionChange::Cleared => self.reset(&mut state).await,
            SelectionChange::Unchanged => {
                tracing::debug!("Same image selected again, not reprocessing");
            }
        }
        change
    }

    /// Clear the selection; any in-flight result becomes stale.
    pub async fn clear(self: &Arc<Self>) {
        let mut state = self.state.lock().await;
        self.selection.clear().await;
        self.reset(&mut state).await;
    }

    /// "Numeric control changed" event. Returns whether the directive list
    /// changed.
    pub async fn set_control(self: &Arc<Self>, control: Control, value: Option<f64>) -> bool {
        let mut state = self.state.lock().await;
        state.controls.set(control, value, &self.options.limits);
        let payload = state.controls.payload(control);

        let changed = state.registry.upsert(control.prefix(), payload.as_deref());
        tracing::debug!(%control, ?value, ?payload, changed, "Control changed");

        if changed {
            self.on_transforms_changed(&mut state).await;
        }
        changed
    }

    /// Set an arbitrary directive; `None` or empty payload removes it.
    pub async fn upsert_directive(
        self: &Arc<Self>,
        prefix: &str,
        payload: Option<&str>,
    ) -> Result<bool, DirectiveError> {
        validate(prefix, payload, self.options.delimiter)?;

        let mut state = self.state.lock().await;
        let changed = state.registry.upsert(prefix, payload);
        if changed {
            self.on_transforms_changed(&mut state).await;
        }
        Ok(changed)
    }

    /// Remove the directive for `prefix`
    pub async fn remove_directive(self: &Arc<Self>, prefix: &str) -> bool {
        let mut state = self.state.lock().await;
        let changed = state.registry.remove(prefix);
        if changed {
            self.on_transforms_changed(&mut state).await;
        }
        changed
    }

    /// Re-run processing with the current selection and directives.
    ///
    /// Returns `false` when there is nothing selected.
    pub async fn refresh(self: &Arc<Self>) -> bool {
        let mut state = self.state.lock().await;
        if self.selection.current().await.is_none() {
            return false;
        }
        self.trigger(&mut state).await;
        true
    }

    /// Wait until the pipeline is idle, published an artifact or failed.
    pub async fn wait_settled(&self) -> PipelineSnapshot {
        let mut rx = self.subscribe();
        let settled = rx
            .wait_for(|snapshot| !snapshot.status.is_pending())
            .await
            .map(|snapshot| snapshot.clone());
        match settled {
            Ok(snapshot) => snapshot,
            Err(_) => self.snapshot(),
        }
    }

    async fn on_transforms_changed(self: &Arc<Self>, state: &mut CoordinatorState) {
        if self.selection.current().await.is_some() {
            self.trigger(state).await;
        } else {
            // Nothing to process, but subscribers still see the new directives
            self.publish(state).await;
        }
    }

    /// Issue a new request generation for the current selection and the
    /// directives as they are right now.
    async fn trigger(self: &Arc<Self>, state: &mut CoordinatorState) {
        let Some(selection) = self.selection.current().await else {
            return;
        };

        state.generation += 1;
        let generation = state.generation;
        let directives = state.registry.serialize();
        let request = ProcessRequest {
            generation,
            image: selection.payload().clone(),
            filename: selection.upload_name(),
            mime: selection.mime_type(),
            extension: selection.extension().to_string(),
            directives,
            transforms: state.registry.joined(),
        };

        tracing::debug!(
            generation,
            transforms = %request.transforms,
            filename = %request.filename,
            "Triggering processing request"
        );
        self.counters.triggered.fetch_add(1, Ordering::Relaxed);

        state.status = PipelineStatus::Processing;
        self.publish(state).await;

        let coordinator = Arc::clone(self);
        let handle = tokio::spawn(async move {
            coordinator.run_request(request).await;
        });

        if let Some(previous) = state.in_flight.replace(handle) {
            if self.options.cancel_superseded && !previous.is_finished() {
                tracing::debug!(generation, "Aborting superseded request");
                previous.abort();
            }
        }
    }

    async fn run_request(self: Arc<Self>, request: ProcessRequest) {
        let generation = request.generation;
        let transforms = request.directives.clone();
        let mut guard = StaleGuard::new(&self.counters, generation);

        let response = self.client.process(request).await;
        if !self.is_current(generation).await {
            return;
        }

        let outcome = match response {
            Ok(response) => {
                tokio::task::spawn_blocking(move || {
                    decode_artifact(response, generation, transforms)
                })
                .await
                .unwrap_or_else(|e| Err(PipelineError::Decode(e.to_string())))
            }
            Err(e) => Err(e),
        };

        let mut state = self.state.lock().await;
        if state.generation != generation {
            return;
        }

        guard.settle();
        match outcome {
            Ok(artifact) => self.complete(&mut state, Arc::new(artifact)).await,
            Err(e) => self.fail(&mut state, generation, e).await,
        }
    }

    async fn complete(&self, state: &mut CoordinatorState, artifact: Arc<ProcessedArtifact>) {
        tracing::info!(
            generation = artifact.generation,
            mime = %artifact.mime,
            size = artifact.size(),
            transforms = ?artifact.transforms,
            "Published processed artifact"
        );
        self.counters.published.fetch_add(1, Ordering::Relaxed);

        self.selection.store_artifact(artifact).await;
        state.status = PipelineStatus::ReadyWithArtifact;
        state.failure = None;
        state.in_flight = None;
        self.publish(state).await;
    }

    async fn fail(&self, state: &mut CoordinatorState, generation: u64, error: PipelineError) {
        tracing::warn!(generation, %error, "Processing failed");
        self.counters.failed.fetch_add(1, Ordering::Relaxed);

        if !self.options.keep_artifact_on_error {
            self.selection.clear_artifact().await;
        }
        state.status = PipelineStatus::Error;
        state.failure = Some(PipelineFailure {
            kind: error.kind(),
            message: error.to_string(),
        });
        state.in_flight = None;
        self.publish(state).await;
    }

    async fn is_current(&self, generation: u64) -> bool {
        self.state.lock().await.generation == generation
    }

    /// Back to idle. Bumping the generation turns any in-flight result stale.
    async fn reset(&self, state: &mut CoordinatorState) {
        state.generation += 1;
        state.status = PipelineStatus::Idle;
        state.failure = None;
        if let Some(previous) = state.in_flight.take() {
            if self.options.cancel_superseded {
                previous.abort();
            }
        }
        tracing::debug!(generation = state.generation, "Selection cleared");
        self.publish(state).await;
    }

    async fn publish(&self, state: &CoordinatorState) {
        let selection = self.selection.current().await.map(|s| SelectionSummary {
            filename: s.filename().to_string(),
            extension: s.extension().to_string(),
            size: s.size(),
        });
        let artifact = self.selection.artifact().await;

        self.publisher.send_replace(PipelineSnapshot {
            status: state.status,
            generation: state.generation,
            transforms: state.registry.serialize(),
            selection,
            artifact,
            failure: state.failure.clone(),
        });
    }
}
