//! In-process processing clients for driving the coordinator.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::{oneshot, watch};

use pixdrop::error::PipelineError;
use pixdrop::services::{ProcessRequest, ProcessedImage, ProcessingClient};

type Reply = Result<ProcessedImage, PipelineError>;

struct Call {
    request: ProcessRequest,
    reply: Option<oneshot::Sender<Reply>>,
}

/// Client whose calls stay pending until the test resolves them, in any
/// order it likes.
pub struct ManualClient {
    calls: Mutex<Vec<Call>>,
    count: watch::Sender<usize>,
}

impl ManualClient {
    pub fn new() -> Arc<Self> {
        let (count, _) = watch::channel(0);
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            count,
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Wait until at least `n` calls arrived
    pub async fn wait_for_calls(&self, n: usize) {
        let mut rx = self.count.subscribe();
        tokio::time::timeout(Duration::from_secs(5), rx.wait_for(|count| *count >= n))
            .await
            .unwrap_or_else(|_| panic!("expected {n} processing calls, got {}", self.call_count()))
            .expect("call counter closed");
    }

    /// Request of call `index` (zero based)
    pub fn request(&self, index: usize) -> ProcessRequest {
        self.calls.lock().unwrap()[index].request.clone()
    }

    /// `transforms` field of every call so far
    pub fn transforms(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|c| c.request.transforms.clone())
            .collect()
    }

    /// Answer call `index`
    pub fn resolve(&self, index: usize, reply: Reply) {
        let sender = self.calls.lock().unwrap()[index]
            .reply
            .take()
            .expect("call already resolved");
        // The caller may have been aborted in the meantime
        let _ = sender.send(reply);
    }

    /// Whether the task waiting on call `index` went away
    pub fn is_abandoned(&self, index: usize) -> bool {
        self.calls.lock().unwrap()[index]
            .reply
            .as_ref()
            .map(|sender| sender.is_closed())
            .unwrap_or(false)
    }
}

#[async_trait]
impl ProcessingClient for ManualClient {
    async fn process(&self, request: ProcessRequest) -> Reply {
        let (tx, rx) = oneshot::channel();
        {
            let mut calls = self.calls.lock().unwrap();
            calls.push(Call {
                request,
                reply: Some(tx),
            });
            self.count.send_replace(calls.len());
        }
        rx.await
            .unwrap_or_else(|_| Err(PipelineError::Transport("reply dropped".to_string())))
    }
}

/// Client answering every call at once with a PNG that embeds the
/// transforms it was asked for.
pub struct ImmediateClient {
    requests: Mutex<Vec<ProcessRequest>>,
}

impl ImmediateClient {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn transforms(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|r| r.transforms.clone())
            .collect()
    }
}

#[async_trait]
impl ProcessingClient for ImmediateClient {
    async fn process(&self, request: ProcessRequest) -> Reply {
        let mut bytes = super::fixtures::images::PNG_A.to_vec();
        bytes.extend_from_slice(request.transforms.as_bytes());
        self.requests.lock().unwrap().push(request);
        Ok(super::fixtures::png_response(&bytes))
    }
}

/// Poll `condition` until it holds or a few seconds pass
pub async fn eventually(what: &str, mut condition: impl FnMut() -> bool) {
    for _ in 0..500 {
        if condition() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("timed out waiting for {what}");
}
