//! Scripted in-memory job backend for controller tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::{broadcast, Notify};

use closetly_core::backend::{JobBackend, JobBackendError};
use closetly_core::image::ImagePayload;
use closetly_core::tryon::{JobId, JobStatus, TryOnRequest};
use closetly_tryon::TryOnState;

/// Backend that replays queued responses in order.
///
/// When the submit queue is empty, submissions fail as malformed (no id).
/// When the poll queue is empty, polls report `pending`.
#[derive(Default)]
pub struct ScriptedBackend {
    submits: Mutex<VecDeque<Result<JobId, JobBackendError>>>,
    polls: Mutex<VecDeque<Result<JobStatus, JobBackendError>>>,
    polled_ids: Mutex<Vec<String>>,
    submit_calls: AtomicUsize,
    poll_calls: AtomicUsize,
    /// Signalled every time a poll starts.
    pub poll_started: Notify,
    /// When set, every poll waits on this before answering.
    poll_gate: Option<Notify>,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept the next submission with `id`.
    pub fn accepting(self, id: &str) -> Self {
        self.submits
            .lock()
            .unwrap()
            .push_back(Ok(JobId::parse(id).expect("non-blank id")));
        self
    }

    pub fn failing_submit(self, err: JobBackendError) -> Self {
        self.submits.lock().unwrap().push_back(Err(err));
        self
    }

    pub fn then_poll(self, status: Result<JobStatus, JobBackendError>) -> Self {
        self.polls.lock().unwrap().push_back(status);
        self
    }

    /// Hold every poll until [`release_polls`](Self::release_polls).
    pub fn gated(mut self) -> Self {
        self.poll_gate = Some(Notify::new());
        self
    }

    pub fn release_polls(&self) {
        if let Some(gate) = &self.poll_gate {
            gate.notify_waiters();
            gate.notify_one();
        }
    }

    pub fn build(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub fn submit_calls(&self) -> usize {
        self.submit_calls.load(Ordering::SeqCst)
    }

    pub fn poll_calls(&self) -> usize {
        self.poll_calls.load(Ordering::SeqCst)
    }

    pub fn polled_ids(&self) -> Vec<String> {
        self.polled_ids.lock().unwrap().clone()
    }
}

#[async_trait]
impl JobBackend for ScriptedBackend {
    async fn submit_job(
        &self,
        _model_image: &ImagePayload,
        _clothing_image: &ImagePayload,
    ) -> Result<JobId, JobBackendError> {
        self.submit_calls.fetch_add(1, Ordering::SeqCst);
        let next = self.submits.lock().unwrap().pop_front();
        next.unwrap_or_else(|| Err(JobBackendError::Malformed("no task id returned".into())))
    }

    async fn get_job_status(&self, id: &JobId) -> Result<JobStatus, JobBackendError> {
        self.poll_calls.fetch_add(1, Ordering::SeqCst);
        self.polled_ids.lock().unwrap().push(id.to_string());
        self.poll_started.notify_one();

        if let Some(gate) = &self.poll_gate {
            gate.notified().await;
        }

        let next = self.polls.lock().unwrap().pop_front();
        next.unwrap_or_else(|| Ok(JobStatus::Pending { raw: "processing".into() }))
    }
}

pub fn pending() -> Result<JobStatus, JobBackendError> {
    Ok(JobStatus::Pending {
        raw: "processing".into(),
    })
}

pub fn succeeded(url: &str) -> Result<JobStatus, JobBackendError> {
    Ok(JobStatus::Succeeded {
        output_image_url: url.into(),
    })
}

pub fn valid_request() -> TryOnRequest {
    TryOnRequest::new(
        ImagePayload::new("bW9kZWw=").unwrap(),
        ImagePayload::new("c2hpcnQ=").unwrap(),
    )
}

/// Receive transitions until a terminal (or idle) state arrives.
pub async fn collect_until_settled(rx: &mut broadcast::Receiver<TryOnState>) -> Vec<TryOnState> {
    let mut seen = Vec::new();
    loop {
        let state = rx.recv().await.expect("controller should keep publishing");
        let done = !state.is_active();
        seen.push(state);
        if done {
            return seen;
        }
    }
}
