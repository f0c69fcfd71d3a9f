//! Single-job try-on controller.
//!
//! [`TryOnJobController`] drives one try-on request at a time: it submits
//! the images, polls the backend on a fixed interval until the job
//! finishes, fails, or the poll budget runs out, and publishes every state
//! transition on a [`tokio::sync::broadcast`] channel. Call
//! [`TryOnJobController::subscribe`] to receive them.
//!
//! Polls are strictly sequential: the next poll is scheduled only after the
//! previous response (or error) has been observed, so a slow backend
//! stretches the total wait instead of stacking up overlapping requests.
//!
//! Every result coming back from the backend is applied under the state
//! lock and only if the job it belongs to is still the current one. After
//! [`cancel`](TryOnJobController::cancel) (or a superseding
//! [`submit`](TryOnJobController::submit)) late results are dropped.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use closetly_core::backend::{JobBackend, JobBackendError};
use closetly_core::tryon::{JobId, JobStatus, TryOnJob, TryOnRequest, ValidatedTryOn};
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

use crate::config::PollConfig;
use crate::schedule::PollTask;
use crate::state::{TryOnError, TryOnState};

/// Broadcast channel capacity for state transitions.
///
/// A full job emits at most `max_attempts + 3` transitions; slower
/// subscribers observe `RecvError::Lagged`.
const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Message used when the backend fails a job without saying why.
const UNKNOWN_FAILURE: &str = "Unknown failure";

/// Owns the lifecycle of the current try-on job.
///
/// Dropping the controller cancels whatever job is in flight.
pub struct TryOnJobController {
    shared: Arc<Shared>,
}

/// State shared between the controller handle and its poll task.
struct Shared {
    backend: Arc<dyn JobBackend>,
    config: PollConfig,
    inner: Mutex<Inner>,
    event_tx: broadcast::Sender<TryOnState>,
}

struct Inner {
    state: TryOnState,
    /// Generation of the current job. Bumped by every `submit` and
    /// `cancel`; a task holding an older value is stale.
    epoch: u64,
    job: Option<TryOnJob>,
    task: Option<PollTask>,
}

impl TryOnJobController {
    pub fn new(backend: Arc<dyn JobBackend>, config: PollConfig) -> Self {
        let (event_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            shared: Arc::new(Shared {
                backend,
                config,
                inner: Mutex::new(Inner {
                    state: TryOnState::Idle,
                    epoch: 0,
                    job: None,
                    task: None,
                }),
                event_tx,
            }),
        }
    }

    /// Subscribe to state transitions from this point on.
    pub fn subscribe(&self) -> broadcast::Receiver<TryOnState> {
        self.shared.event_tx.subscribe()
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> TryOnState {
        self.shared.lock().state.clone()
    }

    /// Snapshot of the job being polled, or of the last one that finished.
    ///
    /// `None` before the first accepted submission and after `cancel`.
    pub fn current_job(&self) -> Option<TryOnJob> {
        self.shared.lock().job.clone()
    }

    pub fn config(&self) -> &PollConfig {
        &self.shared.config
    }

    /// Start a try-on job for `request`.
    ///
    /// A request missing either image moves straight to
    /// `Failed(Validation)` without contacting the backend. A job already
    /// in flight is cancelled first and its pending results are discarded.
    ///
    /// Must be called from within a Tokio runtime; the backend calls run on
    /// a spawned task.
    pub fn submit(&self, request: TryOnRequest) {
        let mut inner = self.shared.lock();

        if inner.state.is_active() {
            tracing::info!(
                from = inner.state.name(),
                "Superseding in-flight try-on job",
            );
        }
        let epoch = inner.reset();

        let request = match request.validate() {
            Ok(request) => request,
            Err(e) => {
                tracing::warn!(error = %e, "Try-on request rejected");
                self.shared.transition(
                    &mut inner,
                    TryOnState::Failed(TryOnError::Validation(e.to_string())),
                );
                return;
            }
        };

        self.shared.transition(&mut inner, TryOnState::Submitting);

        let shared = Arc::clone(&self.shared);
        inner.task = Some(PollTask::spawn(move |cancel| {
            shared.run_job(epoch, request, cancel)
        }));
    }

    /// Stop the current job and return to `Idle`.
    ///
    /// Safe to call from any state and idempotent: from `Idle` it does
    /// nothing. From a terminal state it clears the finished result.
    pub fn cancel(&self) {
        let mut inner = self.shared.lock();
        let was_active = inner.state.is_active();
        inner.reset();

        if inner.state != TryOnState::Idle {
            if was_active {
                tracing::info!(from = inner.state.name(), "Try-on job cancelled");
            }
            self.shared.transition(&mut inner, TryOnState::Idle);
        }
    }

    /// Wait until no job is in flight and return the state at that point.
    ///
    /// Returns immediately when the controller is idle or finished.
    pub async fn settled(&self) -> TryOnState {
        let mut rx = self.subscribe();
        loop {
            let state = self.state();
            if !state.is_active() {
                return state;
            }
            match rx.recv().await {
                Ok(state) if !state.is_active() => return state,
                Ok(_) | Err(broadcast::error::RecvError::Lagged(_)) => continue,
                Err(broadcast::error::RecvError::Closed) => return self.state(),
            }
        }
    }
}

impl Drop for TryOnJobController {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl Inner {
    /// Forget the current job and stop its task. Returns the new epoch.
    fn reset(&mut self) -> u64 {
        self.epoch = self.epoch.wrapping_add(1);
        self.job = None;
        if let Some(task) = self.task.take() {
            task.cancel();
        }
        self.epoch
    }

    fn is_current(&self, epoch: u64, job_id: Option<&JobId>) -> bool {
        if self.epoch != epoch {
            return false;
        }
        match job_id {
            Some(id) => self.job.as_ref().is_some_and(|job| &job.id == id),
            None => true,
        }
    }

    /// Release the task of a job that reached a terminal state. The job
    /// record stays readable until the next `submit` or `cancel`.
    fn finish(&mut self) {
        // Dropping the handle from inside its own task only cancels a token
        // the task is about to stop watching.
        self.task = None;
    }
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Inner> {
        // State stays consistent across a panicking holder: every mutation
        // is a single assignment.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Apply `next` and publish it. Callers hold the lock, which keeps
    /// publication in transition order.
    fn transition(&self, inner: &mut Inner, next: TryOnState) {
        tracing::debug!(from = inner.state.name(), to = next.name(), "Try-on state transition");
        inner.state = next.clone();
        // Zero subscribers is fine.
        let _ = self.event_tx.send(next);
    }

    /// Submit, then poll until a terminal state, cancellation, or a stale
    /// epoch.
    async fn run_job(self: Arc<Self>, epoch: u64, request: ValidatedTryOn, cancel: CancellationToken) {
        let submitted = tokio::select! {
            biased;
            _ = cancel.cancelled() => return,
            result = self.backend.submit_job(&request.model_image, &request.clothing_image) => result,
        };

        let job_id = match submitted {
            Ok(id) => id,
            Err(e) => {
                self.fail_submission(epoch, &e);
                return;
            }
        };

        if !self.begin_polling(epoch, &job_id) {
            tracing::debug!(job_id = %job_id, "Discarding submission result for a stale job");
            return;
        }

        let mut attempt: u32 = 0;
        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => return,
                _ = tokio::time::sleep(self.config.poll_interval) => {}
            }

            attempt += 1;
            let polled = tokio::select! {
                biased;
                _ = cancel.cancelled() => return,
                result = self.backend.get_job_status(&job_id) => result,
            };

            let next = self.next_state(attempt, &polled);
            if !self.record_poll(epoch, &job_id, attempt, polled.as_ref().ok(), &next) {
                tracing::debug!(job_id = %job_id, attempt, "Discarding stale poll result");
                return;
            }
            log_poll_outcome(&job_id, attempt, self.config.max_attempts, &polled, &next);

            if next.is_terminal() {
                return;
            }
        }
    }

    fn fail_submission(&self, epoch: u64, err: &JobBackendError) {
        let mut inner = self.lock();
        if !inner.is_current(epoch, None) {
            return;
        }
        tracing::warn!(error = %err, "Try-on submission failed");
        self.transition(
            &mut inner,
            TryOnState::Failed(TryOnError::Submission(err.to_string())),
        );
        inner.finish();
    }

    fn begin_polling(&self, epoch: u64, job_id: &JobId) -> bool {
        let mut inner = self.lock();
        if !inner.is_current(epoch, None) {
            return false;
        }
        tracing::info!(
            job_id = %job_id,
            max_attempts = self.config.max_attempts,
            interval_ms = self.config.poll_interval.as_millis() as u64,
            "Try-on job submitted, polling for result",
        );
        inner.job = Some(TryOnJob::new(job_id.clone()));
        self.transition(&mut inner, TryOnState::Polling { attempt_count: 0 });
        true
    }

    /// Decide the state that follows poll number `attempt`.
    fn next_state(&self, attempt: u32, polled: &Result<JobStatus, JobBackendError>) -> TryOnState {
        match polled {
            Err(e) => TryOnState::Failed(TryOnError::Poll(e.to_string())),
            Ok(JobStatus::Succeeded { output_image_url }) => TryOnState::Succeeded {
                output_image_url: output_image_url.clone(),
            },
            Ok(JobStatus::Failed { error }) => TryOnState::Failed(TryOnError::BackendJobFailed(
                error.clone().unwrap_or_else(|| UNKNOWN_FAILURE.to_string()),
            )),
            Ok(JobStatus::Pending { .. }) if attempt >= self.config.max_attempts => {
                TryOnState::Failed(TryOnError::Timeout { attempts: attempt })
            }
            Ok(JobStatus::Pending { .. }) => TryOnState::Polling {
                attempt_count: attempt,
            },
        }
    }

    /// Apply a poll outcome if it still belongs to the current job.
    fn record_poll(
        &self,
        epoch: u64,
        job_id: &JobId,
        attempt: u32,
        status: Option<&JobStatus>,
        next: &TryOnState,
    ) -> bool {
        let mut inner = self.lock();
        if !inner.is_current(epoch, Some(job_id)) {
            return false;
        }
        if let Some(job) = inner.job.as_mut() {
            job.record_poll(attempt, status);
        }
        self.transition(&mut inner, next.clone());
        if next.is_terminal() {
            inner.finish();
        }
        true
    }
}

fn log_poll_outcome(
    job_id: &JobId,
    attempt: u32,
    max_attempts: u32,
    polled: &Result<JobStatus, JobBackendError>,
    next: &TryOnState,
) {
    match (polled, next) {
        (Err(e), _) => {
            tracing::error!(job_id = %job_id, attempt, error = %e, "Try-on status check failed");
        }
        (Ok(JobStatus::Succeeded { output_image_url }), _) => {
            tracing::info!(job_id = %job_id, attempt, url = %output_image_url, "Try-on job succeeded");
        }
        (Ok(JobStatus::Failed { error }), _) => {
            tracing::warn!(job_id = %job_id, attempt, error = ?error, "Try-on job failed on the backend");
        }
        (Ok(JobStatus::Pending { .. }), TryOnState::Failed(_)) => {
            tracing::warn!(job_id = %job_id, attempts = attempt, "Try-on job timed out");
        }
        (Ok(JobStatus::Pending { raw }), _) => {
            tracing::debug!(job_id = %job_id, attempt, max_attempts, status = %raw, "Try-on job still pending");
        }
    }
}
