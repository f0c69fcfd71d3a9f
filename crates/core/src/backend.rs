//! The seam between the try-on controller and whatever runs the jobs.
//!
//! [`JobBackend`] abstracts the two backend calls the try-on workflow
//! needs. The HTTP implementation lives in `closetly-client`; tests use
//! scripted in-memory backends.

use async_trait::async_trait;

use crate::image::ImagePayload;
use crate::tryon::{JobId, JobStatus};

/// Errors a [`JobBackend`] call can fail with.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum JobBackendError {
    /// The request never produced a response (network, DNS, TLS, timeout).
    #[error("transport error: {0}")]
    Transport(String),

    /// The backend answered with a non-2xx status code.
    #[error("backend rejected the request ({status}): {body}")]
    Rejected { status: u16, body: String },

    /// The backend answered 2xx but the body was not what we expected.
    #[error("malformed backend response: {0}")]
    Malformed(String),
}

/// Submit and status endpoints of a try-on job queue.
#[async_trait]
pub trait JobBackend: Send + Sync {
    /// Queue a try-on job and return its identifier.
    async fn submit_job(
        &self,
        model_image: &ImagePayload,
        clothing_image: &ImagePayload,
    ) -> Result<JobId, JobBackendError>;

    /// Fetch the current status of a previously submitted job.
    async fn get_job_status(&self, id: &JobId) -> Result<JobStatus, JobBackendError>;
}
