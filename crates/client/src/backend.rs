//! [`JobBackend`] implementation over the Closetly REST API.

use async_trait::async_trait;
use closetly_core::backend::{JobBackend, JobBackendError};
use closetly_core::image::ImagePayload;
use closetly_core::tryon::{JobId, JobStatus};

use crate::api::{ClosetlyApi, ClosetlyApiError};

impl From<ClosetlyApiError> for JobBackendError {
    fn from(err: ClosetlyApiError) -> Self {
        match err {
            ClosetlyApiError::Request(e) => JobBackendError::Transport(e.to_string()),
            ClosetlyApiError::ApiError { status, body } => JobBackendError::Rejected { status, body },
            ClosetlyApiError::Malformed(msg) => JobBackendError::Malformed(msg),
            // Reported inside a 2xx body.
            ClosetlyApiError::Backend(msg) => JobBackendError::Rejected {
                status: 200,
                body: msg,
            },
        }
    }
}

#[async_trait]
impl JobBackend for ClosetlyApi {
    async fn submit_job(
        &self,
        model_image: &ImagePayload,
        clothing_image: &ImagePayload,
    ) -> Result<JobId, JobBackendError> {
        let id = self.submit_tryon(model_image, clothing_image).await?;
        tracing::debug!(job_id = %id, "Backend accepted try-on job");
        Ok(id)
    }

    async fn get_job_status(&self, id: &JobId) -> Result<JobStatus, JobBackendError> {
        Ok(self.get_tryon_status(id).await?)
    }
}
