//! Try-on request and job types.
//!
//! A [`TryOnRequest`] is what the presentation layer assembles from the
//! user's selections. It may be incomplete; [`TryOnRequest::validate`]
//! turns it into a [`ValidatedTryOn`] that is safe to send. A
//! [`TryOnJob`] is the in-memory record of a submitted request while it is
//! being polled.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::catalog::{ClosetItem, ModelPhoto};
use crate::error::CoreError;
use crate::image::ImagePayload;
use crate::types::Timestamp;

// ---------------------------------------------------------------------------
// Request
// ---------------------------------------------------------------------------

/// A try-on request as selected by the user.
///
/// Either image may be absent while the user is still choosing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TryOnRequest {
    pub model_image: Option<ImagePayload>,
    pub clothing_image: Option<ImagePayload>,
}

/// A request whose images are both present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedTryOn {
    pub model_image: ImagePayload,
    pub clothing_image: ImagePayload,
}

impl TryOnRequest {
    pub fn new(model_image: ImagePayload, clothing_image: ImagePayload) -> Self {
        Self {
            model_image: Some(model_image),
            clothing_image: Some(clothing_image),
        }
    }

    /// Build a request from a catalog selection.
    ///
    /// Entries without an embedded payload (or with a blank one) leave the
    /// corresponding field empty so validation reports it.
    pub fn from_selection(model: Option<&ModelPhoto>, item: Option<&ClosetItem>) -> Self {
        Self {
            model_image: model.and_then(ModelPhoto::payload),
            clothing_image: item.and_then(ClosetItem::payload),
        }
    }

    /// Check that both images are present. Payloads are non-empty by
    /// construction.
    pub fn validate(self) -> Result<ValidatedTryOn, CoreError> {
        match (self.model_image, self.clothing_image) {
            (Some(model_image), Some(clothing_image)) => Ok(ValidatedTryOn {
                model_image,
                clothing_image,
            }),
            (None, None) => Err(CoreError::Validation(
                "select both a model and a clothing item".to_string(),
            )),
            (None, _) => Err(CoreError::Validation("select a model photo".to_string())),
            (Some(_), None) => Err(CoreError::Validation(
                "select a clothing item".to_string(),
            )),
        }
    }
}

// ---------------------------------------------------------------------------
// Job identity and status
// ---------------------------------------------------------------------------

/// Backend-assigned identifier of a submitted try-on job.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(String);

impl JobId {
    /// Wrap a backend identifier. Returns `None` for a blank id.
    pub fn parse(id: impl Into<String>) -> Option<Self> {
        let id = id.into();
        if id.trim().is_empty() {
            None
        } else {
            Some(Self(id))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Status of a job as reported by one poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobStatus {
    /// Not finished yet. `raw` is the backend's own status word
    /// (`submitted`, `processing`, ...), kept for logging.
    Pending { raw: String },
    /// Finished; the composite image is available at `output_image_url`.
    Succeeded { output_image_url: String },
    /// The backend gave up on the job.
    Failed { error: Option<String> },
}

impl JobStatus {
    pub fn kind(&self) -> JobStatusKind {
        match self {
            Self::Pending { .. } => JobStatusKind::Pending,
            Self::Succeeded { .. } => JobStatusKind::Succeeded,
            Self::Failed { .. } => JobStatusKind::Failed,
        }
    }
}

/// Payload-free view of [`JobStatus`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatusKind {
    Pending,
    Succeeded,
    Failed,
}

// ---------------------------------------------------------------------------
// Job record
// ---------------------------------------------------------------------------

/// In-memory record of the job currently being polled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TryOnJob {
    pub id: JobId,
    /// Last status reported by the backend.
    pub status: JobStatusKind,
    /// Populated only once the backend reports success.
    pub output_image_url: Option<String>,
    /// Status polls performed since submission.
    pub attempt_count: u32,
    pub submitted_at: Timestamp,
}

impl TryOnJob {
    pub fn new(id: JobId) -> Self {
        Self {
            id,
            status: JobStatusKind::Pending,
            output_image_url: None,
            attempt_count: 0,
            submitted_at: chrono::Utc::now(),
        }
    }

    /// Fold poll number `attempt` into the record.
    ///
    /// The attempt counts even when the poll produced no status (transport
    /// or parse failure); the last known status is kept in that case.
    pub fn record_poll(&mut self, attempt: u32, status: Option<&JobStatus>) {
        self.attempt_count = attempt;
        let Some(status) = status else {
            return;
        };
        self.status = status.kind();
        if let JobStatus::Succeeded { output_image_url } = status {
            self.output_image_url = Some(output_image_url.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn payload(s: &str) -> ImagePayload {
        ImagePayload::new(s).unwrap()
    }

    #[test]
    fn complete_request_validates() {
        let request = TryOnRequest::new(payload("bW9kZWw="), payload("c2hpcnQ="));
        let validated = request.validate().unwrap();
        assert_eq!(validated.model_image.as_str(), "bW9kZWw=");
        assert_eq!(validated.clothing_image.as_str(), "c2hpcnQ=");
    }

    #[test]
    fn missing_model_is_rejected() {
        let request = TryOnRequest {
            model_image: None,
            clothing_image: Some(payload("c2hpcnQ=")),
        };
        assert_matches!(request.validate(), Err(CoreError::Validation(msg)) if msg.contains("model"));
    }

    #[test]
    fn missing_clothing_is_rejected() {
        let request = TryOnRequest {
            model_image: Some(payload("bW9kZWw=")),
            clothing_image: None,
        };
        assert_matches!(request.validate(), Err(CoreError::Validation(msg)) if msg.contains("clothing"));
    }

    #[test]
    fn empty_request_is_rejected() {
        assert_matches!(TryOnRequest::default().validate(), Err(CoreError::Validation(_)));
    }

    #[test]
    fn blank_job_id_is_not_an_id() {
        assert!(JobId::parse("").is_none());
        assert!(JobId::parse("  ").is_none());
        assert_eq!(JobId::parse("job-1").unwrap().as_str(), "job-1");
    }

    #[test]
    fn record_poll_tracks_attempts_and_output() {
        let mut job = TryOnJob::new(JobId::parse("job-1").unwrap());
        job.record_poll(1, Some(&JobStatus::Pending { raw: "processing".into() }));
        assert_eq!(job.attempt_count, 1);
        assert_eq!(job.status, JobStatusKind::Pending);
        assert!(job.output_image_url.is_none());

        job.record_poll(
            2,
            Some(&JobStatus::Succeeded {
                output_image_url: "https://x/y.png".into(),
            }),
        );
        assert_eq!(job.attempt_count, 2);
        assert_eq!(job.status, JobStatusKind::Succeeded);
        assert_eq!(job.output_image_url.as_deref(), Some("https://x/y.png"));
    }

    #[test]
    fn failed_poll_still_counts_as_an_attempt() {
        let mut job = TryOnJob::new(JobId::parse("job-1").unwrap());
        job.record_poll(1, Some(&JobStatus::Pending { raw: "processing".into() }));
        job.record_poll(2, None);
        assert_eq!(job.attempt_count, 2);
        assert_eq!(job.status, JobStatusKind::Pending);
    }
}
