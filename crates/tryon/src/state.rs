//! Observable state of a [`TryOnJobController`](crate::controller::TryOnJobController).

/// Why a try-on job ended without a result.
///
/// Every variant is terminal for the job it describes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TryOnError {
    /// The request was missing an image; nothing was sent.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// The backend rejected or failed the initial submission.
    #[error("Submission failed: {0}")]
    Submission(String),

    /// A status check failed; the job was abandoned without retrying.
    #[error("Status check failed: {0}")]
    Poll(String),

    /// The backend reported that the job itself failed.
    #[error("Try-on generation failed: {0}")]
    BackendJobFailed(String),

    /// The poll budget ran out. The job may still finish server-side.
    #[error("Gave up waiting after {attempts} status checks")]
    Timeout { attempts: u32 },
}

/// Lifecycle state of the controller's current job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TryOnState {
    Idle,
    Submitting,
    /// Waiting on the backend; `attempt_count` polls have completed.
    Polling { attempt_count: u32 },
    Succeeded { output_image_url: String },
    Failed(TryOnError),
}

impl TryOnState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded { .. } | Self::Failed(_))
    }

    /// Whether a job is currently in flight.
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Submitting | Self::Polling { .. })
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Submitting => "submitting",
            Self::Polling { .. } => "polling",
            Self::Succeeded { .. } => "succeeded",
            Self::Failed(_) => "failed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_and_active_are_disjoint() {
        let states = [
            TryOnState::Idle,
            TryOnState::Submitting,
            TryOnState::Polling { attempt_count: 3 },
            TryOnState::Succeeded {
                output_image_url: "https://x/y.png".into(),
            },
            TryOnState::Failed(TryOnError::Timeout { attempts: 30 }),
        ];
        for state in &states {
            assert!(!(state.is_terminal() && state.is_active()), "{state:?}");
        }
        assert!(!TryOnState::Idle.is_terminal());
        assert!(!TryOnState::Idle.is_active());
    }

    #[test]
    fn timeout_display_mentions_attempts() {
        let err = TryOnError::Timeout { attempts: 30 };
        assert_eq!(err.to_string(), "Gave up waiting after 30 status checks");
    }
}
