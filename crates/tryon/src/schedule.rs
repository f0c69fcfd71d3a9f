//! Cancellable handle for a spawned poll loop.
//!
//! [`PollTask`] pairs the task's [`JoinHandle`] with the
//! [`CancellationToken`] the task is expected to watch. Dropping the handle
//! cancels the token and aborts the task, so the owner's lifetime bounds
//! the task even if it never reaches another cancellation check.

use std::future::Future;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

pub struct PollTask {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

impl PollTask {
    /// Spawn `make(token)` on the current Tokio runtime.
    ///
    /// The future receives the task's token and must stop at its next
    /// await point once the token is cancelled.
    pub fn spawn<F, Fut>(make: F) -> Self
    where
        F: FnOnce(CancellationToken) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let cancel = CancellationToken::new();
        let handle = tokio::spawn(make(cancel.clone()));
        Self { cancel, handle }
    }

    /// Signal the task to stop at its next cancellation check. Idempotent.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }
}

impl Drop for PollTask {
    fn drop(&mut self) {
        self.cancel.cancel();
        // No-op when the task already finished or is the one dropping us
        // on its way out.
        self.handle.abort();
    }
}
