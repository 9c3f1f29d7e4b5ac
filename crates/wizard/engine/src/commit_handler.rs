//! Commit handler: submits a validated draft exactly once per tap
//!
//! A busy flag guards the single outstanding submission. Taps that
//! arrive while it is set are rejected without reaching the service.
//! The flag is released on failure or when the in-flight call is
//! dropped; after a success the workflow is over and every further
//! tap is rejected.

use crate::collaborators::SubmissionService;
use crate::config::CommitConfig;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use wizard_types::{CommitOutcome, Draft, SubmissionError, WizardError, WizardResult};

/// Issues the terminal submission for one wizard instance
pub struct CommitHandler {
    service: Arc<dyn SubmissionService>,
    timeout: Option<Duration>,
    busy: AtomicBool,
    succeeded: AtomicBool,
    submissions: AtomicU64,
    enabled: watch::Sender<bool>,
}

impl CommitHandler {
    pub fn new(service: Arc<dyn SubmissionService>, config: &CommitConfig) -> Self {
        let (enabled, _) = watch::channel(true);
        Self {
            service,
            timeout: config.timeout(),
            busy: AtomicBool::new(false),
            succeeded: AtomicBool::new(false),
            submissions: AtomicU64::new(0),
            enabled,
        }
    }

    /// Receiver mirroring whether the commit affordance is enabled
    pub fn subscribe_enabled(&self) -> watch::Receiver<bool> {
        self.enabled.subscribe()
    }

    pub fn is_enabled(&self) -> bool {
        *self.enabled.borrow()
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Number of calls issued to the submission service
    pub fn submissions(&self) -> u64 {
        self.submissions.load(Ordering::Acquire)
    }

    /// Submit `draft`.
    ///
    /// `Err` means the tap was rejected before any submission was issued.
    /// Service failures come back as `Ok(CommitOutcome::Failure(..))`.
    pub async fn commit(&self, draft: &Draft) -> WizardResult<CommitOutcome> {
        if self
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            let err = if self.succeeded.load(Ordering::Acquire) {
                WizardError::AlreadyCommitted
            } else {
                WizardError::CommitInFlight
            };
            tracing::warn!(error = %err, "Commit tap rejected");
            return Err(err);
        }
        self.enabled.send_replace(false);
        // Released on every exit except success, including a dropped future
        let mut guard = BusyGuard {
            handler: self,
            armed: true,
        };

        let outcome = self.submit(draft).await?;
        match &outcome {
            CommitOutcome::Success => {
                self.succeeded.store(true, Ordering::Release);
                guard.armed = false;
                tracing::info!(kind = ?draft.kind(), "Commit succeeded");
            }
            CommitOutcome::Failure(e) => {
                tracing::warn!(kind = ?draft.kind(), title = %e.title, "Commit failed");
            }
        }
        Ok(outcome)
    }

    async fn submit(&self, draft: &Draft) -> WizardResult<CommitOutcome> {
        let result = match draft {
            Draft::Report(report) => {
                let payload = report.to_payload()?;
                self.submissions.fetch_add(1, Ordering::AcqRel);
                self.bounded(self.service.submit_report(&payload)).await
            }
            Draft::Reference(reference) => {
                let attachment = reference.to_attachment()?;
                self.submissions.fetch_add(1, Ordering::AcqRel);
                self.bounded(self.service.attach_reference(&attachment))
                    .await
            }
        };
        Ok(result.into())
    }

    async fn bounded<F>(&self, call: F) -> Result<(), SubmissionError>
    where
        F: std::future::Future<Output = Result<(), SubmissionError>>,
    {
        match self.timeout {
            None => call.await,
            Some(limit) => match tokio::time::timeout(limit, call).await {
                Ok(result) => result,
                Err(_) => Err(SubmissionError::new(
                    "Request timed out",
                    format!("No response after {} ms. Please try again.", limit.as_millis()),
                )),
            },
        }
    }

    fn release(&self) {
        self.busy.store(false, Ordering::Release);
        self.enabled.send_replace(true);
    }
}

struct BusyGuard<'a> {
    handler: &'a CommitHandler,
    armed: bool,
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.handler.release();
        }
    }
}

impl std::fmt::Debug for CommitHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommitHandler")
            .field("busy", &self.is_busy())
            .field("submissions", &self.submissions())
            .field("timeout", &self.timeout)
            .finish()
    }
}
