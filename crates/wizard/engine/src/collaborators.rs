//! External collaborators the wizard core calls into
//!
//! The engine never talks to the network or the UI directly. It
//! shapes payloads for a [`SubmissionService`], asks an
//! [`IdentityProvider`] who is acting, and tells a
//! [`PresentationHost`] which step to show.

use async_trait::async_trait;
use url::Url;
use wizard_types::{Attachment, ReportPayload, StepId, SubmissionError, UserId};

/// Remote submission endpoint. Each method is called at most once per commit.
#[async_trait]
pub trait SubmissionService: Send + Sync {
    async fn submit_report(&self, payload: &ReportPayload) -> Result<(), SubmissionError>;

    async fn attach_reference(&self, attachment: &Attachment) -> Result<(), SubmissionError>;
}

/// Supplies the signed-in user
pub trait IdentityProvider: Send + Sync {
    fn current_user(&self) -> Option<UserId>;
}

/// Screen stack owned by the UI layer
pub trait PresentationHost: Send + Sync {
    /// Push the screen for `step`
    fn go_to_step(&self, step: StepId);

    /// Pop to the previous step
    fn go_back(&self);

    /// Dismiss every screen the wizard presented
    fn dismiss_all(&self);

    /// Transient success indicator after a commit
    fn show_success(&self);

    /// Blocking title/message dialog after a failed commit
    fn show_error(&self, title: &str, message: &str);
}

/// Platform check for whether a URL can be shown in the in-app viewer
pub trait UrlOpener: Send + Sync {
    fn can_open_in_app(&self, url: &Url) -> bool;
}
