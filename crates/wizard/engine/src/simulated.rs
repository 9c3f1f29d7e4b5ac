//! Simulated collaborators
//!
//! In-memory stand-ins for the submission service, identity provider,
//! presentation host and URL opener. Used by tests and the demo.

use crate::collaborators::{IdentityProvider, PresentationHost, SubmissionService, UrlOpener};
use async_trait::async_trait;
use std::collections::{HashSet, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::Notify;
use url::Url;
use wizard_types::{Attachment, ReportPayload, StepId, SubmissionError, UserId};

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

// ── Submission ───────────────────────────────────────────────────────

/// Records every payload it receives; failures are scripted
#[derive(Debug, Default)]
pub struct SimulatedSubmissionService {
    calls: AtomicUsize,
    reports: Mutex<Vec<ReportPayload>>,
    references: Mutex<Vec<Attachment>>,
    failures: Mutex<VecDeque<SubmissionError>>,
    gate: Option<Arc<Notify>>,
    hang: bool,
}

impl SimulatedSubmissionService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hold every call until `gate` is notified
    pub fn with_gate(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }

    /// Never resolve
    pub fn hanging(mut self) -> Self {
        self.hang = true;
        self
    }

    /// Fail the next call with `error`
    pub fn fail_next(&self, error: SubmissionError) {
        lock(&self.failures).push_back(error);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::Acquire)
    }

    pub fn reports(&self) -> Vec<ReportPayload> {
        lock(&self.reports).clone()
    }

    pub fn references(&self) -> Vec<Attachment> {
        lock(&self.references).clone()
    }

    async fn resolve(&self) -> Result<(), SubmissionError> {
        if self.hang {
            std::future::pending::<()>().await;
        }
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        match lock(&self.failures).pop_front() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl SubmissionService for SimulatedSubmissionService {
    async fn submit_report(&self, payload: &ReportPayload) -> Result<(), SubmissionError> {
        self.calls.fetch_add(1, Ordering::AcqRel);
        lock(&self.reports).push(payload.clone());
        self.resolve().await
    }

    async fn attach_reference(&self, attachment: &Attachment) -> Result<(), SubmissionError> {
        self.calls.fetch_add(1, Ordering::AcqRel);
        lock(&self.references).push(attachment.clone());
        self.resolve().await
    }
}

// ── Identity ─────────────────────────────────────────────────────────

/// Fixed identity
#[derive(Clone, Debug, Default)]
pub struct StaticIdentity(Option<UserId>);

impl StaticIdentity {
    pub fn signed_in(user: impl Into<String>) -> Self {
        Self(Some(UserId::new(user)))
    }

    pub fn signed_out() -> Self {
        Self(None)
    }
}

impl IdentityProvider for StaticIdentity {
    fn current_user(&self) -> Option<UserId> {
        self.0.clone()
    }
}

// ── Presentation ─────────────────────────────────────────────────────

/// A presentation command issued by the wizard
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HostCommand {
    GoTo(StepId),
    Back,
    DismissAll,
    Success,
    Error { title: String, message: String },
}

/// Host that records what it was told to do
#[derive(Debug, Default)]
pub struct RecordingHost {
    commands: Mutex<Vec<HostCommand>>,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> Vec<HostCommand> {
        lock(&self.commands).clone()
    }

    pub fn last(&self) -> Option<HostCommand> {
        lock(&self.commands).last().cloned()
    }

    /// Screens currently stacked, replaying pushes and pops
    pub fn depth(&self) -> usize {
        lock(&self.commands)
            .iter()
            .fold(0usize, |depth, cmd| match cmd {
                HostCommand::GoTo(_) => depth + 1,
                HostCommand::Back => depth.saturating_sub(1),
                HostCommand::DismissAll => 0,
                _ => depth,
            })
    }

    fn push(&self, cmd: HostCommand) {
        lock(&self.commands).push(cmd);
    }
}

impl PresentationHost for RecordingHost {
    fn go_to_step(&self, step: StepId) {
        self.push(HostCommand::GoTo(step));
    }

    fn go_back(&self) {
        self.push(HostCommand::Back);
    }

    fn dismiss_all(&self) {
        self.push(HostCommand::DismissAll);
    }

    fn show_success(&self) {
        self.push(HostCommand::Success);
    }

    fn show_error(&self, title: &str, message: &str) {
        self.push(HostCommand::Error {
            title: title.to_string(),
            message: message.to_string(),
        });
    }
}

// ── URL opening ──────────────────────────────────────────────────────

/// Opens a fixed set of hosts in-app; everything else goes to the browser
#[derive(Clone, Debug, Default)]
pub struct StaticOpener {
    in_app_hosts: HashSet<String>,
}

impl StaticOpener {
    pub fn new<I, S>(hosts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            in_app_hosts: hosts.into_iter().map(Into::into).collect(),
        }
    }
}

impl UrlOpener for StaticOpener {
    fn can_open_in_app(&self, url: &Url) -> bool {
        url.host_str()
            .is_some_and(|h| self.in_app_hosts.contains(h))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_host_depth() {
        let host = RecordingHost::new();
        host.go_to_step(StepId::ReportTarget);
        host.go_to_step(StepId::ReportTopic);
        assert_eq!(host.depth(), 2);
        host.go_back();
        assert_eq!(host.depth(), 1);
        host.dismiss_all();
        assert_eq!(host.depth(), 0);
        assert_eq!(host.last(), Some(HostCommand::DismissAll));
    }

    #[test]
    fn test_identity() {
        assert_eq!(
            StaticIdentity::signed_in("u1").current_user(),
            Some(UserId::new("u1"))
        );
        assert_eq!(StaticIdentity::signed_out().current_user(), None);
    }

    #[tokio::test]
    async fn test_scripted_failure_then_success() {
        let service = SimulatedSubmissionService::new();
        service.fail_next(SubmissionError::new("Oops", "Server error"));
        let attachment = Attachment {
            kind: wizard_types::ReferenceKind::Citation,
            normalized_text: "Doe".into(),
        };
        assert!(service.attach_reference(&attachment).await.is_err());
        assert!(service.attach_reference(&attachment).await.is_ok());
        assert_eq!(service.calls(), 2);
        assert_eq!(service.references().len(), 2);
    }
}
