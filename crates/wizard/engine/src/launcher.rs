//! Wizard launcher: the entry point that builds wizard instances
//!
//! The launcher holds the long-lived collaborators and configuration.
//! Each launch builds a fresh draft store, step gate and commit handler
//! so nothing is shared between unrelated wizard runs.

use crate::attachment_channel::AttachmentSender;
use crate::collaborators::{IdentityProvider, PresentationHost, SubmissionService};
use crate::commit_handler::CommitHandler;
use crate::config::WizardConfig;
use crate::controller::{ControllerParts, WizardController};
use crate::draft_store::DraftStore;
use crate::entry::EntryAffordance;
use crate::link_classifier::{LinkClassifier, LinkPurpose};
use crate::step_validator::StepGate;
use std::sync::Arc;
use wizard_types::{
    Attachment, ContentId, ReportDraft, ReportSource, StepPlan, UserId, WizardKind, WizardResult,
};

/// What is being reported and from where
#[derive(Clone, Debug)]
pub struct ReportRequest {
    pub content_id: ContentId,
    pub author_id: UserId,
    pub source: ReportSource,
}

/// How a Reference wizard hands its result back
#[derive(Debug)]
pub struct ReferenceRequest {
    pub purpose: LinkPurpose,
    /// The reference already attached to the post, if any
    pub existing: Option<Attachment>,
    pub bridge: AttachmentSender,
}

/// Builds wizard instances
pub struct WizardLauncher {
    config: WizardConfig,
    classifier: Arc<LinkClassifier>,
    host: Arc<dyn PresentationHost>,
    service: Arc<dyn SubmissionService>,
    identity: Arc<dyn IdentityProvider>,
}

impl WizardLauncher {
    pub fn new(
        config: WizardConfig,
        host: Arc<dyn PresentationHost>,
        service: Arc<dyn SubmissionService>,
        identity: Arc<dyn IdentityProvider>,
    ) -> WizardResult<Self> {
        config.validate()?;
        let classifier = Arc::new(LinkClassifier::new(&config.link));
        Ok(Self {
            config,
            classifier,
            host,
            service,
            identity,
        })
    }

    pub fn config(&self) -> &WizardConfig {
        &self.config
    }

    pub fn classifier(&self) -> Arc<LinkClassifier> {
        self.classifier.clone()
    }

    /// Start a report. Fails when the entry is busy or nobody is signed in.
    pub fn launch_report(
        &self,
        entry: &EntryAffordance,
        request: ReportRequest,
    ) -> WizardResult<WizardController> {
        let lease = entry.try_acquire()?;
        let draft = ReportDraft::new(
            request.content_id,
            request.author_id,
            self.identity.current_user(),
            request.source,
        )
        .inspect_err(|e| tracing::warn!(error = %e, "Report wizard not started"))?;

        let gate = self.gate(LinkPurpose::PostReference);
        let store = DraftStore::new(
            Some(draft.into()),
            gate.clone(),
            &self.config.context_placeholder,
        );
        let mut controller = WizardController::new(ControllerParts {
            kind: WizardKind::Report,
            plan: Some(StepPlan::report()),
            store,
            gate,
            host: self.host.clone(),
            committer: self.committer(),
            bridge: None,
            existing: None,
            citation_placeholder: self.config.citation_placeholder.clone(),
            lease,
        });
        controller.start()?;
        Ok(controller)
    }

    /// Open the "choose reference type" entry. The draft is created once a route is chosen.
    pub fn launch_reference(
        &self,
        entry: &EntryAffordance,
        request: ReferenceRequest,
    ) -> WizardResult<WizardController> {
        let lease = entry.try_acquire()?;
        let gate = self.gate(request.purpose);
        let store = DraftStore::new(None, gate.clone(), &self.config.context_placeholder);
        let controller = WizardController::new(ControllerParts {
            kind: WizardKind::Reference,
            plan: None,
            store,
            gate,
            host: self.host.clone(),
            committer: self.committer(),
            bridge: Some(request.bridge),
            existing: request.existing,
            citation_placeholder: self.config.citation_placeholder.clone(),
            lease,
        });
        tracing::info!(wizard_id = %controller.id(), purpose = ?request.purpose, "Reference wizard opened");
        Ok(controller)
    }

    fn gate(&self, purpose: LinkPurpose) -> Arc<StepGate> {
        Arc::new(StepGate::new(self.classifier.clone(), purpose))
    }

    fn committer(&self) -> CommitHandler {
        CommitHandler::new(self.service.clone(), &self.config.commit)
    }
}

impl std::fmt::Debug for WizardLauncher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WizardLauncher")
            .field("config", &self.config)
            .finish()
    }
}
