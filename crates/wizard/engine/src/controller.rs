//! Wizard controller: drives one wizard instance through its steps
//!
//! The controller owns the draft store, the step plan and the commit
//! handler. It asks the presentation host to push, pop and dismiss
//! screens but never touches presentation state itself.
//!
//! Forward navigation is gated by the presented step's validator.
//! Going back never clears draft fields. Cancelling a wizard whose
//! draft has been touched requires a second, confirming call.

use crate::attachment_channel::AttachmentSender;
use crate::collaborators::PresentationHost;
use crate::commit_handler::CommitHandler;
use crate::draft_store::DraftStore;
use crate::entry::EntryLease;
use crate::step_validator::{GateResult, StepGate};
use std::sync::Arc;
use tokio::sync::watch;
use wizard_types::*;

/// Result of a cancel request
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CancelOutcome {
    /// The wizard was dismissed and its draft discarded
    Cancelled,
    /// The draft holds user data; call `confirm_abandon` or `keep_editing`
    ConfirmationRequired,
}

/// What a step screen is given when it is presented
#[derive(Debug)]
pub struct StepView {
    step: StepId,
    store: DraftStore,
    can_advance: watch::Receiver<bool>,
}

impl StepView {
    pub fn step(&self) -> StepId {
        self.step
    }

    pub fn store(&self) -> &DraftStore {
        &self.store
    }

    pub fn can_advance(&self) -> bool {
        *self.can_advance.borrow()
    }

    /// Wait for the next change of the "continue" state
    pub async fn changed(&mut self) -> bool {
        self.can_advance.changed().await.is_ok()
    }
}

pub(crate) struct ControllerParts {
    pub kind: WizardKind,
    pub plan: Option<StepPlan>,
    pub store: DraftStore,
    pub gate: Arc<StepGate>,
    pub host: Arc<dyn PresentationHost>,
    pub committer: CommitHandler,
    pub bridge: Option<AttachmentSender>,
    pub existing: Option<Attachment>,
    pub citation_placeholder: String,
    pub lease: EntryLease,
}

/// One running wizard
pub struct WizardController {
    id: WizardInstanceId,
    kind: WizardKind,
    plan: Option<StepPlan>,
    cursor: Option<usize>,
    state: WizardState,
    store: DraftStore,
    gate: Arc<StepGate>,
    host: Arc<dyn PresentationHost>,
    committer: CommitHandler,
    bridge: Option<AttachmentSender>,
    existing: Option<Attachment>,
    citation_placeholder: String,
    abandon_pending: bool,
    history: WizardHistory,
    lease: Option<EntryLease>,
}

impl WizardController {
    pub(crate) fn new(parts: ControllerParts) -> Self {
        let mut history = WizardHistory::new();
        history.record(WizardEventKind::Launched, None);
        Self {
            id: WizardInstanceId::generate(),
            kind: parts.kind,
            plan: parts.plan,
            cursor: None,
            state: WizardState::Entry,
            store: parts.store,
            gate: parts.gate,
            host: parts.host,
            committer: parts.committer,
            bridge: parts.bridge,
            existing: parts.existing,
            citation_placeholder: parts.citation_placeholder,
            abandon_pending: false,
            history,
            lease: Some(parts.lease),
        }
    }

    /// Push the first step of a linear wizard
    pub(crate) fn start(&mut self) -> WizardResult<StepId> {
        if self.state != WizardState::Entry {
            return Err(WizardError::InvalidState(self.state));
        }
        let first = self.plan()?.first().ok_or(WizardError::NoCurrentStep)?;
        self.push(0, first)?;
        self.state = WizardState::Active;
        tracing::info!(wizard_id = %self.id, kind = ?self.kind, step = %first, "Wizard started");
        Ok(first)
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn id(&self) -> &WizardInstanceId {
        &self.id
    }

    pub fn kind(&self) -> WizardKind {
        self.kind
    }

    pub fn state(&self) -> WizardState {
        self.state
    }

    pub fn current_step(&self) -> Option<StepId> {
        let index = self.cursor?;
        self.plan.as_ref()?.get(index)
    }

    pub fn step_plan(&self) -> Option<&StepPlan> {
        self.plan.as_ref()
    }

    /// Handle to inject into a step screen
    pub fn store(&self) -> DraftStore {
        self.store.clone()
    }

    pub fn view(&self) -> WizardResult<StepView> {
        let step = self.current_step().ok_or(WizardError::NoCurrentStep)?;
        Ok(StepView {
            step,
            store: self.store.clone(),
            can_advance: self.store.subscribe_can_advance(),
        })
    }

    pub fn history(&self) -> &WizardHistory {
        &self.history
    }

    pub fn can_advance(&self) -> bool {
        self.state == WizardState::Active && self.store.can_advance()
    }

    /// Whether the final step's commit affordance is enabled
    pub fn can_commit(&self) -> bool {
        let at_final = match (self.current_step(), self.plan.as_ref()) {
            (Some(step), Some(plan)) => plan.is_final(step),
            _ => false,
        };
        self.state == WizardState::Active
            && at_final
            && self.store.can_advance()
            && self.committer.is_enabled()
    }

    pub fn subscribe_commit_enabled(&self) -> watch::Receiver<bool> {
        self.committer.subscribe_enabled()
    }

    pub fn submissions(&self) -> u64 {
        self.committer.submissions()
    }

    pub fn is_abandon_pending(&self) -> bool {
        self.abandon_pending
    }

    pub fn existing_attachment(&self) -> Option<&Attachment> {
        self.existing.as_ref()
    }

    // ── Navigation ───────────────────────────────────────────────────

    /// Pick the link or citation route of a Reference wizard
    pub fn choose_route(&mut self, kind: ReferenceKind) -> WizardResult<StepId> {
        if self.kind != WizardKind::Reference {
            return Err(WizardError::NotApplicable(
                "only reference wizards have routes".into(),
            ));
        }
        if self.plan.is_some() {
            return Err(WizardError::RouteAlreadyChosen);
        }
        if self.state != WizardState::Entry {
            return Err(WizardError::InvalidState(self.state));
        }

        let draft = match kind {
            ReferenceKind::Link => ReferenceDraft::link(),
            ReferenceKind::Citation => ReferenceDraft::citation(self.citation_placeholder.as_str()),
        };
        self.store.install_draft(draft.into())?;

        let plan = StepPlan::reference(kind);
        let first = plan.first().ok_or(WizardError::NoCurrentStep)?;
        self.plan = Some(plan);
        self.history
            .record(WizardEventKind::RouteChosen(kind), Some(first));
        self.push(0, first)?;
        self.state = WizardState::Active;

        tracing::info!(wizard_id = %self.id, route = ?kind, "Reference route chosen");
        Ok(first)
    }

    /// Move to the next step. Only legal while the presented step is satisfied.
    pub fn advance(&mut self) -> WizardResult<StepId> {
        self.ensure_active()?;
        let (index, step) = self.position()?;

        let draft = self.store.snapshot()?;
        if let GateResult::NotSatisfied { reason } = self.gate.evaluate(step, &draft) {
            tracing::debug!(wizard_id = %self.id, %reason, "Advance refused");
            return Err(WizardError::StepNotSatisfied(step));
        }
        let next = self.plan()?.next(step).ok_or(WizardError::NoNextStep(step))?;

        self.store.mark_validated(index)?;
        self.history.record(
            WizardEventKind::Advanced {
                from: step,
                to: next,
            },
            Some(next),
        );
        self.push(index + 1, next)?;

        tracing::info!(wizard_id = %self.id, from = %step, to = %next, "Advanced");
        Ok(next)
    }

    /// Pop to the previous step. Draft fields are kept.
    pub fn retreat(&mut self) -> WizardResult<StepId> {
        self.ensure_active()?;
        let (index, step) = self.position()?;
        let previous = self
            .plan()?
            .previous(step)
            .ok_or(WizardError::NoPreviousStep(step))?;

        self.cursor = Some(index - 1);
        self.store.present(Some(previous))?;
        self.history.record(
            WizardEventKind::Retreated {
                from: step,
                to: previous,
            },
            Some(previous),
        );
        self.host.go_back();

        tracing::info!(wizard_id = %self.id, from = %step, to = %previous, "Retreated");
        Ok(previous)
    }

    // ── Cancellation ─────────────────────────────────────────────────

    /// Ask to abandon the wizard
    pub fn cancel(&mut self) -> WizardResult<CancelOutcome> {
        match self.state {
            WizardState::Entry | WizardState::Active => {}
            state => return Err(WizardError::InvalidState(state)),
        }

        if self.store.has_draft() && self.store.is_touched()? {
            if !self.abandon_pending {
                self.abandon_pending = true;
                self.history
                    .record(WizardEventKind::CancelRequested, self.current_step());
            }
            return Ok(CancelOutcome::ConfirmationRequired);
        }

        self.finish_cancel()?;
        Ok(CancelOutcome::Cancelled)
    }

    /// The user confirmed they want to discard their changes
    pub fn confirm_abandon(&mut self) -> WizardResult<()> {
        if !self.abandon_pending {
            return Err(WizardError::NotApplicable(
                "no abandonment awaiting confirmation".into(),
            ));
        }
        self.finish_cancel()
    }

    /// The user backed out of the abandonment prompt
    pub fn keep_editing(&mut self) {
        if self.abandon_pending {
            self.abandon_pending = false;
            self.history
                .record(WizardEventKind::CancelDeclined, self.current_step());
        }
    }

    // ── Completion ───────────────────────────────────────────────────

    /// Submit the draft from the final step.
    ///
    /// On success the wizard is dismissed. On failure it stays on the
    /// final step with the draft unchanged, ready for another tap.
    pub async fn commit(&mut self) -> WizardResult<CommitOutcome> {
        match self.state {
            WizardState::Active => {}
            WizardState::Committing if self.committer.is_busy() => {
                return Err(WizardError::CommitInFlight)
            }
            WizardState::Committing => {
                // A previous commit future was dropped mid-call
                tracing::warn!(wizard_id = %self.id, "Recovering from abandoned commit");
                self.reopen()?;
            }
            WizardState::Committed => return Err(WizardError::AlreadyCommitted),
            state => return Err(WizardError::InvalidState(state)),
        }
        let (_, step) = self.position()?;
        if !self.plan()?.is_final(step) {
            return Err(WizardError::NotAtFinalStep(step));
        }
        let draft = self.store.snapshot()?;
        if let GateResult::NotSatisfied { reason } = self.gate.evaluate(step, &draft) {
            tracing::debug!(wizard_id = %self.id, %reason, "Commit refused");
            return Err(WizardError::StepNotSatisfied(step));
        }

        self.abandon_pending = false;
        self.store.set_frozen(true)?;
        self.state = WizardState::Committing;
        self.history
            .record(WizardEventKind::CommitStarted, Some(step));

        let outcome = match self.committer.commit(&draft).await {
            Ok(outcome) => outcome,
            Err(e) => {
                self.reopen()?;
                return Err(e);
            }
        };

        match &outcome {
            CommitOutcome::Success => self.finish_commit(&draft)?,
            CommitOutcome::Failure(err) => {
                self.reopen()?;
                self.history.record(
                    WizardEventKind::CommitFailed {
                        reason: err.to_string(),
                    },
                    Some(step),
                );
                self.host.show_error(&err.title, &err.message);
                tracing::warn!(wizard_id = %self.id, error = %err, "Commit failed; draft kept");
            }
        }
        Ok(outcome)
    }

    /// Detach the reference the composing screen already holds
    pub fn remove_attachment(&mut self) -> WizardResult<()> {
        if self.kind != WizardKind::Reference {
            return Err(WizardError::NotApplicable(
                "only reference wizards hold attachments".into(),
            ));
        }
        match self.state {
            WizardState::Entry | WizardState::Active => {}
            state => return Err(WizardError::InvalidState(state)),
        }
        if self.existing.take().is_none() {
            return Err(WizardError::NothingToRemove);
        }

        if let Some(bridge) = self.bridge.take() {
            bridge.send(BridgeEvent::Removed);
        }
        self.history
            .record(WizardEventKind::AttachmentRemoved, self.current_step());
        self.close(WizardState::Committed)?;

        tracing::info!(wizard_id = %self.id, "Attachment removed");
        Ok(())
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn plan(&self) -> WizardResult<&StepPlan> {
        self.plan.as_ref().ok_or(WizardError::NoCurrentStep)
    }

    fn position(&self) -> WizardResult<(usize, StepId)> {
        let index = self.cursor.ok_or(WizardError::NoCurrentStep)?;
        let step = self.plan()?.get(index).ok_or(WizardError::NoCurrentStep)?;
        Ok((index, step))
    }

    fn ensure_active(&self) -> WizardResult<()> {
        match self.state {
            WizardState::Active => Ok(()),
            state => Err(WizardError::InvalidState(state)),
        }
    }

    fn push(&mut self, index: usize, step: StepId) -> WizardResult<()> {
        self.cursor = Some(index);
        self.store.present(Some(step))?;
        self.host.go_to_step(step);
        Ok(())
    }

    fn reopen(&mut self) -> WizardResult<()> {
        self.state = WizardState::Active;
        self.store.set_frozen(false)
    }

    fn finish_commit(&mut self, draft: &Draft) -> WizardResult<()> {
        if let Draft::Reference(reference) = draft {
            let attachment = reference.to_attachment()?;
            if let Some(bridge) = self.bridge.take() {
                bridge.send(BridgeEvent::Attached(attachment));
            }
        }
        self.history
            .record(WizardEventKind::Committed, self.current_step());
        self.close(WizardState::Committed)?;
        self.host.show_success();
        tracing::info!(wizard_id = %self.id, "Wizard committed");
        Ok(())
    }

    fn finish_cancel(&mut self) -> WizardResult<()> {
        self.abandon_pending = false;
        self.history
            .record(WizardEventKind::Cancelled, self.current_step());
        // Dropping the sender tells the composing screen nothing was attached
        self.bridge = None;
        self.close(WizardState::Cancelled)?;
        tracing::info!(wizard_id = %self.id, "Wizard cancelled");
        Ok(())
    }

    fn close(&mut self, state: WizardState) -> WizardResult<()> {
        self.store.discard()?;
        self.state = state;
        self.cursor = None;
        self.host.dismiss_all();
        self.lease = None;
        Ok(())
    }
}

impl std::fmt::Debug for WizardController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WizardController")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("state", &self.state)
            .field("step", &self.current_step())
            .field("abandon_pending", &self.abandon_pending)
            .finish()
    }
}
