//! Draft store: the single owner of a wizard's draft
//!
//! Every step screen receives a clone of the same [`DraftStore`]
//! handle and writes through its typed setters. A setter only accepts
//! writes while the step owning its field is presented. Each mutation
//! re-evaluates the presented step's validator and publishes the
//! result on a `watch` channel the step's "continue" affordance
//! subscribes to.

use crate::step_validator::StepGate;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tokio::sync::watch;
use wizard_types::{
    Draft, ReferenceDraft, ReferenceKind, ReportDraft, StepId, Target, TextField, Topic,
    WizardError, WizardKind, WizardResult, WizardState,
};

#[derive(Debug)]
struct StoreInner {
    draft: Option<Draft>,
    step: Option<StepId>,
    /// Any draft field set since entry
    touched: bool,
    /// Plan index of the furthest step that passed its gate
    furthest_validated: Option<usize>,
    /// Step-local buffer for the report context input
    context_buffer: TextField,
    /// Rejects mutations while a commit is outstanding
    frozen: bool,
}

/// Shared handle to one wizard's draft
#[derive(Clone, Debug)]
pub struct DraftStore {
    inner: Arc<RwLock<StoreInner>>,
    gate: Arc<StepGate>,
    can_advance: Arc<watch::Sender<bool>>,
}

impl DraftStore {
    pub fn new(draft: Option<Draft>, gate: Arc<StepGate>, context_placeholder: &str) -> Self {
        let (tx, _) = watch::channel(false);
        Self {
            inner: Arc::new(RwLock::new(StoreInner {
                draft,
                step: None,
                touched: false,
                furthest_validated: None,
                context_buffer: TextField::with_placeholder(context_placeholder),
                frozen: false,
            })),
            gate,
            can_advance: Arc::new(tx),
        }
    }

    // ── Observation ──────────────────────────────────────────────────

    /// Receiver for the presented step's "continue" state
    pub fn subscribe_can_advance(&self) -> watch::Receiver<bool> {
        self.can_advance.subscribe()
    }

    pub fn can_advance(&self) -> bool {
        *self.can_advance.borrow()
    }

    /// Copy of the current draft
    pub fn snapshot(&self) -> WizardResult<Draft> {
        self.read()?.draft.clone().ok_or(WizardError::NoDraft)
    }

    pub fn has_draft(&self) -> bool {
        self.read().map(|i| i.draft.is_some()).unwrap_or(false)
    }

    pub fn is_touched(&self) -> WizardResult<bool> {
        Ok(self.read()?.touched)
    }

    pub fn furthest_validated(&self) -> WizardResult<Option<usize>> {
        Ok(self.read()?.furthest_validated)
    }

    pub fn context_buffer(&self) -> WizardResult<TextField> {
        Ok(self.read()?.context_buffer.clone())
    }

    /// "Confirm add" on the context step: only while the buffer holds text
    pub fn can_confirm_context(&self) -> bool {
        self.read()
            .map(|i| i.context_buffer.value().is_some())
            .unwrap_or(false)
    }

    /// "Remove" on the context step: only once a context was committed
    pub fn can_remove_context(&self) -> bool {
        self.read()
            .map(|i| {
                i.draft
                    .as_ref()
                    .and_then(Draft::as_report)
                    .is_some_and(|r| r.context().is_some())
            })
            .unwrap_or(false)
    }

    // ── Report setters ───────────────────────────────────────────────

    pub fn set_target(&self, target: Target) -> WizardResult<()> {
        self.mutate(true, |inner| {
            report_at(inner, StepId::ReportTarget)?.set_target(target);
            Ok(())
        })
    }

    pub fn set_topic(&self, topic: Topic) -> WizardResult<()> {
        self.mutate(true, |inner| report_at(inner, StepId::ReportTopic)?.set_topic(topic))
    }

    /// Focus the context input, clearing its example text the first time
    pub fn focus_context(&self) -> WizardResult<bool> {
        self.mutate(false, |inner| {
            report_at(inner, StepId::ReportContext)?;
            Ok(inner.context_buffer.focus())
        })
    }

    /// Keystrokes in the context input; the draft is untouched until confirmed
    pub fn edit_context(&self, text: impl Into<String>) -> WizardResult<()> {
        let text = text.into();
        self.mutate(false, |inner| {
            report_at(inner, StepId::ReportContext)?;
            inner.context_buffer.edit(text);
            Ok(())
        })
    }

    /// Copy the context buffer into the draft
    pub fn confirm_context(&self) -> WizardResult<()> {
        self.mutate(true, |inner| {
            report_at(inner, StepId::ReportContext)?;
            let value = inner
                .context_buffer
                .value()
                .map(str::to_string)
                .ok_or(WizardError::EmptyBuffer)?;
            report_mut(inner)?.set_context(value);
            Ok(())
        })
    }

    /// Drop a previously confirmed context
    pub fn remove_context(&self) -> WizardResult<()> {
        self.mutate(true, |inner| {
            report_at(inner, StepId::ReportContext)?
                .clear_context()
                .map(|_| ())
                .ok_or(WizardError::NothingToRemove)?;
            inner.context_buffer.clear();
            Ok(())
        })
    }

    // ── Reference setters ────────────────────────────────────────────

    /// Focus the reference input, clearing a citation's example text the first time
    pub fn focus_reference(&self) -> WizardResult<bool> {
        self.mutate(false, |inner| Ok(reference_at(inner)?.focus()))
    }

    /// Keystrokes in the reference input. The normal form is derived
    /// here and only replaced when the new text is acceptable.
    pub fn edit_reference(&self, text: impl Into<String>) -> WizardResult<()> {
        let text = text.into();
        let gate = self.gate.clone();
        self.mutate(true, move |inner| {
            reference_at(inner)?.record_input(text, |draft, text| gate.normalize(draft, text));
            Ok(())
        })
    }

    // ── Controller-only operations ───────────────────────────────────

    pub(crate) fn install_draft(&self, draft: Draft) -> WizardResult<()> {
        let mut inner = self.write()?;
        if inner.draft.is_some() {
            return Err(WizardError::RouteAlreadyChosen);
        }
        inner.draft = Some(draft);
        Ok(())
    }

    pub(crate) fn present(&self, step: Option<StepId>) -> WizardResult<()> {
        let value = {
            let mut inner = self.write()?;
            inner.step = step;
            self.evaluate(&*inner)
        };
        self.can_advance.send_replace(value);
        Ok(())
    }

    /// Record that the step at `index` passed its gate. Never moves backwards.
    pub(crate) fn mark_validated(&self, index: usize) -> WizardResult<()> {
        let mut inner = self.write()?;
        let furthest = inner.furthest_validated.map_or(index, |f| f.max(index));
        inner.furthest_validated = Some(furthest);
        Ok(())
    }

    pub(crate) fn set_frozen(&self, frozen: bool) -> WizardResult<()> {
        self.write()?.frozen = frozen;
        Ok(())
    }

    pub(crate) fn discard(&self) -> WizardResult<()> {
        {
            let mut inner = self.write()?;
            inner.draft = None;
            inner.step = None;
            inner.frozen = true;
        }
        self.can_advance.send_replace(false);
        Ok(())
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn mutate<R>(
        &self,
        touches: bool,
        f: impl FnOnce(&mut StoreInner) -> WizardResult<R>,
    ) -> WizardResult<R> {
        let (result, value) = {
            let mut inner = self.write()?;
            if inner.frozen {
                return Err(WizardError::InvalidState(WizardState::Committing));
            }
            let result = f(&mut *inner)?;
            if touches {
                inner.touched = true;
            }
            (result, self.evaluate(&*inner))
        };
        tracing::debug!(can_advance = value, "Draft mutated");
        self.can_advance.send_replace(value);
        Ok(result)
    }

    fn evaluate(&self, inner: &StoreInner) -> bool {
        match (inner.step, inner.draft.as_ref()) {
            (Some(step), Some(draft)) => self.gate.is_satisfied(step, draft),
            _ => false,
        }
    }

    fn read(&self) -> WizardResult<RwLockReadGuard<'_, StoreInner>> {
        self.inner
            .read()
            .map_err(|e| WizardError::LockPoisoned(e.to_string()))
    }

    fn write(&self) -> WizardResult<RwLockWriteGuard<'_, StoreInner>> {
        self.inner
            .write()
            .map_err(|e| WizardError::LockPoisoned(e.to_string()))
    }
}

fn report_mut(inner: &mut StoreInner) -> WizardResult<&mut ReportDraft> {
    inner
        .draft
        .as_mut()
        .ok_or(WizardError::NoDraft)?
        .as_report_mut()
        .ok_or_else(|| not_applicable(WizardKind::Report))
}

/// The report draft, provided `owner` is the presented step
fn report_at(inner: &mut StoreInner, owner: StepId) -> WizardResult<&mut ReportDraft> {
    let presented = inner.step;
    let report = report_mut(inner)?;
    if presented != Some(owner) {
        return Err(WizardError::StepNotPresented(owner));
    }
    Ok(report)
}

/// The reference draft, provided its route's step is presented
fn reference_at(inner: &mut StoreInner) -> WizardResult<&mut ReferenceDraft> {
    let presented = inner.step;
    let reference = reference_mut(inner)?;
    let owner = match reference.kind() {
        ReferenceKind::Link => StepId::ReferenceLink,
        ReferenceKind::Citation => StepId::ReferenceCitation,
    };
    if presented != Some(owner) {
        return Err(WizardError::StepNotPresented(owner));
    }
    Ok(reference)
}

fn reference_mut(inner: &mut StoreInner) -> WizardResult<&mut ReferenceDraft> {
    inner
        .draft
        .as_mut()
        .ok_or(WizardError::NoDraft)?
        .as_reference_mut()
        .ok_or_else(|| not_applicable(WizardKind::Reference))
}

fn not_applicable(expected: WizardKind) -> WizardError {
    WizardError::NotApplicable(format!("draft is not a {:?} draft", expected))
}
