//! Wizard lifecycle state and event history

use crate::{ReferenceKind, StepId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle of one wizard instance
///
/// `Entry -> Active -> Committing -> Committed`, with `Cancelled`
/// reachable from `Entry` and `Active`. A failed commit returns to
/// `Active` with the draft untouched.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum WizardState {
    /// Entry screen presented, no step pushed yet
    #[default]
    Entry,
    /// A step is presented and interactive
    Active,
    /// The final step's commit call is outstanding
    Committing,
    /// Submission succeeded; the stack was dismissed
    Committed,
    /// Abandoned; the draft was discarded
    Cancelled,
}

impl WizardState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Committed | Self::Cancelled)
    }
}

/// What happened
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum WizardEventKind {
    Launched,
    RouteChosen(ReferenceKind),
    Advanced { from: StepId, to: StepId },
    Retreated { from: StepId, to: StepId },
    CancelRequested,
    CancelDeclined,
    Cancelled,
    CommitStarted,
    Committed,
    CommitFailed { reason: String },
    AttachmentRemoved,
}

/// A sequenced entry in a wizard's history
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WizardEvent {
    /// Monotonically increasing sequence number
    pub sequence: u64,
    pub kind: WizardEventKind,
    /// Step presented when the event occurred
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step: Option<StepId>,
    pub at: DateTime<Utc>,
}

/// Append-only record of a wizard's transitions
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct WizardHistory {
    events: Vec<WizardEvent>,
}

impl WizardHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, kind: WizardEventKind, step: Option<StepId>) {
        self.events.push(WizardEvent {
            sequence: self.events.len() as u64,
            kind,
            step,
            at: Utc::now(),
        });
    }

    pub fn events(&self) -> &[WizardEvent] {
        &self.events
    }

    pub fn last(&self) -> Option<&WizardEvent> {
        self.events.last()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn count(&self, pred: impl Fn(&WizardEventKind) -> bool) -> usize {
        self.events.iter().filter(|e| pred(&e.kind)).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_states() {
        assert!(!WizardState::Entry.is_terminal());
        assert!(!WizardState::Active.is_terminal());
        assert!(!WizardState::Committing.is_terminal());
        assert!(WizardState::Committed.is_terminal());
        assert!(WizardState::Cancelled.is_terminal());
        assert_eq!(WizardState::default(), WizardState::Entry);
    }

    #[test]
    fn test_history_sequence() {
        let mut history = WizardHistory::new();
        history.record(WizardEventKind::Launched, None);
        history.record(
            WizardEventKind::Advanced {
                from: StepId::ReportTarget,
                to: StepId::ReportTopic,
            },
            Some(StepId::ReportTopic),
        );
        history.record(WizardEventKind::CommitStarted, Some(StepId::ReportContext));

        for (i, event) in history.events().iter().enumerate() {
            assert_eq!(event.sequence, i as u64);
        }
        assert_eq!(history.len(), 3);
        assert_eq!(
            history.count(|k| matches!(k, WizardEventKind::Advanced { .. })),
            1
        );
        assert_eq!(history.last().unwrap().kind, WizardEventKind::CommitStarted);
    }
}
