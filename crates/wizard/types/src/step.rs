//! Steps and step plans
//!
//! A step is one screen in a wizard. Each wizard runs a fixed,
//! linear plan of steps; the Reference wizard picks one of two
//! plans at its entry point.

use crate::ReferenceKind;
use serde::{Deserialize, Serialize};

/// Identifies one step screen
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StepId {
    /// Report: choose what is being reported
    ReportTarget,
    /// Report: choose why it is being reported
    ReportTopic,
    /// Report: optional free-text context
    ReportContext,
    /// Reference: enter a web link
    ReferenceLink,
    /// Reference: enter an author citation
    ReferenceCitation,
}

impl StepId {
    pub fn kind(&self) -> WizardKind {
        match self {
            Self::ReportTarget | Self::ReportTopic | Self::ReportContext => WizardKind::Report,
            Self::ReferenceLink | Self::ReferenceCitation => WizardKind::Reference,
        }
    }
}

impl std::fmt::Display for StepId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::ReportTarget => "report/target",
            Self::ReportTopic => "report/topic",
            Self::ReportContext => "report/context",
            Self::ReferenceLink => "reference/link",
            Self::ReferenceCitation => "reference/citation",
        };
        f.write_str(name)
    }
}

/// Which workflow a wizard runs
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WizardKind {
    Report,
    Reference,
}

/// The ordered steps of one wizard route
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepPlan {
    steps: Vec<StepId>,
}

impl StepPlan {
    /// Target, then Topic, then the optional Context step
    pub fn report() -> Self {
        Self {
            steps: vec![StepId::ReportTarget, StepId::ReportTopic, StepId::ReportContext],
        }
    }

    /// Single-step route for the chosen reference kind
    pub fn reference(kind: ReferenceKind) -> Self {
        let step = match kind {
            ReferenceKind::Link => StepId::ReferenceLink,
            ReferenceKind::Citation => StepId::ReferenceCitation,
        };
        Self { steps: vec![step] }
    }

    pub fn first(&self) -> Option<StepId> {
        self.steps.first().copied()
    }

    pub fn last(&self) -> Option<StepId> {
        self.steps.last().copied()
    }

    pub fn position(&self, step: StepId) -> Option<usize> {
        self.steps.iter().position(|s| *s == step)
    }

    pub fn get(&self, index: usize) -> Option<StepId> {
        self.steps.get(index).copied()
    }

    pub fn next(&self, step: StepId) -> Option<StepId> {
        self.position(step).and_then(|i| self.get(i + 1))
    }

    pub fn previous(&self, step: StepId) -> Option<StepId> {
        self.position(step)
            .and_then(|i| i.checked_sub(1))
            .and_then(|i| self.get(i))
    }

    pub fn is_final(&self, step: StepId) -> bool {
        self.last() == Some(step)
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn steps(&self) -> &[StepId] {
        &self.steps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_plan_order() {
        let plan = StepPlan::report();
        assert_eq!(plan.first(), Some(StepId::ReportTarget));
        assert_eq!(plan.next(StepId::ReportTarget), Some(StepId::ReportTopic));
        assert_eq!(plan.next(StepId::ReportTopic), Some(StepId::ReportContext));
        assert_eq!(plan.next(StepId::ReportContext), None);
        assert!(plan.is_final(StepId::ReportContext));
        assert!(!plan.is_final(StepId::ReportTopic));
    }

    #[test]
    fn test_previous() {
        let plan = StepPlan::report();
        assert_eq!(plan.previous(StepId::ReportTarget), None);
        assert_eq!(plan.previous(StepId::ReportContext), Some(StepId::ReportTopic));
        assert_eq!(plan.previous(StepId::ReferenceLink), None);
    }

    #[test]
    fn test_reference_routes_are_disjoint() {
        let link = StepPlan::reference(ReferenceKind::Link);
        let citation = StepPlan::reference(ReferenceKind::Citation);
        assert_eq!(link.steps(), &[StepId::ReferenceLink]);
        assert_eq!(citation.steps(), &[StepId::ReferenceCitation]);
        assert!(link.is_final(StepId::ReferenceLink));
        assert_eq!(link.position(StepId::ReferenceCitation), None);
    }

    #[test]
    fn test_step_kind_and_display() {
        assert_eq!(StepId::ReportTopic.kind(), WizardKind::Report);
        assert_eq!(StepId::ReferenceCitation.kind(), WizardKind::Reference);
        assert_eq!(StepId::ReportContext.to_string(), "report/context");
    }
}
