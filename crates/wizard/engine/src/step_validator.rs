//! Step validators: pure predicates deciding whether a step may advance
//!
//! Validators read the draft and nothing else. They are evaluated on
//! every mutation, so they must be cheap and side-effect free.

use crate::link_classifier::{LinkClassifier, LinkPurpose};
use std::collections::HashMap;
use std::sync::Arc;
use wizard_types::{Draft, ReferenceDraft, ReferenceKind, StepId};

/// Whether one step's required data is present and well-formed
pub trait StepValidator: Send + Sync {
    fn step(&self) -> StepId;

    fn is_satisfied(&self, draft: &Draft) -> bool;

    /// Why the step is not yet satisfied, for logs
    fn unmet(&self) -> &'static str;
}

/// Report/Target: a target has been chosen
pub struct TargetChosen;

impl StepValidator for TargetChosen {
    fn step(&self) -> StepId {
        StepId::ReportTarget
    }

    fn is_satisfied(&self, draft: &Draft) -> bool {
        draft.as_report().is_some_and(|r| r.target().is_some())
    }

    fn unmet(&self) -> &'static str {
        "no target chosen"
    }
}

/// Report/Topic: a topic has been chosen
pub struct TopicChosen;

impl StepValidator for TopicChosen {
    fn step(&self) -> StepId {
        StepId::ReportTopic
    }

    fn is_satisfied(&self, draft: &Draft) -> bool {
        draft.as_report().is_some_and(|r| r.topic().is_some())
    }

    fn unmet(&self) -> &'static str {
        "no topic chosen"
    }
}

/// Report/Context: context is optional
pub struct ContextOptional;

impl StepValidator for ContextOptional {
    fn step(&self) -> StepId {
        StepId::ReportContext
    }

    fn is_satisfied(&self, draft: &Draft) -> bool {
        draft.as_report().is_some()
    }

    fn unmet(&self) -> &'static str {
        "not a report draft"
    }
}

/// Reference/Link: the typed text classifies as a valid link
pub struct LinkClassified {
    classifier: Arc<LinkClassifier>,
    purpose: LinkPurpose,
}

impl LinkClassified {
    pub fn new(classifier: Arc<LinkClassifier>, purpose: LinkPurpose) -> Self {
        Self {
            classifier,
            purpose,
        }
    }
}

impl StepValidator for LinkClassified {
    fn step(&self) -> StepId {
        StepId::ReferenceLink
    }

    fn is_satisfied(&self, draft: &Draft) -> bool {
        draft
            .as_reference()
            .filter(|r| r.kind() == ReferenceKind::Link)
            .is_some_and(|r| self.classifier.is_valid(r.raw_text(), self.purpose))
    }

    fn unmet(&self) -> &'static str {
        "link is not valid"
    }
}

/// Reference/Citation: something other than the placeholder has been typed
pub struct CitationEntered;

impl StepValidator for CitationEntered {
    fn step(&self) -> StepId {
        StepId::ReferenceCitation
    }

    fn is_satisfied(&self, draft: &Draft) -> bool {
        draft
            .as_reference()
            .filter(|r| r.kind() == ReferenceKind::Citation)
            .is_some_and(|r| r.raw().value().is_some())
    }

    fn unmet(&self) -> &'static str {
        "citation is empty"
    }
}

/// Result of checking a step
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GateResult {
    Satisfied,
    NotSatisfied { reason: String },
}

impl GateResult {
    pub fn is_satisfied(&self) -> bool {
        matches!(self, Self::Satisfied)
    }
}

/// The full set of validators, one per step
pub struct StepGate {
    validators: HashMap<StepId, Box<dyn StepValidator>>,
    classifier: Arc<LinkClassifier>,
    purpose: LinkPurpose,
}

impl StepGate {
    pub fn new(classifier: Arc<LinkClassifier>, purpose: LinkPurpose) -> Self {
        let validators: Vec<Box<dyn StepValidator>> = vec![
            Box::new(TargetChosen),
            Box::new(TopicChosen),
            Box::new(ContextOptional),
            Box::new(LinkClassified::new(classifier.clone(), purpose)),
            Box::new(CitationEntered),
        ];
        Self {
            validators: validators.into_iter().map(|v| (v.step(), v)).collect(),
            classifier,
            purpose,
        }
    }

    pub fn is_satisfied(&self, step: StepId, draft: &Draft) -> bool {
        self.validators
            .get(&step)
            .is_some_and(|v| v.is_satisfied(draft))
    }

    pub fn evaluate(&self, step: StepId, draft: &Draft) -> GateResult {
        match self.validators.get(&step) {
            Some(v) if v.is_satisfied(draft) => GateResult::Satisfied,
            Some(v) => GateResult::NotSatisfied {
                reason: format!("{}: {}", step, v.unmet()),
            },
            None => GateResult::NotSatisfied {
                reason: format!("{}: no validator registered", step),
            },
        }
    }

    /// Normal form of freshly typed reference text, or `None` when the
    /// text is not acceptable and the previous normal form must stay.
    pub fn normalize(&self, draft: &ReferenceDraft, text: &str) -> Option<String> {
        match draft.kind() {
            ReferenceKind::Link => self.classifier.classify(text, self.purpose).normalized,
            ReferenceKind::Citation => {
                let trimmed = text.trim();
                let placeholder = draft.raw().placeholder();
                if trimmed.is_empty() || (!placeholder.is_empty() && text == placeholder) {
                    None
                } else {
                    Some(trimmed.to_string())
                }
            }
        }
    }

    pub fn classifier(&self) -> &LinkClassifier {
        &self.classifier
    }

    pub fn purpose(&self) -> LinkPurpose {
        self.purpose
    }
}

impl std::fmt::Debug for StepGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StepGate")
            .field("steps", &self.validators.len())
            .field("purpose", &self.purpose)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wizard_types::{ContentId, ReportDraft, ReportSource, Target, Topic, UserId};

    fn gate() -> StepGate {
        StepGate::new(Arc::new(LinkClassifier::default()), LinkPurpose::PostReference)
    }

    fn report() -> Draft {
        ReportDraft::new(
            ContentId::new("c"),
            UserId::new("a"),
            Some(UserId::new("r")),
            ReportSource::Feed,
        )
        .unwrap()
        .into()
    }

    #[test]
    fn test_report_steps() {
        let gate = gate();
        let mut draft = report();
        assert!(!gate.is_satisfied(StepId::ReportTarget, &draft));
        assert!(!gate.is_satisfied(StepId::ReportTopic, &draft));
        assert!(gate.is_satisfied(StepId::ReportContext, &draft));

        let r = draft.as_report_mut().unwrap();
        r.set_target(Target::Post);
        r.set_topic(Topic::Spam).unwrap();
        assert!(gate.is_satisfied(StepId::ReportTarget, &draft));
        assert!(gate.is_satisfied(StepId::ReportTopic, &draft));
    }

    #[test]
    fn test_link_step() {
        let gate = gate();
        let mut draft: Draft = ReferenceDraft::link().into();
        assert!(!gate.is_satisfied(StepId::ReferenceLink, &draft));

        draft
            .as_reference_mut()
            .unwrap()
            .record_input("example.com", |_, _| None);
        assert!(gate.is_satisfied(StepId::ReferenceLink, &draft));

        draft
            .as_reference_mut()
            .unwrap()
            .record_input("example.bar", |_, _| None);
        assert!(!gate.is_satisfied(StepId::ReferenceLink, &draft));
    }

    #[test]
    fn test_citation_step_ignores_placeholder() {
        let gate = gate();
        let mut draft: Draft = ReferenceDraft::citation("Author, Year").into();
        assert!(!gate.is_satisfied(StepId::ReferenceCitation, &draft));

        let r = draft.as_reference_mut().unwrap();
        r.focus();
        assert!(!gate.is_satisfied(StepId::ReferenceCitation, &draft));

        draft
            .as_reference_mut()
            .unwrap()
            .record_input("Doe, 2020", |_, _| None);
        assert!(gate.is_satisfied(StepId::ReferenceCitation, &draft));
    }

    #[test]
    fn test_wrong_draft_kind_never_satisfies() {
        let gate = gate();
        let reference: Draft = ReferenceDraft::link().into();
        assert!(!gate.is_satisfied(StepId::ReportContext, &reference));
        assert!(!gate.is_satisfied(StepId::ReferenceCitation, &report()));
    }

    #[test]
    fn test_evaluate_reason() {
        let result = gate().evaluate(StepId::ReportTopic, &report());
        assert_eq!(
            result,
            GateResult::NotSatisfied {
                reason: "report/topic: no topic chosen".into()
            }
        );
        assert!(gate().evaluate(StepId::ReportContext, &report()).is_satisfied());
    }

    #[test]
    fn test_normalize() {
        let gate = gate();
        let link = ReferenceDraft::link();
        assert_eq!(
            gate.normalize(&link, "example.com").as_deref(),
            Some("https://example.com/")
        );
        assert_eq!(gate.normalize(&link, "not a url"), None);

        let citation = ReferenceDraft::citation("Author, Year");
        assert_eq!(gate.normalize(&citation, "  Doe  ").as_deref(), Some("Doe"));
        assert_eq!(gate.normalize(&citation, "Author, Year"), None);
        assert_eq!(gate.normalize(&citation, "   "), None);
    }
}
