//! Drafts: the mutable accumulators threaded through a wizard
//!
//! A draft is owned by exactly one wizard instance. Report drafts
//! collect a target, a topic and optional context; reference drafts
//! collect one link or citation whose kind is fixed at creation.

use crate::{
    Attachment, ContentId, StepId, TextField, UserId, WizardError, WizardKind, WizardResult,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ── Report enumerations ──────────────────────────────────────────────

/// What kind of thing is being reported
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Target {
    Post,
    Comment,
    Profile,
    Message,
    JobListing,
}

impl Target {
    pub const ALL: [Target; 5] = [
        Target::Post,
        Target::Comment,
        Target::Profile,
        Target::Message,
        Target::JobListing,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Post => "Post",
            Self::Comment => "Comment",
            Self::Profile => "Profile",
            Self::Message => "Message",
            Self::JobListing => "Job listing",
        }
    }
}

/// Why it is being reported
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Topic {
    Spam,
    Harassment,
    HateSpeech,
    Misinformation,
    Violence,
    Nudity,
    Scam,
    Impersonation,
    Other,
}

impl Topic {
    pub const ALL: [Topic; 9] = [
        Topic::Spam,
        Topic::Harassment,
        Topic::HateSpeech,
        Topic::Misinformation,
        Topic::Violence,
        Topic::Nudity,
        Topic::Scam,
        Topic::Impersonation,
        Topic::Other,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Spam => "Spam",
            Self::Harassment => "Harassment or bullying",
            Self::HateSpeech => "Hate speech",
            Self::Misinformation => "False information",
            Self::Violence => "Violence",
            Self::Nudity => "Nudity or sexual content",
            Self::Scam => "Scam or fraud",
            Self::Impersonation => "Impersonation",
            Self::Other => "Something else",
        }
    }
}

/// The part of the app the report was started from
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReportSource {
    Feed,
    Profile,
    Jobs,
    Messages,
    Comments,
}

// ── Report draft ─────────────────────────────────────────────────────

/// A report in progress
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportDraft {
    content_id: ContentId,
    author_id: UserId,
    reporter_id: UserId,
    source: ReportSource,
    target: Option<Target>,
    topic: Option<Topic>,
    context: Option<String>,
}

impl ReportDraft {
    /// Start a report. Fails fast when no reporter identity is available.
    pub fn new(
        content_id: ContentId,
        author_id: UserId,
        reporter_id: Option<UserId>,
        source: ReportSource,
    ) -> WizardResult<Self> {
        let reporter_id = reporter_id.ok_or(WizardError::MissingIdentity)?;
        Ok(Self {
            content_id,
            author_id,
            reporter_id,
            source,
            target: None,
            topic: None,
            context: None,
        })
    }

    /// Last write wins when the step is revisited
    pub fn set_target(&mut self, target: Target) {
        self.target = Some(target);
    }

    /// Topic may only be chosen once a target is set
    pub fn set_topic(&mut self, topic: Topic) -> WizardResult<()> {
        if self.target.is_none() {
            return Err(WizardError::StepNotSatisfied(StepId::ReportTarget));
        }
        self.topic = Some(topic);
        Ok(())
    }

    pub fn set_context(&mut self, context: impl Into<String>) {
        self.context = Some(context.into());
    }

    pub fn clear_context(&mut self) -> Option<String> {
        self.context.take()
    }

    pub fn content_id(&self) -> &ContentId {
        &self.content_id
    }

    pub fn author_id(&self) -> &UserId {
        &self.author_id
    }

    pub fn reporter_id(&self) -> &UserId {
        &self.reporter_id
    }

    pub fn source(&self) -> ReportSource {
        self.source
    }

    pub fn target(&self) -> Option<Target> {
        self.target
    }

    pub fn topic(&self) -> Option<Topic> {
        self.topic
    }

    pub fn context(&self) -> Option<&str> {
        self.context.as_deref()
    }

    /// Shape the payload handed to the submission service
    pub fn to_payload(&self) -> WizardResult<ReportPayload> {
        let target = self
            .target
            .ok_or(WizardError::StepNotSatisfied(StepId::ReportTarget))?;
        let topic = self
            .topic
            .ok_or(WizardError::StepNotSatisfied(StepId::ReportTopic))?;
        Ok(ReportPayload {
            content_id: self.content_id.clone(),
            author_id: self.author_id.clone(),
            reporter_id: self.reporter_id.clone(),
            source: self.source,
            target,
            topic,
            context: self.context.clone(),
            submitted_at: Utc::now(),
        })
    }
}

/// What the submission service receives for a report
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportPayload {
    pub content_id: ContentId,
    pub author_id: UserId,
    pub reporter_id: UserId,
    pub source: ReportSource,
    pub target: Target,
    pub topic: Topic,
    pub context: Option<String>,
    pub submitted_at: DateTime<Utc>,
}

// ── Reference draft ──────────────────────────────────────────────────

/// The two mutually exclusive reference routes
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReferenceKind {
    Link,
    Citation,
}

/// A link or citation being attached to a post
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceDraft {
    kind: ReferenceKind,
    raw: TextField,
    normalized_text: Option<String>,
}

impl ReferenceDraft {
    pub fn link() -> Self {
        Self {
            kind: ReferenceKind::Link,
            raw: TextField::new(),
            normalized_text: None,
        }
    }

    pub fn citation(placeholder: impl Into<String>) -> Self {
        Self {
            kind: ReferenceKind::Citation,
            raw: TextField::with_placeholder(placeholder),
            normalized_text: None,
        }
    }

    pub fn kind(&self) -> ReferenceKind {
        self.kind
    }

    pub fn raw(&self) -> &TextField {
        &self.raw
    }

    pub fn raw_text(&self) -> &str {
        self.raw.text()
    }

    pub fn normalized_text(&self) -> Option<&str> {
        self.normalized_text.as_deref()
    }

    /// Clear the placeholder on first focus
    pub fn focus(&mut self) -> bool {
        self.raw.focus()
    }

    /// Record what the user typed. The normal form is derived from the
    /// new text by `normalize`; `None` leaves the previous one untouched.
    pub fn record_input<F>(&mut self, text: impl Into<String>, normalize: F)
    where
        F: FnOnce(&Self, &str) -> Option<String>,
    {
        let text = text.into();
        let normalized = normalize(self, &text);
        self.raw.edit(text);
        if normalized.is_some() {
            self.normalized_text = normalized;
        }
    }

    /// The payload handed back to the composing screen
    pub fn to_attachment(&self) -> WizardResult<Attachment> {
        let step = match self.kind {
            ReferenceKind::Link => StepId::ReferenceLink,
            ReferenceKind::Citation => StepId::ReferenceCitation,
        };
        let normalized_text = self
            .normalized_text
            .clone()
            .ok_or(WizardError::StepNotSatisfied(step))?;
        Ok(Attachment {
            kind: self.kind,
            normalized_text,
        })
    }
}

// ── Draft ────────────────────────────────────────────────────────────

/// Either kind of draft
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Draft {
    Report(ReportDraft),
    Reference(ReferenceDraft),
}

impl Draft {
    pub fn kind(&self) -> WizardKind {
        match self {
            Self::Report(_) => WizardKind::Report,
            Self::Reference(_) => WizardKind::Reference,
        }
    }

    pub fn as_report(&self) -> Option<&ReportDraft> {
        match self {
            Self::Report(r) => Some(r),
            Self::Reference(_) => None,
        }
    }

    pub fn as_report_mut(&mut self) -> Option<&mut ReportDraft> {
        match self {
            Self::Report(r) => Some(r),
            Self::Reference(_) => None,
        }
    }

    pub fn as_reference(&self) -> Option<&ReferenceDraft> {
        match self {
            Self::Reference(r) => Some(r),
            Self::Report(_) => None,
        }
    }

    pub fn as_reference_mut(&mut self) -> Option<&mut ReferenceDraft> {
        match self {
            Self::Reference(r) => Some(r),
            Self::Report(_) => None,
        }
    }
}

impl From<ReportDraft> for Draft {
    fn from(draft: ReportDraft) -> Self {
        Self::Report(draft)
    }
}

impl From<ReferenceDraft> for Draft {
    fn from(draft: ReferenceDraft) -> Self {
        Self::Reference(draft)
    }
}
