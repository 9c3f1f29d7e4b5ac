//! Wizard Runtime
//!
//! Drives multi-step submission flows: a content report (target,
//! topic, optional context) and an evidence reference (a validated
//! web link or an author citation attached to a post).
//!
//! # Key Principle
//!
//! **The engine never renders and never talks to the network itself.**
//!
//! It owns the draft, gates navigation on pure step validators and
//! issues exactly one submission per commit through the
//! [`SubmissionService`] it was given.
//!
//! # Architecture
//!
//! The [`WizardLauncher`] builds a [`WizardController`] per run from:
//!
//! - [`LinkClassifier`]: normalizes and validates candidate web links
//! - [`StepGate`]: one [`StepValidator`] per step
//! - [`DraftStore`]: the single owner of the draft, shared with step screens
//! - [`CommitHandler`]: busy-flagged terminal submission
//! - [`AttachmentSender`]: scoped, single-shot hand-back of a finished reference
//!
//! # Example
//!
//! ```rust
//! use wizard_engine::{LinkClassifier, LinkPurpose};
//!
//! let classifier = LinkClassifier::default();
//! let result = classifier.classify("www.example.org/paper", LinkPurpose::WebsiteAttachment);
//!
//! assert!(result.valid);
//! assert_eq!(result.host.as_deref(), Some("example.org"));
//! assert_eq!(result.normalized.as_deref(), Some("https://www.example.org/paper"));
//! ```

#![deny(unsafe_code)]

pub mod attachment_channel;
pub mod collaborators;
pub mod commit_handler;
pub mod config;
pub mod controller;
pub mod draft_store;
pub mod entry;
pub mod launcher;
pub mod link_classifier;
pub mod simulated;
pub mod step_validator;

// Re-export main types
pub use attachment_channel::{attachment_channel, AttachmentReceiver, AttachmentSender};
pub use collaborators::{IdentityProvider, PresentationHost, SubmissionService, UrlOpener};
pub use commit_handler::CommitHandler;
pub use config::{CommitConfig, LinkClassifierConfig, WizardConfig};
pub use controller::{CancelOutcome, StepView, WizardController};
pub use draft_store::DraftStore;
pub use entry::{EntryAffordance, EntryLease};
pub use launcher::{ReferenceRequest, ReportRequest, WizardLauncher};
pub use link_classifier::{choose_viewer, Classification, LinkClassifier, LinkPurpose, Viewer};
pub use step_validator::{GateResult, StepGate, StepValidator};
