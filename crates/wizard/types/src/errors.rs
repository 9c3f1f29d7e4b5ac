//! Error types for the wizard layer

use crate::{StepId, WizardState};

/// Errors that can occur while driving a wizard
#[derive(Debug, thiserror::Error)]
pub enum WizardError {
    #[error("Step not satisfied: {0}")]
    StepNotSatisfied(StepId),

    #[error("No step follows {0}; commit instead")]
    NoNextStep(StepId),

    #[error("No step precedes {0}")]
    NoPreviousStep(StepId),

    #[error("Commit is only available from the final step (current: {0})")]
    NotAtFinalStep(StepId),

    #[error("No step is presented")]
    NoCurrentStep,

    #[error("Field belongs to {0}, which is not the presented step")]
    StepNotPresented(StepId),

    #[error("Operation not allowed in state {0:?}")]
    InvalidState(WizardState),

    #[error("A commit is already in flight")]
    CommitInFlight,

    #[error("Draft was already committed")]
    AlreadyCommitted,

    #[error("No signed-in user; cannot start a report")]
    MissingIdentity,

    #[error("Route already chosen")]
    RouteAlreadyChosen,

    #[error("Operation does not apply to this wizard: {0}")]
    NotApplicable(String),

    #[error("Another wizard is already open from this screen")]
    EntryActive,

    #[error("Nothing to remove")]
    NothingToRemove,

    #[error("Text buffer is empty")]
    EmptyBuffer,

    #[error("No draft is held")]
    NoDraft,

    #[error("Lock poisoned: {0}")]
    LockPoisoned(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type alias for wizard operations
pub type WizardResult<T> = Result<T, WizardError>;
