//! Commit outcomes

use serde::{Deserialize, Serialize};

/// A failure reported by the submission service, shown to the user verbatim
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("{title}: {message}")]
pub struct SubmissionError {
    pub title: String,
    pub message: String,
}

impl SubmissionError {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
        }
    }
}

/// How a commit resolved
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CommitOutcome {
    Success,
    Failure(SubmissionError),
}

impl CommitOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    pub fn failure(&self) -> Option<&SubmissionError> {
        match self {
            Self::Success => None,
            Self::Failure(e) => Some(e),
        }
    }
}

impl From<Result<(), SubmissionError>> for CommitOutcome {
    fn from(result: Result<(), SubmissionError>) -> Self {
        match result {
            Ok(()) => Self::Success,
            Err(e) => Self::Failure(e),
        }
    }
}
