//! Identifiers shared across wizard drafts and instances

use serde::{Deserialize, Serialize};

/// Unique identifier for one running wizard instance
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WizardInstanceId(pub String);

impl WizardInstanceId {
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn short(&self) -> &str {
        &self.0[..8.min(self.0.len())]
    }
}

impl std::fmt::Display for WizardInstanceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a piece of content in the remote store (post, comment, profile...)
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentId(pub String);

impl ContentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl std::fmt::Display for ContentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a user account
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instance_id() {
        let id = WizardInstanceId::generate();
        assert!(!id.0.is_empty());
        assert_eq!(id.short().len(), 8);

        let named = WizardInstanceId::new("wiz");
        assert_eq!(named.short(), "wiz");
        assert_eq!(format!("{}", named), "wiz");
    }

    #[test]
    fn test_generated_ids_differ() {
        assert_ne!(WizardInstanceId::generate(), WizardInstanceId::generate());
    }
}
