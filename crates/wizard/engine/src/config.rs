//! Wizard configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;
use wizard_types::{WizardError, WizardResult};

/// Domain extensions accepted by the link classifier
pub const DEFAULT_ALLOWED_TLDS: &[&str] = &[
    // generic
    "com", "org", "net", "edu", "gov", "mil", "int", "info", "biz", "io", "co", "ai", "app",
    "dev", "me", "tv", "news", "blog", "tech", "online", "site", "science", "health",
    "academy", "media", "page", "wiki", "xyz",
    // country codes
    "us", "uk", "ca", "au", "nz", "ie", "de", "fr", "es", "it", "nl", "be", "ch", "at", "se",
    "no", "dk", "fi", "pl", "pt", "gr", "cz", "ru", "ua", "tr", "il", "in", "cn", "jp", "kr",
    "tw", "hk", "sg", "my", "id", "ph", "th", "vn", "br", "mx", "ar", "cl", "za", "ng", "ke",
    "eg", "eu",
];

/// Link classification settings
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkClassifierConfig {
    /// Accepted top-level domains, compared case-insensitively
    pub allowed_tlds: Vec<String>,
    /// Scheme prepended to inputs that carry none
    pub default_scheme: String,
}

impl Default for LinkClassifierConfig {
    fn default() -> Self {
        Self {
            allowed_tlds: DEFAULT_ALLOWED_TLDS.iter().map(|s| s.to_string()).collect(),
            default_scheme: "https".into(),
        }
    }
}

/// Commit settings
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CommitConfig {
    /// Give up on the submission call after this many milliseconds.
    /// `None` waits indefinitely.
    pub timeout_ms: Option<u64>,
}

impl CommitConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }
}

/// Top-level configuration for launching wizards
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct WizardConfig {
    pub link: LinkClassifierConfig,
    pub commit: CommitConfig,
    /// Example text shown in the citation field until first focus
    pub citation_placeholder: String,
    /// Example text shown in the report context field until first focus
    pub context_placeholder: String,
}

impl Default for WizardConfig {
    fn default() -> Self {
        Self {
            link: LinkClassifierConfig::default(),
            commit: CommitConfig::default(),
            citation_placeholder: "e.g. Smith J., Journal of Examples, 2019".into(),
            context_placeholder: "Add anything that helps us understand the problem".into(),
        }
    }
}

impl WizardConfig {
    /// Default configuration with a bounded commit call
    pub fn with_commit_timeout(timeout_ms: u64) -> Self {
        Self {
            commit: CommitConfig {
                timeout_ms: Some(timeout_ms),
            },
            ..Self::default()
        }
    }

    pub fn from_json(json: &str) -> WizardResult<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| WizardError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> WizardResult<()> {
        if self.link.allowed_tlds.is_empty() {
            return Err(WizardError::InvalidConfig("allowed_tlds is empty".into()));
        }
        if !matches!(self.link.default_scheme.as_str(), "http" | "https") {
            return Err(WizardError::InvalidConfig(format!(
                "unsupported default scheme '{}'",
                self.link.default_scheme
            )));
        }
        if self.commit.timeout_ms == Some(0) {
            return Err(WizardError::InvalidConfig("commit timeout must be > 0".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let c = WizardConfig::default();
        assert!(c.validate().is_ok());
        assert!(c.commit.timeout().is_none());
        assert!(c.link.allowed_tlds.iter().any(|t| t == "gov"));
        assert!(!c.link.allowed_tlds.iter().any(|t| t == "bar"));
    }

    #[test]
    fn timeout_config() {
        let c = WizardConfig::with_commit_timeout(1500);
        assert_eq!(c.commit.timeout(), Some(Duration::from_millis(1500)));
        assert!(c.validate().is_ok());
    }

    #[test]
    fn partial_json_fills_defaults() {
        let c = WizardConfig::from_json(r#"{ "commit": { "timeout_ms": 3000 } }"#).unwrap();
        assert_eq!(c.commit.timeout_ms, Some(3000));
        assert_eq!(c.link.default_scheme, "https");
        assert!(!c.citation_placeholder.is_empty());
    }

    #[test]
    fn invalid_configs_rejected() {
        assert!(WizardConfig::from_json(r#"{ "link": { "allowed_tlds": [] } }"#).is_err());
        assert!(WizardConfig::from_json(r#"{ "commit": { "timeout_ms": 0 } }"#).is_err());
        assert!(WizardConfig::from_json(r#"{ "link": { "default_scheme": "ftp" } }"#).is_err());
        assert!(WizardConfig::from_json("not json").is_err());
    }

    #[test]
    fn config_serde() {
        let c = WizardConfig::with_commit_timeout(10);
        let json = serde_json::to_string(&c).unwrap();
        let restored: WizardConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.commit.timeout_ms, Some(10));
        assert_eq!(restored.link.allowed_tlds.len(), c.link.allowed_tlds.len());
    }
}
