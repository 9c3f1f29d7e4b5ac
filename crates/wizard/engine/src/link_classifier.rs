//! Link classifier: decides whether raw input is an attachable web link
//!
//! Classification is pure. It never touches the network; whether a
//! link opens in the in-app viewer is a separate, best-effort
//! question answered by [`choose_viewer`].

use crate::collaborators::UrlOpener;
use crate::config::LinkClassifierConfig;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use url::Url;

/// Where the classified link is going to be used
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum LinkPurpose {
    /// Evidence reference on a post; host is returned as-is
    #[default]
    PostReference,
    /// Website field on a profile; a leading `www.` is dropped from the display host
    WebsiteAttachment,
}

/// Result of classifying one input
#[derive(Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Classification {
    pub valid: bool,
    /// Display host
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    /// Absolute URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub normalized: Option<String>,
}

impl Classification {
    fn invalid() -> Self {
        Self::default()
    }

    pub fn url(&self) -> Option<Url> {
        self.normalized.as_deref().and_then(|n| Url::parse(n).ok())
    }
}

/// Validates and normalizes candidate web links
#[derive(Clone, Debug)]
pub struct LinkClassifier {
    allowed_tlds: HashSet<String>,
    default_scheme: String,
}

impl LinkClassifier {
    pub fn new(config: &LinkClassifierConfig) -> Self {
        Self {
            allowed_tlds: config
                .allowed_tlds
                .iter()
                .map(|t| t.trim_start_matches('.').to_ascii_lowercase())
                .collect(),
            default_scheme: config.default_scheme.clone(),
        }
    }

    pub fn classify(&self, raw: &str, purpose: LinkPurpose) -> Classification {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.chars().any(char::is_whitespace) {
            return Classification::invalid();
        }

        let candidate = if has_scheme(trimmed) {
            trimmed.to_string()
        } else {
            format!("{}://{}", self.default_scheme, trimmed)
        };

        let url = match Url::parse(&candidate) {
            Ok(url) => url,
            Err(e) => {
                tracing::debug!(input = %trimmed, error = %e, "Link did not parse");
                return Classification::invalid();
            }
        };
        if !matches!(url.scheme(), "http" | "https") {
            return Classification::invalid();
        }

        // IP literals have no domain and therefore no extension
        let Some(domain) = url.domain() else {
            return Classification::invalid();
        };
        if !self.has_allowed_tld(domain) {
            tracing::debug!(domain, "Link rejected: unknown domain extension");
            return Classification::invalid();
        }

        let host = match purpose {
            LinkPurpose::PostReference => domain,
            LinkPurpose::WebsiteAttachment => domain.strip_prefix("www.").unwrap_or(domain),
        };

        Classification {
            valid: true,
            host: Some(host.to_string()),
            normalized: Some(url.to_string()),
        }
    }

    pub fn is_valid(&self, raw: &str, purpose: LinkPurpose) -> bool {
        self.classify(raw, purpose).valid
    }

    fn has_allowed_tld(&self, domain: &str) -> bool {
        match domain.rsplit_once('.') {
            Some((rest, tld)) if !rest.is_empty() => {
                self.allowed_tlds.contains(&tld.to_ascii_lowercase())
            }
            _ => false,
        }
    }
}

/// Whether `text` starts with `scheme://`. A `://` later in the path
/// or query (a redirect target, say) does not count.
fn has_scheme(text: &str) -> bool {
    let Some((scheme, _)) = text.split_once("://") else {
        return false;
    };
    let mut chars = scheme.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

impl Default for LinkClassifier {
    fn default() -> Self {
        Self::new(&LinkClassifierConfig::default())
    }
}

/// Where a classified link should be opened
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Viewer {
    InApp,
    ExternalBrowser,
}

/// Pick a viewer for an already-valid link. Returns `None` for invalid links.
pub fn choose_viewer(classification: &Classification, opener: &dyn UrlOpener) -> Option<Viewer> {
    if !classification.valid {
        return None;
    }
    let url = classification.url()?;
    if opener.can_open_in_app(&url) {
        Some(Viewer::InApp)
    } else {
        Some(Viewer::ExternalBrowser)
    }
}
