//! Error taxonomy shared by every layer of the scraping engine.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScraperError {
    /// Every violated field, joined into one message.
    #[error("invalid arguments: {}", .violations.join("; "))]
    Validation { violations: Vec<String> },

    #[error("operation cancelled")]
    Cancelled,

    #[error("unsupported domain \"{domain}\" (supported: {supported})")]
    UnsupportedDomain { domain: String, supported: String },

    #[error("failed to load {url}: {reason}")]
    Navigation { url: String, reason: String },

    #[error("HTTP error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("timed out after {timeout_ms}ms waiting for {what}")]
    Timeout { what: String, timeout_ms: u64 },

    #[error(
        "listing {listing_id} not found on {domain}; run a search first so its URL is known"
    )]
    NotFound { listing_id: String, domain: String },

    #[error("could not extract {field} from {url}")]
    Parsing { field: String, url: String },

    #[error("invalid CSS selector \"{selector}\": {reason}")]
    InvalidSelector { selector: String, reason: String },

    #[error("{context}: {message}")]
    Internal { context: String, message: String },
}

impl ScraperError {
    pub fn internal(context: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Internal {
            context: context.into(),
            message: message.into(),
        }
    }

    pub fn navigation(url: impl Into<String>, reason: impl ToString) -> Self {
        Self::Navigation {
            url: url.into(),
            reason: reason.to_string(),
        }
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

pub type ScraperResult<T> = Result<T, ScraperError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_message_lists_every_violation() {
        let err = ScraperError::Validation {
            violations: vec![
                "page: must be at least 1".to_owned(),
                "limit: must be between 1 and 50".to_owned(),
            ],
        };
        assert_eq!(
            err.to_string(),
            "invalid arguments: page: must be at least 1; limit: must be between 1 and 50"
        );
    }

    #[test]
    fn not_found_message_suggests_searching_first() {
        let err = ScraperError::NotFound {
            listing_id: "IDabc".to_owned(),
            domain: "olx.pl".to_owned(),
        };
        assert!(err.to_string().contains("search first"));
    }
}
