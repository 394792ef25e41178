//! Error types for chord-chart cleanup
//!
//! Only malformed input (no document, unparsable markup, bad selectors or
//! config) is fatal. Per-node removal failures are reported through
//! `CleanReport` and never abort a pass.

use thiserror::Error;

/// Top-level cleanup error type
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CleanError {
    /// The document/root to clean is absent
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Markup is not well-formed XML
    #[error("Invalid XML: {0}")]
    InvalidXml(String),

    /// Selector is not a valid CSS selector list
    #[error("Invalid selector '{selector}': {reason}")]
    InvalidSelector { selector: String, reason: String },

    /// Cleaner configuration could not be decoded
    #[error("Invalid cleaner config: {0}")]
    InvalidConfig(String),

    /// Node id does not belong to this tree
    #[error("Unknown node id {0}")]
    UnknownNode(usize),

    /// The host DOM rejected a query or a removal
    #[error("DOM operation failed: {0}")]
    Dom(String),

    /// Serialising the cleaned tree failed
    #[error("Failed to write markup: {0}")]
    Write(String),
}

impl CleanError {
    pub(crate) fn invalid_selector(selector: &str, reason: impl Into<String>) -> Self {
        CleanError::InvalidSelector {
            selector: selector.to_string(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CleanError>;
