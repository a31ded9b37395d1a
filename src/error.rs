//! Error handling module for regform
//!
//! Provides the crate-level error type and the typed errors of each layer.
//! Validation failures are not errors: they are reported as
//! [`crate::rules::ValidationOutcome`] values and never abort anything.

use thiserror::Error;

use crate::steps::Step;
use crate::types::Language;

/// Main error type for the terminal front end
#[derive(Error, Debug)]
pub enum RegFormError {
    /// IO errors (terminal, event polling)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Terminal/UI errors
    #[error("Terminal error: {0}")]
    Terminal(String),
}

/// Result type alias for regform operations
pub type Result<T> = std::result::Result<T, RegFormError>;

impl RegFormError {
    /// Create a terminal error
    pub fn terminal(msg: impl Into<String>) -> Self {
        Self::Terminal(msg.into())
    }
}

/// Failures of the key-value store behind the draft.
///
/// These never leave [`crate::storage::DraftStore`]; they are logged there and
/// turned into `false`/`None`.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("storage IO failed for key '{key}': {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("stored value for key '{key}' is not valid JSON: {source}")]
    Json {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Translation catalog failures. Recovered by falling back to English.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TranslationError {
    #[error("no translation catalog for language '{0}'")]
    MissingCatalog(Language),

    #[error("translation catalog for '{lang}' is invalid: {reason}")]
    InvalidCatalog { lang: Language, reason: String },
}

/// Why a step transition or submission did not happen.
///
/// Every variant leaves the form state untouched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NavigationError {
    #[error("step {step} has {} incomplete required field(s)", invalid_fields.len())]
    Incomplete {
        step: Step,
        invalid_fields: Vec<String>,
    },

    #[error("already on the first step")]
    AtFirstStep,

    #[error("already on the last step")]
    AtLastStep,

    #[error("step {0} does not exist")]
    OutOfRange(u8),

    #[error("submission is only possible from the final step")]
    NotOnFinalStep,

    #[error("the form is locked while submitting or after submission")]
    Locked,
}
