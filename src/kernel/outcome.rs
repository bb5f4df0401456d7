//! The uniform success/failure envelope returned across the command/query
//! boundary, and the domain `Failure` raised when an invariant is violated.

use serde::{Deserialize, Serialize};
use std::convert::TryFrom;

/// Message recorded when a failure is built from an empty error list.
pub const GENERIC_FAILURE: &str = "The operation failed.";

/// Result envelope for commands and for queries that only report success.
///
/// An outcome is either succeeded with no errors, or failed with at least one
/// error. The fields are private so no other combination can be built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "OutcomeDocument")]
pub struct Outcome {
    succeeded: bool,
    errors: Vec<String>,
}

impl Outcome {
    /// A succeeded outcome.
    pub fn ok() -> Self {
        Self {
            succeeded: true,
            errors: Vec::new(),
        }
    }

    /// A failed outcome carrying a single error.
    pub fn fail(error: impl Into<String>) -> Self {
        Self {
            succeeded: false,
            errors: vec![error.into()],
        }
    }

    /// A failed outcome carrying every error in `errors`.
    ///
    /// An empty list still yields a failure, recorded as [`GENERIC_FAILURE`].
    pub fn fail_all<I, S>(errors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut errors: Vec<String> = errors.into_iter().map(Into::into).collect();
        if errors.is_empty() {
            errors.push(GENERIC_FAILURE.to_string());
        }
        Self {
            succeeded: false,
            errors,
        }
    }

    pub fn succeeded(&self) -> bool {
        self.succeeded
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }
}

impl From<Failure> for Outcome {
    fn from(failure: Failure) -> Self {
        let Failure { message, errors } = failure;
        if errors.is_empty() {
            Outcome::fail(message)
        } else {
            Outcome::fail_all(errors)
        }
    }
}

#[derive(Deserialize)]
struct OutcomeDocument {
    succeeded: bool,
    #[serde(default)]
    errors: Vec<String>,
}

impl TryFrom<OutcomeDocument> for Outcome {
    type Error = String;

    fn try_from(document: OutcomeDocument) -> Result<Self, Self::Error> {
        match (document.succeeded, document.errors.is_empty()) {
            (true, true) => Ok(Outcome::ok()),
            (false, false) => Ok(Outcome::fail_all(document.errors)),
            (true, false) => Err("a succeeded outcome cannot carry errors".to_string()),
            (false, true) => Err("a failed outcome must carry at least one error".to_string()),
        }
    }
}

/// A domain failure: an invariant was violated or a business rule refused the
/// request in a way the caller cannot simply retry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct Failure {
    message: String,
    errors: Vec<String>,
}

impl Failure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            errors: Vec::new(),
        }
    }

    /// A failure with detail errors in addition to its headline message.
    pub fn with_errors<I, S>(message: impl Into<String>, errors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            message: message.into(),
            errors: errors.into_iter().map(Into::into).collect(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }
}
