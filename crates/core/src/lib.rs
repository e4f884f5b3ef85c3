//! Shared primitives for all Rust crates in Formwright.

#![forbid(unsafe_code)]

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type used across Formwright crates.
pub type AppResult<T> = Result<T, AppError>;

/// A validated non-empty UTF-8 string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NonEmptyString(String);

impl NonEmptyString {
    /// Creates a validated non-empty string.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(AppError::Validation(
                "value must not be empty or whitespace".to_owned(),
            ));
        }

        Ok(Self(value))
    }

    /// Returns the underlying string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<NonEmptyString> for String {
    fn from(value: NonEmptyString) -> Self {
        value.0
    }
}

/// Common application error categories.
#[derive(Debug, Error)]
pub enum AppError {
    /// Invalid input or violated invariant.
    #[error("validation error: {0}")]
    Validation(String),

    /// Form schema is larger than the generation capability accepts.
    #[error(
        "form complexity {actual} exceeds the AI assistance limit of {limit} components; simplify the form and try again"
    )]
    ComplexityExceeded {
        /// Components counted in the submitted schema.
        actual: usize,
        /// Configured soft limit.
        limit: usize,
    },

    /// External capability is not configured or switched off.
    #[error("unavailable: {0}")]
    Unavailable(String),

    /// External capability errored or returned unusable output.
    #[error("generation failed: {0}")]
    Generation(String),

    /// Candidate schema was rejected by the safety checks.
    #[error("safety check failed: {}", .0.join("; "))]
    SafetyCheckFailed(Vec<String>),

    /// External call did not finish within its time budget.
    #[error("timed out: {0}")]
    Timeout(String),

    /// Caller abandoned the operation before it completed.
    #[error("cancelled: {0}")]
    Cancelled(String),

    /// Internal unexpected error.
    #[error("internal error: {0}")]
    Internal(String),
}

#[cfg(test)]
mod tests {
    use super::{AppError, NonEmptyString};

    #[test]
    fn non_empty_string_rejects_whitespace() {
        let result = NonEmptyString::new("   ");
        assert!(result.is_err());
    }

    #[test]
    fn complexity_error_names_both_counts() {
        let message = AppError::ComplexityExceeded {
            actual: 51,
            limit: 50,
        }
        .to_string();
        assert!(message.contains("51"));
        assert!(message.contains("50"));
    }

    #[test]
    fn safety_error_joins_issues() {
        let message =
            AppError::SafetyCheckFailed(vec!["first".to_owned(), "second".to_owned()]).to_string();
        assert_eq!(message, "safety check failed: first; second");
    }
}
