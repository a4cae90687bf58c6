//! Error types for the query crate.
//!
//! Compilation itself never fails; these errors only come from parsing the
//! textual tokens a form layer uses for types and operators.

use thiserror::Error;

/// Errors that can occur when reading field rules from their textual form.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// A token did not name any variant of the expected enum.
    #[error("unknown {kind} '{token}'")]
    UnknownToken { kind: &'static str, token: String },
}

impl QueryError {
    pub(crate) fn unknown(kind: &'static str, token: &str) -> Self {
        Self::UnknownToken {
            kind,
            token: token.to_string(),
        }
    }
}

/// Result type for query operations.
pub type Result<T> = std::result::Result<T, QueryError>;
