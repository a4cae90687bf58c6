//! Error types for form sessions.

/// Errors that can occur when editing a form session.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    /// The edited row does not exist.
    #[error("row {index} out of range (form has {len} rows)")]
    RowOutOfRange { index: usize, len: usize },

    /// No row carries the given id.
    #[error("no row with id {id}")]
    UnknownRow { id: usize },

    /// An operator or combinator edit on a form that hides those controls.
    #[error("logical conditions are disabled for form '{label}'")]
    LogicalConditionsDisabled { label: String },
}

impl FormError {
    pub(crate) fn out_of_range(index: usize, len: usize) -> Self {
        Self::RowOutOfRange { index, len }
    }
}

/// Result type for form operations.
pub type Result<T> = std::result::Result<T, FormError>;
