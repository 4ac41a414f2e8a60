//! Operation results.

use serde::Serialize;
use std::fmt;

/// Outcome of an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ResultState {
    /// The operation did what was asked.
    Success,
    /// The operation was refused or matched nothing.
    Failure,
}

/// Machine-readable status of an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StatusCode {
    /// A document was inserted.
    CreationSuccess,
    /// A document was found.
    ReadSuccess,
    /// A document was modified.
    UpdateSuccess,
    /// A document was removed.
    DeletionSuccess,
    /// The pre-check found an existing value for a unique field.
    UniqueIndexViolation,
    /// The store rejected the insert on a unique index.
    DuplicateKey,
    /// Nothing matched the condition.
    NotFound,
}

impl StatusCode {
    /// Wire name of the status code.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CreationSuccess => "CREATION_SUCCESS",
            Self::ReadSuccess => "READ_SUCCESS",
            Self::UpdateSuccess => "UPDATE_SUCCESS",
            Self::DeletionSuccess => "DELETION_SUCCESS",
            Self::UniqueIndexViolation => "UNIQUE_INDEX_VIOLATION",
            Self::DuplicateKey => "DUPLICATE_KEY",
            Self::NotFound => "NOT_FOUND",
        }
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub(crate) const MSG_CREATED: &str = "Document created successfully";
pub(crate) const MSG_DUPLICATE_KEY: &str = "Duplicate key error";
pub(crate) const MSG_NOT_FOUND: &str = "No document found matching the specified condition";
pub(crate) const MSG_READ: &str = "Document read successfully";
pub(crate) const MSG_UPDATED: &str = "Document updated successfully";
pub(crate) const MSG_DELETED: &str = "Document deleted successfully";

pub(crate) fn unique_violation_message(field: &str) -> String {
    format!("Creation violates the unique index definition for field '{field}'")
}

/// The value every operation returns for expected outcomes.
///
/// Failures here are business outcomes (nothing matched, a uniqueness
/// clash); genuine errors come back as [`crate::CoreError`] instead.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OperationResult<T> {
    /// Success or failure.
    pub state: ResultState,
    /// Human-readable message.
    pub message: String,
    /// Machine-readable status.
    pub status_code: StatusCode,
    /// Entity before the operation. No operation fills it yet.
    pub old_data: Option<T>,
    /// Entity after the operation, when requested.
    pub new_data: Option<T>,
}

impl<T> OperationResult<T> {
    /// Creates a successful result.
    pub fn success(message: impl Into<String>, status_code: StatusCode, new_data: Option<T>) -> Self {
        Self {
            state: ResultState::Success,
            message: message.into(),
            status_code,
            old_data: None,
            new_data,
        }
    }

    /// Creates a failed result.
    pub fn failure(message: impl Into<String>, status_code: StatusCode) -> Self {
        Self {
            state: ResultState::Failure,
            message: message.into(),
            status_code,
            old_data: None,
            new_data: None,
        }
    }

    pub(crate) fn not_found() -> Self {
        Self::failure(MSG_NOT_FOUND, StatusCode::NotFound)
    }

    /// Returns true if the operation succeeded.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.state == ResultState::Success
    }

    /// Consumes the result, returning the post-operation entity if any.
    pub fn into_data(self) -> Option<T> {
        self.new_data
    }
}
