//! Error types for store operations.

use thiserror::Error;
use uuid::Uuid;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors a store can raise.
///
/// [`StoreError::DuplicateKey`] is the one condition callers are expected to
/// recognise; everything else is treated as a driver failure.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A write would violate a unique index.
    #[error("duplicate key on index {index}: {key}")]
    DuplicateKey {
        /// Name of the violated index.
        index: String,
        /// Rendered key value.
        key: String,
    },

    /// The session is unknown or has already finished.
    #[error("session not found: {0}")]
    SessionNotFound(Uuid),

    /// The transaction could not be committed.
    #[error("transaction aborted: {reason}")]
    TransactionAborted {
        /// Reason for abort.
        reason: String,
    },

    /// The store is closed.
    #[error("store is closed")]
    Closed,
}

impl StoreError {
    /// Creates a duplicate key error.
    pub fn duplicate_key(index: impl Into<String>, key: impl Into<String>) -> Self {
        Self::DuplicateKey {
            index: index.into(),
            key: key.into(),
        }
    }

    /// Creates a transaction aborted error.
    pub fn transaction_aborted(reason: impl Into<String>) -> Self {
        Self::TransactionAborted {
            reason: reason.into(),
        }
    }

    /// Returns true if this is a unique-index violation.
    #[must_use]
    pub fn is_duplicate_key(&self) -> bool {
        matches!(self, Self::DuplicateKey { .. })
    }
}
