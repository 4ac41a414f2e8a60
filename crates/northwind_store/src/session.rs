//! Store sessions for transactional writes.

use uuid::Uuid;

/// A handle to an open store transaction.
///
/// Created by [`crate::Store::start_session`] and consumed by
/// [`crate::Store::commit_transaction`] or [`crate::Store::abort_transaction`],
/// so a finished session cannot be reused.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct Session {
    id: Uuid,
}

impl Session {
    /// Creates a session with a fresh identifier.
    ///
    /// Intended for `Store` implementations.
    #[must_use]
    pub fn new() -> Self {
        Self { id: Uuid::new_v4() }
    }

    /// Returns the session identifier.
    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
