//! Group options.

use serde::{Deserialize, Serialize};

/// Behavioral options for an entity group.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupOptions {
    /// Whether creates run inside a store transaction.
    pub use_transactions: bool,

    /// Whether results carry the entity after the write.
    pub return_document_state: bool,
}

impl GroupOptions {
    /// Creates options with default values (both flags off).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether creates run inside a transaction.
    #[must_use]
    pub const fn use_transactions(mut self, value: bool) -> Self {
        self.use_transactions = value;
        self
    }

    /// Sets whether results carry the written entity.
    #[must_use]
    pub const fn return_document_state(mut self, value: bool) -> Self {
        self.return_document_state = value;
        self
    }
}
