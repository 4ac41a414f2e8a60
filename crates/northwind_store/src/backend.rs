//! Store trait definition.

use crate::error::StoreResult;
use crate::filter::Filter;
use crate::index::IndexModel;
use crate::session::Session;
use crate::update::UpdateSpec;
use northwind_codec::Document;

/// A handle to one physical document collection.
///
/// This is the boundary to the document database driver. Northwind never
/// interprets how documents are persisted; it only issues these calls.
///
/// # Invariants
///
/// - `insert_one`, `update_one` and `find_one_and_update` fail with
///   [`crate::StoreError::DuplicateKey`] when a unique index would be violated
/// - `update_one` returns the matched count, `delete_one` the deleted count;
///   both are 0 or 1
/// - writes issued with a session are not visible until the session commits
/// - implementations must be `Send + Sync` for concurrent access
///
/// # Implementors
///
/// - [`super::InMemoryStore`] - For testing and ephemeral data
pub trait Store: Send + Sync {
    /// Name of the collection, for diagnostics.
    fn collection_name(&self) -> &str;

    /// Returns the first document matching `filter`.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver fails.
    fn find_one(&self, filter: &Filter) -> StoreResult<Option<Document>>;

    /// Returns every document matching `filter`, in store order.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver fails.
    fn find(&self, filter: &Filter) -> StoreResult<Vec<Document>>;

    /// Inserts a document, inside `session`'s transaction when given.
    ///
    /// # Errors
    ///
    /// Returns [`crate::StoreError::DuplicateKey`] on a unique-index violation,
    /// or another error if the driver fails.
    fn insert_one(&self, doc: Document, session: Option<&Session>) -> StoreResult<()>;

    /// Applies `update` to the first document matching `filter`.
    ///
    /// Returns the number of matched documents.
    ///
    /// # Errors
    ///
    /// Returns an error if the update violates a unique index or the driver
    /// fails.
    fn update_one(&self, filter: &Filter, update: &UpdateSpec) -> StoreResult<u64>;

    /// Atomically applies `update` to the first match and returns it.
    ///
    /// With `return_after` the post-update document is returned, otherwise the
    /// pre-update one. `None` when nothing matched.
    ///
    /// # Errors
    ///
    /// Returns an error if the update violates a unique index or the driver
    /// fails.
    fn find_one_and_update(
        &self,
        filter: &Filter,
        update: &UpdateSpec,
        return_after: bool,
    ) -> StoreResult<Option<Document>>;

    /// Deletes the first document matching `filter`.
    ///
    /// Returns the number of deleted documents.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver fails.
    fn delete_one(&self, filter: &Filter) -> StoreResult<u64>;

    /// Lists the names of existing indexes.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver fails.
    fn list_indexes(&self) -> StoreResult<Vec<String>>;

    /// Creates all given indexes in one call.
    ///
    /// # Errors
    ///
    /// Returns an error if an index cannot be built, for example a unique
    /// index over existing duplicate values.
    fn create_indexes(&self, models: &[IndexModel]) -> StoreResult<()>;

    /// Starts a session with an open transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver cannot start a transaction.
    fn start_session(&self) -> StoreResult<Session>;

    /// Commits the session's transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the session is unknown or the commit fails; in that
    /// case none of the session's writes are applied.
    fn commit_transaction(&self, session: Session) -> StoreResult<()>;

    /// Discards the session's transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the session is unknown.
    fn abort_transaction(&self, session: Session) -> StoreResult<()>;
}
