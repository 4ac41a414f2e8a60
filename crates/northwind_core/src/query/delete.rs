//! Delete query.

use crate::entity::Entity;
use crate::error::CoreResult;
use crate::group::GroupRegistry;
use crate::operation;
use crate::predicate::Predicate;
use crate::result::OperationResult;
use std::sync::Arc;

/// A delete of the first entity of `T` that matches every filter.
#[derive(Debug)]
pub struct DeleteQuery<T: Entity> {
    registry: Arc<GroupRegistry>,
    predicate: Predicate<T>,
}

impl<T: Entity> DeleteQuery<T> {
    /// Creates a delete query matching every entity.
    pub fn new(registry: Arc<GroupRegistry>) -> Self {
        Self {
            registry,
            predicate: Predicate::always(),
        }
    }

    /// Returns a new query that additionally requires `predicate`.
    #[must_use]
    pub fn filter<F>(&self, predicate: F) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        Self {
            registry: Arc::clone(&self.registry),
            predicate: self.predicate.and(&Predicate::new(predicate)),
        }
    }

    /// Runs the delete.
    ///
    /// # Errors
    ///
    /// As [`crate::delete_matching`].
    pub fn execute(&self) -> CoreResult<OperationResult<T>> {
        operation::delete_matching(&self.registry, &self.predicate)
    }
}

impl<T: Entity> Clone for DeleteQuery<T> {
    fn clone(&self) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
            predicate: self.predicate.clone(),
        }
    }
}
