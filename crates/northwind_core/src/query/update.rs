//! Update query.

use crate::entity::{Entity, Field};
use crate::error::{CoreError, CoreResult};
use crate::group::GroupRegistry;
use crate::operation::{self, Update};
use crate::predicate::Predicate;
use crate::result::OperationResult;
use northwind_codec::Value;
use std::sync::Arc;

/// An update over the first entity of `T` that matches every filter.
#[derive(Debug)]
pub struct UpdateQuery<T: Entity> {
    registry: Arc<GroupRegistry>,
    predicate: Predicate<T>,
    update: Update<T>,
}

impl<T: Entity> UpdateQuery<T> {
    /// Creates an update query matching every entity with no assignments.
    pub fn new(registry: Arc<GroupRegistry>) -> Self {
        Self {
            registry,
            predicate: Predicate::always(),
            update: Update::new(),
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
            update: self.update.clone(),
        }
    }

    /// Returns a new query with one more assignment.
    ///
    /// The value is encrypted under the group's policy when the query runs.
    #[must_use]
    pub fn set(&self, field: Field<T>, value: impl Into<Value>) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
            predicate: self.predicate.clone(),
            update: self.update.clone().set(field, value),
        }
    }

    /// Runs the update.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidArgument`] if no assignment was added,
    /// otherwise as [`crate::update`].
    pub fn execute(&self) -> CoreResult<OperationResult<T>> {
        if self.update.is_empty() {
            return Err(CoreError::invalid_argument(
                "update query has no assignments; call set before execute",
            ));
        }
        operation::update(&self.registry, &self.predicate, &self.update)
    }
}

impl<T: Entity> Clone for UpdateQuery<T> {
    fn clone(&self) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
            predicate: self.predicate.clone(),
            update: self.update.clone(),
        }
    }
}
