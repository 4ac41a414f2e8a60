//! Read query.

use crate::entity::Entity;
use crate::error::CoreResult;
use crate::group::GroupRegistry;
use crate::operation;
use crate::predicate::Predicate;
use std::sync::Arc;

/// A read query over the group of `T`.
///
/// Every entity a terminal method returns has been decrypted.
#[derive(Debug)]
pub struct Query<T: Entity> {
    registry: Arc<GroupRegistry>,
    predicate: Predicate<T>,
}

impl<T: Entity> Query<T> {
    /// Creates a query matching every entity.
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
        self.filter_by(&Predicate::new(predicate))
    }

    /// Like [`filter`](Self::filter), for an existing [`Predicate`].
    #[must_use]
    pub fn filter_by(&self, predicate: &Predicate<T>) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
            predicate: self.predicate.and(predicate),
        }
    }

    /// The composed predicate.
    pub fn predicate(&self) -> &Predicate<T> {
        &self.predicate
    }

    /// Returns every matching entity.
    ///
    /// # Errors
    ///
    /// Returns [`crate::CoreError::NotRegistered`] if `T` has no group, or a
    /// store, codec or decryption error.
    pub fn to_list(&self) -> CoreResult<Vec<T>> {
        operation::find_all(&self.registry, &self.predicate)
    }

    /// Returns the first matching entity, if any.
    ///
    /// # Errors
    ///
    /// As [`to_list`](Self::to_list).
    pub fn first_or_default(&self) -> CoreResult<Option<T>> {
        Ok(operation::read(&self.registry, &self.predicate)?.into_data())
    }

    /// Projects every matching entity.
    ///
    /// # Errors
    ///
    /// As [`to_list`](Self::to_list).
    pub fn select<R, F>(&self, projection: F) -> CoreResult<Vec<R>>
    where
        F: Fn(T) -> R,
    {
        Ok(self.to_list()?.into_iter().map(projection).collect())
    }

    /// Number of matching entities.
    ///
    /// # Errors
    ///
    /// As [`to_list`](Self::to_list).
    pub fn count(&self) -> CoreResult<usize> {
        let config = self.registry.get::<T>()?;
        Ok(config.store().find(&config.lower(&self.predicate))?.len())
    }

    /// Returns true if any entity matches.
    ///
    /// # Errors
    ///
    /// As [`to_list`](Self::to_list).
    pub fn any(&self) -> CoreResult<bool> {
        let config = self.registry.get::<T>()?;
        Ok(config
            .store()
            .find_one(&config.lower(&self.predicate))?
            .is_some())
    }
}

impl<T: Entity> Clone for Query<T> {
    fn clone(&self) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
            predicate: self.predicate.clone(),
        }
    }
}
