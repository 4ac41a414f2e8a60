//! Typed service facade.

use crate::entity::Entity;
use crate::error::CoreResult;
use crate::group::{GroupConfig, GroupRegistry};
use crate::operation::{self, Update};
use crate::predicate::Predicate;
use crate::query::{DeleteQuery, Query, UpdateQuery};
use crate::result::OperationResult;
use northwind_codec::Value;
use std::marker::PhantomData;
use std::sync::Arc;

/// Every operation for one entity type, bound to a registry.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use northwind_core::{field, Entity, Field, GroupBuilder, GroupOptions, GroupRegistry, Service};
/// use northwind_store::InMemoryStore;
///
/// #[derive(Debug, Clone, Default, PartialEq)]
/// struct Tag {
///     id: i64,
///     label: String,
/// }
///
/// impl Entity for Tag {
///     fn fields() -> Vec<Field<Self>> {
///         vec![field!(Tag, id => "Id"), field!(Tag, label => "Label")]
///     }
/// }
///
/// let registry = Arc::new(GroupRegistry::new());
/// GroupBuilder::<Tag>::new("tags", Arc::new(InMemoryStore::new("tags")), GroupOptions::new())
///     .unwrap()
///     .has_primary_key(field!(Tag, id => "Id"))
///     .build(&registry)
///     .unwrap();
///
/// let tags = Service::<Tag>::new(Arc::clone(&registry));
/// tags.create(&Tag { id: 1, label: "rust".into() }).unwrap();
///
/// let found = tags.query().filter(|t| t.label == "rust").to_list().unwrap();
/// assert_eq!(found.len(), 1);
/// assert!(tags.delete_by_id(1i64).unwrap().is_success());
/// ```
pub struct Service<T: Entity> {
    registry: Arc<GroupRegistry>,
    _entity: PhantomData<fn() -> T>,
}

impl<T: Entity> Service<T> {
    /// Binds a service to a registry.
    pub fn new(registry: Arc<GroupRegistry>) -> Self {
        Self {
            registry,
            _entity: PhantomData,
        }
    }

    /// The registry this service resolves groups from.
    pub fn registry(&self) -> &Arc<GroupRegistry> {
        &self.registry
    }

    /// The group currently registered for `T`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::CoreError::NotRegistered`] if `T` has no group.
    pub fn group(&self) -> CoreResult<Arc<GroupConfig<T>>> {
        self.registry.get::<T>()
    }

    /// See [`crate::create`].
    ///
    /// # Errors
    ///
    /// As [`crate::create`].
    pub fn create(&self, entity: &T) -> CoreResult<OperationResult<T>> {
        operation::create(&self.registry, entity)
    }

    /// See [`crate::read`].
    ///
    /// # Errors
    ///
    /// As [`crate::read`].
    pub fn read<F>(&self, predicate: F) -> CoreResult<OperationResult<T>>
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        operation::read(&self.registry, &Predicate::new(predicate))
    }

    /// See [`crate::update`].
    ///
    /// # Errors
    ///
    /// As [`crate::update`].
    pub fn update<F>(&self, predicate: F, update: &Update<T>) -> CoreResult<OperationResult<T>>
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        operation::update(&self.registry, &Predicate::new(predicate), update)
    }

    /// See [`crate::delete_by_id`].
    ///
    /// # Errors
    ///
    /// As [`crate::delete_by_id`].
    pub fn delete_by_id(&self, id: impl Into<Value>) -> CoreResult<OperationResult<T>> {
        operation::delete_by_id(&self.registry, id)
    }

    /// See [`crate::delete_where`].
    ///
    /// # Errors
    ///
    /// As [`crate::delete_where`].
    pub fn delete_where(
        &self,
        field: &str,
        value: impl Into<Value>,
    ) -> CoreResult<OperationResult<T>> {
        operation::delete_where(&self.registry, field, value)
    }

    /// Starts a read query.
    pub fn query(&self) -> Query<T> {
        Query::new(Arc::clone(&self.registry))
    }

    /// Starts an update query.
    pub fn update_query(&self) -> UpdateQuery<T> {
        UpdateQuery::new(Arc::clone(&self.registry))
    }

    /// Starts a delete query.
    pub fn delete_query(&self) -> DeleteQuery<T> {
        DeleteQuery::new(Arc::clone(&self.registry))
    }
}

impl<T: Entity> Clone for Service<T> {
    fn clone(&self) -> Self {
        Self::new(Arc::clone(&self.registry))
    }
}

impl<T: Entity> std::fmt::Debug for Service<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Service")
            .field("entity", &std::any::type_name::<T>())
            .finish_non_exhaustive()
    }
}
