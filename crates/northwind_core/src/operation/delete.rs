//! Delete operation.

use crate::entity::Entity;
use crate::error::{CoreError, CoreResult};
use crate::group::{GroupConfig, GroupRegistry};
use crate::predicate::Predicate;
use crate::result::{self, OperationResult, StatusCode};
use northwind_codec::Value;
use northwind_store::Filter;

/// Deletes the entity whose primary key equals `id`.
///
/// # Errors
///
/// Returns [`CoreError::InvalidArgument`] if the group has no primary key,
/// [`CoreError::NotRegistered`] if `T` has no group, or a store error.
pub fn delete_by_id<T: Entity>(
    registry: &GroupRegistry,
    id: impl Into<Value>,
) -> CoreResult<OperationResult<T>> {
    let config = registry.get::<T>()?;
    let key = config.primary_key().ok_or_else(|| {
        CoreError::invalid_argument(format!(
            "group '{}' has no primary key; use delete_where",
            config.name()
        ))
    })?;
    let filter = config.field_eq(key.name(), id.into());
    delete_one(&config, &filter)
}

/// Deletes the first entity whose `field` equals `value`.
///
/// # Errors
///
/// Returns [`CoreError::InvalidArgument`] if `field` is not declared on `T`,
/// [`CoreError::NotRegistered`] if `T` has no group, or a store error.
pub fn delete_where<T: Entity>(
    registry: &GroupRegistry,
    field: &str,
    value: impl Into<Value>,
) -> CoreResult<OperationResult<T>> {
    let config = registry.get::<T>()?;
    let field = T::field(field).ok_or_else(|| {
        CoreError::invalid_argument(format!(
            "field '{field}' is not declared on {}",
            std::any::type_name::<T>()
        ))
    })?;
    let filter = config.field_eq(field.name(), value.into());
    delete_one(&config, &filter)
}

/// Deletes the first entity matching `predicate`.
///
/// # Errors
///
/// Returns [`CoreError::NotRegistered`] if `T` has no group, or a store
/// error.
pub fn delete_matching<T: Entity>(
    registry: &GroupRegistry,
    predicate: &Predicate<T>,
) -> CoreResult<OperationResult<T>> {
    let config = registry.get::<T>()?;
    let filter = config.lower(predicate);
    delete_one(&config, &filter)
}

fn delete_one<T: Entity>(config: &GroupConfig<T>, filter: &Filter) -> CoreResult<OperationResult<T>> {
    let deleted = config.store().delete_one(filter)?;
    if deleted == 0 {
        return Ok(OperationResult::not_found());
    }
    tracing::debug!(group = config.name(), ?filter, "document deleted");
    Ok(OperationResult::success(
        result::MSG_DELETED,
        StatusCode::DeletionSuccess,
        None,
    ))
}
