//! Read operation.

use crate::entity::Entity;
use crate::error::CoreResult;
use crate::group::GroupRegistry;
use crate::predicate::Predicate;
use crate::result::{self, OperationResult, StatusCode};

/// Reads the first entity matching `predicate`.
///
/// The entity is decrypted before it is returned. `new_data` is always
/// populated on success, regardless of the group's options.
///
/// # Errors
///
/// Returns [`crate::CoreError::NotRegistered`] if `T` has no group, or a
/// store, codec or decryption error.
pub fn read<T: Entity>(
    registry: &GroupRegistry,
    predicate: &Predicate<T>,
) -> CoreResult<OperationResult<T>> {
    let config = registry.get::<T>()?;
    match config.store().find_one(&config.lower(predicate))? {
        Some(doc) => {
            let entity = config.materialize(&doc)?;
            tracing::debug!(group = config.name(), "document read");
            Ok(OperationResult::success(
                result::MSG_READ,
                StatusCode::ReadSuccess,
                Some(entity),
            ))
        }
        None => Ok(OperationResult::not_found()),
    }
}

/// Returns every entity matching `predicate`, decrypted, in store order.
///
/// # Errors
///
/// Returns [`crate::CoreError::NotRegistered`] if `T` has no group, or a
/// store, codec or decryption error.
pub fn find_all<T: Entity>(registry: &GroupRegistry, predicate: &Predicate<T>) -> CoreResult<Vec<T>> {
    let config = registry.get::<T>()?;
    let docs = config.store().find(&config.lower(predicate))?;
    tracing::debug!(group = config.name(), count = docs.len(), "documents fetched");
    docs.iter().map(|doc| config.materialize(doc)).collect()
}
