//! Update operation.

use crate::entity::{Entity, Field};
use crate::error::{CoreError, CoreResult};
use crate::group::{GroupConfig, GroupRegistry};
use crate::predicate::Predicate;
use crate::result::{self, OperationResult, StatusCode};
use northwind_codec::Value;
use northwind_store::UpdateSpec;

/// An ordered list of field assignments on `T`.
///
/// Assignments are independent and applied in order, so a later assignment
/// to the same field wins. Values are checked against the field's type and
/// encrypted when the update runs.
pub struct Update<T> {
    sets: Vec<(Field<T>, Value)>,
}

impl<T: Entity> Update<T> {
    /// Creates an empty update.
    #[must_use]
    pub fn new() -> Self {
        Self { sets: Vec::new() }
    }

    /// Appends an assignment.
    #[must_use]
    pub fn set(mut self, field: Field<T>, value: impl Into<Value>) -> Self {
        self.sets.push((field, value.into()));
        self
    }

    /// Number of assignments.
    pub fn len(&self) -> usize {
        self.sets.len()
    }

    /// Returns true if there are no assignments.
    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    /// Lowers the assignments to a store update on physical names.
    pub(crate) fn lower(&self, config: &GroupConfig<T>) -> CoreResult<UpdateSpec> {
        let mut spec = UpdateSpec::new();
        for (field, value) in &self.sets {
            let mut scratch = T::default();
            field.set(&mut scratch, value.clone()).map_err(|e| {
                CoreError::invalid_argument(format!(
                    "value for field '{}' does not fit: {e}",
                    field.name()
                ))
            })?;
            let stored = config.encryption().encrypt_value(field.name(), value)?;
            spec = spec.set(config.element_name(field.name()), stored);
        }
        Ok(spec)
    }
}

impl<T: Entity> Default for Update<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for Update<T> {
    fn clone(&self) -> Self {
        Self {
            sets: self.sets.clone(),
        }
    }
}

impl<T> std::fmt::Debug for Update<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.sets.iter().map(|(field, value)| (field.name(), value)))
            .finish()
    }
}

/// Applies `update` to the first entity matching `predicate`.
///
/// With `return_document_state` the post-update entity is fetched, decrypted
/// and returned in `new_data`; otherwise only the matched count decides the
/// outcome and `new_data` stays empty.
///
/// # Errors
///
/// Returns [`CoreError::InvalidArgument`] for an empty update or a value
/// that does not fit its field, [`CoreError::NotRegistered`] if `T` has no
/// group, or a store, codec or encryption error.
pub fn update<T: Entity>(
    registry: &GroupRegistry,
    predicate: &Predicate<T>,
    update: &Update<T>,
) -> CoreResult<OperationResult<T>> {
    if update.is_empty() {
        return Err(CoreError::invalid_argument("update has no assignments"));
    }
    let config = registry.get::<T>()?;
    let spec = update.lower(&config)?;
    let filter = config.lower(predicate);

    if config.options().return_document_state {
        match config.store().find_one_and_update(&filter, &spec, true)? {
            Some(doc) => {
                let entity = config.materialize(&doc)?;
                tracing::debug!(group = config.name(), fields = spec.len(), "document updated");
                Ok(OperationResult::success(
                    result::MSG_UPDATED,
                    StatusCode::UpdateSuccess,
                    Some(entity),
                ))
            }
            None => Ok(OperationResult::not_found()),
        }
    } else {
        let matched = config.store().update_one(&filter, &spec)?;
        if matched == 0 {
            return Ok(OperationResult::not_found());
        }
        tracing::debug!(
            group = config.name(),
            matched,
            fields = spec.len(),
            "document updated"
        );
        Ok(OperationResult::success(
            result::MSG_UPDATED,
            StatusCode::UpdateSuccess,
            None,
        ))
    }
}
