//! Create operation.

use crate::entity::Entity;
use crate::error::CoreResult;
use crate::group::{GroupConfig, GroupRegistry};
use crate::index::field_of_index;
use crate::result::{self, OperationResult, StatusCode};
use northwind_codec::Document;
use northwind_store::{Store, StoreResult};

/// Inserts a new entity.
///
/// The entity is first encrypted (if the group has a policy). Every unique
/// index of the group is then checked against the value as it will be
/// stored; a hit fails with [`StatusCode::UniqueIndexViolation`] without
/// writing. Otherwise the entity is encoded and inserted, inside a
/// transaction when the group asks for one. A store-level unique violation
/// fails with [`StatusCode::DuplicateKey`].
///
/// On success `new_data` carries the plaintext entity if the group returns
/// document state.
///
/// # Errors
///
/// Returns [`crate::CoreError::NotRegistered`] if `T` has no group, or any
/// store, codec or encryption error other than a duplicate key.
pub fn create<T: Entity>(registry: &GroupRegistry, entity: &T) -> CoreResult<OperationResult<T>> {
    let config = registry.get::<T>()?;
    let stored = config.encryption().encrypt_entity(entity)?;

    if let Some(field) = unique_conflict(&config, &stored)? {
        tracing::debug!(group = config.name(), field, "unique pre-check rejected create");
        return Ok(OperationResult::failure(
            result::unique_violation_message(field),
            StatusCode::UniqueIndexViolation,
        ));
    }

    let doc = config.encode(&stored);

    let inserted = if config.options().use_transactions {
        insert_in_transaction(config.store(), doc)
    } else {
        config.store().insert_one(doc, None)
    };

    match inserted {
        Ok(()) => {
            tracing::debug!(group = config.name(), "document created");
            let new_data = config
                .options()
                .return_document_state
                .then(|| entity.clone());
            Ok(OperationResult::success(
                result::MSG_CREATED,
                StatusCode::CreationSuccess,
                new_data,
            ))
        }
        Err(err) if err.is_duplicate_key() => {
            tracing::debug!(group = config.name(), error = %err, "store rejected duplicate key");
            Ok(OperationResult::failure(
                result::MSG_DUPLICATE_KEY,
                StatusCode::DuplicateKey,
            ))
        }
        Err(err) => Err(err.into()),
    }
}

/// Returns the first unique field whose stored value already exists.
fn unique_conflict<T: Entity>(
    config: &GroupConfig<T>,
    stored: &T,
) -> CoreResult<Option<&'static str>> {
    for spec in config.indexes().iter().filter(|s| s.is_unique()) {
        let Some(field) = T::field(field_of_index(spec.name())) else {
            continue;
        };
        let filter = config.field_eq(field.name(), field.get(stored));
        if config.store().find_one(&filter)?.is_some() {
            return Ok(Some(field.name()));
        }
    }
    Ok(None)
}

fn insert_in_transaction(store: &dyn Store, doc: Document) -> StoreResult<()> {
    let session = store.start_session()?;
    match store.insert_one(doc, Some(&session)) {
        Ok(()) => store.commit_transaction(session),
        Err(err) => {
            if let Err(abort_err) = store.abort_transaction(session) {
                tracing::warn!(error = %abort_err, "failed to abort transaction");
            }
            Err(err)
        }
    }
}
