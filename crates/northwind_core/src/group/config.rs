//! Group configuration.

use crate::encryption::EncryptionPolicy;
use crate::entity::{Entity, Field};
use crate::error::CoreResult;
use crate::index::IndexSpec;
use crate::mapping::FieldMap;
use crate::options::GroupOptions;
use crate::predicate::Predicate;
use northwind_codec::{Document, Value};
use northwind_store::{Filter, Store};
use std::fmt;
use std::sync::Arc;

/// The registered configuration of one entity group.
///
/// Immutable once built. Operations resolve it from the registry on every
/// call and route all physical work through its store.
pub struct GroupConfig<T: Entity> {
    pub(crate) name: String,
    pub(crate) primary_key: Option<Field<T>>,
    pub(crate) custom_key_field: Option<String>,
    pub(crate) indexes: Vec<IndexSpec>,
    pub(crate) options: GroupOptions,
    pub(crate) encryption: EncryptionPolicy<T>,
    pub(crate) store: Arc<dyn Store>,
    pub(crate) mapping: Arc<FieldMap>,
}

impl<T: Entity> GroupConfig<T> {
    /// Returns the group name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the primary key field, if declared.
    pub fn primary_key(&self) -> Option<Field<T>> {
        self.primary_key
    }

    /// Returns the custom physical name of the primary key, if set.
    pub fn custom_key_field(&self) -> Option<&str> {
        self.custom_key_field.as_deref()
    }

    /// Returns the declared indexes.
    pub fn indexes(&self) -> &[IndexSpec] {
        &self.indexes
    }

    /// Returns the group options.
    pub fn options(&self) -> GroupOptions {
        self.options
    }

    /// Returns the encryption policy.
    pub fn encryption(&self) -> &EncryptionPolicy<T> {
        &self.encryption
    }

    /// Returns the backing store.
    pub fn store(&self) -> &dyn Store {
        self.store.as_ref()
    }

    /// Returns the field mapping shared by every group of this type.
    pub fn mapping(&self) -> &FieldMap {
        &self.mapping
    }

    /// Physical element name of a logical field.
    pub fn element_name(&self, field: &str) -> String {
        self.mapping.element_name(field)
    }

    pub(crate) fn encode(&self, entity: &T) -> Document {
        self.mapping.encode(entity)
    }

    /// Decodes a stored document and decrypts it.
    pub(crate) fn materialize(&self, doc: &Document) -> CoreResult<T> {
        let stored: T = self.mapping.decode(doc)?;
        self.encryption.decrypt_entity(&stored)
    }

    /// Lowers an entity predicate to a store filter.
    ///
    /// The predicate sees each document decoded through the field mapping and
    /// decrypted, exactly as a read would return it. Documents that fail to
    /// decode or decrypt never match.
    pub(crate) fn lower(&self, predicate: &Predicate<T>) -> Filter {
        let mapping = Arc::clone(&self.mapping);
        let encryption = self.encryption.clone();
        let predicate = predicate.clone();
        Filter::new(move |doc| {
            let Ok(stored) = mapping.decode::<T>(doc) else {
                return false;
            };
            match encryption.decrypt_entity(&stored) {
                Ok(entity) => predicate.test(&entity),
                Err(err) => {
                    tracing::debug!(
                        entity = std::any::type_name::<T>(),
                        error = %err,
                        "skipping document that does not decrypt"
                    );
                    false
                }
            }
        })
    }

    /// Equality filter on a logical field.
    pub(crate) fn field_eq(&self, field: &str, value: Value) -> Filter {
        Filter::eq(self.element_name(field), value)
    }
}

impl<T: Entity> fmt::Debug for GroupConfig<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GroupConfig")
            .field("name", &self.name)
            .field("type", &std::any::type_name::<T>())
            .field("primary_key", &self.primary_key.map(|k| k.name()))
            .field("custom_key_field", &self.custom_key_field)
            .field("indexes", &self.indexes)
            .field("options", &self.options)
            .field("encryption", &self.encryption)
            .field("collection", &self.store.collection_name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field;
    use crate::group::{GroupBuilder, GroupRegistry};
    use northwind_store::InMemoryStore;

    #[derive(Debug, Clone, Default, PartialEq)]
    struct Territory {
        id: i64,
        description: String,
    }

    impl Entity for Territory {
        fn fields() -> Vec<Field<Self>> {
            vec![
                field!(Territory, id => "Id"),
                field!(Territory, description => "Description"),
            ]
        }
    }

    fn config() -> Arc<GroupConfig<Territory>> {
        GroupBuilder::<Territory>::new(
            "territories",
            Arc::new(InMemoryStore::new("territories")),
            GroupOptions::new(),
        )
        .unwrap()
        .build(&GroupRegistry::new())
        .unwrap()
    }

    #[test]
    fn lowered_predicate_matches_decoded_documents() {
        let config = config();
        let filter = config.lower(&Predicate::new(|t: &Territory| t.id == 7));

        assert!(filter.matches(&Document::new().with("Id", 7i64).with("Description", "x")));
        assert!(!filter.matches(&Document::new().with("Id", 8i64)));
    }

    #[test]
    fn undecodable_documents_never_match() {
        let config = config();
        let filter = config.lower(&Predicate::always());
        assert!(!filter.matches(&Document::new().with("Id", "seven")));
    }

    #[test]
    fn lowered_predicate_sees_decrypted_values() {
        let unwrap_tag = |v: &Value| -> CoreResult<Value> {
            match v {
                Value::Text(s) => s
                    .strip_prefix("sealed:")
                    .map(|rest| Value::Text(rest.to_string()))
                    .ok_or_else(|| crate::CoreError::decryption_failed("untagged")),
                other => Ok(other.clone()),
            }
        };
        let add_tag = |v: &Value| -> CoreResult<Value> {
            match v {
                Value::Text(s) => Ok(Value::Text(format!("sealed:{s}"))),
                other => Ok(other.clone()),
            }
        };
        let config = GroupBuilder::<Territory>::new(
            "territories",
            Arc::new(InMemoryStore::new("territories")),
            GroupOptions::new(),
        )
        .unwrap()
        .with_encryption(EncryptionPolicy::new(add_tag, unwrap_tag))
        .build(&GroupRegistry::new())
        .unwrap();

        let filter = config.lower(&Predicate::new(|t: &Territory| t.description == "north"));
        let sealed = Document::new().with("Id", 1i64).with("Description", "sealed:north");
        let plain = Document::new().with("Id", 1i64).with("Description", "north");

        assert!(filter.matches(&sealed));
        assert!(!filter.matches(&plain));
    }

    #[test]
    fn field_eq_uses_physical_name() {
        let config = config();
        let filter = config.field_eq("Id", Value::Integer(1));
        assert!(filter.matches(&Document::new().with("Id", 1i64)));
    }
}
