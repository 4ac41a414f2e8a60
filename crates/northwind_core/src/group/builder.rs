//! Group builder.

use super::config::GroupConfig;
use super::registry::GroupRegistry;
use crate::encryption::EncryptionPolicy;
use crate::entity::{Entity, Field};
use crate::error::{CoreError, CoreResult};
use crate::index::IndexSpec;
use crate::options::GroupOptions;
use northwind_store::{IndexModel, Store};
use std::sync::Arc;

/// Fluent declaration of an entity group.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use northwind_core::{field, Entity, Field, GroupBuilder, GroupOptions, GroupRegistry};
/// use northwind_store::InMemoryStore;
///
/// #[derive(Debug, Clone, Default)]
/// struct Customer {
///     id: i64,
///     email: String,
/// }
///
/// impl Entity for Customer {
///     fn fields() -> Vec<Field<Self>> {
///         vec![field!(Customer, id => "Id"), field!(Customer, email => "Email")]
///     }
/// }
///
/// let registry = GroupRegistry::new();
/// let store = Arc::new(InMemoryStore::new("customers"));
///
/// let group = GroupBuilder::<Customer>::new("customers", store, GroupOptions::new())
///     .unwrap()
///     .has_primary_key(field!(Customer, id => "Id"))
///     .with_index(field!(Customer, email => "Email"), true)
///     .build(&registry)
///     .unwrap();
///
/// assert_eq!(group.indexes()[0].name(), "Email_1");
/// assert!(registry.contains::<Customer>());
/// ```
pub struct GroupBuilder<T: Entity> {
    name: String,
    store: Arc<dyn Store>,
    options: GroupOptions,
    primary_key: Option<Field<T>>,
    custom_key_field: Option<String>,
    indexes: Vec<IndexSpec>,
    encryption: EncryptionPolicy<T>,
}

impl<T: Entity> GroupBuilder<T> {
    /// Starts a group declaration.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidArgument`] if `name` is blank.
    pub fn new(
        name: impl Into<String>,
        store: Arc<dyn Store>,
        options: GroupOptions,
    ) -> CoreResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(CoreError::invalid_argument("group name must not be empty"));
        }
        Ok(Self {
            name,
            store,
            options,
            primary_key: None,
            custom_key_field: None,
            indexes: Vec::new(),
            encryption: EncryptionPolicy::disabled(),
        })
    }

    /// Declares the primary key field.
    #[must_use]
    pub fn has_primary_key(mut self, field: Field<T>) -> Self {
        self.primary_key = Some(field);
        self
    }

    /// Stores the primary key under a different physical element name.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidArgument`] if `name` is blank.
    pub fn with_custom_key_field_name(mut self, name: impl Into<String>) -> CoreResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(CoreError::invalid_argument(
                "custom key field name must not be empty",
            ));
        }
        self.custom_key_field = Some(name);
        Ok(self)
    }

    /// Sets the encryption policy.
    #[must_use]
    pub fn with_encryption(mut self, policy: EncryptionPolicy<T>) -> Self {
        self.encryption = policy;
        self
    }

    /// Declares an ascending index on a field.
    #[must_use]
    pub fn with_index(mut self, field: Field<T>, unique: bool) -> Self {
        self.indexes.push(IndexSpec::on(field, unique));
        self
    }

    /// Finalizes the group: applies the key mapping, creates missing indexes
    /// and registers the group, replacing any earlier one for `T`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidArgument`] if a custom key name was given
    /// without a primary key, or a store error if listing or creating
    /// indexes fails. A failed build leaves the field mapping and the
    /// registry untouched.
    pub fn build(self, registry: &GroupRegistry) -> CoreResult<Arc<GroupConfig<T>>> {
        let mapping = registry.field_map::<T>();

        let key_rename = match &self.custom_key_field {
            Some(custom) => {
                let key = self.primary_key.ok_or_else(|| {
                    CoreError::invalid_argument(
                        "a custom key field name requires a primary key to be declared",
                    )
                })?;
                Some((key.name(), custom.clone()))
            }
            None => None,
        };
        // Index keys use the element names the mapping will have once the
        // rename lands; the mapping itself is only touched after the store
        // calls succeed.
        let element_of = |field: &str| match &key_rename {
            Some((key, custom)) if *key == field && !mapping.is_frozen() => custom.clone(),
            _ => mapping.element_name(field),
        };

        let existing = self.store.list_indexes()?;
        let missing: Vec<IndexModel> = self
            .indexes
            .iter()
            .filter(|spec| !existing.iter().any(|name| name == spec.name()))
            .map(|spec| {
                IndexModel::new(spec.name(), element_of(spec.field())).unique(spec.is_unique())
            })
            .collect();
        if !missing.is_empty() {
            self.store.create_indexes(&missing)?;
            tracing::info!(
                group = %self.name,
                count = missing.len(),
                "created indexes"
            );
        }

        if let Some((key, custom)) = key_rename {
            if !mapping.remap(key, custom.clone()) {
                let current = mapping.element_name(key);
                if current != custom {
                    tracing::warn!(
                        group = %self.name,
                        field = key,
                        current = %current,
                        requested = %custom,
                        "field mapping already in use; custom key field name ignored"
                    );
                }
            }
        }

        let config = Arc::new(GroupConfig {
            name: self.name,
            primary_key: self.primary_key,
            custom_key_field: self.custom_key_field,
            indexes: self.indexes,
            options: self.options,
            encryption: self.encryption,
            store: self.store,
            mapping,
        });
        registry.register(Arc::clone(&config));
        Ok(config)
    }
}

impl<T: Entity> std::fmt::Debug for GroupBuilder<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GroupBuilder")
            .field("name", &self.name)
            .field("collection", &self.store.collection_name())
            .field("primary_key", &self.primary_key.map(|k| k.name()))
            .field("custom_key_field", &self.custom_key_field)
            .field("indexes", &self.indexes)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field;
    use northwind_codec::Document;
    use northwind_store::{InMemoryStore, StoreError};

    #[derive(Debug, Clone, Default, PartialEq)]
    struct Widget {
        id: i64,
        sku: String,
        color: String,
    }

    impl Entity for Widget {
        fn fields() -> Vec<Field<Self>> {
            vec![
                field!(Widget, id => "Id"),
                field!(Widget, sku => "Sku"),
                field!(Widget, color => "Color"),
            ]
        }
    }

    fn id() -> Field<Widget> {
        field!(Widget, id => "Id")
    }

    fn sku() -> Field<Widget> {
        field!(Widget, sku => "Sku")
    }

    fn color() -> Field<Widget> {
        field!(Widget, color => "Color")
    }

    fn builder(store: &Arc<InMemoryStore>) -> GroupBuilder<Widget> {
        let store: Arc<dyn Store> = store.clone();
        GroupBuilder::new("widgets", store, GroupOptions::new()).unwrap()
    }

    #[test]
    fn blank_name_rejected() {
        let store: Arc<dyn Store> = Arc::new(InMemoryStore::new("w"));
        let err = GroupBuilder::<Widget>::new("  ", store, GroupOptions::new()).unwrap_err();
        assert!(matches!(err, CoreError::InvalidArgument { .. }));
    }

    #[test]
    fn blank_custom_key_rejected() {
        let store = Arc::new(InMemoryStore::new("w"));
        let err = builder(&store).with_custom_key_field_name("").unwrap_err();
        assert!(matches!(err, CoreError::InvalidArgument { .. }));
    }

    #[test]
    fn custom_key_without_primary_key_rejected() {
        let registry = GroupRegistry::new();
        let store = Arc::new(InMemoryStore::new("w"));
        let err = builder(&store)
            .with_custom_key_field_name("_id")
            .unwrap()
            .build(&registry)
            .unwrap_err();
        assert!(matches!(err, CoreError::InvalidArgument { .. }));
        assert!(!registry.contains::<Widget>());
    }

    #[test]
    fn build_creates_missing_indexes_only() {
        let registry = GroupRegistry::new();
        let store = Arc::new(InMemoryStore::new("w"));
        store
            .create_indexes(&[IndexModel::new("Sku_1", "Sku").unique(true)])
            .unwrap();

        builder(&store)
            .with_index(sku(), true)
            .with_index(color(), false)
            .build(&registry)
            .unwrap();

        let names: Vec<String> = store.indexes().into_iter().map(|i| i.name).collect();
        assert_eq!(names, vec!["Sku_1".to_string(), "Color_1".to_string()]);
    }

    #[test]
    fn custom_key_renames_element() {
        let registry = GroupRegistry::new();
        let store = Arc::new(InMemoryStore::new("w"));
        let group = builder(&store)
            .has_primary_key(id())
            .with_custom_key_field_name("_id")
            .unwrap()
            .build(&registry)
            .unwrap();

        assert_eq!(group.element_name("Id"), "_id");
        let doc = group.encode(&Widget::default());
        assert!(doc.contains("_id"));
        assert!(!doc.contains("Id"));
    }

    #[test]
    fn frozen_mapping_skips_remap() {
        let registry = GroupRegistry::new();
        let store = Arc::new(InMemoryStore::new("w"));
        let first = builder(&store).has_primary_key(id()).build(&registry).unwrap();
        let _ = first.encode(&Widget::default());

        let second = builder(&store)
            .has_primary_key(id())
            .with_custom_key_field_name("_id")
            .unwrap()
            .build(&registry)
            .unwrap();

        assert_eq!(second.element_name("Id"), "Id");
        assert_eq!(second.custom_key_field(), Some("_id"));
    }

    #[test]
    fn rebuild_replaces_registration() {
        let registry = GroupRegistry::new();
        let store = Arc::new(InMemoryStore::new("w"));
        builder(&store).build(&registry).unwrap();

        let store: Arc<dyn Store> = store;
        GroupBuilder::<Widget>::new("widgets-v2", store, GroupOptions::new())
            .unwrap()
            .build(&registry)
            .unwrap();

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get::<Widget>().unwrap().name(), "widgets-v2");
    }

    #[test]
    fn index_over_existing_duplicates_fails_build() {
        let registry = GroupRegistry::new();
        let store = Arc::new(InMemoryStore::with_documents(
            "w",
            vec![
                Document::new().with("Id", 1i64).with("Sku", "a"),
                Document::new().with("Id", 2i64).with("Sku", "a"),
            ],
        ));

        let err = builder(&store).with_index(sku(), true).build(&registry).unwrap_err();
        assert!(matches!(err, CoreError::Store(StoreError::DuplicateKey { .. })));
    }

    #[test]
    fn failed_build_leaves_mapping_alone() {
        let registry = GroupRegistry::new();
        let store = Arc::new(InMemoryStore::with_documents(
            "w",
            vec![
                Document::new().with("Id", 1i64).with("Sku", "a"),
                Document::new().with("Id", 2i64).with("Sku", "a"),
            ],
        ));

        let result = builder(&store)
            .has_primary_key(id())
            .with_custom_key_field_name("_id")
            .unwrap()
            .with_index(sku(), true)
            .build(&registry);

        assert!(result.is_err());
        assert!(!registry.contains::<Widget>());
        assert_eq!(registry.field_map::<Widget>().element_name("Id"), "Id");
    }

    #[test]
    fn index_on_renamed_key_uses_new_element() {
        let registry = GroupRegistry::new();
        let store = Arc::new(InMemoryStore::new("w"));
        builder(&store)
            .has_primary_key(id())
            .with_custom_key_field_name("_id")
            .unwrap()
            .with_index(id(), true)
            .build(&registry)
            .unwrap();

        let keys: Vec<String> = store.indexes().into_iter().map(|i| i.key).collect();
        assert_eq!(keys, vec!["_id".to_string()]);
    }
}
