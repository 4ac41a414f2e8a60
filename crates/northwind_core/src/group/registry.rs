//! Group registry.

use super::config::GroupConfig;
use crate::encryption::EncryptionPolicy;
use crate::entity::Entity;
use crate::error::{CoreError, CoreResult};
use crate::mapping::FieldMap;
use parking_lot::RwLock;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;

/// Type-erased view of a registered group.
pub trait RegisteredGroup: Send + Sync {
    /// Group name.
    fn name(&self) -> &str;

    /// Rust type name of the entity.
    fn entity_type(&self) -> &'static str;

    /// Name of the backing collection.
    fn collection_name(&self) -> &str;

    /// Names of the declared indexes.
    fn index_names(&self) -> Vec<String>;

    /// Converts into `Any` for downcasting to the concrete config.
    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;
}

impl<T: Entity> RegisteredGroup for GroupConfig<T> {
    fn name(&self) -> &str {
        &self.name
    }

    fn entity_type(&self) -> &'static str {
        std::any::type_name::<T>()
    }

    fn collection_name(&self) -> &str {
        self.store.collection_name()
    }

    fn index_names(&self) -> Vec<String> {
        self.indexes.iter().map(|i| i.name().to_string()).collect()
    }

    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}

/// Registry of entity groups, keyed by entity type.
///
/// Holds at most one group per entity type; registering again replaces the
/// previous group. The registry also owns the field mapping of every type
/// it has seen, so a mapping frozen by use stays frozen for as long as the
/// registry lives.
///
/// Share it through an `Arc`; all methods take `&self`.
#[derive(Default)]
pub struct GroupRegistry {
    groups: RwLock<HashMap<TypeId, Arc<dyn RegisteredGroup>>>,
    field_maps: RwLock<HashMap<TypeId, Arc<FieldMap>>>,
}

impl GroupRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a group, replacing any earlier group for the same type.
    pub fn register<T: Entity>(&self, config: Arc<GroupConfig<T>>) {
        let name = config.name.clone();
        let previous = self.groups.write().insert(TypeId::of::<T>(), config);
        match previous {
            Some(old) => tracing::warn!(
                entity = std::any::type_name::<T>(),
                previous = old.name(),
                group = %name,
                "group re-registered; replacing previous configuration"
            ),
            None => tracing::info!(
                entity = std::any::type_name::<T>(),
                group = %name,
                "group registered"
            ),
        }
    }

    /// Returns the group registered for `T`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::NotRegistered`] if no group exists for `T`.
    pub fn get<T: Entity>(&self) -> CoreResult<Arc<GroupConfig<T>>> {
        let group = self
            .groups
            .read()
            .get(&TypeId::of::<T>())
            .cloned()
            .ok_or_else(CoreError::not_registered::<T>)?;
        group
            .into_any()
            .downcast::<GroupConfig<T>>()
            .map_err(|_| CoreError::GroupTypeMismatch {
                type_name: std::any::type_name::<T>(),
            })
    }

    /// Returns the encryption policy of the group registered for `T`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::NotRegistered`] if no group exists for `T`.
    pub fn encryption_policy<T: Entity>(&self) -> CoreResult<EncryptionPolicy<T>> {
        Ok(self.get::<T>()?.encryption.clone())
    }

    /// Returns every registered group.
    pub fn all(&self) -> Vec<Arc<dyn RegisteredGroup>> {
        self.groups.read().values().cloned().collect()
    }

    /// Returns true if a group is registered for `T`.
    pub fn contains<T: Entity>(&self) -> bool {
        self.groups.read().contains_key(&TypeId::of::<T>())
    }

    /// Number of registered groups.
    pub fn len(&self) -> usize {
        self.groups.read().len()
    }

    /// Returns true if no group is registered.
    pub fn is_empty(&self) -> bool {
        self.groups.read().is_empty()
    }

    /// Removes every group. Field mappings are kept.
    pub fn clear(&self) {
        self.groups.write().clear();
    }

    /// Returns the field mapping for `T`, creating an identity mapping on
    /// first request.
    pub fn field_map<T: Entity>(&self) -> Arc<FieldMap> {
        if let Some(map) = self.field_maps.read().get(&TypeId::of::<T>()) {
            return Arc::clone(map);
        }
        let mut maps = self.field_maps.write();
        Arc::clone(
            maps.entry(TypeId::of::<T>())
                .or_insert_with(|| Arc::new(FieldMap::for_type::<T>())),
        )
    }
}

impl std::fmt::Debug for GroupRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let groups = self.groups.read();
        let names: Vec<&str> = groups.values().map(|g| g.name()).collect();
        f.debug_struct("GroupRegistry").field("groups", &names).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::Field;
    use crate::field;
    use crate::group::GroupBuilder;
    use crate::options::GroupOptions;
    use northwind_store::InMemoryStore;

    #[derive(Debug, Clone, Default)]
    struct Region {
        id: i64,
    }

    impl Entity for Region {
        fn fields() -> Vec<Field<Self>> {
            vec![field!(Region, id => "Id")]
        }
    }

    #[derive(Debug, Clone, Default)]
    struct Shipper {
        id: i64,
        phone: String,
    }

    impl Entity for Shipper {
        fn fields() -> Vec<Field<Self>> {
            vec![field!(Shipper, id => "Id"), field!(Shipper, phone => "Phone")]
        }
    }

    fn register<T: Entity>(registry: &GroupRegistry, name: &str) -> Arc<GroupConfig<T>> {
        GroupBuilder::<T>::new(name, Arc::new(InMemoryStore::new(name)), GroupOptions::new())
            .unwrap()
            .build(registry)
            .unwrap()
    }

    #[test]
    fn missing_type_is_not_registered() {
        let registry = GroupRegistry::new();
        let err = registry.get::<Region>().unwrap_err();
        assert!(matches!(err, CoreError::NotRegistered { type_name } if type_name.ends_with("Region")));
    }

    #[test]
    fn groups_are_keyed_by_type() {
        let registry = GroupRegistry::new();
        register::<Region>(&registry, "regions");
        register::<Shipper>(&registry, "shippers");

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get::<Region>().unwrap().name(), "regions");
        assert_eq!(registry.get::<Shipper>().unwrap().name(), "shippers");

        let mut names: Vec<String> = registry.all().iter().map(|g| g.name().to_string()).collect();
        names.sort();
        assert_eq!(names, vec!["regions", "shippers"]);
    }

    #[test]
    fn last_registration_wins() {
        let registry = GroupRegistry::new();
        register::<Region>(&registry, "first");
        register::<Region>(&registry, "second");

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get::<Region>().unwrap().name(), "second");
    }

    #[test]
    fn type_erased_view() {
        let registry = GroupRegistry::new();
        GroupBuilder::<Shipper>::new(
            "shippers",
            Arc::new(InMemoryStore::new("shipper_docs")),
            GroupOptions::new(),
        )
        .unwrap()
        .with_index(field!(Shipper, phone => "Phone"), false)
        .build(&registry)
        .unwrap();

        let all = registry.all();
        let group = &all[0];
        assert!(group.entity_type().ends_with("Shipper"));
        assert_eq!(group.collection_name(), "shipper_docs");
        assert_eq!(group.index_names(), vec!["Phone_1".to_string()]);
    }

    #[test]
    fn clear_keeps_field_maps() {
        let registry = GroupRegistry::new();
        let config = register::<Region>(&registry, "regions");
        let _ = config.encode(&Region { id: 1 });

        registry.clear();
        assert!(registry.is_empty());
        assert!(!registry.contains::<Region>());
        assert!(registry.field_map::<Region>().is_frozen());
    }

    #[test]
    fn field_map_is_shared() {
        let registry = GroupRegistry::new();
        let a = registry.field_map::<Region>();
        let b = registry.field_map::<Region>();
        assert!(Arc::ptr_eq(&a, &b));
    }
}
