//! Logical-to-physical field mapping.

use crate::entity::Entity;
use northwind_codec::{CodecResult, Document};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

/// Field-name mapping for one entity type.
///
/// Every logical field maps to an identically named physical element unless
/// remapped. The mapping can be changed until it is first used to encode or
/// decode a document; from then on it is frozen for the life of the process.
#[derive(Debug)]
pub struct FieldMap {
    type_name: &'static str,
    renames: RwLock<HashMap<&'static str, String>>,
    frozen: AtomicBool,
}

impl FieldMap {
    /// Creates an identity mapping for `T`.
    pub fn for_type<T: Entity>() -> Self {
        Self {
            type_name: std::any::type_name::<T>(),
            renames: RwLock::new(HashMap::new()),
            frozen: AtomicBool::new(false),
        }
    }

    /// Rust type name of the mapped entity.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Physical element name for a logical field.
    #[must_use]
    pub fn element_name(&self, field: &str) -> String {
        self.renames
            .read()
            .get(field)
            .cloned()
            .unwrap_or_else(|| field.to_string())
    }

    /// Returns true once the mapping has been used.
    #[must_use]
    pub fn is_frozen(&self) -> bool {
        self.frozen.load(Ordering::Acquire)
    }

    /// Freezes the mapping; later remaps are refused.
    pub fn freeze(&self) {
        self.frozen.store(true, Ordering::Release);
    }

    /// Maps `field` to the physical name `element`.
    ///
    /// Returns false, leaving the mapping untouched, if it is already frozen.
    pub fn remap(&self, field: &'static str, element: impl Into<String>) -> bool {
        let mut renames = self.renames.write();
        if self.is_frozen() {
            return false;
        }
        renames.insert(field, element.into());
        true
    }

    /// Encodes an entity into a document keyed by physical names.
    ///
    /// Freezes the mapping.
    pub fn encode<T: Entity>(&self, entity: &T) -> Document {
        self.freeze();
        let renames = self.renames.read();
        T::fields()
            .into_iter()
            .map(|f| {
                let element = renames
                    .get(f.name())
                    .cloned()
                    .unwrap_or_else(|| f.name().to_string());
                (element, f.get(entity))
            })
            .collect()
    }

    /// Decodes a document back into an entity.
    ///
    /// Fields missing from the document keep their default value. Freezes
    /// the mapping.
    ///
    /// # Errors
    ///
    /// Returns a codec error if a stored value has the wrong kind for its
    /// field.
    pub fn decode<T: Entity>(&self, doc: &Document) -> CodecResult<T> {
        self.freeze();
        let renames = self.renames.read();
        let mut entity = T::default();
        for field in T::fields() {
            let element = renames.get(field.name()).map_or(field.name(), String::as_str);
            if let Some(value) = doc.get(element) {
                field.set(&mut entity, value.clone())?;
            }
        }
        Ok(entity)
    }
}
