//! Index specifications.

use crate::entity::Field;

const ASCENDING_SUFFIX: &str = "_1";

/// An ascending single-field index declared on a group.
///
/// The index name is always `<Field>_1`, the store's conventional name for
/// an ascending index on `Field`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexSpec {
    field: &'static str,
    unique: bool,
    name: String,
}

impl IndexSpec {
    /// Creates an index spec on a logical field name.
    #[must_use]
    pub fn new(field: &'static str, unique: bool) -> Self {
        Self {
            field,
            unique,
            name: format!("{field}{ASCENDING_SUFFIX}"),
        }
    }

    /// Creates an index spec on a declared entity field.
    #[must_use]
    pub fn on<T>(field: Field<T>, unique: bool) -> Self {
        Self::new(field.name(), unique)
    }

    /// Logical field name.
    #[must_use]
    pub fn field(&self) -> &'static str {
        self.field
    }

    /// Whether the index rejects duplicate values.
    #[must_use]
    pub fn is_unique(&self) -> bool {
        self.unique
    }

    /// Index name as stored.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Recovers the field name from an index name by dropping the `_1` suffix.
#[must_use]
pub fn field_of_index(index_name: &str) -> &str {
    index_name
        .strip_suffix(ASCENDING_SUFFIX)
        .unwrap_or(index_name)
}
