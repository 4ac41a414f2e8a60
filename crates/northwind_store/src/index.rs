//! Physical index descriptions.

/// An index a store should create on one field.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IndexModel {
    /// Index name; stores treat names as identity.
    pub name: String,
    /// Physical field the index covers (ascending).
    pub key: String,
    /// Whether the index enforces uniqueness.
    pub unique: bool,
}

impl IndexModel {
    /// Creates a non-unique index model.
    pub fn new(name: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            key: key.into(),
            unique: false,
        }
    }

    /// Makes this a unique index.
    #[must_use]
    pub fn unique(mut self, unique: bool) -> Self {
        self.unique = unique;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_model_builder() {
        let model = IndexModel::new("Name_1", "Name").unique(true);
        assert_eq!(model.name, "Name_1");
        assert_eq!(model.key, "Name");
        assert!(model.unique);
    }
}
