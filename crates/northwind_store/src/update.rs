//! Field-assignment update specifications.

use northwind_codec::{Document, Value};

/// A single `field = value` assignment.
#[derive(Debug, Clone, PartialEq)]
pub struct SetField {
    /// Physical field name.
    pub field: String,
    /// New value.
    pub value: Value,
}

/// An ordered list of field assignments applied to one document.
///
/// Assignments accumulate: setting two different fields yields two
/// independent updates. Setting the same field twice keeps the later value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateSpec {
    sets: Vec<SetField>,
}

impl UpdateSpec {
    /// Creates an empty update.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an assignment.
    #[must_use]
    pub fn set(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.sets.push(SetField {
            field: field.into(),
            value: value.into(),
        });
        self
    }

    /// Applies the assignments, in order, to `doc`.
    pub fn apply(&self, doc: &mut Document) {
        for set in &self.sets {
            doc.insert(set.field.clone(), set.value.clone());
        }
    }

    /// Number of assignments.
    pub fn len(&self) -> usize {
        self.sets.len()
    }

    /// Returns true if there are no assignments.
    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sets_accumulate() {
        let update = UpdateSpec::new().set("Name", "y").set("Age", 3i64);
        let mut doc = Document::new().with("Id", 1i64).with("Name", "x");

        update.apply(&mut doc);

        assert_eq!(doc.get("Id"), Some(&Value::Integer(1)));
        assert_eq!(doc.get("Name"), Some(&Value::Text("y".into())));
        assert_eq!(doc.get("Age"), Some(&Value::Integer(3)));
    }

    #[test]
    fn later_set_wins_for_same_field() {
        let update = UpdateSpec::new().set("Name", "a").set("Name", "b");
        let mut doc = Document::new();
        update.apply(&mut doc);
        assert_eq!(doc.get("Name"), Some(&Value::Text("b".into())));
    }
}
