//! Document filters.

use northwind_codec::{Document, Value};
use std::fmt;
use std::sync::Arc;

/// A predicate over stored documents.
///
/// Filters are opaque functions rather than syntax trees. Composition happens
/// before lowering, on typed predicates, so a filter is built once per call.
#[derive(Clone)]
pub struct Filter {
    test: Arc<dyn Fn(&Document) -> bool + Send + Sync>,
    label: Arc<str>,
}

impl Filter {
    /// Wraps an arbitrary document predicate.
    pub fn new<F>(test: F) -> Self
    where
        F: Fn(&Document) -> bool + Send + Sync + 'static,
    {
        Self {
            test: Arc::new(test),
            label: Arc::from("custom"),
        }
    }

    /// Matches documents whose `field` equals `value`.
    ///
    /// An absent field compares equal to [`Value::Null`].
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        let field = field.into();
        let value = value.into();
        let label = format!("{field} == {value:?}");
        Self {
            test: Arc::new(move |doc| doc.get(&field).unwrap_or(&Value::Null) == &value),
            label: Arc::from(label),
        }
    }

    /// Evaluates the filter against a document.
    pub fn matches(&self, doc: &Document) -> bool {
        (self.test)(doc)
    }
}

impl fmt::Debug for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Filter").field(&self.label).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(id: i64, name: &str) -> Document {
        Document::new().with("Id", id).with("Name", name)
    }

    #[test]
    fn eq_matches_field() {
        let f = Filter::eq("Name", "x");
        assert!(f.matches(&doc(1, "x")));
        assert!(!f.matches(&doc(1, "y")));
    }

    #[test]
    fn eq_null_matches_missing() {
        let f = Filter::eq("Missing", Value::Null);
        assert!(f.matches(&doc(1, "x")));
    }

    #[test]
    fn debug_shows_label() {
        let f = Filter::eq("Id", 1i64);
        assert!(format!("{f:?}").contains("Id == Integer(1)"));
    }
}
