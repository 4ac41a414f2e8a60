//! Entity predicates.

use std::fmt;
use std::sync::Arc;

/// A boolean test over an entity.
///
/// Predicates are cheap to clone and compose with [`and`](Self::and); the
/// fluent builders start from [`always`](Self::always) and AND every
/// `filter` call onto it.
pub struct Predicate<T> {
    test: Arc<dyn Fn(&T) -> bool + Send + Sync>,
}

impl<T: 'static> Predicate<T> {
    /// Wraps a closure.
    pub fn new<F>(test: F) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        Self {
            test: Arc::new(test),
        }
    }

    /// A predicate that matches every entity.
    #[must_use]
    pub fn always() -> Self {
        Self {
            test: Arc::new(|_| true),
        }
    }

    /// Returns a predicate that holds when both `self` and `other` hold on
    /// the same entity.
    #[must_use]
    pub fn and(&self, other: &Predicate<T>) -> Self {
        let a = Arc::clone(&self.test);
        let b = Arc::clone(&other.test);
        Self {
            test: Arc::new(move |entity| a(entity) && b(entity)),
        }
    }

    /// Evaluates the predicate.
    pub fn test(&self, entity: &T) -> bool {
        (self.test)(entity)
    }
}

impl<T> Clone for Predicate<T> {
    fn clone(&self) -> Self {
        Self {
            test: Arc::clone(&self.test),
        }
    }
}

impl<T: 'static> Default for Predicate<T> {
    fn default() -> Self {
        Self::always()
    }
}

impl<T> fmt::Debug for Predicate<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Predicate(..)")
    }
}
