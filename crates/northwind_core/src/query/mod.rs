//! Fluent query builders.
//!
//! [`Query`], [`UpdateQuery`] and [`DeleteQuery`] are immutable: every
//! `filter` or `set` call returns a new builder and leaves the original
//! usable. Filters are AND-composed onto [`Predicate::always`](crate::Predicate::always).

mod delete;
mod read;
mod update;

pub use delete::DeleteQuery;
pub use read::Query;
pub use update::UpdateQuery;
