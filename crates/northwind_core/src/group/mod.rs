//! Entity groups.
//!
//! A group binds one entity type to one collection: its name, primary key,
//! optional custom key element name, declared indexes, options and
//! encryption policy. Groups are declared with a [`GroupBuilder`] and
//! looked up by entity type through a [`GroupRegistry`].

mod builder;
mod config;
mod registry;

pub use builder::GroupBuilder;
pub use config::GroupConfig;
pub use registry::{GroupRegistry, RegisteredGroup};
