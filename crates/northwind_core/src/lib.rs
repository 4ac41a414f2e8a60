//! # Northwind Core
//!
//! Typed data access over a document store.
//!
//! This crate provides:
//! - Entity groups: one entity type bound to one collection, with a primary
//!   key, optional custom key element name, indexes and options
//! - A registry resolving groups by entity type
//! - Create, read, update and delete operations returning [`OperationResult`]
//! - Immutable fluent builders ([`Query`], [`UpdateQuery`], [`DeleteQuery`])
//!   with AND-composed predicates
//! - Transparent field-level encryption through an [`EncryptionPolicy`]
//!
//! Storage itself is behind the [`northwind_store::Store`] trait.
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use northwind_core::{
//!     field, Entity, Field, GroupBuilder, GroupOptions, GroupRegistry, Service, StatusCode,
//! };
//! use northwind_store::InMemoryStore;
//!
//! #[derive(Debug, Clone, Default, PartialEq)]
//! struct Supplier {
//!     id: i64,
//!     name: String,
//! }
//!
//! impl Entity for Supplier {
//!     fn fields() -> Vec<Field<Self>> {
//!         vec![field!(Supplier, id => "Id"), field!(Supplier, name => "Name")]
//!     }
//! }
//!
//! let registry = Arc::new(GroupRegistry::new());
//! GroupBuilder::<Supplier>::new(
//!     "suppliers",
//!     Arc::new(InMemoryStore::new("suppliers")),
//!     GroupOptions::new().return_document_state(true),
//! )
//! .unwrap()
//! .has_primary_key(field!(Supplier, id => "Id"))
//! .with_index(field!(Supplier, name => "Name"), true)
//! .build(&registry)
//! .unwrap();
//!
//! let suppliers = Service::<Supplier>::new(registry);
//! let created = suppliers.create(&Supplier { id: 1, name: "Exotic Liquids".into() }).unwrap();
//! assert_eq!(created.status_code, StatusCode::CreationSuccess);
//!
//! let clash = suppliers.create(&Supplier { id: 2, name: "Exotic Liquids".into() }).unwrap();
//! assert_eq!(clash.status_code, StatusCode::UniqueIndexViolation);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod crypto;
mod encryption;
mod entity;
mod error;
mod group;
mod index;
mod mapping;
mod operation;
mod options;
mod predicate;
mod query;
mod result;
mod service;

pub use encryption::EncryptionPolicy;
pub use entity::{Entity, Field};
pub use error::{CoreError, CoreResult};
pub use group::{GroupBuilder, GroupConfig, GroupRegistry, RegisteredGroup};
pub use index::{field_of_index, IndexSpec};
pub use mapping::FieldMap;
pub use operation::{
    create, delete_by_id, delete_matching, delete_where, find_all, read, update, Update,
};
pub use options::GroupOptions;
pub use predicate::Predicate;
pub use query::{DeleteQuery, Query, UpdateQuery};
pub use result::{OperationResult, ResultState, StatusCode};
pub use service::Service;

pub use northwind_codec::{Document, FromValue, Value};
