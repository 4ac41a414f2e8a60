//! # Northwind Store
//!
//! The document-store boundary for Northwind.
//!
//! Northwind does not implement storage. Everything physical (finding,
//! inserting, updating, deleting documents, maintaining indexes, running
//! transactions) goes through the [`Store`] trait, one instance per
//! collection.
//!
//! ## Design Principles
//!
//! - A store sees only [`Document`]s keyed by physical field names
//! - Filters are opaque predicates, updates are ordered field assignments
//! - A unique-index violation is always reported as [`StoreError::DuplicateKey`]
//! - Stores must be `Send + Sync` for concurrent access
//!
//! ## Available Stores
//!
//! - [`InMemoryStore`] - For testing and ephemeral collections
//!
//! ## Example
//!
//! ```rust
//! use northwind_codec::Document;
//! use northwind_store::{Filter, InMemoryStore, IndexModel, Store, UpdateSpec};
//!
//! let store = InMemoryStore::new("people");
//! store.create_indexes(&[IndexModel::new("Name_1", "Name").unique(true)]).unwrap();
//! store.insert_one(Document::new().with("Id", 1i64).with("Name", "x"), None).unwrap();
//!
//! let matched = store
//!     .update_one(&Filter::eq("Id", 1i64), &UpdateSpec::new().set("Name", "y"))
//!     .unwrap();
//! assert_eq!(matched, 1);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod backend;
mod error;
mod filter;
mod index;
mod memory;
mod session;
mod update;

pub use backend::Store;
pub use error::{StoreError, StoreResult};
pub use filter::Filter;
pub use index::IndexModel;
pub use memory::InMemoryStore;
pub use session::Session;
pub use update::{SetField, UpdateSpec};

pub use northwind_codec::Document;
