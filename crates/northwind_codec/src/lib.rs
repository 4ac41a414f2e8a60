//! # Northwind Codec
//!
//! Dynamic document values for Northwind.
//!
//! Entities never reach a store directly. Each declared field is read into a
//! [`Value`], the values are collected into a [`Document`] keyed by physical
//! field name, and the store only ever sees documents. [`FromValue`] is the way
//! back.
//!
//! ## Usage
//!
//! ```
//! use northwind_codec::{Document, FromValue, Value};
//!
//! let doc = Document::new().with("Id", 1i64).with("Name", "x");
//! let name = String::from_value(doc.get("Name").cloned().unwrap()).unwrap();
//! assert_eq!(name, "x");
//! assert_eq!(doc.get("Id"), Some(&Value::Integer(1)));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod convert;
mod document;
mod error;
mod value;

pub use convert::FromValue;
pub use document::Document;
pub use error::{CodecError, CodecResult};
pub use value::Value;
