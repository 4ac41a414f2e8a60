//! The entity managed by the CLI and its group.

use crate::error::CliResult;
use northwind_core::crypto::{EncryptionKey, FieldCipher};
use northwind_core::{field, Entity, Field, GroupBuilder, GroupOptions, GroupRegistry, Service};
use northwind_store::{InMemoryStore, Store};
use serde::Serialize;
use std::sync::Arc;

/// Group and collection name.
pub const GROUP_NAME: &str = "TestClass";

const KEY_SALT: &[u8] = b"northwind-cli:TestClass";

/// A record with an integer key and a name.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TestClass {
    /// Primary key.
    #[serde(rename = "Id")]
    pub id: i64,
    /// Display name.
    #[serde(rename = "Name")]
    pub name: String,
}

impl Entity for TestClass {
    fn fields() -> Vec<Field<Self>> {
        vec![id_field(), name_field()]
    }
}

/// The `Id` field.
pub fn id_field() -> Field<TestClass> {
    field!(TestClass, id => "Id")
}

/// The `Name` field.
pub fn name_field() -> Field<TestClass> {
    field!(TestClass, name => "Name")
}

/// Registers the `TestClass` group over `store` and returns its service.
///
/// Transactions and document state are on. A password turns on AES-GCM
/// encryption of every text field with a key derived from it.
pub fn open_service(
    store: Arc<InMemoryStore>,
    password: Option<&str>,
    unique_names: bool,
) -> CliResult<Service<TestClass>> {
    let registry = Arc::new(GroupRegistry::new());
    let store: Arc<dyn Store> = store;
    let options = GroupOptions::new()
        .use_transactions(true)
        .return_document_state(true);

    let mut builder = GroupBuilder::<TestClass>::new(GROUP_NAME, store, options)?
        .has_primary_key(id_field())
        .with_index(name_field(), unique_names);

    if let Some(password) = password {
        let key = EncryptionKey::derive_from_password(password.as_bytes(), KEY_SALT)?;
        builder = builder.with_encryption(FieldCipher::new(key)?.policy());
    }

    builder.build(&registry)?;
    Ok(Service::new(registry))
}
