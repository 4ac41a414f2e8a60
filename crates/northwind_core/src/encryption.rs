//! Field-level encryption policy.

use crate::entity::Entity;
use crate::error::{CoreError, CoreResult};
use northwind_codec::Value;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

type Transform = Arc<dyn Fn(&Value) -> CoreResult<Value> + Send + Sync>;

fn passthrough(value: &Value) -> CoreResult<Value> {
    Ok(value.clone())
}

/// Per-type encryption-at-rest policy.
///
/// When enabled, every declared field of the entity (or only the fields
/// named through [`with_fields`](Self::with_fields)) is passed through the
/// encrypt function before it is written and through the decrypt function
/// after it is read. `Null` values are never transformed. The entity given
/// to the policy is never mutated; a transformed copy is returned.
///
/// The functions are opaque: any keyed cipher that maps a `Value` to a
/// `Value` can be plugged in. With the `encryption` feature,
/// [`crate::crypto::FieldCipher::policy`] builds one backed by AES-256-GCM.
pub struct EncryptionPolicy<T> {
    enabled: bool,
    encrypt: Transform,
    decrypt: Transform,
    fields: Option<Vec<&'static str>>,
    _entity: PhantomData<fn() -> T>,
}

impl<T> EncryptionPolicy<T> {
    /// Creates a disabled policy that leaves every value untouched.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            encrypt: Arc::new(passthrough),
            decrypt: Arc::new(passthrough),
            fields: None,
            _entity: PhantomData,
        }
    }

    /// Creates an enabled policy from an encrypt/decrypt pair.
    pub fn new<E, D>(encrypt: E, decrypt: D) -> Self
    where
        E: Fn(&Value) -> CoreResult<Value> + Send + Sync + 'static,
        D: Fn(&Value) -> CoreResult<Value> + Send + Sync + 'static,
    {
        Self {
            enabled: true,
            encrypt: Arc::new(encrypt),
            decrypt: Arc::new(decrypt),
            fields: None,
            _entity: PhantomData,
        }
    }

    /// Restricts the policy to the given logical field names.
    #[must_use]
    pub fn with_fields<I>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = &'static str>,
    {
        self.fields = Some(fields.into_iter().collect());
        self
    }

    /// Returns true if the policy transforms values.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Returns true if `field` is transformed by this policy.
    #[must_use]
    pub fn covers(&self, field: &str) -> bool {
        self.enabled
            && self
                .fields
                .as_ref()
                .map_or(true, |names| names.iter().any(|n| *n == field))
    }

    /// Encrypts a single field value.
    ///
    /// # Errors
    ///
    /// Propagates the error of the encrypt function.
    pub fn encrypt_value(&self, field: &str, value: &Value) -> CoreResult<Value> {
        if value.is_null() || !self.covers(field) {
            return Ok(value.clone());
        }
        (self.encrypt)(value)
    }

    /// Decrypts a single field value.
    ///
    /// # Errors
    ///
    /// Propagates the error of the decrypt function.
    pub fn decrypt_value(&self, field: &str, value: &Value) -> CoreResult<Value> {
        if value.is_null() || !self.covers(field) {
            return Ok(value.clone());
        }
        (self.decrypt)(value)
    }
}

impl<T: Entity> EncryptionPolicy<T> {
    /// Returns an encrypted copy of `entity`.
    ///
    /// # Errors
    ///
    /// Fails if the encrypt function fails or yields a value the field
    /// cannot hold.
    pub fn encrypt_entity(&self, entity: &T) -> CoreResult<T> {
        self.transform(entity, |name, v| self.encrypt_value(name, v))
    }

    /// Returns a decrypted copy of `entity`.
    ///
    /// # Errors
    ///
    /// Fails if the decrypt function fails or yields a value the field
    /// cannot hold.
    pub fn decrypt_entity(&self, entity: &T) -> CoreResult<T> {
        self.transform(entity, |name, v| self.decrypt_value(name, v))
    }

    fn transform<F>(&self, entity: &T, f: F) -> CoreResult<T>
    where
        F: Fn(&str, &Value) -> CoreResult<Value>,
    {
        let mut out = entity.clone();
        if !self.enabled {
            return Ok(out);
        }
        for field in T::fields() {
            let value = field.get(entity);
            if value.is_null() || !self.covers(field.name()) {
                continue;
            }
            let transformed = f(field.name(), &value)?;
            field.set(&mut out, transformed).map_err(|e| {
                CoreError::invalid_argument(format!(
                    "encryption produced an invalid value for field '{}': {e}",
                    field.name()
                ))
            })?;
        }
        Ok(out)
    }
}

impl<T> Default for EncryptionPolicy<T> {
    fn default() -> Self {
        Self::disabled()
    }
}

impl<T> Clone for EncryptionPolicy<T> {
    fn clone(&self) -> Self {
        Self {
            enabled: self.enabled,
            encrypt: Arc::clone(&self.encrypt),
            decrypt: Arc::clone(&self.decrypt),
            fields: self.fields.clone(),
            _entity: PhantomData,
        }
    }
}

impl<T> fmt::Debug for EncryptionPolicy<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncryptionPolicy")
            .field("enabled", &self.enabled)
            .field("fields", &self.fields)
            .finish_non_exhaustive()
    }
}
