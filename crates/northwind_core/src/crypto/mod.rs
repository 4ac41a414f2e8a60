//! Field encryption for Northwind groups.
//!
//! This module provides an AES-256-GCM [`FieldCipher`] that plugs into an
//! [`EncryptionPolicy`](crate::EncryptionPolicy). It is optional and must be
//! enabled via the `encryption` feature.
//!
//! ## Security Model
//!
//! - AES-256-GCM for authenticated encryption
//! - Synthetic nonce per value (HMAC-SHA256 of the plaintext), so equal
//!   plaintexts seal to equal ciphertexts and unique indexes still hold
//! - Separate HKDF subkeys for sealing and nonce derivation
//! - Keys are zeroized on drop
//!
//! ## Usage
//!
//! ```ignore
//! use northwind_core::crypto::{EncryptionKey, FieldCipher};
//!
//! let cipher = FieldCipher::new(EncryptionKey::generate())?;
//! let policy = cipher.policy::<Customer>().with_fields(["Email"]);
//! ```

#[cfg(feature = "encryption")]
mod cipher;

#[cfg(feature = "encryption")]
pub use cipher::*;

/// Module contents when encryption feature is disabled.
#[cfg(not(feature = "encryption"))]
mod stub {
    use crate::encryption::EncryptionPolicy;
    use crate::error::{CoreError, CoreResult};
    use northwind_codec::Value;

    /// Encryption key (stub when encryption disabled).
    #[derive(Debug, Clone)]
    pub struct EncryptionKey {
        _private: (),
    }

    impl EncryptionKey {
        /// Always returns an error when encryption is disabled.
        pub fn generate() -> CoreResult<Self> {
            Err(CoreError::encryption_not_enabled())
        }

        /// Always returns an error when encryption is disabled.
        pub fn from_bytes(_bytes: &[u8]) -> CoreResult<Self> {
            Err(CoreError::encryption_not_enabled())
        }

        /// Always returns an error when encryption is disabled.
        pub fn derive_from_password(_password: &[u8], _salt: &[u8]) -> CoreResult<Self> {
            Err(CoreError::encryption_not_enabled())
        }
    }

    /// Field cipher (stub when encryption disabled).
    #[derive(Debug, Clone)]
    pub struct FieldCipher {
        _private: (),
    }

    impl FieldCipher {
        /// Always returns an error when encryption is disabled.
        pub fn new(_key: EncryptionKey) -> CoreResult<Self> {
            Err(CoreError::encryption_not_enabled())
        }

        /// Always returns an error when encryption is disabled.
        pub fn encrypt_value(&self, _value: &Value) -> CoreResult<Value> {
            Err(CoreError::encryption_not_enabled())
        }

        /// Always returns an error when encryption is disabled.
        pub fn decrypt_value(&self, _value: &Value) -> CoreResult<Value> {
            Err(CoreError::encryption_not_enabled())
        }

        /// Returns a disabled policy.
        pub fn policy<T: 'static>(&self) -> EncryptionPolicy<T> {
            EncryptionPolicy::disabled()
        }
    }
}

#[cfg(not(feature = "encryption"))]
pub use stub::*;
