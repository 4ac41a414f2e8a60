//! Deterministic AES-256-GCM field cipher.
//!
//! A text value is sealed under a synthetic nonce: the first 12 bytes of
//! HMAC-SHA256 over the plaintext. The MAC key and the AES key are separate
//! HKDF subkeys of one [`EncryptionKey`]. Under a given key, equal plaintexts
//! seal to equal ciphertexts, so equality filters and unique indexes keep
//! working on encrypted fields. The price is that equal values are
//! recognisable as equal at rest.
//!
//! Sealed layout, base64-encoded into a text value:
//!
//! ```text
//! nonce (12) || ciphertext (n) || tag (16)
//! ```
//!
//! Opening recomputes the nonce from the recovered plaintext and rejects a
//! mismatch.

use crate::encryption::EncryptionPolicy;
use crate::error::{CoreError, CoreResult};
use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use hkdf::Hkdf;
use hmac::{Hmac, Mac};
use northwind_codec::Value;
use rand::RngCore;
use sha2::Sha256;
use zeroize::{Zeroize, ZeroizeOnDrop};

type HmacSha256 = Hmac<Sha256>;

/// Master key length in bytes.
pub const KEY_SIZE: usize = 32;

const NONCE_LEN: usize = 12;
const TAG_LEN: usize = 16;

const PASSWORD_INFO: &[u8] = b"northwind-field-key-v1";
const SEAL_INFO: &[u8] = b"northwind/field/seal";
const NONCE_INFO: &[u8] = b"northwind/field/nonce";

/// 256-bit master key for field encryption.
///
/// Zeroized on drop. `Debug` never prints the bytes.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct EncryptionKey([u8; KEY_SIZE]);

impl EncryptionKey {
    /// Draws a fresh random key.
    #[must_use]
    pub fn generate() -> Self {
        let mut key = [0u8; KEY_SIZE];
        rand::thread_rng().fill_bytes(&mut key);
        Self(key)
    }

    /// Wraps existing key material.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidKeySize`] unless `bytes` is exactly
    /// [`KEY_SIZE`] long.
    pub fn from_bytes(bytes: &[u8]) -> CoreResult<Self> {
        <[u8; KEY_SIZE]>::try_from(bytes)
            .map(Self)
            .map_err(|_| CoreError::invalid_key_size(bytes.len(), KEY_SIZE))
    }

    /// Raw key bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.0
    }

    /// Derives a key from a password and salt with HKDF-SHA256.
    ///
    /// The same password and salt always give the same key.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::KeyDerivationFailed`] if HKDF rejects the output
    /// length.
    pub fn derive_from_password(password: &[u8], salt: &[u8]) -> CoreResult<Self> {
        hkdf_expand(Some(salt), password, PASSWORD_INFO).map(Self)
    }
}

impl std::fmt::Debug for EncryptionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("EncryptionKey([REDACTED])")
    }
}

fn hkdf_expand(salt: Option<&[u8]>, ikm: &[u8], info: &[u8]) -> CoreResult<[u8; KEY_SIZE]> {
    let mut okm = [0u8; KEY_SIZE];
    Hkdf::<Sha256>::new(salt, ikm)
        .expand(info, &mut okm)
        .map_err(|_| CoreError::key_derivation_failed("HKDF output length rejected"))?;
    Ok(okm)
}

/// Seals and opens field values with a deterministic AES-256-GCM scheme.
///
/// Only [`Value::Text`] is transformed; every other kind passes through so
/// that key and numeric fields keep their type.
#[derive(Clone)]
pub struct FieldCipher {
    aead: Aes256Gcm,
    nonce_mac: HmacSha256,
}

impl FieldCipher {
    /// Builds a cipher from a master key.
    ///
    /// # Errors
    ///
    /// Fails if subkey derivation fails.
    pub fn new(key: EncryptionKey) -> CoreResult<Self> {
        let mut seal_key = hkdf_expand(None, key.as_bytes(), SEAL_INFO)?;
        let mut mac_key = hkdf_expand(None, key.as_bytes(), NONCE_INFO)?;

        let aead = <Aes256Gcm as KeyInit>::new_from_slice(&seal_key)
            .map_err(|_| CoreError::invalid_key_size(seal_key.len(), KEY_SIZE));
        let nonce_mac = <HmacSha256 as Mac>::new_from_slice(&mac_key)
            .map_err(|_| CoreError::invalid_key_size(mac_key.len(), KEY_SIZE));
        seal_key.zeroize();
        mac_key.zeroize();

        Ok(Self {
            aead: aead?,
            nonce_mac: nonce_mac?,
        })
    }

    fn synthetic_nonce(&self, plaintext: &[u8]) -> [u8; NONCE_LEN] {
        let mut mac = self.nonce_mac.clone();
        mac.update(plaintext);
        let digest = mac.finalize().into_bytes();
        let mut nonce = [0u8; NONCE_LEN];
        nonce.copy_from_slice(&digest[..NONCE_LEN]);
        nonce
    }

    /// Seals raw bytes. Equal inputs give equal outputs.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::EncryptionFailed`] if AES-GCM refuses the input.
    pub fn seal(&self, plaintext: &[u8]) -> CoreResult<Vec<u8>> {
        let nonce = self.synthetic_nonce(plaintext);
        let body = self
            .aead
            .encrypt(Nonce::from_slice(&nonce), plaintext)
            .map_err(|_| CoreError::encryption_failed("AES-GCM seal failed"))?;

        let mut sealed = Vec::with_capacity(NONCE_LEN + body.len());
        sealed.extend_from_slice(&nonce);
        sealed.extend_from_slice(&body);
        Ok(sealed)
    }

    /// Opens bytes produced by [`seal`](Self::seal).
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::DecryptionFailed`] on truncated input, a wrong
    /// key, tampering, or a nonce that does not belong to the plaintext.
    pub fn open(&self, sealed: &[u8]) -> CoreResult<Vec<u8>> {
        if sealed.len() < NONCE_LEN + TAG_LEN {
            return Err(CoreError::decryption_failed("sealed value too short"));
        }
        let (nonce, body) = sealed.split_at(NONCE_LEN);
        let plain = self
            .aead
            .decrypt(Nonce::from_slice(nonce), body)
            .map_err(|_| CoreError::decryption_failed("authentication failed"))?;
        if nonce != self.synthetic_nonce(&plain).as_slice() {
            return Err(CoreError::decryption_failed("synthetic nonce mismatch"));
        }
        Ok(plain)
    }

    /// Seals a text value into base64 text; other kinds are returned as is.
    ///
    /// # Errors
    ///
    /// See [`seal`](Self::seal).
    pub fn encrypt_value(&self, value: &Value) -> CoreResult<Value> {
        match value {
            Value::Text(text) => Ok(Value::Text(BASE64.encode(self.seal(text.as_bytes())?))),
            other => Ok(other.clone()),
        }
    }

    /// Reverses [`encrypt_value`](Self::encrypt_value).
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::DecryptionFailed`] if the text is not base64, does
    /// not open, or does not decode as UTF-8.
    pub fn decrypt_value(&self, value: &Value) -> CoreResult<Value> {
        let Value::Text(encoded) = value else {
            return Ok(value.clone());
        };
        let sealed = BASE64
            .decode(encoded)
            .map_err(|e| CoreError::decryption_failed(format!("invalid base64: {e}")))?;
        String::from_utf8(self.open(&sealed)?)
            .map(Value::Text)
            .map_err(|_| CoreError::decryption_failed("plaintext is not UTF-8"))
    }

    /// Builds an enabled encryption policy backed by this cipher.
    #[must_use]
    pub fn policy<T: 'static>(&self) -> EncryptionPolicy<T> {
        let sealer = self.clone();
        let opener = self.clone();
        EncryptionPolicy::new(
            move |v| sealer.encrypt_value(v),
            move |v| opener.decrypt_value(v),
        )
    }
}

impl std::fmt::Debug for FieldCipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldCipher").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn cipher() -> FieldCipher {
        FieldCipher::new(EncryptionKey::from_bytes(&[9u8; KEY_SIZE]).unwrap()).unwrap()
    }

    #[test]
    fn generated_keys_differ() {
        assert_ne!(
            EncryptionKey::generate().as_bytes(),
            EncryptionKey::generate().as_bytes()
        );
    }

    #[test]
    fn key_length_is_checked() {
        assert!(matches!(
            EncryptionKey::from_bytes(&[0u8; 16]),
            Err(CoreError::InvalidKeySize {
                expected: 32,
                actual: 16
            })
        ));
        assert!(EncryptionKey::from_bytes(&[0u8; 64]).is_err());
    }

    #[test]
    fn password_derivation_depends_on_salt() {
        let a = EncryptionKey::derive_from_password(b"pw", b"salt").unwrap();
        let b = EncryptionKey::derive_from_password(b"pw", b"salt").unwrap();
        let c = EncryptionKey::derive_from_password(b"pw", b"pepper").unwrap();

        assert_eq!(a.as_bytes(), b.as_bytes());
        assert_ne!(a.as_bytes(), c.as_bytes());
    }

    #[test]
    fn debug_redacts_key() {
        let key = EncryptionKey::from_bytes(&[0xAB; KEY_SIZE]).unwrap();
        let shown = format!("{key:?}");
        assert!(shown.contains("REDACTED"));
        assert!(!shown.contains("171"));
    }

    #[test]
    fn equal_text_seals_equal() {
        let cipher = cipher();
        let plain = Value::Text("secret".into());

        let a = cipher.encrypt_value(&plain).unwrap();
        let b = cipher.encrypt_value(&plain).unwrap();
        let other = cipher.encrypt_value(&Value::Text("secreT".into())).unwrap();

        assert_ne!(a, plain);
        assert_eq!(a, b);
        assert_ne!(a, other);
        assert_eq!(cipher.decrypt_value(&a).unwrap(), plain);
    }

    #[test]
    fn keys_give_different_ciphertexts() {
        let a = cipher();
        let b = FieldCipher::new(EncryptionKey::generate()).unwrap();
        let plain = Value::Text("x".into());

        let sealed = a.encrypt_value(&plain).unwrap();
        assert_ne!(sealed, b.encrypt_value(&plain).unwrap());
        assert!(matches!(
            b.decrypt_value(&sealed),
            Err(CoreError::DecryptionFailed { .. })
        ));
    }

    #[test]
    fn non_text_passes_through() {
        let cipher = cipher();
        assert_eq!(
            cipher.encrypt_value(&Value::Integer(5)).unwrap(),
            Value::Integer(5)
        );
        assert_eq!(
            cipher.decrypt_value(&Value::Bool(true)).unwrap(),
            Value::Bool(true)
        );
    }

    #[test]
    fn tampering_is_detected() {
        let cipher = cipher();
        let mut sealed = cipher.seal(b"payload").unwrap();
        let last = sealed.len() - 1;
        sealed[last] ^= 0x01;
        assert!(cipher.open(&sealed).is_err());

        let mut renonced = cipher.seal(b"payload").unwrap();
        renonced[0] ^= 0x01;
        assert!(cipher.open(&renonced).is_err());
    }

    #[test]
    fn malformed_text_is_rejected() {
        let cipher = cipher();
        assert!(cipher.decrypt_value(&Value::Text("not base64!".into())).is_err());
        assert!(cipher.decrypt_value(&Value::Text("AAAA".into())).is_err());
    }

    proptest! {
        #[test]
        fn text_round_trips(text in ".*") {
            let cipher = cipher();
            let plain = Value::Text(text);
            let sealed = cipher.encrypt_value(&plain).unwrap();
            prop_assert_eq!(cipher.decrypt_value(&sealed).unwrap(), plain);
        }
    }
}
