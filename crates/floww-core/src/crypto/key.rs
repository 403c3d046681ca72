//! Symmetric encryption key handling.

use chacha20poly1305::Key;
use rand::RngCore;
use rand::rngs::OsRng;

use super::error::{CryptoError, CryptoResult};

/// Length in bytes of an [`EncryptionKey`].
pub const KEY_SIZE: usize = 32;

/// A 256-bit symmetric key used for XChaCha20-Poly1305 encryption.
///
/// Holds raw key bytes; never logged or serialized via `Debug`/`Display`.
#[derive(Clone)]
pub struct EncryptionKey([u8; KEY_SIZE]);

impl EncryptionKey {
    /// Generates a new random key using the OS RNG.
    pub fn generate() -> Self {
        let mut bytes = [0u8; KEY_SIZE];
        OsRng.fill_bytes(&mut bytes);
        Self(bytes)
    }

    /// Builds a key from raw bytes, failing if the length is wrong.
    pub fn from_bytes(bytes: &[u8]) -> CryptoResult<Self> {
        if bytes.len() != KEY_SIZE {
            return Err(CryptoError::InvalidKeyLength);
        }
        let mut key = [0u8; KEY_SIZE];
        key.copy_from_slice(bytes);
        Ok(Self(key))
    }

    /// Builds a key from a hex-encoded string (as loaded from configuration).
    pub fn from_hex(hex_str: &str) -> CryptoResult<Self> {
        let bytes = hex::decode(hex_str).map_err(|_| CryptoError::InvalidKeyLength)?;
        Self::from_bytes(&bytes)
    }

    /// Returns the key as a `chacha20poly1305` key reference.
    pub fn as_bytes(&self) -> &Key {
        Key::from_slice(&self.0)
    }
}

impl std::fmt::Debug for EncryptionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EncryptionKey").field("bytes", &"<redacted>").finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generate_produces_distinct_keys() {
        let a = EncryptionKey::generate();
        let b = EncryptionKey::generate();
        assert_ne!(a.as_bytes(), b.as_bytes());
    }

    #[test]
    fn from_bytes_rejects_wrong_length() {
        let result = EncryptionKey::from_bytes(&[0u8; 16]);
        assert!(matches!(result, Err(CryptoError::InvalidKeyLength)));
    }

    #[test]
    fn hex_roundtrip() {
        let key = EncryptionKey::generate();
        let hex_str = hex::encode(key.as_bytes());
        let decoded = EncryptionKey::from_hex(&hex_str).unwrap();
        assert_eq!(key.as_bytes(), decoded.as_bytes());
    }
}
