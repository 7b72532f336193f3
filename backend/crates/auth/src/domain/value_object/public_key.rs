//! Public Key Value Object
//!
//! A user's ed25519 verifying key. Carried as base64 of the 32 raw key
//! bytes in snapshots and on the wire.

use std::fmt;

use ed25519_dalek::VerifyingKey;
use platform::crypto::{from_base64, key_fingerprint, to_base64, verify, verifying_key_from_bytes};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{AuthError, AuthResult};

/// Validated ed25519 verifying key
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct PublicKey(VerifyingKey);

impl PublicKey {
    /// Parse raw key bytes, rejecting anything that is not a valid point
    pub fn from_bytes(bytes: &[u8]) -> AuthResult<Self> {
        verifying_key_from_bytes(bytes)
            .map(Self)
            .ok_or(AuthError::InvalidPublicKey)
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    pub fn verifying_key(&self) -> &VerifyingKey {
        &self.0
    }

    /// Short hex fingerprint for log fields
    pub fn fingerprint(&self) -> String {
        key_fingerprint(&self.0)
    }

    /// Whether `signature` is this key's signature over `message`
    pub fn verifies(&self, message: &[u8], signature: &[u8]) -> bool {
        verify(&self.0, message, signature)
    }
}

impl From<VerifyingKey> for PublicKey {
    fn from(key: VerifyingKey) -> Self {
        Self(key)
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({})", self.fingerprint())
    }
}

impl Serialize for PublicKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&to_base64(self.as_bytes()))
    }
}

impl<'de> Deserialize<'de> for PublicKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        let bytes = from_base64(&encoded).map_err(serde::de::Error::custom)?;
        Self::from_bytes(&bytes).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use platform::crypto::{generate_signing_key, sign};

    #[test]
    fn test_from_bytes() {
        let key = generate_signing_key().verifying_key();
        let public = PublicKey::from_bytes(key.as_bytes()).unwrap();
        assert_eq!(public.as_bytes(), key.as_bytes());

        assert!(matches!(
            PublicKey::from_bytes(&[7u8; 5]),
            Err(AuthError::InvalidPublicKey)
        ));
    }

    #[test]
    fn test_verifies() {
        let signing = generate_signing_key();
        let public = PublicKey::from(signing.verifying_key());

        let signature = sign(&signing, b"server challenge");
        assert!(public.verifies(b"server challenge", &signature));
        assert!(!public.verifies(b"other", &signature));
    }

    #[test]
    fn test_serde_is_base64_string() {
        let public = PublicKey::from(generate_signing_key().verifying_key());
        let json = serde_json::to_string(&public).unwrap();
        assert_eq!(json, format!("\"{}\"", to_base64(public.as_bytes())));

        let parsed: PublicKey = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, public);
    }
}
