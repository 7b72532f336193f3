//! Application Configuration
//!
//! Configuration for the Auth application layer.

use std::sync::Arc;
use std::time::Duration;

use ed25519_dalek::{SigningKey, VerifyingKey};
use platform::crypto::generate_signing_key;

/// Auth application configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Validity window of a pending challenge
    pub challenge_ttl: Duration,
    /// Session token TTL
    pub token_ttl: Duration,
    /// Server challenge length in random bytes
    pub challenge_bytes_len: usize,
    /// Session token length in random bytes
    pub token_bytes_len: usize,
    /// Server signing key, shared by every replica of a deployment
    pub server_key: Arc<SigningKey>,
}

impl AuthConfig {
    /// Create config with default TTLs around the given server key
    pub fn new(server_key: SigningKey) -> Self {
        Self {
            challenge_ttl: Duration::from_secs(120),
            token_ttl: Duration::from_secs(3600),
            challenge_bytes_len: 32,
            token_bytes_len: 32,
            server_key: Arc::new(server_key),
        }
    }

    /// Create config with a random server key (for development)
    pub fn with_random_key() -> Self {
        Self::new(generate_signing_key())
    }

    /// Public half of the server key, handed to clients
    pub fn server_public_key(&self) -> VerifyingKey {
        self.server_key.verifying_key()
    }

    pub fn challenge_ttl_ms(&self) -> i64 {
        self.challenge_ttl.as_millis() as i64
    }

    pub fn token_ttl_ms(&self) -> i64 {
        self.token_ttl.as_millis() as i64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AuthConfig::with_random_key();
        assert_eq!(config.challenge_ttl_ms(), 120_000);
        assert_eq!(config.token_ttl_ms(), 3_600_000);
        assert_eq!(config.challenge_bytes_len, 32);
        assert_eq!(
            config.server_public_key(),
            config.server_key.verifying_key()
        );
    }
}
