//! Domain Services
//!
//! Signature rules of the challenge-response handshake:
//! - the server signs the UTF-8 bytes of the client's challenge
//! - the client signs the UTF-8 bytes of the server's challenge

use ed25519_dalek::SigningKey;
use platform::crypto::sign;

use crate::domain::value_object::PublicKey;

/// Server acknowledgment of a client nonce
pub fn sign_client_challenge(server_key: &SigningKey, client_challenge: &str) -> Vec<u8> {
    sign(server_key, client_challenge.as_bytes())
}

/// Client response to a server nonce
pub fn respond_to_challenge(client_key: &SigningKey, server_challenge: &str) -> Vec<u8> {
    sign(client_key, server_challenge.as_bytes())
}

/// Check a client response against the issued server nonce
pub fn verify_challenge_response(
    public_key: &PublicKey,
    server_challenge: &str,
    signature: &[u8],
) -> bool {
    public_key.verifies(server_challenge.as_bytes(), signature)
}

#[cfg(test)]
mod tests {
    use super::*;
    use platform::crypto::{generate_signing_key, verify};

    #[test]
    fn test_server_signature_covers_client_challenge() {
        let server = generate_signing_key();
        let signature = sign_client_challenge(&server, "client-nonce");
        assert!(verify(&server.verifying_key(), b"client-nonce", &signature));
    }

    #[test]
    fn test_response_round_trip() {
        let client = generate_signing_key();
        let public = PublicKey::from(client.verifying_key());

        let response = respond_to_challenge(&client, "c2VydmVy");
        assert!(verify_challenge_response(&public, "c2VydmVy", &response));
        assert!(!verify_challenge_response(&public, "b3RoZXI=", &response));
    }

    #[test]
    fn test_response_from_other_key_fails() {
        let client = generate_signing_key();
        let impostor = generate_signing_key();
        let public = PublicKey::from(client.verifying_key());

        let response = respond_to_challenge(&impostor, "nonce");
        assert!(!verify_challenge_response(&public, "nonce", &response));
    }
}
