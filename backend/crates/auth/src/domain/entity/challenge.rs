//! Challenge Entity
//!
//! The pending server half of a challenge-response handshake. Node-local,
//! never replicated: losing one on failover just forces the client to
//! start over.

use chrono::Utc;
use kernel::id::UserId;

/// Outstanding challenge for one user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Challenge {
    pub user_id: UserId,
    /// Nonce the client must sign (base64 text; the UTF-8 bytes are signed)
    pub server_challenge: String,
    pub issued_at_ms: i64,
    pub expires_at_ms: i64,
}

impl Challenge {
    /// Create a new challenge
    ///
    /// TTL is provided by the application layer (config).
    pub fn new(user_id: UserId, server_challenge: String, ttl_ms: i64) -> Self {
        let now_ms = Utc::now().timestamp_millis();
        Self {
            user_id,
            server_challenge,
            issued_at_ms: now_ms,
            expires_at_ms: now_ms + ttl_ms,
        }
    }

    /// Check if the challenge has expired
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now().timestamp_millis())
    }

    pub fn is_expired_at(&self, now_ms: i64) -> bool {
        now_ms >= self.expires_at_ms
    }
}
