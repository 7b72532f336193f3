//! Session Token Entity
//!
//! Bearer token issued by a successful handshake. Reusable until it
//! expires; replicated so any node can honor it after failover.

use chrono::Utc;
use kernel::id::UserId;
use serde::{Deserialize, Serialize};

/// Session token entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionToken {
    pub user_id: UserId,
    pub token: String,
    /// Expiration (Unix timestamp ms)
    pub expires_at_ms: i64,
}

impl SessionToken {
    pub fn new(user_id: UserId, token: String, ttl_ms: i64) -> Self {
        Self {
            user_id,
            token,
            expires_at_ms: Utc::now().timestamp_millis() + ttl_ms,
        }
    }

    /// Check if the token has expired
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now().timestamp_millis())
    }

    pub fn is_expired_at(&self, now_ms: i64) -> bool {
        now_ms >= self.expires_at_ms
    }

    /// Whether this token authorizes a call made as `user_id` right now
    pub fn authorizes(&self, user_id: UserId) -> bool {
        self.user_id == user_id && !self.is_expired()
    }

    /// Get remaining time until expiration
    pub fn remaining_ms(&self) -> i64 {
        (self.expires_at_ms - Utc::now().timestamp_millis()).max(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authorizes_only_its_user() {
        let token = SessionToken::new(UserId::new(1), "t".to_string(), 60_000);
        assert!(token.authorizes(UserId::new(1)));
        assert!(!token.authorizes(UserId::new(2)));
        assert!(token.remaining_ms() > 0);
    }

    #[test]
    fn test_expired_token_authorizes_nobody() {
        let token = SessionToken::new(UserId::new(1), "t".to_string(), -1);
        assert!(token.is_expired());
        assert!(!token.authorizes(UserId::new(1)));
        assert_eq!(token.remaining_ms(), 0);
    }

    #[test]
    fn test_camel_case_fields() {
        let token = SessionToken {
            user_id: UserId::new(3),
            token: "abc".to_string(),
            expires_at_ms: 10,
        };
        let json = serde_json::to_value(&token).unwrap();
        assert_eq!(json["userId"], 3);
        assert_eq!(json["expiresAtMs"], 10);
    }
}
