//! In-memory Auth Tables
//!
//! Plain tables (no locking) that the replica embeds in its replicated
//! state, plus [`MemoryAuthRepository`] which puts each table behind a
//! tokio lock for single-node use.

use std::collections::{BTreeMap, HashMap};

use kernel::id::UserId;
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, RwLock};

use crate::domain::entity::{Challenge, SessionToken, User};
use crate::domain::repository::{ChallengeRepository, SessionTokenRepository, UserRepository};
use crate::domain::value_object::{Email, PublicKey};
use crate::error::AuthResult;

/// Users indexed by ID; serialized as a list ordered by ID
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<User>", into = "Vec<User>")]
pub struct UserTable {
    users: BTreeMap<UserId, User>,
}

impl UserTable {
    /// Insert under ID `len + 1`
    pub fn insert_next(&mut self, email: Email, public_key: PublicKey) -> User {
        let user_id = UserId::new(self.users.len() as i32 + 1);
        let user = User::new(user_id, email, public_key);
        self.users.insert(user_id, user.clone());
        user
    }

    pub fn get(&self, user_id: UserId) -> Option<&User> {
        self.users.get(&user_id)
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &User> {
        self.users.values()
    }
}

impl From<Vec<User>> for UserTable {
    fn from(users: Vec<User>) -> Self {
        Self {
            users: users.into_iter().map(|u| (u.user_id, u)).collect(),
        }
    }
}

impl From<UserTable> for Vec<User> {
    fn from(table: UserTable) -> Self {
        table.users.into_values().collect()
    }
}

/// Session tokens indexed by token value; serialized as a list
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<SessionToken>", into = "Vec<SessionToken>")]
pub struct TokenTable {
    tokens: BTreeMap<String, SessionToken>,
}

impl TokenTable {
    pub fn insert(&mut self, token: SessionToken) {
        self.tokens.insert(token.token.clone(), token);
    }

    pub fn get(&self, token: &str) -> Option<&SessionToken> {
        self.tokens.get(token)
    }

    /// Remove expired tokens, returning how many were dropped
    pub fn purge_expired(&mut self, now_ms: i64) -> usize {
        let before = self.tokens.len();
        self.tokens.retain(|_, t| !t.is_expired_at(now_ms));
        before - self.tokens.len()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

impl From<Vec<SessionToken>> for TokenTable {
    fn from(tokens: Vec<SessionToken>) -> Self {
        Self {
            tokens: tokens.into_iter().map(|t| (t.token.clone(), t)).collect(),
        }
    }
}

impl From<TokenTable> for Vec<SessionToken> {
    fn from(table: TokenTable) -> Self {
        table.tokens.into_values().collect()
    }
}

/// At most one outstanding challenge per user
#[derive(Debug, Default)]
pub struct ChallengeTable {
    challenges: HashMap<UserId, Challenge>,
}

impl ChallengeTable {
    pub fn put(&mut self, challenge: Challenge) {
        self.challenges.insert(challenge.user_id, challenge);
    }

    pub fn take(&mut self, user_id: UserId) -> Option<Challenge> {
        self.challenges.remove(&user_id)
    }

    pub fn purge_expired(&mut self, now_ms: i64) -> usize {
        let before = self.challenges.len();
        self.challenges.retain(|_, c| !c.is_expired_at(now_ms));
        before - self.challenges.len()
    }
}

/// Standalone in-memory repository
#[derive(Debug, Default)]
pub struct MemoryAuthRepository {
    users: RwLock<UserTable>,
    challenges: Mutex<ChallengeTable>,
    tokens: RwLock<TokenTable>,
}

impl MemoryAuthRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl UserRepository for MemoryAuthRepository {
    async fn create_user(&self, email: Email, public_key: PublicKey) -> AuthResult<User> {
        Ok(self.users.write().await.insert_next(email, public_key))
    }

    async fn find_user(&self, user_id: UserId) -> AuthResult<Option<User>> {
        Ok(self.users.read().await.get(user_id).cloned())
    }
}

impl ChallengeRepository for MemoryAuthRepository {
    async fn put_challenge(&self, challenge: Challenge) -> AuthResult<()> {
        self.challenges.lock().await.put(challenge);
        Ok(())
    }

    async fn take_challenge(&self, user_id: UserId) -> AuthResult<Option<Challenge>> {
        Ok(self.challenges.lock().await.take(user_id))
    }

    async fn purge_expired_challenges(&self, now_ms: i64) -> AuthResult<usize> {
        Ok(self.challenges.lock().await.purge_expired(now_ms))
    }
}

impl SessionTokenRepository for MemoryAuthRepository {
    async fn create_token(&self, token: SessionToken) -> AuthResult<()> {
        self.tokens.write().await.insert(token);
        Ok(())
    }

    async fn find_token(&self, token: &str) -> AuthResult<Option<SessionToken>> {
        Ok(self.tokens.read().await.get(token).cloned())
    }

    async fn purge_expired_tokens(&self, now_ms: i64) -> AuthResult<usize> {
        Ok(self.tokens.write().await.purge_expired(now_ms))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use platform::crypto::generate_signing_key;

    fn key() -> PublicKey {
        PublicKey::from(generate_signing_key().verifying_key())
    }

    #[test]
    fn test_user_ids_are_sequential() {
        let mut table = UserTable::default();
        let first = table.insert_next(Email::new("a@x.com").unwrap(), key());
        let second = table.insert_next(Email::new("a@x.com").unwrap(), key());

        assert_eq!(first.user_id, UserId::new(1));
        assert_eq!(second.user_id, UserId::new(2));
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_user_table_serializes_as_list() {
        let mut table = UserTable::default();
        table.insert_next(Email::new("a@x.com").unwrap(), key());

        let json = serde_json::to_value(&table).unwrap();
        assert!(json.is_array());
        assert_eq!(json[0]["userId"], 1);
        assert_eq!(json[0]["email"], "a@x.com");

        let parsed: UserTable = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, table);
    }

    #[test]
    fn test_token_purge() {
        let mut table = TokenTable::default();
        table.insert(SessionToken {
            user_id: UserId::new(1),
            token: "old".to_string(),
            expires_at_ms: 100,
        });
        table.insert(SessionToken {
            user_id: UserId::new(1),
            token: "new".to_string(),
            expires_at_ms: 300,
        });

        assert_eq!(table.purge_expired(200), 1);
        assert!(table.get("old").is_none());
        assert!(table.get("new").is_some());
    }

    #[test]
    fn test_challenge_overwrite_and_take() {
        let mut table = ChallengeTable::default();
        table.put(Challenge::new(UserId::new(1), "first".to_string(), 60_000));
        table.put(Challenge::new(UserId::new(1), "second".to_string(), 60_000));

        let taken = table.take(UserId::new(1)).unwrap();
        assert_eq!(taken.server_challenge, "second");
        assert!(table.take(UserId::new(1)).is_none());
    }
}
