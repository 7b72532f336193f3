//! Repository Traits
//!
//! Interfaces for auth state. The replica node implements them over its
//! replicated tables; `infra::memory` provides a standalone version.

use kernel::id::UserId;

use crate::domain::entity::{Challenge, SessionToken, User};
use crate::domain::value_object::{Email, PublicKey};
use crate::error::AuthResult;

/// User repository trait
#[trait_variant::make(UserRepository: Send)]
pub trait LocalUserRepository {
    /// Create a user under the next sequential ID (count of users + 1)
    async fn create_user(&self, email: Email, public_key: PublicKey) -> AuthResult<User>;

    /// Find user by ID
    async fn find_user(&self, user_id: UserId) -> AuthResult<Option<User>>;
}

/// Pending challenge repository trait
#[trait_variant::make(ChallengeRepository: Send)]
pub trait LocalChallengeRepository {
    /// Store a challenge, replacing any earlier one for the same user
    async fn put_challenge(&self, challenge: Challenge) -> AuthResult<()>;

    /// Remove and return the user's outstanding challenge
    async fn take_challenge(&self, user_id: UserId) -> AuthResult<Option<Challenge>>;

    /// Drop challenges whose window has elapsed; returns how many
    async fn purge_expired_challenges(&self, now_ms: i64) -> AuthResult<usize>;
}

/// Session token repository trait
#[trait_variant::make(SessionTokenRepository: Send)]
pub trait LocalSessionTokenRepository {
    /// Store a freshly issued token
    async fn create_token(&self, token: SessionToken) -> AuthResult<()>;

    /// Find token by its opaque value
    async fn find_token(&self, token: &str) -> AuthResult<Option<SessionToken>>;

    /// Drop expired tokens; returns how many
    async fn purge_expired_tokens(&self, now_ms: i64) -> AuthResult<usize>;
}
