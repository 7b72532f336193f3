//! Authenticate Use Case
//!
//! Second half of the handshake. The pending challenge is consumed on
//! every attempt, successful or not.

use std::sync::Arc;

use kernel::id::UserId;
use platform::crypto::random_token;

use crate::application::config::AuthConfig;
use crate::domain::entity::SessionToken;
use crate::domain::repository::{ChallengeRepository, SessionTokenRepository, UserRepository};
use crate::domain::services::verify_challenge_response;
use crate::error::{AuthError, AuthResult};

/// Authenticate use case
pub struct AuthenticateUseCase<U, C, T>
where
    U: UserRepository,
    C: ChallengeRepository,
    T: SessionTokenRepository,
{
    user_repo: Arc<U>,
    challenge_repo: Arc<C>,
    token_repo: Arc<T>,
    config: Arc<AuthConfig>,
}

impl<U, C, T> AuthenticateUseCase<U, C, T>
where
    U: UserRepository,
    C: ChallengeRepository,
    T: SessionTokenRepository,
{
    pub fn new(
        user_repo: Arc<U>,
        challenge_repo: Arc<C>,
        token_repo: Arc<T>,
        config: Arc<AuthConfig>,
    ) -> Self {
        Self {
            user_repo,
            challenge_repo,
            token_repo,
            config,
        }
    }

    pub async fn execute(&self, user_id: UserId, signature: &[u8]) -> AuthResult<SessionToken> {
        let challenge = self
            .challenge_repo
            .take_challenge(user_id)
            .await?
            .ok_or(AuthError::ChallengeMissing)?;

        if challenge.is_expired() {
            return Err(AuthError::ChallengeExpired);
        }

        let user = self
            .user_repo
            .find_user(user_id)
            .await?
            .ok_or(AuthError::UnknownUser)?;

        if !verify_challenge_response(&user.public_key, &challenge.server_challenge, signature) {
            return Err(AuthError::SignatureInvalid);
        }

        let token = SessionToken::new(
            user_id,
            random_token(self.config.token_bytes_len),
            self.config.token_ttl_ms(),
        );
        self.token_repo.create_token(token.clone()).await?;

        tracing::info!(
            user_id = %user_id,
            expires_at_ms = token.expires_at_ms,
            "User authenticated"
        );

        Ok(token)
    }
}
