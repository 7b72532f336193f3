//! Issue Challenge Use Case
//!
//! First half of the handshake: sign the client's nonce with the server
//! key and hand back a fresh server nonce to be signed in return.

use std::sync::Arc;

use kernel::id::UserId;
use platform::crypto::random_nonce_b64;

use crate::application::config::AuthConfig;
use crate::domain::entity::Challenge;
use crate::domain::repository::{ChallengeRepository, UserRepository};
use crate::domain::services::sign_client_challenge;
use crate::error::{AuthError, AuthResult};

/// Output DTO for issue challenge
#[derive(Debug, Clone)]
pub struct IssueChallengeOutput {
    pub server_signature: Vec<u8>,
    pub server_challenge: String,
    pub expires_at_ms: i64,
}

/// Issue Challenge Use Case
pub struct IssueChallengeUseCase<U, C>
where
    U: UserRepository,
    C: ChallengeRepository,
{
    user_repo: Arc<U>,
    challenge_repo: Arc<C>,
    config: Arc<AuthConfig>,
}

impl<U, C> IssueChallengeUseCase<U, C>
where
    U: UserRepository,
    C: ChallengeRepository,
{
    pub fn new(user_repo: Arc<U>, challenge_repo: Arc<C>, config: Arc<AuthConfig>) -> Self {
        Self {
            user_repo,
            challenge_repo,
            config,
        }
    }

    pub async fn execute(
        &self,
        user_id: UserId,
        client_challenge: &str,
    ) -> AuthResult<IssueChallengeOutput> {
        if self.user_repo.find_user(user_id).await?.is_none() {
            return Err(AuthError::UnknownUser);
        }

        let server_signature = sign_client_challenge(&self.config.server_key, client_challenge);
        let server_challenge = random_nonce_b64(self.config.challenge_bytes_len);
        let challenge = Challenge::new(
            user_id,
            server_challenge.clone(),
            self.config.challenge_ttl_ms(),
        );
        let expires_at_ms = challenge.expires_at_ms;

        self.challenge_repo.put_challenge(challenge).await?;

        tracing::info!(user_id = %user_id, expires_at_ms, "Issued challenge");

        Ok(IssueChallengeOutput {
            server_signature,
            server_challenge,
            expires_at_ms,
        })
    }
}
