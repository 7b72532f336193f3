//! Purge Expired Use Case
//!
//! Periodic cleanup of elapsed challenges and expired tokens.

use std::sync::Arc;

use chrono::Utc;

use crate::domain::repository::{ChallengeRepository, SessionTokenRepository};
use crate::error::AuthResult;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PurgeExpiredOutput {
    pub challenges: usize,
    pub tokens: usize,
}

/// Purge expired use case
pub struct PurgeExpiredUseCase<C, T>
where
    C: ChallengeRepository,
    T: SessionTokenRepository,
{
    challenge_repo: Arc<C>,
    token_repo: Arc<T>,
}

impl<C, T> PurgeExpiredUseCase<C, T>
where
    C: ChallengeRepository,
    T: SessionTokenRepository,
{
    pub fn new(challenge_repo: Arc<C>, token_repo: Arc<T>) -> Self {
        Self {
            challenge_repo,
            token_repo,
        }
    }

    pub async fn execute(&self) -> AuthResult<PurgeExpiredOutput> {
        let now_ms = Utc::now().timestamp_millis();
        let challenges = self.challenge_repo.purge_expired_challenges(now_ms).await?;
        let tokens = self.token_repo.purge_expired_tokens(now_ms).await?;

        if challenges > 0 || tokens > 0 {
            tracing::info!(challenges, tokens, "Purged expired auth state");
        }

        Ok(PurgeExpiredOutput { challenges, tokens })
    }
}
