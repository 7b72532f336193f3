//! Check Token Use Case
//!
//! The authorization gate in front of every auction operation.

use std::sync::Arc;

use kernel::id::UserId;

use crate::domain::entity::SessionToken;
use crate::domain::repository::SessionTokenRepository;
use crate::error::{AuthError, AuthResult};

/// Check token use case
pub struct CheckTokenUseCase<T>
where
    T: SessionTokenRepository,
{
    token_repo: Arc<T>,
}

impl<T> CheckTokenUseCase<T>
where
    T: SessionTokenRepository,
{
    pub fn new(token_repo: Arc<T>) -> Self {
        Self { token_repo }
    }

    /// Resolve `user_id + token` to the live session it names
    ///
    /// Unknown, expired and foreign tokens all fail the same way.
    pub async fn execute(&self, user_id: UserId, token: &str) -> AuthResult<SessionToken> {
        let session = self
            .token_repo
            .find_token(token)
            .await?
            .ok_or(AuthError::TokenInvalid)?;

        if !session.authorizes(user_id) {
            return Err(AuthError::TokenInvalid);
        }
        tracing::debug!(
            user_id = %user_id,
            remaining_ms = session.remaining_ms(),
            "Token accepted"
        );
        Ok(session)
    }
}
