//! Register Use Case
//!
//! Validates the email and public key and creates the user record.
//! Emails are not deduplicated: registering twice yields two users.

use std::sync::Arc;

use kernel::id::UserId;

use crate::domain::repository::UserRepository;
use crate::domain::value_object::{Email, PublicKey};
use crate::error::{AuthError, AuthResult};

/// Register input
pub struct RegisterInput {
    pub email: String,
    /// Raw 32-byte ed25519 verifying key
    pub public_key: Vec<u8>,
}

/// Register output
pub struct RegisterOutput {
    pub user_id: UserId,
}

/// Register use case
pub struct RegisterUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
}

impl<U> RegisterUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>) -> Self {
        Self { user_repo }
    }

    pub async fn execute(&self, input: RegisterInput) -> AuthResult<RegisterOutput> {
        let email =
            Email::new(input.email).map_err(|e| AuthError::InvalidEmail(e.message().to_string()))?;
        let public_key = PublicKey::from_bytes(&input.public_key)?;

        let user = self.user_repo.create_user(email, public_key).await?;

        tracing::info!(
            user_id = %user.user_id,
            key = %public_key.fingerprint(),
            "User registered"
        );

        Ok(RegisterOutput {
            user_id: user.user_id,
        })
    }
}
