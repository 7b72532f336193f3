//! Auth Error Types
//!
//! This module provides auth-specific error variants that integrate
//! with the unified `kernel::error::AppError` system and with the
//! client-visible `ServiceError` taxonomy.

use kernel::contract::ServiceError;
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

/// Auth-specific error variants
#[derive(Debug, Error)]
pub enum AuthError {
    /// No user registered under the given ID
    #[error("Unknown user")]
    UnknownUser,

    /// Email failed validation
    #[error("Invalid email: {0}")]
    InvalidEmail(String),

    /// Public key is not a valid ed25519 verifying key
    #[error("Invalid public key")]
    InvalidPublicKey,

    /// No outstanding challenge for the user
    #[error("No outstanding challenge")]
    ChallengeMissing,

    /// Challenge validity window elapsed
    #[error("Challenge expired")]
    ChallengeExpired,

    /// Signature does not verify against the server challenge
    #[error("Signature verification failed")]
    SignatureInvalid,

    /// Token missing, expired, or bound to another user
    #[error("Session token invalid")]
    TokenInvalid,

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::UnknownUser => ErrorKind::NotFound,
            AuthError::InvalidEmail(_) | AuthError::InvalidPublicKey => ErrorKind::BadRequest,
            AuthError::ChallengeMissing
            | AuthError::ChallengeExpired
            | AuthError::SignatureInvalid
            | AuthError::TokenInvalid => ErrorKind::Unauthorized,
            AuthError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Convert to AppError
    pub fn to_app_error(&self) -> AppError {
        AppError::new(self.kind(), self.to_string())
    }

    /// Log the error with appropriate level
    pub fn log(&self) {
        match self {
            AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Auth internal error");
            }
            AuthError::SignatureInvalid => {
                tracing::warn!("Challenge response rejected");
            }
            AuthError::ChallengeExpired => {
                tracing::warn!("Challenge response arrived after expiry");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

/// Collapse auth failures onto the client-visible taxonomy
///
/// Every handshake failure reads as `AuthFailed` and every gate failure as
/// `Unauthorized`, so a caller never learns which check tripped.
impl From<AuthError> for ServiceError {
    fn from(err: AuthError) -> Self {
        err.log();
        match err {
            AuthError::UnknownUser => ServiceError::UnknownUser,
            AuthError::InvalidEmail(reason) => ServiceError::InvalidRequest(reason),
            AuthError::InvalidPublicKey => {
                ServiceError::InvalidRequest("public key must be a 32-byte ed25519 key".to_string())
            }
            AuthError::ChallengeMissing
            | AuthError::ChallengeExpired
            | AuthError::SignatureInvalid => ServiceError::AuthFailed,
            AuthError::TokenInvalid => ServiceError::Unauthorized,
            AuthError::Internal(reason) => ServiceError::Internal(reason),
        }
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        err.to_app_error()
    }
}

impl From<AppError> for AuthError {
    fn from(err: AppError) -> Self {
        AuthError::Internal(err.to_string())
    }
}
