//! Replica Error Types

use auth::AuthError;
use axum::response::{IntoResponse, Response};
use kernel::contract::ServiceError;
use kernel::error::{app_error::AppError, kind::ErrorKind};
use platform::directory::DirectoryError;
use thiserror::Error;

/// Replica-specific result type alias
pub type ReplicaResult<T> = Result<T, ReplicaError>;

/// Replica-specific error variants
#[derive(Debug, Error)]
pub enum ReplicaError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("Item not found")]
    ItemNotFound,

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error(transparent)]
    Directory(#[from] DirectoryError),

    /// A peer did not answer a push or pull
    #[error("Peer {peer} unreachable: {reason}")]
    PeerUnreachable { peer: String, reason: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ReplicaError {
    pub fn peer_unreachable(peer: impl Into<String>, reason: impl ToString) -> Self {
        ReplicaError::PeerUnreachable {
            peer: peer.into(),
            reason: reason.to_string(),
        }
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            ReplicaError::Auth(err) => err.kind(),
            ReplicaError::ItemNotFound => ErrorKind::NotFound,
            ReplicaError::InvalidRequest(_) => ErrorKind::BadRequest,
            ReplicaError::Directory(err) => err.kind(),
            ReplicaError::PeerUnreachable { .. } => ErrorKind::ServiceUnavailable,
            ReplicaError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            ReplicaError::Internal(msg) => {
                tracing::error!(message = %msg, "Replica internal error");
            }
            ReplicaError::Directory(err) => {
                tracing::error!(error = %err, "Directory failure");
            }
            ReplicaError::PeerUnreachable { peer, reason } => {
                tracing::warn!(peer = %peer, reason = %reason, "Peer unreachable");
            }
            _ => {
                tracing::debug!(error = %self, "Replica error");
            }
        }
    }
}

impl From<ReplicaError> for ServiceError {
    fn from(err: ReplicaError) -> Self {
        match err {
            ReplicaError::Auth(err) => err.into(),
            ReplicaError::ItemNotFound => ServiceError::ItemNotFound,
            ReplicaError::InvalidRequest(reason) => ServiceError::InvalidRequest(reason),
            ReplicaError::PeerUnreachable { peer, reason } => {
                ServiceError::PeerUnreachable(format!("{}: {}", peer, reason))
            }
            other => {
                other.log();
                ServiceError::Internal(other.to_string())
            }
        }
    }
}

impl From<ReplicaError> for AppError {
    fn from(err: ReplicaError) -> Self {
        AppError::new(err.kind(), err.to_string())
    }
}

impl IntoResponse for ReplicaError {
    fn into_response(self) -> Response {
        self.log();
        AppError::from(self).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_error_mapping() {
        assert_eq!(
            ServiceError::from(ReplicaError::ItemNotFound),
            ServiceError::ItemNotFound
        );
        assert_eq!(
            ServiceError::from(ReplicaError::Auth(AuthError::TokenInvalid)),
            ServiceError::Unauthorized
        );
        assert!(
            ServiceError::from(ReplicaError::peer_unreachable("Replica2", "refused"))
                .is_transport()
        );
        assert!(matches!(
            ServiceError::from(ReplicaError::Internal("boom".to_string())),
            ServiceError::Internal(_)
        ));
    }

    #[test]
    fn test_kind() {
        assert_eq!(ReplicaError::ItemNotFound.kind(), ErrorKind::NotFound);
        assert_eq!(
            ReplicaError::Directory(DirectoryError::Unreachable("down".to_string())).kind(),
            ErrorKind::ServiceUnavailable
        );
    }
}
