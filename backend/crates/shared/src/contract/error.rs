//! Service Error Taxonomy
//!
//! Errors visible across the RPC boundary. Every variant carries a stable
//! machine-readable code so clients can tell "retry" from "re-authenticate"
//! from "give up".

use thiserror::Error;

use crate::error::{app_error::AppError, kind::ErrorKind};

/// Service-level result type alias
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Errors surfaced by the Auction contract
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    /// No user registered under the given ID
    #[error("Unknown user")]
    UnknownUser,

    /// Bad signature, or missing/expired challenge
    #[error("Authentication failed")]
    AuthFailed,

    /// Missing, invalid or expired session token
    #[error("Unauthorized")]
    Unauthorized,

    #[error("Item not found")]
    ItemNotFound,

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Transport-level failure talking to a peer; never surfaced to clients
    #[error("Peer unreachable: {0}")]
    PeerUnreachable(String),

    /// No responsive replica after re-discovery
    #[error("Service unavailable")]
    Unavailable,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    /// Stable wire code
    pub const fn code(&self) -> &'static str {
        match self {
            ServiceError::UnknownUser => "UNKNOWN_USER",
            ServiceError::AuthFailed => "AUTH_FAILED",
            ServiceError::Unauthorized => "UNAUTHORIZED",
            ServiceError::ItemNotFound => "ITEM_NOT_FOUND",
            ServiceError::InvalidRequest(_) => "INVALID_REQUEST",
            // A peer failure seen by a client means nothing answered.
            ServiceError::PeerUnreachable(_) | ServiceError::Unavailable => "UNAVAILABLE",
            ServiceError::Internal(_) => "INTERNAL",
        }
    }

    pub const fn kind(&self) -> ErrorKind {
        match self {
            ServiceError::UnknownUser | ServiceError::ItemNotFound => ErrorKind::NotFound,
            ServiceError::AuthFailed | ServiceError::Unauthorized => ErrorKind::Unauthorized,
            ServiceError::InvalidRequest(_) => ErrorKind::BadRequest,
            ServiceError::PeerUnreachable(_) | ServiceError::Unavailable => {
                ErrorKind::ServiceUnavailable
            }
            ServiceError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Rebuild an error from its wire code
    ///
    /// Returns `None` for unrecognized codes.
    pub fn from_code(code: &str, detail: &str) -> Option<Self> {
        let err = match code {
            "UNKNOWN_USER" => ServiceError::UnknownUser,
            "AUTH_FAILED" => ServiceError::AuthFailed,
            "UNAUTHORIZED" => ServiceError::Unauthorized,
            "ITEM_NOT_FOUND" => ServiceError::ItemNotFound,
            "INVALID_REQUEST" => ServiceError::InvalidRequest(detail.to_string()),
            "UNAVAILABLE" => ServiceError::Unavailable,
            "INTERNAL" => ServiceError::Internal(detail.to_string()),
            _ => return None,
        };
        Some(err)
    }

    /// Whether this failure should trigger primary re-discovery
    pub const fn is_transport(&self) -> bool {
        matches!(self, ServiceError::PeerUnreachable(_))
    }

    /// Detail string carried in the problem body
    pub fn detail(&self) -> String {
        match self {
            ServiceError::InvalidRequest(reason) | ServiceError::Internal(reason) => {
                reason.clone()
            }
            other => other.to_string(),
        }
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        let app_err = AppError::new(err.kind(), err.to_string());
        match err {
            ServiceError::Unauthorized | ServiceError::AuthFailed => {
                app_err.with_action("Run the challenge-response handshake again")
            }
            ServiceError::Unavailable | ServiceError::PeerUnreachable(_) => {
                app_err.with_action("Retry later")
            }
            _ => app_err,
        }
    }
}

#[cfg(feature = "axum")]
impl axum::response::IntoResponse for ServiceError {
    fn into_response(self) -> axum::response::Response {
        use axum::Json;
        use axum::http::StatusCode;

        let kind = self.kind();
        let status =
            StatusCode::from_u16(kind.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        // RFC 7807 Problem Details plus a machine-readable code
        let body = serde_json::json!({
            "type": format!("https://httpstatuses.io/{}", kind.status_code()),
            "title": kind.as_str(),
            "status": kind.status_code(),
            "code": self.code(),
            "detail": self.detail(),
        });

        (status, Json(body)).into_response()
    }
}
