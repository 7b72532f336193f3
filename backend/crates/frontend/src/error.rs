//! Proxy Error Types

use kernel::contract::ServiceError;
use kernel::error::kind::ErrorKind;
use platform::directory::DirectoryError;
use thiserror::Error;

pub type ProxyResult<T> = Result<T, ProxyError>;

/// Why no primary could be found
#[derive(Debug, Error)]
pub enum ProxyError {
    #[error(transparent)]
    Directory(#[from] DirectoryError),

    /// Every listed replica failed the liveness probe
    #[error("No responsive replica among {candidates} candidates")]
    NoReplica { candidates: usize },
}

impl ProxyError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ProxyError::Directory(err) => err.kind(),
            ProxyError::NoReplica { .. } => ErrorKind::ServiceUnavailable,
        }
    }

    fn log(&self) {
        match self {
            ProxyError::Directory(err) => {
                tracing::error!(error = %err, "Discovery could not read the directory");
            }
            ProxyError::NoReplica { candidates } => {
                tracing::warn!(candidates, "Discovery found no responsive replica");
            }
        }
    }
}

/// Clients only ever see `Unavailable` when discovery comes up empty
impl From<ProxyError> for ServiceError {
    fn from(err: ProxyError) -> Self {
        err.log();
        ServiceError::Unavailable
    }
}
