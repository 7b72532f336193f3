//! Directory - name-to-endpoint registry
//!
//! Any node can enumerate live service endpoints by name and resolve one.
//! Listing order is registration order; rebinding a name keeps its slot.

pub mod client;
pub mod memory;
pub mod router;

use std::fmt;

use kernel::error::{app_error::AppError, kind::ErrorKind};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use client::HttpDirectory;
pub use memory::InMemoryDirectory;
pub use router::directory_router;

/// Base URL of a node (no trailing slash)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Endpoint(String);

impl Endpoint {
    pub fn new(url: impl Into<String>) -> Self {
        let url = url.into();
        Self(url.trim_end_matches('/').to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Absolute URL of `path` on this endpoint
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.0, path.trim_start_matches('/'))
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A directory entry resolved once and reused until a call through it fails
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeerHandle {
    pub name: String,
    pub endpoint: Endpoint,
}

impl PeerHandle {
    pub fn new(name: impl Into<String>, endpoint: Endpoint) -> Self {
        Self {
            name: name.into(),
            endpoint,
        }
    }
}

/// Directory errors
#[derive(Debug, Error)]
pub enum DirectoryError {
    /// The directory service itself could not be reached
    #[error("Directory unreachable: {0}")]
    Unreachable(String),

    #[error("Invalid directory name: {0}")]
    InvalidName(String),

    #[error("Directory error: {0}")]
    Internal(String),
}

pub type DirectoryResult<T> = Result<T, DirectoryError>;

impl DirectoryError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DirectoryError::Unreachable(_) => ErrorKind::ServiceUnavailable,
            DirectoryError::InvalidName(_) => ErrorKind::BadRequest,
            DirectoryError::Internal(_) => ErrorKind::InternalServerError,
        }
    }
}

impl From<DirectoryError> for AppError {
    fn from(err: DirectoryError) -> Self {
        let message = err.to_string();
        AppError::new(err.kind(), message).with_source(err)
    }
}

/// Directory trait
#[trait_variant::make(Directory: Send)]
pub trait LocalDirectory {
    /// Bind `name` to `endpoint`, replacing any previous binding
    async fn register(&self, name: &str, endpoint: &Endpoint) -> DirectoryResult<()>;

    /// Resolve a name
    async fn lookup(&self, name: &str) -> DirectoryResult<Option<Endpoint>>;

    /// All bound names in listing order
    async fn list(&self) -> DirectoryResult<Vec<String>>;

    /// Remove a binding (no-op if absent)
    async fn unbind(&self, name: &str) -> DirectoryResult<()>;
}

/// Resolve every entry whose name starts with `prefix`, in listing order
///
/// `exclude` skips one name (typically the caller's own). Entries that
/// disappear between `list` and `lookup` are skipped.
pub async fn resolve_peers<D>(
    directory: &D,
    prefix: &str,
    exclude: Option<&str>,
) -> DirectoryResult<Vec<PeerHandle>>
where
    D: Directory + Sync,
{
    let mut peers = Vec::new();
    for name in directory.list().await? {
        if !name.starts_with(prefix) || exclude == Some(name.as_str()) {
            continue;
        }
        if let Some(endpoint) = directory.lookup(&name).await? {
            peers.push(PeerHandle { name, endpoint });
        }
    }
    Ok(peers)
}

pub(crate) fn validate_name(name: &str) -> DirectoryResult<()> {
    let valid = !name.is_empty()
        && name.len() <= 64
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(DirectoryError::InvalidName(name.to_string()))
    }
}
