//! Auth (Session Authentication) Module
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, repository traits, signature rules
//! - `application/` - Use cases (register, challenge, authenticate, token gate)
//! - `infra/` - In-memory tables
//!
//! ## Protocol
//! 1. `challenge(userID, clientChallenge)`: the server signs the client's
//!    nonce with its ed25519 key and returns a fresh server nonce
//! 2. `authenticate(userID, signature)`: the client's signature over the
//!    server nonce is checked against the registered public key; the
//!    pending challenge is consumed either way
//! 3. The issued bearer token is reusable until it expires

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;

#[cfg(test)]
mod tests;

// Re-exports for convenience
pub use application::config::AuthConfig;
pub use error::{AuthError, AuthResult};
pub use infra::memory::MemoryAuthRepository;

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

pub mod models {
    pub use crate::domain::entity::*;
    pub use crate::domain::value_object::*;
}
