//! Domain Layer
//!
//! Contains entities, value objects, repository traits and the
//! signature rules of the handshake.

pub mod entity;
pub mod repository;
pub mod services;
pub mod value_object;

// Re-exports
pub use entity::{Challenge, SessionToken, User};
pub use repository::{ChallengeRepository, SessionTokenRepository, UserRepository};
