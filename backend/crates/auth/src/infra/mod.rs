//! Infrastructure Layer
//!
//! In-memory table implementations of the auth repositories.

pub mod memory;

pub use memory::{ChallengeTable, MemoryAuthRepository, TokenTable, UserTable};
