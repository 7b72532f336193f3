//! Application Layer
//!
//! Use cases and application services.

pub mod authenticate;
pub mod check_token;
pub mod config;
pub mod issue_challenge;
pub mod purge_expired;
pub mod register;

// Re-exports
pub use authenticate::AuthenticateUseCase;
pub use check_token::CheckTokenUseCase;
pub use config::AuthConfig;
pub use issue_challenge::{IssueChallengeOutput, IssueChallengeUseCase};
pub use purge_expired::{PurgeExpiredOutput, PurgeExpiredUseCase};
pub use register::{RegisterInput, RegisterOutput, RegisterUseCase};
