//! Entity Module

pub mod challenge;
pub mod session_token;
pub mod user;

pub use challenge::Challenge;
pub use session_token::SessionToken;
pub use user::User;
