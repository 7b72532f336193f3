//! Value Object Module

pub mod email;
pub mod public_key;

pub use email::Email;
pub use public_key::PublicKey;
