//! Shared Kernel - Domain-crossing minimal core
//!
//! This crate contains the "smallest core" of the auction vocabulary:
//! - Common error types and result aliases
//! - Typed integer IDs shared by every node
//! - The Auction service contract (trait, wire types, service errors)
//!
//! **Design Principle**: Only include things that are "hard to change"
//! and have consistent meaning across the replica, the front-end and clients.

pub mod error {
    pub mod app_error;
    pub mod conversions;
    pub mod kind;
}
pub mod contract;
pub mod id;
