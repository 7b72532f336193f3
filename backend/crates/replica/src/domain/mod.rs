//! Domain Layer
//!
//! Auction items, the replicated snapshot, and the auction store trait.

pub mod item;
pub mod repository;
pub mod snapshot;

// Re-exports
pub use item::{AuctionItemRecord, ItemTable};
pub use repository::AuctionStore;
pub use snapshot::StateSnapshot;
