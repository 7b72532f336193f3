//! Repository Traits

use kernel::contract::{AuctionResult, AuctionSaleItem};
use kernel::id::{ItemId, UserId};

use crate::domain::item::AuctionItemRecord;
use crate::error::ReplicaResult;

/// Auction item bookkeeping
///
/// Every method that changes replicated state bumps the snapshot version;
/// methods that change nothing (including a rejected bid) leave it alone.
#[trait_variant::make(AuctionStore: Send)]
pub trait LocalAuctionStore {
    /// Open an auction under a fresh item ID
    async fn open_auction(&self, seller_id: UserId, item: AuctionSaleItem)
    -> ReplicaResult<ItemId>;

    async fn find_item(&self, item_id: ItemId) -> ReplicaResult<Option<AuctionItemRecord>>;

    /// All open items ordered by ID
    async fn open_items(&self) -> ReplicaResult<Vec<AuctionItemRecord>>;

    /// `Ok(false)` when `price` does not beat the highest bid
    async fn place_bid(&self, bidder_id: UserId, item_id: ItemId, price: i32)
    -> ReplicaResult<bool>;

    /// Remove the item and report its winner
    async fn close_auction(&self, item_id: ItemId) -> ReplicaResult<AuctionResult>;
}
