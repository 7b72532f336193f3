//! Auction Service Trait
//!
//! Implemented by the replica node (local state), the failover front-end
//! (pass-through) and the HTTP RPC client (remote handle).

use crate::contract::error::ServiceResult;
use crate::contract::types::{
    AuctionItem, AuctionResult, AuctionSaleItem, Base64Bytes, ChallengeInfo, TokenInfo,
};
use crate::id::{ItemId, ReplicaId, UserId};

/// The Auction RPC surface
///
/// Every operation except `register`, `challenge`, `authenticate` and
/// `get_primary_replica_id` requires a valid session token bound to `user_id`.
#[trait_variant::make(Auction: Send)]
pub trait LocalAuction {
    /// Register a user and return the assigned ID
    async fn register(&self, email: String, public_key: Base64Bytes) -> ServiceResult<UserId>;

    /// Start the challenge-response handshake
    async fn challenge(
        &self,
        user_id: UserId,
        client_challenge: String,
    ) -> ServiceResult<ChallengeInfo>;

    /// Complete the handshake with a signature over the server challenge
    async fn authenticate(
        &self,
        user_id: UserId,
        signature: Base64Bytes,
    ) -> ServiceResult<TokenInfo>;

    async fn get_spec(
        &self,
        user_id: UserId,
        item_id: ItemId,
        token: String,
    ) -> ServiceResult<AuctionItem>;

    async fn new_auction(
        &self,
        user_id: UserId,
        item: AuctionSaleItem,
        token: String,
    ) -> ServiceResult<ItemId>;

    async fn list_items(&self, user_id: UserId, token: String) -> ServiceResult<Vec<AuctionItem>>;

    async fn close_auction(
        &self,
        user_id: UserId,
        item_id: ItemId,
        token: String,
    ) -> ServiceResult<AuctionResult>;

    /// Place a bid; `Ok(false)` when the price does not beat the highest bid
    async fn bid(
        &self,
        user_id: UserId,
        item_id: ItemId,
        price: i32,
        token: String,
    ) -> ServiceResult<bool>;

    /// Liveness probe returning the serving replica's identity
    async fn get_primary_replica_id(&self) -> ServiceResult<ReplicaId>;
}
