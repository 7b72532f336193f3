//! Replica State
//!
//! Replicated tables live behind one `RwLock` so reads run concurrently
//! and writes (and their version bumps) are serialized. Pending challenges
//! are node-local and sit in their own `Mutex`.

use auth::domain::entity::{Challenge, SessionToken, User};
use auth::domain::repository::{ChallengeRepository, SessionTokenRepository, UserRepository};
use auth::domain::value_object::{Email, PublicKey};
use auth::infra::memory::ChallengeTable;
use auth::AuthResult;
use kernel::contract::{AuctionResult, AuctionSaleItem};
use kernel::id::{ItemId, UserId};
use tokio::sync::{Mutex, RwLock};

use crate::domain::item::AuctionItemRecord;
use crate::domain::repository::AuctionStore;
use crate::domain::snapshot::StateSnapshot;
use crate::error::{ReplicaError, ReplicaResult};

#[derive(Debug, Default)]
pub struct ReplicaState {
    tables: RwLock<StateSnapshot>,
    challenges: Mutex<ChallengeTable>,
}

impl ReplicaState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing snapshot
    pub fn seeded(snapshot: StateSnapshot) -> Self {
        Self {
            tables: RwLock::new(snapshot),
            challenges: Mutex::new(ChallengeTable::default()),
        }
    }

    /// Consistent copy of every replicated table
    pub async fn snapshot(&self) -> StateSnapshot {
        self.tables.read().await.clone()
    }

    pub async fn version(&self) -> u64 {
        self.tables.read().await.version
    }

    /// Replace local tables iff `snapshot` is newer
    pub async fn apply(&self, snapshot: StateSnapshot) -> bool {
        let mut tables = self.tables.write().await;
        if !snapshot.supersedes(tables.version) {
            return false;
        }
        *tables = snapshot;
        true
    }
}

impl UserRepository for ReplicaState {
    async fn create_user(&self, email: Email, public_key: PublicKey) -> AuthResult<User> {
        let mut tables = self.tables.write().await;
        let user = tables.users.insert_next(email, public_key);
        tables.bump();
        Ok(user)
    }

    async fn find_user(&self, user_id: UserId) -> AuthResult<Option<User>> {
        Ok(self.tables.read().await.users.get(user_id).cloned())
    }
}

impl ChallengeRepository for ReplicaState {
    async fn put_challenge(&self, challenge: Challenge) -> AuthResult<()> {
        self.challenges.lock().await.put(challenge);
        Ok(())
    }

    async fn take_challenge(&self, user_id: UserId) -> AuthResult<Option<Challenge>> {
        Ok(self.challenges.lock().await.take(user_id))
    }

    async fn purge_expired_challenges(&self, now_ms: i64) -> AuthResult<usize> {
        Ok(self.challenges.lock().await.purge_expired(now_ms))
    }
}

impl SessionTokenRepository for ReplicaState {
    async fn create_token(&self, token: SessionToken) -> AuthResult<()> {
        let mut tables = self.tables.write().await;
        tables.tokens.insert(token);
        tables.bump();
        Ok(())
    }

    async fn find_token(&self, token: &str) -> AuthResult<Option<SessionToken>> {
        Ok(self.tables.read().await.tokens.get(token).cloned())
    }

    async fn purge_expired_tokens(&self, now_ms: i64) -> AuthResult<usize> {
        let mut tables = self.tables.write().await;
        let purged = tables.tokens.purge_expired(now_ms);
        if purged > 0 {
            tables.bump();
        }
        Ok(purged)
    }
}

impl AuctionStore for ReplicaState {
    async fn open_auction(
        &self,
        seller_id: UserId,
        item: AuctionSaleItem,
    ) -> ReplicaResult<ItemId> {
        let mut tables = self.tables.write().await;
        let item_id = tables.allocate_item_id();
        tables
            .items
            .insert(AuctionItemRecord::new(item_id, seller_id, item));
        tables.bump();
        Ok(item_id)
    }

    async fn find_item(&self, item_id: ItemId) -> ReplicaResult<Option<AuctionItemRecord>> {
        Ok(self.tables.read().await.items.get(item_id).cloned())
    }

    async fn open_items(&self) -> ReplicaResult<Vec<AuctionItemRecord>> {
        Ok(self.tables.read().await.items.iter().cloned().collect())
    }

    async fn place_bid(
        &self,
        bidder_id: UserId,
        item_id: ItemId,
        price: i32,
    ) -> ReplicaResult<bool> {
        let mut tables = self.tables.write().await;
        let item = tables
            .items
            .get_mut(item_id)
            .ok_or(ReplicaError::ItemNotFound)?;
        let accepted = item.place_bid(bidder_id, price);
        if accepted {
            tables.bump();
        }
        Ok(accepted)
    }

    async fn close_auction(&self, item_id: ItemId) -> ReplicaResult<AuctionResult> {
        let mut tables = self.tables.write().await;
        let item = tables
            .items
            .remove(item_id)
            .ok_or(ReplicaError::ItemNotFound)?;
        tables.bump();

        let winning_email = item
            .highest_bidder_id
            .and_then(|bidder| tables.users.get(bidder))
            .map(|user| user.email.to_string());

        Ok(AuctionResult {
            winning_email,
            winning_price: item.highest_bid,
        })
    }
}
