//! Replica Node
//!
//! Serves every Auction operation from local state. Operations that change
//! replicated state push the full snapshot to all known peers before
//! returning; push failures are logged and never fail the call.

use std::sync::Arc;

use auth::application::{
    AuthConfig, AuthenticateUseCase, CheckTokenUseCase, IssueChallengeUseCase,
    PurgeExpiredOutput, PurgeExpiredUseCase, RegisterInput, RegisterUseCase,
};
use kernel::contract::{
    Auction, AuctionItem, AuctionResult, AuctionSaleItem, Base64Bytes, ChallengeInfo,
    ServiceError, ServiceResult, TokenInfo,
};
use kernel::id::{ItemId, ReplicaId, UserId};
use platform::directory::{Directory, PeerHandle};
use tokio::sync::Mutex;

use crate::application::config::ReplicaConfig;
use crate::application::peers::PeerSet;
use crate::domain::repository::AuctionStore;
use crate::domain::snapshot::StateSnapshot;
use crate::error::ReplicaResult;
use crate::infra::peer_client::PeerClient;
use crate::infra::state::ReplicaState;

/// One full copy of the service state
pub struct ReplicaNode<D>
where
    D: Directory,
{
    pub(crate) config: Arc<ReplicaConfig>,
    pub(crate) auth_config: Arc<AuthConfig>,
    pub(crate) state: Arc<ReplicaState>,
    pub(crate) directory: Arc<D>,
    pub(crate) peers: PeerSet,
    pub(crate) peer_client: PeerClient,
    /// Serializes broadcasts so snapshots leave in version order
    pub(crate) broadcast_lock: Mutex<()>,
}

impl<D> ReplicaNode<D>
where
    D: Directory + Send + Sync + 'static,
{
    pub fn new(
        config: ReplicaConfig,
        auth_config: AuthConfig,
        directory: Arc<D>,
        client: reqwest::Client,
    ) -> Self {
        Self::with_state(config, auth_config, directory, client, ReplicaState::new())
    }

    /// Build a node over pre-seeded state
    pub fn with_state(
        config: ReplicaConfig,
        auth_config: AuthConfig,
        directory: Arc<D>,
        client: reqwest::Client,
        state: ReplicaState,
    ) -> Self {
        let peer_client = PeerClient::new(client, config.peer_timeout);
        Self {
            config: Arc::new(config),
            auth_config: Arc::new(auth_config),
            state: Arc::new(state),
            directory,
            peers: PeerSet::new(),
            peer_client,
            broadcast_lock: Mutex::new(()),
        }
    }

    pub fn config(&self) -> &ReplicaConfig {
        &self.config
    }

    pub fn replica_id(&self) -> ReplicaId {
        self.config.replica_id
    }

    pub async fn snapshot(&self) -> StateSnapshot {
        self.state.snapshot().await
    }

    pub async fn version(&self) -> u64 {
        self.state.version().await
    }

    /// Currently known peers
    pub async fn peers(&self) -> Vec<PeerHandle> {
        self.peers.list().await
    }

    /// The authorization gate
    async fn authorize(&self, user_id: UserId, token: &str) -> ServiceResult<()> {
        CheckTokenUseCase::new(self.state.clone())
            .execute(user_id, token)
            .await?;
        Ok(())
    }

    /// Drop expired challenges and tokens; broadcast if any token went
    pub async fn purge_expired(&self) -> ReplicaResult<PurgeExpiredOutput> {
        let output = PurgeExpiredUseCase::new(self.state.clone(), self.state.clone())
            .execute()
            .await?;
        if output.tokens > 0 {
            self.broadcast().await;
        }
        Ok(output)
    }
}

impl<D> Auction for ReplicaNode<D>
where
    D: Directory + Send + Sync + 'static,
{
    async fn register(&self, email: String, public_key: Base64Bytes) -> ServiceResult<UserId> {
        let output = RegisterUseCase::new(self.state.clone())
            .execute(RegisterInput {
                email,
                public_key: public_key.into_inner(),
            })
            .await?;
        self.broadcast().await;
        Ok(output.user_id)
    }

    async fn challenge(
        &self,
        user_id: UserId,
        client_challenge: String,
    ) -> ServiceResult<ChallengeInfo> {
        let output = IssueChallengeUseCase::new(
            self.state.clone(),
            self.state.clone(),
            self.auth_config.clone(),
        )
        .execute(user_id, &client_challenge)
        .await?;

        Ok(ChallengeInfo {
            server_signature: Base64Bytes::new(output.server_signature),
            server_challenge: output.server_challenge,
        })
    }

    async fn authenticate(
        &self,
        user_id: UserId,
        signature: Base64Bytes,
    ) -> ServiceResult<TokenInfo> {
        let token = AuthenticateUseCase::new(
            self.state.clone(),
            self.state.clone(),
            self.state.clone(),
            self.auth_config.clone(),
        )
        .execute(user_id, signature.as_bytes())
        .await?;
        self.broadcast().await;

        Ok(TokenInfo {
            token: token.token,
            expires_at_ms: token.expires_at_ms,
        })
    }

    async fn get_spec(
        &self,
        user_id: UserId,
        item_id: ItemId,
        token: String,
    ) -> ServiceResult<AuctionItem> {
        self.authorize(user_id, &token).await?;
        let item = self
            .state
            .find_item(item_id)
            .await?
            .ok_or(ServiceError::ItemNotFound)?;
        Ok(AuctionItem::from(&item))
    }

    async fn new_auction(
        &self,
        user_id: UserId,
        item: AuctionSaleItem,
        token: String,
    ) -> ServiceResult<ItemId> {
        self.authorize(user_id, &token).await?;
        if item.name.trim().is_empty() {
            return Err(ServiceError::InvalidRequest(
                "item name cannot be empty".to_string(),
            ));
        }

        let item_id = self.state.open_auction(user_id, item).await?;
        tracing::info!(
            replica_id = %self.config.replica_id,
            user_id = %user_id,
            item_id = %item_id,
            "Auction opened"
        );
        self.broadcast().await;
        Ok(item_id)
    }

    async fn list_items(&self, user_id: UserId, token: String) -> ServiceResult<Vec<AuctionItem>> {
        self.authorize(user_id, &token).await?;
        let items = self.state.open_items().await?;
        Ok(items.iter().map(AuctionItem::from).collect())
    }

    async fn close_auction(
        &self,
        user_id: UserId,
        item_id: ItemId,
        token: String,
    ) -> ServiceResult<AuctionResult> {
        self.authorize(user_id, &token).await?;
        let result = self.state.close_auction(item_id).await?;
        tracing::info!(
            replica_id = %self.config.replica_id,
            user_id = %user_id,
            item_id = %item_id,
            winning_price = result.winning_price,
            "Auction closed"
        );
        self.broadcast().await;
        Ok(result)
    }

    async fn bid(
        &self,
        user_id: UserId,
        item_id: ItemId,
        price: i32,
        token: String,
    ) -> ServiceResult<bool> {
        self.authorize(user_id, &token).await?;
        let accepted = self.state.place_bid(user_id, item_id, price).await?;
        if accepted {
            tracing::info!(user_id = %user_id, item_id = %item_id, price, "Bid accepted");
            self.broadcast().await;
        } else {
            tracing::debug!(user_id = %user_id, item_id = %item_id, price, "Bid too low");
        }
        Ok(accepted)
    }

    async fn get_primary_replica_id(&self) -> ServiceResult<ReplicaId> {
        Ok(self.config.replica_id)
    }
}
