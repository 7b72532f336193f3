//! Failover Proxy
//!
//! Forwards every Auction call to a cached primary replica. A transport
//! failure (or an empty cache) triggers discovery: replicas are probed with
//! `getPrimaryReplicaID` in directory-listing order and the first that
//! answers becomes the new primary. The failed call is retried once
//! against it; a second transport failure reaches the caller as
//! `Unavailable`. Application errors pass through untouched.

use std::future::Future;
use std::sync::Arc;

use kernel::contract::{
    Auction, AuctionItem, AuctionResult, AuctionSaleItem, Base64Bytes, ChallengeInfo,
    ServiceError, ServiceResult, TokenInfo,
};
use kernel::id::{ItemId, ReplicaId, UserId};
use platform::directory::{Directory, PeerHandle, resolve_peers};
use platform::rpc::AuctionClient;
use reqwest::Client;
use tokio::sync::RwLock;

use crate::config::ProxyConfig;
use crate::error::{ProxyError, ProxyResult};

#[derive(Debug, Clone)]
struct Primary {
    handle: PeerHandle,
    client: AuctionClient,
}

pub struct FailoverProxy<D>
where
    D: Directory,
{
    directory: Arc<D>,
    client: Client,
    config: ProxyConfig,
    primary: RwLock<Option<Primary>>,
}

impl<D> FailoverProxy<D>
where
    D: Directory + Send + Sync + 'static,
{
    pub fn new(directory: Arc<D>, client: Client, config: ProxyConfig) -> Self {
        Self {
            directory,
            client,
            config,
            primary: RwLock::new(None),
        }
    }

    /// Currently cached primary, if any
    pub async fn primary(&self) -> Option<PeerHandle> {
        self.primary
            .read()
            .await
            .as_ref()
            .map(|primary| primary.handle.clone())
    }

    /// Probe replicas in listing order and cache the first that answers
    pub async fn discover(&self) -> ProxyResult<PeerHandle> {
        let candidates =
            resolve_peers(self.directory.as_ref(), &self.config.replica_prefix, None).await?;

        for handle in &candidates {
            let client = AuctionClient::new(handle.endpoint.clone(), self.client.clone());
            match self.bounded(client.get_primary_replica_id()).await {
                Ok(replica_id) => {
                    tracing::info!(
                        peer = %handle.name,
                        replica_id = %replica_id,
                        "Adopted primary"
                    );
                    *self.primary.write().await = Some(Primary {
                        handle: handle.clone(),
                        client,
                    });
                    return Ok(handle.clone());
                }
                Err(err) => {
                    tracing::debug!(peer = %handle.name, error = %err, "Replica failed probe");
                }
            }
        }

        Err(ProxyError::NoReplica {
            candidates: candidates.len(),
        })
    }

    /// Bound a call by the configured timeout
    async fn bounded<T>(&self, call: impl Future<Output = ServiceResult<T>>) -> ServiceResult<T> {
        tokio::time::timeout(self.config.call_timeout, call)
            .await
            .unwrap_or_else(|_| {
                Err(ServiceError::PeerUnreachable(format!(
                    "no answer within {}ms",
                    self.config.call_timeout_ms()
                )))
            })
    }

    /// Drop the cached primary unless another call already replaced it
    async fn forget(&self, failed: &PeerHandle) {
        let mut primary = self.primary.write().await;
        if primary.as_ref().is_some_and(|p| &p.handle == failed) {
            *primary = None;
        }
    }

    async fn forward<T, F, Fut>(&self, method: &'static str, call: F) -> ServiceResult<T>
    where
        F: Fn(AuctionClient) -> Fut + Send + Sync,
        Fut: Future<Output = ServiceResult<T>> + Send,
        T: Send,
    {
        let cached = self.primary.read().await.clone();
        if let Some(primary) = cached {
            match self.bounded(call(primary.client.clone())).await {
                Err(err) if err.is_transport() => {
                    tracing::warn!(
                        method,
                        peer = %primary.handle.name,
                        error = %err,
                        "Primary unreachable, rediscovering"
                    );
                    self.forget(&primary.handle).await;
                }
                other => return other,
            }
        }

        self.discover().await?;
        let Some(primary) = self.primary.read().await.clone() else {
            return Err(ServiceError::Unavailable);
        };

        match self.bounded(call(primary.client.clone())).await {
            Err(err) if err.is_transport() => {
                tracing::warn!(
                    method,
                    peer = %primary.handle.name,
                    error = %err,
                    "Retry against new primary failed"
                );
                self.forget(&primary.handle).await;
                Err(ServiceError::Unavailable)
            }
            other => other,
        }
    }
}

impl<D> Auction for FailoverProxy<D>
where
    D: Directory + Send + Sync + 'static,
{
    async fn register(&self, email: String, public_key: Base64Bytes) -> ServiceResult<UserId> {
        self.forward("register", |primary| {
            let email = email.clone();
            let public_key = public_key.clone();
            async move { primary.register(email, public_key).await }
        })
        .await
    }

    async fn challenge(
        &self,
        user_id: UserId,
        client_challenge: String,
    ) -> ServiceResult<ChallengeInfo> {
        self.forward("challenge", |primary| {
            let client_challenge = client_challenge.clone();
            async move { primary.challenge(user_id, client_challenge).await }
        })
        .await
    }

    async fn authenticate(
        &self,
        user_id: UserId,
        signature: Base64Bytes,
    ) -> ServiceResult<TokenInfo> {
        self.forward("authenticate", |primary| {
            let signature = signature.clone();
            async move { primary.authenticate(user_id, signature).await }
        })
        .await
    }

    async fn get_spec(
        &self,
        user_id: UserId,
        item_id: ItemId,
        token: String,
    ) -> ServiceResult<AuctionItem> {
        self.forward("getSpec", |primary| {
            let token = token.clone();
            async move { primary.get_spec(user_id, item_id, token).await }
        })
        .await
    }

    async fn new_auction(
        &self,
        user_id: UserId,
        item: AuctionSaleItem,
        token: String,
    ) -> ServiceResult<ItemId> {
        self.forward("newAuction", |primary| {
            let item = item.clone();
            let token = token.clone();
            async move { primary.new_auction(user_id, item, token).await }
        })
        .await
    }

    async fn list_items(&self, user_id: UserId, token: String) -> ServiceResult<Vec<AuctionItem>> {
        self.forward("listItems", |primary| {
            let token = token.clone();
            async move { primary.list_items(user_id, token).await }
        })
        .await
    }

    async fn close_auction(
        &self,
        user_id: UserId,
        item_id: ItemId,
        token: String,
    ) -> ServiceResult<AuctionResult> {
        self.forward("closeAuction", |primary| {
            let token = token.clone();
            async move { primary.close_auction(user_id, item_id, token).await }
        })
        .await
    }

    async fn bid(
        &self,
        user_id: UserId,
        item_id: ItemId,
        price: i32,
        token: String,
    ) -> ServiceResult<bool> {
        self.forward("bid", |primary| {
            let token = token.clone();
            async move { primary.bid(user_id, item_id, price, token).await }
        })
        .await
    }

    async fn get_primary_replica_id(&self) -> ServiceResult<ReplicaId> {
        self.forward("getPrimaryReplicaID", |primary| async move {
            primary.get_primary_replica_id().await
        })
        .await
    }
}
