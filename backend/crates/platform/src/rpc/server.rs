//! Auction RPC Router
//!
//! Serves any [`Auction`] implementation: the replica node serves its own
//! state, the front-end serves its failover proxy.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};
use kernel::contract::{
    Auction, AuctionItem, AuctionResult, AuthenticateRequest, BidRequest, BidResponse,
    ChallengeInfo, ChallengeRequest, CloseAuctionRequest, GetSpecRequest, ListItemsRequest,
    NewAuctionRequest, NewAuctionResponse, PrimaryReplicaResponse, RegisterRequest,
    RegisterResponse, ServiceError, ServiceResult, TokenInfo,
};

use super::paths;

/// Create the Auction RPC router for any Auction implementation
pub fn auction_router<A>(service: Arc<A>) -> Router
where
    A: Auction + Send + Sync + 'static,
{
    Router::new()
        .route(paths::REGISTER, post(register::<A>))
        .route(paths::CHALLENGE, post(challenge::<A>))
        .route(paths::AUTHENTICATE, post(authenticate::<A>))
        .route(paths::GET_SPEC, post(get_spec::<A>))
        .route(paths::NEW_AUCTION, post(new_auction::<A>))
        .route(paths::LIST_ITEMS, post(list_items::<A>))
        .route(paths::CLOSE_AUCTION, post(close_auction::<A>))
        .route(paths::BID, post(bid::<A>))
        .route(paths::PRIMARY_REPLICA_ID, get(primary_replica_id::<A>))
        .with_state(service)
}

fn logged<T>(method: &'static str, result: ServiceResult<T>) -> ServiceResult<T> {
    if let Err(err) = &result {
        match err {
            ServiceError::Internal(reason) => {
                tracing::error!(method, reason = %reason, "RPC failed");
            }
            ServiceError::Unavailable | ServiceError::PeerUnreachable(_) => {
                tracing::warn!(method, error = %err, "RPC could not be served");
            }
            _ => {
                tracing::debug!(method, code = err.code(), "RPC rejected");
            }
        }
    }
    result
}

/// POST /rpc/register
async fn register<A>(
    State(service): State<Arc<A>>,
    Json(req): Json<RegisterRequest>,
) -> ServiceResult<Json<RegisterResponse>>
where
    A: Auction + Send + Sync + 'static,
{
    let user_id = logged("register", service.register(req.email, req.public_key).await)?;
    Ok(Json(RegisterResponse { user_id }))
}

/// POST /rpc/challenge
async fn challenge<A>(
    State(service): State<Arc<A>>,
    Json(req): Json<ChallengeRequest>,
) -> ServiceResult<Json<ChallengeInfo>>
where
    A: Auction + Send + Sync + 'static,
{
    let info = logged(
        "challenge",
        service.challenge(req.user_id, req.client_challenge).await,
    )?;
    Ok(Json(info))
}

/// POST /rpc/authenticate
async fn authenticate<A>(
    State(service): State<Arc<A>>,
    Json(req): Json<AuthenticateRequest>,
) -> ServiceResult<Json<TokenInfo>>
where
    A: Auction + Send + Sync + 'static,
{
    let token = logged(
        "authenticate",
        service.authenticate(req.user_id, req.signature).await,
    )?;
    Ok(Json(token))
}

/// POST /rpc/get-spec
async fn get_spec<A>(
    State(service): State<Arc<A>>,
    Json(req): Json<GetSpecRequest>,
) -> ServiceResult<Json<AuctionItem>>
where
    A: Auction + Send + Sync + 'static,
{
    let item = logged(
        "getSpec",
        service.get_spec(req.user_id, req.item_id, req.token).await,
    )?;
    Ok(Json(item))
}

/// POST /rpc/new-auction
async fn new_auction<A>(
    State(service): State<Arc<A>>,
    Json(req): Json<NewAuctionRequest>,
) -> ServiceResult<Json<NewAuctionResponse>>
where
    A: Auction + Send + Sync + 'static,
{
    let item_id = logged(
        "newAuction",
        service.new_auction(req.user_id, req.item, req.token).await,
    )?;
    Ok(Json(NewAuctionResponse { item_id }))
}

/// POST /rpc/list-items
async fn list_items<A>(
    State(service): State<Arc<A>>,
    Json(req): Json<ListItemsRequest>,
) -> ServiceResult<Json<Vec<AuctionItem>>>
where
    A: Auction + Send + Sync + 'static,
{
    let items = logged("listItems", service.list_items(req.user_id, req.token).await)?;
    Ok(Json(items))
}

/// POST /rpc/close-auction
async fn close_auction<A>(
    State(service): State<Arc<A>>,
    Json(req): Json<CloseAuctionRequest>,
) -> ServiceResult<Json<AuctionResult>>
where
    A: Auction + Send + Sync + 'static,
{
    let result = logged(
        "closeAuction",
        service
            .close_auction(req.user_id, req.item_id, req.token)
            .await,
    )?;
    Ok(Json(result))
}

/// POST /rpc/bid
async fn bid<A>(
    State(service): State<Arc<A>>,
    Json(req): Json<BidRequest>,
) -> ServiceResult<Json<BidResponse>>
where
    A: Auction + Send + Sync + 'static,
{
    let accepted = logged(
        "bid",
        service
            .bid(req.user_id, req.item_id, req.price, req.token)
            .await,
    )?;
    Ok(Json(BidResponse { accepted }))
}

/// GET /rpc/primary-replica-id
async fn primary_replica_id<A>(
    State(service): State<Arc<A>>,
) -> ServiceResult<Json<PrimaryReplicaResponse>>
where
    A: Auction + Send + Sync + 'static,
{
    let replica_id = logged(
        "getPrimaryReplicaID",
        service.get_primary_replica_id().await,
    )?;
    Ok(Json(PrimaryReplicaResponse { replica_id }))
}

#[cfg(test)]
mod tests {
    use super::auction_router;
    use crate::directory::Endpoint;
    use crate::rpc::{AuctionClient, RpcClientConfig};
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use kernel::contract::{
        Auction, AuctionItem, AuctionResult, AuctionSaleItem, Base64Bytes, ChallengeInfo,
        ServiceError, ServiceResult, TokenInfo,
    };
    use kernel::id::{ItemId, ReplicaId, UserId};
    use std::sync::Arc;
    use tower::ServiceExt;

    const TOKEN: &str = "good-token";

    /// One-item auction answering from constants
    struct FixedAuction;

    impl FixedAuction {
        fn check(&self, token: &str) -> ServiceResult<()> {
            if token == TOKEN {
                Ok(())
            } else {
                Err(ServiceError::Unauthorized)
            }
        }

        fn item() -> AuctionItem {
            AuctionItem {
                item_id: ItemId::first(),
                name: "Vase".to_string(),
                description: "Ming".to_string(),
                highest_bid: 50,
                seller_id: UserId::first(),
            }
        }
    }

    impl Auction for FixedAuction {
        async fn register(&self, email: String, _key: Base64Bytes) -> ServiceResult<UserId> {
            if email.is_empty() {
                return Err(ServiceError::InvalidRequest("email is empty".to_string()));
            }
            Ok(UserId::new(7))
        }

        async fn challenge(&self, _user_id: UserId, _c: String) -> ServiceResult<ChallengeInfo> {
            Ok(ChallengeInfo {
                server_signature: Base64Bytes::new(vec![1, 2, 3]),
                server_challenge: "nonce".to_string(),
            })
        }

        async fn authenticate(&self, _u: UserId, _s: Base64Bytes) -> ServiceResult<TokenInfo> {
            Err(ServiceError::AuthFailed)
        }

        async fn get_spec(&self, _u: UserId, item_id: ItemId, token: String) -> ServiceResult<AuctionItem> {
            self.check(&token)?;
            if item_id == ItemId::first() {
                Ok(Self::item())
            } else {
                Err(ServiceError::ItemNotFound)
            }
        }

        async fn new_auction(&self, _u: UserId, _i: AuctionSaleItem, token: String) -> ServiceResult<ItemId> {
            self.check(&token)?;
            Ok(ItemId::new(2))
        }

        async fn list_items(&self, _u: UserId, token: String) -> ServiceResult<Vec<AuctionItem>> {
            self.check(&token)?;
            Ok(vec![Self::item()])
        }

        async fn close_auction(&self, _u: UserId, _i: ItemId, token: String) -> ServiceResult<AuctionResult> {
            self.check(&token)?;
            Ok(AuctionResult {
                winning_email: Some("a@x.com".to_string()),
                winning_price: 50,
            })
        }

        async fn bid(&self, _u: UserId, _i: ItemId, price: i32, token: String) -> ServiceResult<bool> {
            self.check(&token)?;
            Ok(price > 50)
        }

        async fn get_primary_replica_id(&self) -> ServiceResult<ReplicaId> {
            Err(ServiceError::Unavailable)
        }
    }

    async fn spawn(router: axum::Router) -> Endpoint {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        Endpoint::new(format!("http://{}", addr))
    }

    fn client(endpoint: Endpoint) -> AuctionClient {
        AuctionClient::new(endpoint, RpcClientConfig::testing().build_client().unwrap())
    }

    #[tokio::test]
    async fn test_oneshot_register_uses_camel_case() {
        let router = auction_router(Arc::new(FixedAuction));

        let response = router
            .oneshot(
                Request::post("/rpc/register")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"email":"a@x.com","publicKey":"AAEC"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["userId"], 7);
    }

    #[tokio::test]
    async fn test_oneshot_error_carries_code() {
        let router = auction_router(Arc::new(FixedAuction));

        let response = router
            .oneshot(
                Request::post("/rpc/list-items")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"userId":1,"token":"stale"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["code"], "UNAUTHORIZED");
    }

    #[tokio::test]
    async fn test_client_round_trip() {
        let endpoint = spawn(auction_router(Arc::new(FixedAuction))).await;
        let client = client(endpoint);
        let user = UserId::first();

        assert_eq!(
            client
                .register("a@x.com".to_string(), Base64Bytes::new(vec![0; 32]))
                .await
                .unwrap(),
            UserId::new(7)
        );

        let info = client.challenge(user, "hello".to_string()).await.unwrap();
        assert_eq!(info.server_challenge, "nonce");
        assert_eq!(info.server_signature.as_bytes(), &[1, 2, 3]);

        let item = client
            .get_spec(user, ItemId::first(), TOKEN.to_string())
            .await
            .unwrap();
        assert_eq!(item.name, "Vase");

        assert!(client.bid(user, ItemId::first(), 60, TOKEN.to_string()).await.unwrap());
        assert!(!client.bid(user, ItemId::first(), 40, TOKEN.to_string()).await.unwrap());

        let result = client
            .close_auction(user, ItemId::first(), TOKEN.to_string())
            .await
            .unwrap();
        assert_eq!(result.winning_email.as_deref(), Some("a@x.com"));
        assert_eq!(
            client
                .new_auction(
                    user,
                    AuctionSaleItem {
                        name: "Lamp".to_string(),
                        description: "Brass".to_string(),
                    },
                    TOKEN.to_string(),
                )
                .await
                .unwrap(),
            ItemId::new(2)
        );
        assert_eq!(client.list_items(user, TOKEN.to_string()).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_client_rebuilds_service_errors() {
        let endpoint = spawn(auction_router(Arc::new(FixedAuction))).await;
        let client = client(endpoint);
        let user = UserId::first();

        let err = client
            .get_spec(user, ItemId::new(9), TOKEN.to_string())
            .await
            .unwrap_err();
        assert_eq!(err, ServiceError::ItemNotFound);

        let err = client
            .list_items(user, "stale".to_string())
            .await
            .unwrap_err();
        assert_eq!(err, ServiceError::Unauthorized);

        let err = client
            .authenticate(user, Base64Bytes::new(vec![0; 64]))
            .await
            .unwrap_err();
        assert_eq!(err, ServiceError::AuthFailed);

        let err = client
            .register(String::new(), Base64Bytes::default())
            .await
            .unwrap_err();
        assert_eq!(err, ServiceError::InvalidRequest("email is empty".to_string()));

        let err = client.get_primary_replica_id().await.unwrap_err();
        assert_eq!(err, ServiceError::Unavailable);
    }

    #[tokio::test]
    async fn test_client_against_dead_endpoint_is_transport() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = client(Endpoint::new(format!("http://{}", addr)));
        let err = client.get_primary_replica_id().await.unwrap_err();
        assert!(err.is_transport());
    }
}
