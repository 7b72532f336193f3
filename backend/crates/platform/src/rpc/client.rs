//! Auction RPC client
//!
//! A remote handle implementing [`Auction`] over HTTP. Used by the
//! front-end to reach the primary and by tests acting as clients.

use kernel::contract::{
    Auction, AuctionItem, AuctionResult, AuctionSaleItem, AuthenticateRequest, Base64Bytes,
    BidRequest, BidResponse, ChallengeInfo, ChallengeRequest, CloseAuctionRequest, GetSpecRequest,
    ListItemsRequest, NewAuctionRequest, NewAuctionResponse, PrimaryReplicaResponse,
    RegisterRequest, RegisterResponse, ServiceError, ServiceResult, TokenInfo,
};
use kernel::error::kind::ErrorKind;
use kernel::id::{ItemId, ReplicaId, UserId};
use reqwest::Client;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use thiserror::Error;

use super::paths;
use crate::directory::Endpoint;

/// Failures of a single RPC round-trip
#[derive(Debug, Error)]
pub enum RpcError {
    /// Connection refused/reset, timeout, or the body was cut short
    #[error("Transport failure: {0}")]
    Transport(String),

    /// The peer answered with a non-success status
    #[error("Peer answered {status}: {detail}")]
    Status {
        status: u16,
        code: Option<String>,
        detail: String,
    },

    /// The peer answered 2xx with a body we could not decode
    #[error("Malformed response: {0}")]
    Decode(String),
}

pub type RpcResult<T> = Result<T, RpcError>;

impl RpcError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RpcError::Transport(_) => ErrorKind::ServiceUnavailable,
            RpcError::Status { status, .. } => match *status {
                400 => ErrorKind::BadRequest,
                401 => ErrorKind::Unauthorized,
                404 => ErrorKind::NotFound,
                502..=504 => ErrorKind::ServiceUnavailable,
                _ => ErrorKind::InternalServerError,
            },
            RpcError::Decode(_) => ErrorKind::InternalServerError,
        }
    }

    fn log(&self) {
        match self {
            RpcError::Transport(reason) => {
                tracing::debug!(reason = %reason, "RPC transport failure");
            }
            RpcError::Status { status, code, .. } if *status >= 500 => {
                tracing::debug!(status, code = ?code, "RPC peer error");
            }
            RpcError::Decode(reason) => {
                tracing::warn!(reason = %reason, "RPC response could not be decoded");
            }
            _ => {}
        }
    }
}

impl From<reqwest::Error> for RpcError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            RpcError::Decode(err.to_string())
        } else {
            RpcError::Transport(err.to_string())
        }
    }
}

impl From<RpcError> for ServiceError {
    fn from(err: RpcError) -> Self {
        err.log();
        match err {
            RpcError::Transport(reason) => ServiceError::PeerUnreachable(reason),
            RpcError::Status {
                status,
                code,
                detail,
            } => {
                if let Some(rebuilt) = code
                    .as_deref()
                    .and_then(|code| ServiceError::from_code(code, &detail))
                {
                    return rebuilt;
                }
                match status {
                    502..=504 => ServiceError::PeerUnreachable(format!("peer answered {}", status)),
                    _ => ServiceError::Internal(format!("peer answered {}: {}", status, detail)),
                }
            }
            RpcError::Decode(reason) => ServiceError::Internal(reason),
        }
    }
}

/// Problem body fields the client cares about
#[derive(Debug, Default, Deserialize)]
struct ProblemBody {
    code: Option<String>,
    detail: Option<String>,
}

/// Remote Auction handle
#[derive(Debug, Clone)]
pub struct AuctionClient {
    endpoint: Endpoint,
    client: Client,
}

impl AuctionClient {
    pub fn new(endpoint: Endpoint, client: Client) -> Self {
        Self { endpoint, client }
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    async fn post<Req, Resp>(&self, path: &str, body: &Req) -> RpcResult<Resp>
    where
        Req: Serialize + Sync,
        Resp: DeserializeOwned,
    {
        let response = self
            .client
            .post(self.endpoint.url(path))
            .json(body)
            .send()
            .await?;
        decode(response).await
    }

    async fn get<Resp: DeserializeOwned>(&self, path: &str) -> RpcResult<Resp> {
        let response = self.client.get(self.endpoint.url(path)).send().await?;
        decode(response).await
    }
}

async fn decode<Resp: DeserializeOwned>(response: reqwest::Response) -> RpcResult<Resp> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json::<Resp>().await?);
    }

    let problem = response.json::<ProblemBody>().await.unwrap_or_default();
    Err(RpcError::Status {
        status: status.as_u16(),
        code: problem.code,
        detail: problem
            .detail
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("").to_string()),
    })
}

impl Auction for AuctionClient {
    async fn register(&self, email: String, public_key: Base64Bytes) -> ServiceResult<UserId> {
        let response: RegisterResponse = self
            .post(paths::REGISTER, &RegisterRequest { email, public_key })
            .await?;
        Ok(response.user_id)
    }

    async fn challenge(
        &self,
        user_id: UserId,
        client_challenge: String,
    ) -> ServiceResult<ChallengeInfo> {
        Ok(self
            .post(
                paths::CHALLENGE,
                &ChallengeRequest {
                    user_id,
                    client_challenge,
                },
            )
            .await?)
    }

    async fn authenticate(
        &self,
        user_id: UserId,
        signature: Base64Bytes,
    ) -> ServiceResult<TokenInfo> {
        Ok(self
            .post(
                paths::AUTHENTICATE,
                &AuthenticateRequest { user_id, signature },
            )
            .await?)
    }

    async fn get_spec(
        &self,
        user_id: UserId,
        item_id: ItemId,
        token: String,
    ) -> ServiceResult<AuctionItem> {
        Ok(self
            .post(
                paths::GET_SPEC,
                &GetSpecRequest {
                    user_id,
                    item_id,
                    token,
                },
            )
            .await?)
    }

    async fn new_auction(
        &self,
        user_id: UserId,
        item: AuctionSaleItem,
        token: String,
    ) -> ServiceResult<ItemId> {
        let response: NewAuctionResponse = self
            .post(
                paths::NEW_AUCTION,
                &NewAuctionRequest {
                    user_id,
                    item,
                    token,
                },
            )
            .await?;
        Ok(response.item_id)
    }

    async fn list_items(&self, user_id: UserId, token: String) -> ServiceResult<Vec<AuctionItem>> {
        Ok(self
            .post(paths::LIST_ITEMS, &ListItemsRequest { user_id, token })
            .await?)
    }

    async fn close_auction(
        &self,
        user_id: UserId,
        item_id: ItemId,
        token: String,
    ) -> ServiceResult<AuctionResult> {
        Ok(self
            .post(
                paths::CLOSE_AUCTION,
                &CloseAuctionRequest {
                    user_id,
                    item_id,
                    token,
                },
            )
            .await?)
    }

    async fn bid(
        &self,
        user_id: UserId,
        item_id: ItemId,
        price: i32,
        token: String,
    ) -> ServiceResult<bool> {
        let response: BidResponse = self
            .post(
                paths::BID,
                &BidRequest {
                    user_id,
                    item_id,
                    price,
                    token,
                },
            )
            .await?;
        Ok(response.accepted)
    }

    async fn get_primary_replica_id(&self) -> ServiceResult<ReplicaId> {
        let response: PrimaryReplicaResponse = self.get(paths::PRIMARY_REPLICA_ID).await?;
        Ok(response.replica_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(status: u16, code: Option<&str>, detail: &str) -> RpcError {
        RpcError::Status {
            status,
            code: code.map(str::to_string),
            detail: detail.to_string(),
        }
    }

    #[test]
    fn test_transport_maps_to_peer_unreachable() {
        let err: ServiceError = RpcError::Transport("connection refused".to_string()).into();
        assert!(err.is_transport());
    }

    #[test]
    fn test_status_with_code_is_rebuilt() {
        let err: ServiceError = status(401, Some("UNAUTHORIZED"), "Unauthorized").into();
        assert_eq!(err, ServiceError::Unauthorized);

        let err: ServiceError = status(400, Some("INVALID_REQUEST"), "bad email").into();
        assert_eq!(err, ServiceError::InvalidRequest("bad email".to_string()));

        let err: ServiceError = status(503, Some("UNAVAILABLE"), "Service unavailable").into();
        assert_eq!(err, ServiceError::Unavailable);
    }

    #[test]
    fn test_gateway_status_without_code_is_transport() {
        let err: ServiceError = status(503, None, "Service Unavailable").into();
        assert!(err.is_transport());

        let err: ServiceError = status(500, None, "boom").into();
        assert!(matches!(err, ServiceError::Internal(_)));
    }

    #[test]
    fn test_rpc_error_kind() {
        assert_eq!(
            RpcError::Transport("x".to_string()).kind(),
            ErrorKind::ServiceUnavailable
        );
        assert_eq!(status(404, None, "").kind(), ErrorKind::NotFound);
    }
}
