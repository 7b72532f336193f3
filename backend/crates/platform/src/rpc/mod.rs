//! HTTP RPC for the Auction contract
//!
//! Every operation is `POST /rpc/<method>` with a camelCase JSON body,
//! except the liveness probe `GET /rpc/primary-replica-id`. Failures are
//! RFC 7807 problem bodies carrying a stable `code`.

pub mod client;
pub mod config;
pub mod server;

pub use client::AuctionClient;
pub use config::RpcClientConfig;
pub use server::auction_router;

/// Route paths shared by [`client`] and [`server`]
pub mod paths {
    pub const REGISTER: &str = "/rpc/register";
    pub const CHALLENGE: &str = "/rpc/challenge";
    pub const AUTHENTICATE: &str = "/rpc/authenticate";
    pub const GET_SPEC: &str = "/rpc/get-spec";
    pub const NEW_AUCTION: &str = "/rpc/new-auction";
    pub const LIST_ITEMS: &str = "/rpc/list-items";
    pub const CLOSE_AUCTION: &str = "/rpc/close-auction";
    pub const BID: &str = "/rpc/bid";
    pub const PRIMARY_REPLICA_ID: &str = "/rpc/primary-replica-id";
}
