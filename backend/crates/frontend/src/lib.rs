//! Front-end (Failover Proxy) Module
//!
//! A stateless entry point for clients. It serves the Auction RPC surface
//! by forwarding each call to one replica and hides which replica that is.

pub mod config;
pub mod error;
pub mod proxy;


// Re-exports for convenience
pub use config::{FRONTEND_NAME, ProxyConfig};
pub use error::{ProxyError, ProxyResult};
pub use proxy::FailoverProxy;
