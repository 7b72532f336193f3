//! Auction Service Contract
//!
//! The RPC surface every node speaks, independent of wire format:
//! - [`service`] - the `Auction` trait served by replicas and the front-end
//! - [`types`] - request/response records exchanged over the wire
//! - [`error`] - the error taxonomy visible to clients

pub mod error;
pub mod service;
pub mod types;

pub use error::{ServiceError, ServiceResult};
pub use service::{Auction, LocalAuction};
pub use types::*;
