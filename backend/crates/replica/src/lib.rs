//! Replica (Replicated Auction State) Module
//!
//! Clean Architecture structure:
//! - `domain/` - Auction items, the replicated snapshot, store trait
//! - `application/` - The replica node, snapshot broadcast, cluster join
//! - `infra/` - Locked in-memory state, peer push/pull client
//! - `presentation/` - Replication routes and the combined router
//!
//! ## Replication
//! Every replica holds the full state and serves clients directly. After
//! each local mutation the node pushes its whole snapshot to all peers;
//! a receiver replaces its state only if the pushed version is strictly
//! greater than its own. A joining replica pulls state from a running
//! peer before it takes traffic.

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;


// Re-exports for convenience
pub use application::{JoinOutcome, ReplicaConfig, ReplicaNode};
pub use application::replication::BroadcastReport;
pub use domain::StateSnapshot;
pub use error::{ReplicaError, ReplicaResult};
pub use infra::ReplicaState;
pub use presentation::router::{replica_router, replication_router};
