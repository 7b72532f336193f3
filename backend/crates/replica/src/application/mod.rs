//! Application Layer
//!
//! The replica node: serves the Auction contract over local state, pushes
//! snapshots to peers after every mutation, and joins a running cluster.

pub mod config;
pub mod join;
pub mod node;
pub mod peers;
pub mod replication;

// Re-exports
pub use config::ReplicaConfig;
pub use join::JoinOutcome;
pub use node::ReplicaNode;
pub use peers::PeerSet;
