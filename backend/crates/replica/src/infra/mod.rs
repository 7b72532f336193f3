//! Infrastructure Layer
//!
//! Locked replicated state and the HTTP client for peer replication.

pub mod peer_client;
pub mod state;

pub use peer_client::PeerClient;
pub use state::ReplicaState;
