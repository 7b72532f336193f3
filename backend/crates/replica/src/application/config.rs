//! Application Configuration
//!
//! Configuration for the replica node.

use std::time::Duration;

use kernel::id::ReplicaId;
use platform::directory::{Endpoint, PeerHandle};

/// Directory name prefix shared by every replica
pub const REPLICA_NAME_PREFIX: &str = "Replica";

/// Replica node configuration
#[derive(Debug, Clone)]
pub struct ReplicaConfig {
    /// Identity reported by `getPrimaryReplicaID`
    pub replica_id: ReplicaId,
    /// Directory name prefix (the node registers as `<prefix><id>`)
    pub name_prefix: String,
    /// Base URL peers and the front-end use to reach this node
    pub endpoint: Endpoint,
    /// Bound on every push to or pull from a peer
    pub peer_timeout: Duration,
}

impl ReplicaConfig {
    pub fn new(replica_id: ReplicaId, endpoint: Endpoint) -> Self {
        Self {
            replica_id,
            name_prefix: REPLICA_NAME_PREFIX.to_string(),
            endpoint,
            peer_timeout: Duration::from_millis(2000),
        }
    }

    /// Directory name of this node
    pub fn name(&self) -> String {
        format!("{}{}", self.name_prefix, self.replica_id)
    }

    /// This node as a peer sees it
    pub fn handle(&self) -> PeerHandle {
        PeerHandle::new(self.name(), self.endpoint.clone())
    }

    pub fn peer_timeout_ms(&self) -> i64 {
        self.peer_timeout.as_millis() as i64
    }

    /// Bound on a whole broadcast: waiting for the lock, one peer
    /// re-resolution and one round of concurrent pushes
    pub fn broadcast_deadline(&self) -> Duration {
        self.peer_timeout * 2
    }
}
