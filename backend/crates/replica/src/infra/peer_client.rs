//! Peer Replication Client
//!
//! Pushes snapshots to peers and pulls them during catch-up. Each call is
//! bounded by the reqwest client timeout and an outer `tokio` timeout.

use std::time::Duration;

use platform::directory::{Endpoint, PeerHandle};
use reqwest::{Client, header};

use crate::domain::snapshot::StateSnapshot;
use crate::error::{ReplicaError, ReplicaResult};
use crate::presentation::dto::{PushSnapshotRequest, PushSnapshotResponse, SNAPSHOT_PATH};

#[derive(Debug, Clone)]
pub struct PeerClient {
    client: Client,
    timeout: Duration,
}

impl PeerClient {
    pub fn new(client: Client, timeout: Duration) -> Self {
        Self { client, timeout }
    }

    /// Encode a push body once so it can be sent to every peer
    pub fn encode_push(from: &PeerHandle, snapshot: &StateSnapshot) -> ReplicaResult<Vec<u8>> {
        serde_json::to_vec(&PushSnapshotRequest {
            from: from.clone(),
            snapshot: snapshot.clone(),
        })
        .map_err(|e| ReplicaError::Internal(format!("Snapshot encoding failed: {}", e)))
    }

    /// Push an encoded snapshot; returns whether the peer applied it
    pub async fn push_snapshot(&self, peer: &PeerHandle, body: Vec<u8>) -> ReplicaResult<bool> {
        let request = self
            .client
            .post(peer.endpoint.url(SNAPSHOT_PATH))
            .header(header::CONTENT_TYPE, "application/json")
            .body(body)
            .send();

        let response = tokio::time::timeout(self.timeout, request)
            .await
            .map_err(|_| ReplicaError::peer_unreachable(&peer.name, "push timed out"))?
            .map_err(|e| ReplicaError::peer_unreachable(&peer.name, e))?;

        if !response.status().is_success() {
            return Err(ReplicaError::peer_unreachable(
                &peer.name,
                format!("push answered {}", response.status()),
            ));
        }

        let body: PushSnapshotResponse = response
            .json()
            .await
            .map_err(|e| ReplicaError::peer_unreachable(&peer.name, e))?;
        Ok(body.applied)
    }

    /// Pull a peer's full state
    pub async fn fetch_snapshot(&self, name: &str, endpoint: &Endpoint) -> ReplicaResult<StateSnapshot> {
        let request = self.client.get(endpoint.url(SNAPSHOT_PATH)).send();

        let response = tokio::time::timeout(self.timeout, request)
            .await
            .map_err(|_| ReplicaError::peer_unreachable(name, "pull timed out"))?
            .map_err(|e| ReplicaError::peer_unreachable(name, e))?;

        if !response.status().is_success() {
            return Err(ReplicaError::peer_unreachable(
                name,
                format!("pull answered {}", response.status()),
            ));
        }

        response
            .json()
            .await
            .map_err(|e| ReplicaError::peer_unreachable(name, e))
    }
}
