//! Replication DTOs

use platform::directory::PeerHandle;
use serde::{Deserialize, Serialize};

use crate::domain::snapshot::StateSnapshot;

/// Push and pull both live at this path
pub const SNAPSHOT_PATH: &str = "/replication/snapshot";

/// POST /replication/snapshot request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PushSnapshotRequest {
    pub from: PeerHandle,
    pub snapshot: StateSnapshot,
}

/// POST /replication/snapshot response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PushSnapshotResponse {
    pub applied: bool,
}
