//! Replication Handlers

use std::sync::Arc;

use axum::{Json, extract::State};
use platform::directory::Directory;

use crate::application::node::ReplicaNode;
use crate::domain::snapshot::StateSnapshot;
use crate::presentation::dto::{PushSnapshotRequest, PushSnapshotResponse};

/// POST /replication/snapshot
///
/// Apply a peer's snapshot if it is newer than local state.
pub async fn push_snapshot<D>(
    State(node): State<Arc<ReplicaNode<D>>>,
    Json(req): Json<PushSnapshotRequest>,
) -> Json<PushSnapshotResponse>
where
    D: Directory + Send + Sync + 'static,
{
    let applied = node.apply_snapshot(req.from, req.snapshot).await;
    Json(PushSnapshotResponse { applied })
}

/// GET /replication/snapshot
///
/// Full local state, for a joining replica to catch up from.
pub async fn pull_snapshot<D>(State(node): State<Arc<ReplicaNode<D>>>) -> Json<StateSnapshot>
where
    D: Directory + Send + Sync + 'static,
{
    let snapshot = node.snapshot().await;
    tracing::debug!(version = snapshot.version, "Serving snapshot pull");
    Json(snapshot)
}
