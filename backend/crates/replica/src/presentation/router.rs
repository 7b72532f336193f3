//! Replica Router

use std::sync::Arc;

use axum::{Router, routing::get};
use platform::directory::Directory;
use platform::rpc::auction_router;

use super::dto::SNAPSHOT_PATH;
use super::handlers;
use crate::application::node::ReplicaNode;

/// Peer-to-peer replication routes
pub fn replication_router<D>(node: Arc<ReplicaNode<D>>) -> Router
where
    D: Directory + Send + Sync + 'static,
{
    Router::new()
        .route(
            SNAPSHOT_PATH,
            get(handlers::pull_snapshot::<D>).post(handlers::push_snapshot::<D>),
        )
        .with_state(node)
}

/// Everything a replica serves: the Auction RPC surface plus replication
pub fn replica_router<D>(node: Arc<ReplicaNode<D>>) -> Router
where
    D: Directory + Send + Sync + 'static,
{
    auction_router(node.clone()).merge(replication_router(node))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ReplicaConfig;
    use crate::domain::snapshot::StateSnapshot;
    use crate::presentation::dto::{PushSnapshotRequest, PushSnapshotResponse};
    use auth::AuthConfig;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use kernel::id::ReplicaId;
    use platform::directory::{Endpoint, InMemoryDirectory, PeerHandle};
    use tower::ServiceExt;

    fn node() -> Arc<ReplicaNode<InMemoryDirectory>> {
        Arc::new(ReplicaNode::new(
            ReplicaConfig::new(ReplicaId::new(1), Endpoint::new("http://127.0.0.1:1")),
            AuthConfig::with_random_key(),
            Arc::new(InMemoryDirectory::new()),
            reqwest::Client::new(),
        ))
    }

    fn push(snapshot: StateSnapshot) -> Request<Body> {
        let body = PushSnapshotRequest {
            from: PeerHandle::new("Replica2", Endpoint::new("http://127.0.0.1:2")),
            snapshot,
        };
        Request::post(SNAPSHOT_PATH)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap()
    }

    async fn applied(response: axum::response::Response) -> bool {
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice::<PushSnapshotResponse>(&bytes)
            .unwrap()
            .applied
    }

    #[tokio::test]
    async fn test_push_applies_only_newer() {
        let node = node();
        let router = replication_router(node.clone());

        let mut newer = StateSnapshot::default();
        newer.version = 3;
        let response = router.clone().oneshot(push(newer.clone())).await.unwrap();
        assert!(applied(response).await);
        assert_eq!(node.version().await, 3);

        let response = router.oneshot(push(StateSnapshot::default())).await.unwrap();
        assert!(!applied(response).await);
        assert_eq!(node.snapshot().await, newer);
    }

    #[tokio::test]
    async fn test_pull_returns_local_state() {
        let node = node();
        let router = replica_router(node.clone());

        let response = router
            .oneshot(Request::get(SNAPSHOT_PATH).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let snapshot: StateSnapshot = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(snapshot, node.snapshot().await);
    }

    fn assert_send<T: Send>(_: &T) {}

    #[tokio::test]
    async fn test_snapshot_handlers_are_send() {
        let node = node();
        let from = PeerHandle::new("Replica2", Endpoint::new("http://127.0.0.1:2"));

        // A stale push takes the logging branch that reads the local version
        let push = node.apply_snapshot(from, StateSnapshot::default());
        assert_send(&push);
        assert!(!push.await);

        let pull = handlers::pull_snapshot(axum::extract::State(node.clone()));
        assert_send(&pull);
        pull.await;
    }

    #[tokio::test]
    async fn test_malformed_push_is_rejected() {
        let router = replication_router(node());
        let request = Request::post(SNAPSHOT_PATH)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{\"snapshot\":1}"))
            .unwrap();

        let response = router.oneshot(request).await.unwrap();
        assert!(response.status().is_client_error());
    }
}
