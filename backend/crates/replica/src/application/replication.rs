//! Snapshot Replication
//!
//! Full-state push after each mutation; last-writer-wins by version on
//! receipt.

use platform::directory::{Directory, PeerHandle, resolve_peers};
use tokio::task::JoinSet;

use crate::application::node::ReplicaNode;
use crate::domain::snapshot::StateSnapshot;
use crate::error::ReplicaResult;
use crate::infra::peer_client::PeerClient;

/// What one broadcast achieved
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BroadcastReport {
    pub version: u64,
    /// Peers that replaced their state with ours
    pub applied: usize,
    /// Peers that already held this version or newer
    pub ignored: usize,
    /// Names of peers that did not answer
    pub failed: Vec<String>,
}

impl<D> ReplicaNode<D>
where
    D: Directory + Send + Sync + 'static,
{
    /// Push the current snapshot to every known peer
    ///
    /// Never fails: unreachable peers are logged and the peer list is
    /// re-resolved before the next broadcast. The whole broadcast, lock wait
    /// included, is bounded by `ReplicaConfig::broadcast_deadline`.
    pub async fn broadcast(&self) -> BroadcastReport {
        let deadline = self.config.broadcast_deadline();
        match tokio::time::timeout(deadline, self.push_to_peers()).await {
            Ok(report) => report,
            Err(_) => {
                self.peers.mark_stale().await;
                let version = self.state.version().await;
                tracing::warn!(
                    version,
                    deadline_ms = deadline.as_millis() as u64,
                    "Snapshot broadcast abandoned at deadline"
                );
                BroadcastReport {
                    version,
                    ..Default::default()
                }
            }
        }
    }

    async fn push_to_peers(&self) -> BroadcastReport {
        let _guard = self.broadcast_lock.lock().await;

        let snapshot = self.state.snapshot().await;
        let mut report = BroadcastReport {
            version: snapshot.version,
            ..Default::default()
        };

        let peers = self.current_peers().await;
        if peers.is_empty() {
            tracing::debug!(version = snapshot.version, "No peers to push to");
            return report;
        }

        let body = match PeerClient::encode_push(&self.config.handle(), &snapshot) {
            Ok(body) => body,
            Err(err) => {
                tracing::error!(error = %err, "Snapshot push skipped");
                return report;
            }
        };

        let mut pushes = JoinSet::new();
        for peer in peers {
            let client = self.peer_client.clone();
            let body = body.clone();
            pushes.spawn(async move {
                let result = client.push_snapshot(&peer, body).await;
                (peer, result)
            });
        }

        while let Some(joined) = pushes.join_next().await {
            match joined {
                Ok((_, Ok(true))) => report.applied += 1,
                Ok((_, Ok(false))) => report.ignored += 1,
                Ok((peer, Err(err))) => {
                    tracing::warn!(
                        peer = %peer.name,
                        version = report.version,
                        error = %err,
                        "Snapshot push failed"
                    );
                    report.failed.push(peer.name);
                }
                Err(err) => {
                    tracing::error!(error = %err, "Snapshot push task failed");
                }
            }
        }

        if !report.failed.is_empty() {
            self.peers.mark_stale().await;
        }

        tracing::debug!(
            version = report.version,
            applied = report.applied,
            ignored = report.ignored,
            failed = report.failed.len(),
            "Snapshot broadcast"
        );
        report
    }

    /// Known peers, re-resolved first if the list is stale
    async fn current_peers(&self) -> Vec<PeerHandle> {
        if self.peers.is_stale().await {
            if let Err(err) = self.refresh_peers().await {
                tracing::warn!(error = %err, "Peer resolution failed, keeping previous list");
            }
        }
        self.peers.list().await
    }

    /// Resolve every other replica from the Directory
    pub async fn refresh_peers(&self) -> ReplicaResult<Vec<PeerHandle>> {
        let own_name = self.config.name();
        let peers = resolve_peers(
            self.directory.as_ref(),
            &self.config.name_prefix,
            Some(own_name.as_str()),
        )
        .await?;
        self.peers.replace(peers.clone()).await;
        Ok(peers)
    }

    /// Handle an incoming push; returns whether local state was replaced
    pub async fn apply_snapshot(&self, from: PeerHandle, snapshot: StateSnapshot) -> bool {
        let version = snapshot.version;
        let peer = from.name.clone();

        if from.name != self.config.name() && self.peers.remember(from).await {
            tracing::info!(peer = %peer, "Learned peer from incoming push");
        }

        let applied = self.state.apply(snapshot).await;
        if applied {
            tracing::info!(peer = %peer, version, "Applied snapshot");
        } else {
            let local_version = self.state.version().await;
            tracing::debug!(peer = %peer, version, local_version, "Ignored stale snapshot");
        }
        applied
    }
}
