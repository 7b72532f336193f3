//! Cluster Join
//!
//! A replica starting under a name that is already bound takes over that
//! name: it first copies state from the previous holder (or any other
//! replica that answers), then rebinds the name to itself. A replica
//! under a fresh name registers first, pulls whatever state exists, and
//! announces itself with a push.

use platform::directory::{Directory, PeerHandle};

use crate::application::node::ReplicaNode;
use crate::error::ReplicaResult;

/// How a join went
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinOutcome {
    /// The name was already bound when the node started
    pub took_over: bool,
    /// Peer whose snapshot replaced local state, if any
    pub caught_up_from: Option<String>,
    /// Local version after the join
    pub version: u64,
}

impl<D> ReplicaNode<D>
where
    D: Directory + Send + Sync + 'static,
{
    /// Register with the Directory and catch up with the cluster
    pub async fn join(&self) -> ReplicaResult<JoinOutcome> {
        let name = self.config.name();
        let previous = self.directory.lookup(&name).await?;
        let others = self.refresh_peers().await?;

        let outcome = match previous {
            Some(previous) => {
                let mut sources = Vec::with_capacity(others.len() + 1);
                if previous != self.config.endpoint {
                    sources.push(PeerHandle::new(name.clone(), previous));
                }
                sources.extend(others);

                let caught_up_from = self.catch_up(&sources).await;
                self.directory.register(&name, &self.config.endpoint).await?;

                JoinOutcome {
                    took_over: true,
                    caught_up_from,
                    version: self.state.version().await,
                }
            }
            None => {
                self.directory.register(&name, &self.config.endpoint).await?;
                let caught_up_from = self.catch_up(&others).await;
                self.broadcast().await;

                JoinOutcome {
                    took_over: false,
                    caught_up_from,
                    version: self.state.version().await,
                }
            }
        };

        tracing::info!(
            name = %name,
            endpoint = %self.config.endpoint,
            took_over = outcome.took_over,
            caught_up_from = ?outcome.caught_up_from,
            version = outcome.version,
            "Joined cluster"
        );
        Ok(outcome)
    }

    /// Pull from the first source that answers
    ///
    /// Returns the source's name if its snapshot was newer and applied.
    async fn catch_up(&self, sources: &[PeerHandle]) -> Option<String> {
        for source in sources {
            match self
                .peer_client
                .fetch_snapshot(&source.name, &source.endpoint)
                .await
            {
                Ok(snapshot) => {
                    let version = snapshot.version;
                    if self.state.apply(snapshot).await {
                        tracing::info!(peer = %source.name, version, "Caught up from peer");
                        return Some(source.name.clone());
                    }
                    tracing::debug!(peer = %source.name, version, "Peer held nothing newer");
                    return None;
                }
                Err(err) => {
                    tracing::warn!(peer = %source.name, error = %err, "Catch-up source unavailable");
                }
            }
        }
        None
    }
}
