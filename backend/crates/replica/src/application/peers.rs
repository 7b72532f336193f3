//! Known Peers
//!
//! Resolved once from the Directory and re-resolved only after a push to
//! some peer fails. Senders of incoming pushes are added as they appear.

use platform::directory::PeerHandle;
use tokio::sync::RwLock;

#[derive(Debug)]
struct PeerSetInner {
    peers: Vec<PeerHandle>,
    stale: bool,
}

#[derive(Debug)]
pub struct PeerSet {
    inner: RwLock<PeerSetInner>,
}

impl Default for PeerSet {
    fn default() -> Self {
        Self {
            inner: RwLock::new(PeerSetInner {
                peers: Vec::new(),
                // Nothing resolved yet
                stale: true,
            }),
        }
    }
}

impl PeerSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the list with a fresh resolution
    pub async fn replace(&self, peers: Vec<PeerHandle>) {
        let mut inner = self.inner.write().await;
        inner.peers = peers;
        inner.stale = false;
    }

    /// Add or update a peer; returns true if its name was unknown
    pub async fn remember(&self, peer: PeerHandle) -> bool {
        let mut inner = self.inner.write().await;
        match inner.peers.iter_mut().find(|p| p.name == peer.name) {
            Some(existing) => {
                existing.endpoint = peer.endpoint;
                false
            }
            None => {
                inner.peers.push(peer);
                true
            }
        }
    }

    pub async fn mark_stale(&self) {
        self.inner.write().await.stale = true;
    }

    pub async fn is_stale(&self) -> bool {
        self.inner.read().await.stale
    }

    pub async fn list(&self) -> Vec<PeerHandle> {
        self.inner.read().await.peers.clone()
    }
}
