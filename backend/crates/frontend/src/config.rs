//! Proxy Configuration

use std::time::Duration;

/// Directory name the front-end registers under
pub const FRONTEND_NAME: &str = "FrontEnd";

/// Failover proxy configuration
#[derive(Debug, Clone)]
pub struct ProxyConfig {
    /// Only directory names with this prefix are primary candidates
    pub replica_prefix: String,
    /// Bound on one forwarded call or discovery probe
    pub call_timeout: Duration,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            replica_prefix: "Replica".to_string(),
            call_timeout: Duration::from_secs(2),
        }
    }
}

impl ProxyConfig {
    pub fn new(call_timeout: Duration) -> Self {
        Self {
            call_timeout,
            ..Default::default()
        }
    }

    /// Call timeout for replicas configured with `peer_timeout`
    ///
    /// A mutating call on the primary may spend up to twice the peer timeout
    /// broadcasting before it answers; the call timeout must outlast that.
    pub fn covering(peer_timeout: Duration) -> Self {
        Self::new(peer_timeout * 3)
    }

    pub fn call_timeout_ms(&self) -> i64 {
        self.call_timeout.as_millis() as i64
    }
}
