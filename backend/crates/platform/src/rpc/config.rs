//! RPC Client Configuration

use std::time::Duration;

/// Settings for the reqwest client used between nodes
#[derive(Debug, Clone)]
pub struct RpcClientConfig {
    /// Whole-request timeout
    pub timeout: Duration,
    /// TCP connect timeout
    pub connect_timeout: Duration,
    /// Idle keep-alive connections per host (0 disables pooling)
    pub pool_max_idle_per_host: usize,
}

impl Default for RpcClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(2),
            connect_timeout: Duration::from_millis(500),
            pool_max_idle_per_host: 8,
        }
    }
}

impl RpcClientConfig {
    /// Config with the given whole-request timeout
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout,
            connect_timeout: timeout.min(Duration::from_millis(500)),
            ..Default::default()
        }
    }

    /// Config for in-process test clusters
    ///
    /// Pooling is disabled so a killed node never leaves a half-dead
    /// keep-alive connection behind.
    pub fn testing() -> Self {
        Self {
            timeout: Duration::from_millis(1500),
            connect_timeout: Duration::from_millis(300),
            pool_max_idle_per_host: 0,
        }
    }

    pub fn timeout_ms(&self) -> i64 {
        self.timeout.as_millis() as i64
    }

    /// Build a reqwest client from this config
    pub fn build_client(&self) -> Result<reqwest::Client, reqwest::Error> {
        reqwest::Client::builder()
            .timeout(self.timeout)
            .connect_timeout(self.connect_timeout)
            .pool_max_idle_per_host(self.pool_max_idle_per_host)
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_timeout_caps_connect_timeout() {
        let config = RpcClientConfig::with_timeout(Duration::from_secs(5));
        assert_eq!(config.timeout_ms(), 5000);
        assert_eq!(config.connect_timeout, Duration::from_millis(500));

        let config = RpcClientConfig::with_timeout(Duration::from_millis(100));
        assert_eq!(config.connect_timeout, Duration::from_millis(100));
    }

    #[test]
    fn test_build_client() {
        assert!(RpcClientConfig::testing().build_client().is_ok());
    }
}
