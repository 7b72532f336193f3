//! Process Settings
//!
//! Read from the environment after `.env` has been loaded.

use std::env;
use std::fmt::Display;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::Context;
use platform::directory::Endpoint;

#[derive(Debug, Clone)]
pub struct Settings {
    pub directory_url: Endpoint,
    pub directory_bind: SocketAddr,
    pub server_key_path: PathBuf,
    pub peer_timeout: Duration,
    pub token_ttl: Duration,
    pub challenge_ttl: Duration,
    pub purge_interval: Duration,
}

impl Settings {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build settings from any variable source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        Ok(Self {
            directory_url: Endpoint::new(
                lookup("DIRECTORY_URL").unwrap_or_else(|| "http://127.0.0.1:31100".to_string()),
            ),
            directory_bind: parse_or(&lookup, "DIRECTORY_BIND", "0.0.0.0:31100".parse()?)?,
            server_key_path: lookup("SERVER_KEY_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("keys/server.key")),
            peer_timeout: Duration::from_millis(parse_or(&lookup, "PEER_TIMEOUT_MS", 2000)?),
            token_ttl: Duration::from_secs(parse_or(&lookup, "TOKEN_TTL_SECS", 3600)?),
            challenge_ttl: Duration::from_secs(parse_or(&lookup, "CHALLENGE_TTL_SECS", 120)?),
            purge_interval: Duration::from_secs(parse_or(&lookup, "PURGE_INTERVAL_SECS", 60)?),
        })
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, name: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    match lookup(name) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("{}", e))
            .with_context(|| format!("{} has an invalid value: {:?}", name, raw)),
        None => Ok(default),
    }
}

/// URL other nodes should use for a listener bound at `local`
pub fn advertised_endpoint(advertise: Option<String>, local: SocketAddr) -> Endpoint {
    match advertise {
        Some(url) => Endpoint::new(url),
        None => {
            let ip = if local.ip().is_unspecified() {
                IpAddr::V4(Ipv4Addr::LOCALHOST)
            } else {
                local.ip()
            };
            Endpoint::new(format!("http://{}", SocketAddr::new(ip, local.port())))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings(vars: &[(&str, &str)]) -> anyhow::Result<Settings> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_defaults() {
        let settings = settings(&[]).unwrap();
        assert_eq!(settings.directory_url.as_str(), "http://127.0.0.1:31100");
        assert_eq!(settings.directory_bind.port(), 31100);
        assert_eq!(settings.server_key_path, PathBuf::from("keys/server.key"));
        assert_eq!(settings.peer_timeout, Duration::from_millis(2000));
        assert_eq!(settings.token_ttl, Duration::from_secs(3600));
        assert_eq!(settings.challenge_ttl, Duration::from_secs(120));
        assert_eq!(settings.purge_interval, Duration::from_secs(60));
    }

    #[test]
    fn test_overrides() {
        let settings = settings(&[
            ("DIRECTORY_URL", "http://dir:9000/"),
            ("PEER_TIMEOUT_MS", "500"),
            ("TOKEN_TTL_SECS", "60"),
        ])
        .unwrap();
        assert_eq!(settings.directory_url.as_str(), "http://dir:9000");
        assert_eq!(settings.peer_timeout, Duration::from_millis(500));
        assert_eq!(settings.token_ttl, Duration::from_secs(60));
    }

    #[test]
    fn test_invalid_number_is_reported() {
        let err = settings(&[("PEER_TIMEOUT_MS", "soon")]).unwrap_err();
        assert!(err.to_string().contains("PEER_TIMEOUT_MS"));
    }

    #[test]
    fn test_advertised_endpoint() {
        let local: SocketAddr = "0.0.0.0:9001".parse().unwrap();
        assert_eq!(
            advertised_endpoint(None, local).as_str(),
            "http://127.0.0.1:9001"
        );
        assert_eq!(
            advertised_endpoint(Some("http://replica1.internal:9001".to_string()), local)
                .as_str(),
            "http://replica1.internal:9001"
        );
    }
}
