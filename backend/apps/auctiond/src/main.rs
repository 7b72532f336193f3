//! Auction Service Entry Point
//!
//! One binary, three roles: the name directory, a replica, or the
//! failover front-end. Uses `anyhow` for startup errors; everything past
//! startup reports through the crates' own error types.

mod cli;
mod settings;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use auth::AuthConfig;
use clap::Parser;
use frontend::{FRONTEND_NAME, FailoverProxy, ProxyConfig};
use kernel::id::ReplicaId;
use platform::directory::{Directory, HttpDirectory, InMemoryDirectory, directory_router};
use platform::key_store::load_or_generate_signing_key;
use platform::rpc::{RpcClientConfig, auction_router};
use replica::{ReplicaConfig, ReplicaNode, replica_router};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::{Cli, Command};
use crate::settings::{Settings, advertised_endpoint};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "auctiond=info,replica=info,frontend=info,auth=info,platform=info,tower_http=info"
                    .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let settings = Settings::from_env()?;

    match cli.command {
        Command::Directory { bind } => {
            run_directory(bind.unwrap_or(settings.directory_bind)).await
        }
        Command::Replica {
            id,
            bind,
            advertise,
        } => run_replica(&settings, ReplicaId::new(id), bind, advertise).await,
        Command::Frontend { bind, advertise } => run_frontend(&settings, bind, advertise).await,
    }
}

async fn run_directory(bind: SocketAddr) -> anyhow::Result<()> {
    let app = directory_router(Arc::new(InMemoryDirectory::new())).layer(TraceLayer::new_for_http());

    let listener = TcpListener::bind(bind).await?;
    tracing::info!("Directory listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}

async fn run_replica(
    settings: &Settings,
    replica_id: ReplicaId,
    bind: SocketAddr,
    advertise: Option<String>,
) -> anyhow::Result<()> {
    let server_key = load_or_generate_signing_key(&settings.server_key_path)?;
    let mut auth_config = AuthConfig::new(server_key);
    auth_config.token_ttl = settings.token_ttl;
    auth_config.challenge_ttl = settings.challenge_ttl;

    let client = RpcClientConfig::with_timeout(settings.peer_timeout).build_client()?;
    let directory = Arc::new(HttpDirectory::new(
        settings.directory_url.clone(),
        client.clone(),
    ));

    let listener = TcpListener::bind(bind).await?;
    let endpoint = advertised_endpoint(advertise, listener.local_addr()?);

    let mut config = ReplicaConfig::new(replica_id, endpoint);
    config.peer_timeout = settings.peer_timeout;
    let node = Arc::new(ReplicaNode::new(config, auth_config, directory, client));

    // Serve before joining so peers can pull from us while we catch up
    let app = replica_router(node.clone()).layer(TraceLayer::new_for_http());
    tracing::info!(replica_id = %replica_id, "Replica listening on {}", listener.local_addr()?);
    let server = tokio::spawn(async move { axum::serve(listener, app).await });

    let outcome = node.join().await?;
    tracing::info!(
        name = %node.config().name(),
        took_over = outcome.took_over,
        version = outcome.version,
        "Replica ready"
    );

    spawn_purge_loop(node, settings.purge_interval);

    server.await??;
    Ok(())
}

/// Periodically drop expired challenges and tokens
fn spawn_purge_loop<D>(node: Arc<ReplicaNode<D>>, every: Duration)
where
    D: Directory + Send + Sync + 'static,
{
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        // The first tick completes immediately
        ticker.tick().await;
        loop {
            ticker.tick().await;
            match node.purge_expired().await {
                Ok(purged) if purged.challenges + purged.tokens > 0 => {
                    tracing::info!(
                        challenges_deleted = purged.challenges,
                        tokens_deleted = purged.tokens,
                        "Expired session cleanup completed"
                    );
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!(error = %e, "Expired session cleanup failed, continuing anyway");
                }
            }
        }
    });
}

async fn run_frontend(
    settings: &Settings,
    bind: SocketAddr,
    advertise: Option<String>,
) -> anyhow::Result<()> {
    let proxy_config = ProxyConfig::covering(settings.peer_timeout);
    let client = RpcClientConfig::with_timeout(proxy_config.call_timeout).build_client()?;
    let directory = Arc::new(HttpDirectory::new(
        settings.directory_url.clone(),
        client.clone(),
    ));
    let proxy = Arc::new(FailoverProxy::new(directory.clone(), client, proxy_config));

    let listener = TcpListener::bind(bind).await?;
    let endpoint = advertised_endpoint(advertise, listener.local_addr()?);
    directory.register(FRONTEND_NAME, &endpoint).await?;

    // An empty cluster is fine; discovery runs again on the first call
    if let Err(e) = proxy.discover().await {
        tracing::warn!(error = %e, "No primary yet");
    }

    let app = auction_router(proxy).layer(TraceLayer::new_for_http());
    tracing::info!(endpoint = %endpoint, "Front-end listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
