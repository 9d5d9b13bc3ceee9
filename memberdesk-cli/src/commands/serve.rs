//! HTTP server command
//!
//! Connects the record store and serves the member API until shutdown.

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use memberdesk_server::db::{MemberStore, MemoryMemberStore, PgMemberStore};
use memberdesk_server::http::server::DEFAULT_BODY_LIMIT;
use memberdesk_server::{run_server, ServerConfig, StoreConfig};

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind to
    #[arg(long, short = 'b', default_value = "0.0.0.0", env = "MEMBERDESK_BIND")]
    pub bind: IpAddr,

    /// Port to listen on
    #[arg(long, short = 'p', default_value_t = 5000, env = "MEMBERDESK_PORT")]
    pub port: u16,

    /// Largest accepted request body in bytes
    #[arg(long, default_value_t = DEFAULT_BODY_LIMIT)]
    pub body_limit: usize,

    /// Keep members in process memory instead of PostgreSQL (lost on exit)
    #[arg(long)]
    pub memory: bool,
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs) -> Result<()> {
    let store_config = StoreConfig::from_env().context("Invalid store configuration")?;

    let store: Arc<dyn MemberStore> = if args.memory {
        tracing::warn!("Using in-memory store - submissions are lost on exit");
        Arc::new(MemoryMemberStore::new().with_unique_email(store_config.unique_email))
    } else {
        tracing::info!(
            host = %store_config.host,
            port = store_config.port,
            database = %store_config.database,
            "Connecting to PostgreSQL"
        );
        let store = PgMemberStore::connect(&store_config)
            .await
            .context("Failed to connect record store")?;
        Arc::new(store)
    };

    let config = ServerConfig {
        bind_addr: SocketAddr::new(args.bind, args.port),
        body_limit: args.body_limit,
    };

    tracing::info!("Starting memberdesk server on {}", config.bind_addr);

    // Run server (blocks until shutdown)
    run_server(store, config).await.context("Server error")?;

    Ok(())
}
