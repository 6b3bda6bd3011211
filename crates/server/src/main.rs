//! topview-shell entry point.
//!
//! Boots the shell worker (install with retry, then activate) and only then
//! serves MCP on stdio, so no request is handled before activation.
//! Logging goes to stderr to avoid interfering with the JSON-RPC protocol on stdout.

use std::sync::Arc;

use anyhow::Result;
use rmcp::service::serve_server;
use rmcp::transport::io::stdio;
use topview_client::{HttpNetwork, NetworkConfig, ShellWorker};
use topview_core::{AppConfig, CacheDb};
use tracing_subscriber::EnvFilter;

mod boot;
mod handler;
#[cfg(test)]
mod test_support;
mod tools;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    let config = AppConfig::load()?;
    let origin = config.origin_url()?;

    tracing::info!(cache = %config.cache_name, origin = %origin, db = %config.db_path.display(), "Starting topview-shell");

    let cache = CacheDb::open(&config.db_path).await?;
    let network = HttpNetwork::new(NetworkConfig::from(&config))?;
    let worker = Arc::new(ShellWorker::from_config(&config, Arc::new(network), Arc::new(cache.clone()))?);

    boot::boot(&worker, &config).await?;

    tracing::info!("Shell worker active; serving MCP on stdio transport");

    let handler = handler::ShellServer::new(worker, cache, origin);
    let server = serve_server(handler, stdio()).await?;

    server.waiting().await?;

    Ok(())
}
