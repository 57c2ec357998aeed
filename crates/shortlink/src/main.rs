//! shortlink server
//!
//! Serves the URL shortener over HTTP/1.

use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use shortlink::{build_router, open_store, serve, shutdown_signal, AppState, Config};
use shortlink_auth::{GitHubExchange, GitHubOAuth};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    let log_level = if config.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let store = open_store(&config.backend()).await?;

    let oauth_config = config.oauth();
    if oauth_config.client_id.is_empty() {
        info!("GITHUB_CLIENT_ID is not set, sign-in will fail at the provider");
    }
    let exchange = Arc::new(GitHubExchange::new(oauth_config.clone()));
    let oauth = Arc::new(GitHubOAuth::new(oauth_config, Arc::clone(&store), exchange));

    let state = AppState::new(store, oauth, config.static_dir.clone());
    let router = Arc::new(build_router(state)?);

    let listener = TcpListener::bind(config.addr).await?;
    info!(addr = %listener.local_addr()?, routes = router.routes().len(), "shortlink listening");

    serve(listener, router, shutdown_signal()).await?;
    Ok(())
}
