//! Command-line and environment configuration.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use shortlink_auth::OAuthConfig;

/// URL shortener with GitHub sign-in.
#[derive(Debug, Clone, Parser)]
#[command(name = "shortlink")]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// Address to listen on.
    #[arg(short, long, env = "SHORTLINK_ADDR", default_value = "127.0.0.1:8000")]
    pub addr: SocketAddr,

    /// Database URL, or `memory` for the in-process store.
    #[arg(short, long, env = "DATABASE_URL", default_value = "sqlite::memory:")]
    pub database: String,

    /// Directory served under `/static/`.
    #[arg(long, env = "SHORTLINK_STATIC_DIR", default_value = "static")]
    pub static_dir: PathBuf,

    /// GitHub OAuth app client id.
    #[arg(long, env = "GITHUB_CLIENT_ID", default_value = "")]
    pub github_client_id: String,

    /// GitHub OAuth app client secret.
    #[arg(long, env = "GITHUB_CLIENT_SECRET", default_value = "", hide_env_values = true)]
    pub github_client_secret: String,

    /// Callback URL registered with the OAuth app.
    #[arg(
        long,
        env = "SHORTLINK_REDIRECT_URI",
        default_value = "http://localhost:8000/oauth/callback"
    )]
    pub redirect_uri: String,

    /// Enable debug logging.
    #[arg(short, long)]
    pub verbose: bool,
}

/// Where links and sessions are kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    /// In-process map, lost on restart.
    Memory,
    /// SQLite database at the given URL.
    Sqlite(String),
}

impl Config {
    /// Returns the selected store backend.
    pub fn backend(&self) -> StoreBackend {
        if self.database.eq_ignore_ascii_case("memory") {
            StoreBackend::Memory
        } else {
            StoreBackend::Sqlite(self.database.clone())
        }
    }

    /// Returns the GitHub OAuth settings.
    pub fn oauth(&self) -> OAuthConfig {
        OAuthConfig::github(
            &self.github_client_id,
            &self.github_client_secret,
            &self.redirect_uri,
        )
    }
}
