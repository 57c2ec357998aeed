//! Shared application state.

use std::path::PathBuf;
use std::sync::Arc;

use shortlink_auth::OAuthHelper;
use shortlink_store::{KvStore, MemoryStore, SqliteStore};
use tracing::info;

use crate::config::StoreBackend;
use crate::error::Result;

/// Collaborators every handler can reach.
#[derive(Clone)]
pub struct AppState {
    /// Links and sessions.
    pub store: Arc<dyn KvStore>,
    /// Identity provider sign-in.
    pub oauth: Arc<dyn OAuthHelper>,
    /// Root of the `/static/` tree.
    pub static_dir: PathBuf,
}

impl AppState {
    /// Creates the state.
    pub fn new(
        store: Arc<dyn KvStore>,
        oauth: Arc<dyn OAuthHelper>,
        static_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            store,
            oauth,
            static_dir: static_dir.into(),
        }
    }
}

/// Opens the configured store.
pub async fn open_store(backend: &StoreBackend) -> Result<Arc<dyn KvStore>> {
    match backend {
        StoreBackend::Memory => {
            info!("using in-memory store");
            Ok(Arc::new(MemoryStore::new()))
        }
        StoreBackend::Sqlite(url) => {
            info!(url = %url, "opening SQLite store");
            Ok(Arc::new(SqliteStore::connect(url).await?))
        }
    }
}
