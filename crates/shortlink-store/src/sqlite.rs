//! SQLite-backed store.

use chrono::Utc;
use futures::future::BoxFuture;
use serde_json::Value;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use tracing::debug;

use crate::error::Result;
use crate::key::Key;
use crate::KvStore;

/// SQL to create the key-value table.
pub const CREATE_KV_TABLE_SQL: &str = r"
CREATE TABLE IF NOT EXISTS kv_entries (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL,
    updated_at TEXT NOT NULL
)
";

/// A persistent store keeping JSON values in a single `SQLite` table.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Wraps an existing pool. Call [`SqliteStore::ensure_table`] before use.
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Connects to a database URL and creates the table if needed.
    ///
    /// In-memory databases are limited to one connection that is never
    /// recycled, since each `SQLite` connection has its own memory database.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection or the table creation fails.
    pub async fn connect(url: &str) -> Result<Self> {
        let options = if url.contains(":memory:") {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(5)
        };
        let store = Self::new(options.connect(url).await?);
        store.ensure_table().await?;
        Ok(store)
    }

    /// Creates the key-value table if it doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Database`](crate::StoreError::Database) if the
    /// statement fails.
    pub async fn ensure_table(&self) -> Result<()> {
        sqlx::query(CREATE_KV_TABLE_SQL).execute(&self.pool).await?;
        Ok(())
    }

    /// Returns the underlying pool.
    #[must_use]
    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

impl KvStore for SqliteStore {
    fn get<'a>(&'a self, key: &'a Key) -> BoxFuture<'a, Result<Option<Value>>> {
        Box::pin(async move {
            let raw = sqlx::query_scalar::<_, String>("SELECT value FROM kv_entries WHERE key = ?")
                .bind(key.encode()?)
                .fetch_optional(&self.pool)
                .await?;
            match raw {
                Some(text) => Ok(Some(serde_json::from_str(&text)?)),
                None => Ok(None),
            }
        })
    }

    fn set<'a>(&'a self, key: &'a Key, value: Value) -> BoxFuture<'a, Result<()>> {
        Box::pin(async move {
            debug!(%key, "writing entry");
            sqlx::query(
                r"
                INSERT INTO kv_entries (key, value, updated_at)
                VALUES (?, ?, ?)
                ON CONFLICT(key) DO UPDATE SET
                    value = excluded.value,
                    updated_at = excluded.updated_at
                ",
            )
            .bind(key.encode()?)
            .bind(serde_json::to_string(&value)?)
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;
            Ok(())
        })
    }

    fn delete<'a>(&'a self, key: &'a Key) -> BoxFuture<'a, Result<bool>> {
        Box::pin(async move {
            let result = sqlx::query("DELETE FROM kv_entries WHERE key = ?")
                .bind(key.encode()?)
                .execute(&self.pool)
                .await?;
            Ok(result.rows_affected() > 0)
        })
    }
}
