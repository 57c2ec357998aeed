//! # shortlink-store
//!
//! Key-value persistence for short links and signed-in sessions.
//!
//! This crate provides:
//! - [`KvStore`], an object-safe async get/set/delete interface over
//!   composite [`Key`]s and JSON values
//! - [`MemoryStore`] for tests and single-process use
//! - [`SqliteStore`] for persistence across restarts
//! - [`ShortLink`] records and [`generate_short_code`]
//! - [`GitHubUser`] records keyed by session id
//!
//! ## Quick Start
//!
//! ```rust
//! use shortlink_store::{generate_short_code, get_short_link, store_short_link, MemoryStore};
//!
//! # tokio_test::block_on(async {
//! let store = MemoryStore::new();
//! let code = generate_short_code("https://example.com").unwrap();
//! store_short_link(&store, "https://example.com", &code, "octocat").await.unwrap();
//!
//! let link = get_short_link(&store, &code).await.unwrap().unwrap();
//! assert_eq!(link.long_url, "https://example.com");
//! # });
//! ```

mod error;
mod key;
mod links;
mod memory;
mod sqlite;
mod users;

pub use error::{Result, StoreError};
pub use key::Key;
pub use links::{
    generate_short_code, generate_short_code_at, get_short_link, record_click, store_short_link,
    ShortLink, SHORTLINKS,
};
pub use memory::MemoryStore;
pub use sqlite::{SqliteStore, CREATE_KV_TABLE_SQL};
pub use users::{delete_user, get_user, store_user, GitHubUser, SESSIONS};

use futures::future::BoxFuture;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

/// An async key-value store holding JSON values.
pub trait KvStore: Send + Sync {
    /// Reads a value.
    fn get<'a>(&'a self, key: &'a Key) -> BoxFuture<'a, Result<Option<Value>>>;

    /// Writes a value, replacing any previous one.
    fn set<'a>(&'a self, key: &'a Key, value: Value) -> BoxFuture<'a, Result<()>>;

    /// Removes a value. Returns true if it existed.
    fn delete<'a>(&'a self, key: &'a Key) -> BoxFuture<'a, Result<bool>>;
}

/// Reads and deserializes a value.
///
/// # Errors
///
/// Returns an error if the store fails or the stored value does not
/// deserialize into `T`.
pub async fn get_json<T>(store: &dyn KvStore, key: &Key) -> Result<Option<T>>
where
    T: DeserializeOwned + Send,
{
    match store.get(key).await? {
        Some(value) => Ok(Some(serde_json::from_value(value)?)),
        None => Ok(None),
    }
}

/// Serializes and writes a value.
///
/// # Errors
///
/// Returns an error if `value` does not serialize or the store fails.
pub async fn set_json<T>(store: &dyn KvStore, key: &Key, value: &T) -> Result<()>
where
    T: Serialize + Sync + ?Sized,
{
    store.set(key, serde_json::to_value(value)?).await
}
