//! Signed-in users keyed by session id.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::key::Key;
use crate::{get_json, set_json, KvStore};

/// Key prefix for sessions.
pub const SESSIONS: &str = "sessions";

/// The profile fields kept for a GitHub user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitHubUser {
    /// Username.
    pub login: String,
    /// Avatar image URL.
    pub avatar_url: String,
    /// Profile page URL.
    pub html_url: String,
}

fn session_key(session_id: &str) -> Key {
    Key::new([SESSIONS, session_id])
}

/// Stores the user for a session.
///
/// # Errors
///
/// Returns an error if the store fails.
pub async fn store_user(store: &dyn KvStore, session_id: &str, user: &GitHubUser) -> Result<()> {
    set_json(store, &session_key(session_id), user).await
}

/// Looks up the user for a session.
///
/// # Errors
///
/// Returns an error if the store fails or the stored record is malformed.
pub async fn get_user(store: &dyn KvStore, session_id: &str) -> Result<Option<GitHubUser>> {
    get_json(store, &session_key(session_id)).await
}

/// Removes a session. Returns true if it existed.
///
/// # Errors
///
/// Returns an error if the store fails.
pub async fn delete_user(store: &dyn KvStore, session_id: &str) -> Result<bool> {
    store.delete(&session_key(session_id)).await
}
