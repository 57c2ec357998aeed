//! Short links and short-code generation.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use url::Url;

use crate::error::{Result, StoreError};
use crate::key::Key;
use crate::{get_json, set_json, KvStore};

/// Key prefix for stored links.
pub const SHORTLINKS: &str = "shortlinks";

/// A stored short link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortLink {
    /// The generated code.
    pub short_code: String,
    /// The target URL.
    pub long_url: String,
    /// Creation time in milliseconds since the Unix epoch.
    pub created_at: i64,
    /// Login of the user that created the link.
    pub user_id: String,
    /// Number of redirects served.
    pub click_count: u64,
    /// RFC 3339 timestamp of the most recent redirect.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_click_event: Option<String>,
}

impl ShortLink {
    /// Returns the store key for a code.
    #[must_use]
    pub fn key(short_code: &str) -> Key {
        Key::new([SHORTLINKS, short_code])
    }
}

/// Generates a short code for a URL using the current time.
///
/// The URL must parse as an absolute URL. The code is the first 8 bytes of
/// `SHA-256(url || millis)` in unpadded URL-safe base64 (11 characters).
/// Codes are not checked for collisions.
///
/// # Errors
///
/// Returns [`StoreError::InvalidUrl`] if `long_url` is not an absolute URL.
pub fn generate_short_code(long_url: &str) -> Result<String> {
    generate_short_code_at(long_url, Utc::now().timestamp_millis())
}

/// Generates a short code for a URL at a fixed timestamp.
///
/// # Errors
///
/// Returns [`StoreError::InvalidUrl`] if `long_url` is not an absolute URL.
pub fn generate_short_code_at(long_url: &str, millis: i64) -> Result<String> {
    Url::parse(long_url).map_err(|e| StoreError::InvalidUrl(format!("{long_url}: {e}")))?;

    let mut hasher = Sha256::new();
    hasher.update(long_url.as_bytes());
    hasher.update(millis.to_string().as_bytes());
    let digest = hasher.finalize();

    Ok(URL_SAFE_NO_PAD.encode(&digest[..8]))
}

/// Stores a new link with zero clicks and returns it.
///
/// # Errors
///
/// Returns an error if the store fails.
pub async fn store_short_link(
    store: &dyn KvStore,
    long_url: &str,
    short_code: &str,
    user_id: &str,
) -> Result<ShortLink> {
    let link = ShortLink {
        short_code: short_code.to_string(),
        long_url: long_url.to_string(),
        created_at: Utc::now().timestamp_millis(),
        user_id: user_id.to_string(),
        click_count: 0,
        last_click_event: None,
    };
    set_json(store, &ShortLink::key(short_code), &link).await?;
    Ok(link)
}

/// Looks up a link by code.
///
/// # Errors
///
/// Returns an error if the store fails or the stored record is malformed.
pub async fn get_short_link(
    store: &dyn KvStore,
    short_code: &str,
) -> Result<Option<ShortLink>> {
    get_json(store, &ShortLink::key(short_code)).await
}

/// Increments a link's click count and stamps the click time.
///
/// Returns the updated link, or `None` if the code is unknown. The update is
/// a read-modify-write; concurrent clicks may be under-counted.
///
/// # Errors
///
/// Returns an error if the store fails or the stored record is malformed.
pub async fn record_click(
    store: &dyn KvStore,
    short_code: &str,
) -> Result<Option<ShortLink>> {
    let Some(mut link) = get_short_link(store, short_code).await? else {
        return Ok(None);
    };
    link.click_count += 1;
    link.last_click_event = Some(Utc::now().to_rfc3339());
    set_json(store, &ShortLink::key(short_code), &link).await?;
    Ok(Some(link))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryStore;

    #[test]
    fn test_code_shape() {
        let code = generate_short_code("https://example.com").unwrap();
        assert_eq!(code.len(), 11);
        assert!(code
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }

    #[test]
    fn test_code_depends_on_time() {
        let a = generate_short_code_at("https://example.com", 1).unwrap();
        let b = generate_short_code_at("https://example.com", 1).unwrap();
        let c = generate_short_code_at("https://example.com", 2).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_invalid_url_rejected() {
        let err = generate_short_code("not a url").unwrap_err();
        assert!(matches!(err, StoreError::InvalidUrl(_)));
        assert!(generate_short_code("/relative/path").is_err());
    }

    #[test]
    fn test_link_json_shape() {
        let link = ShortLink {
            short_code: "abc".to_string(),
            long_url: "https://example.com".to_string(),
            created_at: 1,
            user_id: "octocat".to_string(),
            click_count: 0,
            last_click_event: None,
        };
        let value = serde_json::to_value(&link).unwrap();
        assert_eq!(value["shortCode"], "abc");
        assert_eq!(value["longUrl"], "https://example.com");
        assert_eq!(value["clickCount"], 0);
        assert!(value.get("lastClickEvent").is_none());
    }

    #[tokio::test]
    async fn test_store_and_get() {
        let store = MemoryStore::new();
        let code = generate_short_code("https://example.com").unwrap();

        let stored = store_short_link(&store, "https://example.com", &code, "octocat")
            .await
            .unwrap();
        let fetched = get_short_link(&store, &code).await.unwrap().unwrap();

        assert_eq!(stored, fetched);
        assert_eq!(fetched.long_url, "https://example.com");
        assert_eq!(fetched.click_count, 0);
        assert!(get_short_link(&store, "missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_record_click() {
        let store = MemoryStore::new();
        store_short_link(&store, "https://example.com", "abc", "octocat")
            .await
            .unwrap();

        record_click(&store, "abc").await.unwrap();
        let link = record_click(&store, "abc").await.unwrap().unwrap();
        assert_eq!(link.click_count, 2);
        assert!(link.last_click_event.is_some());

        assert!(record_click(&store, "missing").await.unwrap().is_none());
    }
}
