//! Composite store keys.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// An ordered, multi-part key such as `["shortlinks", "abc123"]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Key(Vec<String>);

impl Key {
    /// Creates a key from its parts.
    #[must_use]
    pub fn new<I, S>(parts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(parts.into_iter().map(Into::into).collect())
    }

    /// Returns the key parts.
    #[must_use]
    pub fn parts(&self) -> &[String] {
        &self.0
    }

    /// Encodes the key as a JSON array string.
    ///
    /// Unlike the `/`-joined display form this cannot collide when a part
    /// itself contains a slash.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Serialization`](crate::StoreError::Serialization)
    /// if encoding fails.
    pub fn encode(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.0)?)
    }
}

impl std::fmt::Display for Key {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0.join("/"))
    }
}
