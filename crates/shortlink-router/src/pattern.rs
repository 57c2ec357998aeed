//! Path pattern compilation and matching.

use crate::error::{Result, RouterError};

/// A segment in a compiled path pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// A literal segment, compared byte-for-byte.
    Literal(String),
    /// A named parameter segment (e.g. `:id`).
    Param(String),
    /// A trailing wildcard (`*` or `*name`) capturing the rest of the path.
    Wildcard(Option<String>),
}

/// A compiled path pattern.
///
/// Pattern syntax:
/// - `/users` - literal path
/// - `/users/:id` - named parameter capturing one segment
/// - `/static/*` - trailing wildcard capturing the remainder of the path
/// - `/files/*path` - named wildcard, also exposed as a parameter
///
/// # Example
///
/// ```
/// use shortlink_router::RoutePattern;
///
/// let pattern = RoutePattern::compile("/posts/:id/comments/:comment_id").unwrap();
/// let m = pattern.match_path("/posts/123/comments/456").unwrap();
/// assert_eq!(m.get("id"), Some("123"));
/// assert_eq!(m.get("comment_id"), Some("456"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutePattern {
    source: String,
    segments: Vec<Segment>,
}

impl RoutePattern {
    /// Compiles a pattern string.
    ///
    /// Fails when a parameter has an empty name, when a wildcard is not the
    /// final segment, or when a parameter name is declared twice.
    pub fn compile(pattern: &str) -> Result<Self> {
        let parts = split_path(pattern);
        let last = parts.len().saturating_sub(1);
        let mut segments = Vec::with_capacity(parts.len());
        let mut names: Vec<&str> = Vec::new();

        for (i, part) in parts.iter().enumerate() {
            let segment = if let Some(name) = part.strip_prefix(':') {
                if name.is_empty() {
                    return Err(RouterError::invalid_pattern(
                        pattern,
                        "empty parameter name",
                    ));
                }
                declare(pattern, &mut names, name)?;
                Segment::Param(name.to_string())
            } else if let Some(name) = part.strip_prefix('*') {
                if i != last {
                    return Err(RouterError::invalid_pattern(
                        pattern,
                        "wildcard must be the final segment",
                    ));
                }
                if name.is_empty() {
                    Segment::Wildcard(None)
                } else {
                    declare(pattern, &mut names, name)?;
                    Segment::Wildcard(Some(name.to_string()))
                }
            } else {
                Segment::Literal((*part).to_string())
            };
            segments.push(segment);
        }

        Ok(Self {
            source: pattern.to_string(),
            segments,
        })
    }

    /// Attempts to match a concrete path against this pattern.
    ///
    /// Any query string is ignored. Returns `None` on mismatch.
    pub fn match_path(&self, path: &str) -> Option<MatchResult> {
        let path = strip_query(path);
        let parts = split_path(path);
        let mut result = MatchResult::new();
        let mut idx = 0;

        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => {
                    if *parts.get(idx)? != text.as_str() {
                        return None;
                    }
                    idx += 1;
                }
                Segment::Param(name) => {
                    let value = *parts.get(idx)?;
                    if value.is_empty() {
                        return None;
                    }
                    result.params.push((name.clone(), value.to_string()));
                    idx += 1;
                }
                Segment::Wildcard(name) => {
                    let rest = parts[idx..].join("/");
                    if let Some(name) = name {
                        result.params.push((name.clone(), rest.clone()));
                    }
                    result.wildcard = Some(rest);
                    return Some(result);
                }
            }
        }

        (idx == parts.len()).then_some(result)
    }

    /// Returns the original pattern string.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Returns the compiled segments.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }
}

impl std::fmt::Display for RoutePattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.source)
    }
}

fn declare<'a>(pattern: &str, names: &mut Vec<&'a str>, name: &'a str) -> Result<()> {
    if names.contains(&name) {
        return Err(RouterError::invalid_pattern(
            pattern,
            format!("duplicate parameter name `{name}`"),
        ));
    }
    names.push(name);
    Ok(())
}

/// Strips a `?query` suffix from a request target.
pub(crate) fn strip_query(path: &str) -> &str {
    path.split_once('?').map_or(path, |(p, _)| p)
}

/// Splits a path on `/`, ignoring a single leading and trailing slash.
fn split_path(path: &str) -> Vec<&str> {
    let path = path.strip_prefix('/').unwrap_or(path);
    let path = path.strip_suffix('/').unwrap_or(path);
    if path.is_empty() {
        Vec::new()
    } else {
        path.split('/').collect()
    }
}

/// Captures produced by matching a path against a [`RoutePattern`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchResult {
    params: Vec<(String, String)>,
    wildcard: Option<String>,
}

impl MatchResult {
    /// Creates an empty match result.
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets a captured parameter by name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Gets a parameter or returns an error naming the missing key.
    pub fn require(&self, name: &str) -> std::result::Result<&str, String> {
        self.get(name)
            .ok_or_else(|| format!("Missing path parameter: {name}"))
    }

    /// Parses a parameter as a specific type.
    pub fn parse<T: std::str::FromStr>(&self, name: &str) -> Option<T> {
        self.get(name).and_then(|v| v.parse().ok())
    }

    /// Returns the remainder captured by a trailing wildcard.
    pub fn wildcard(&self) -> Option<&str> {
        self.wildcard.as_deref()
    }

    /// Iterates captured parameters in pattern order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.params.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Returns the number of captured parameters.
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// Returns true if no parameters were captured.
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }
}
