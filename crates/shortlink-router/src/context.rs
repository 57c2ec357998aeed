//! Per-dispatch request context.

use std::future::Future;
use std::net::SocketAddr;
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};

use crate::request::Request;

/// A boxed future for async handlers and resolvers.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

static NEXT_REQUEST_ID: AtomicU64 = AtomicU64::new(1);

/// Metadata about how a request arrived, supplied by the server bridge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestMeta {
    /// Process-unique id, used to correlate log lines of one dispatch.
    pub request_id: u64,
    /// Peer address, when the transport knows it.
    pub remote_addr: Option<SocketAddr>,
    /// When the request was received.
    pub received_at: DateTime<Utc>,
}

impl RequestMeta {
    /// Creates metadata with a fresh request id, stamped with the current
    /// time.
    pub fn new(remote_addr: Option<SocketAddr>) -> Self {
        Self {
            request_id: NEXT_REQUEST_ID.fetch_add(1, Ordering::Relaxed),
            remote_addr,
            received_at: Utc::now(),
        }
    }
}

impl Default for RequestMeta {
    fn default() -> Self {
        Self::new(None)
    }
}

/// State scoped to a single dispatch.
///
/// A fresh context is built for every matched request and handed to the
/// handler by value, so nothing leaks between concurrent requests.
#[derive(Debug, Clone)]
pub struct RequestContext<U> {
    /// Transport metadata.
    pub meta: RequestMeta,
    /// The authenticated caller, if one was resolved.
    pub user: Option<U>,
}

impl<U> RequestContext<U> {
    /// Creates a context with no user.
    pub fn new(meta: RequestMeta) -> Self {
        Self { meta, user: None }
    }

    /// Returns the authenticated user, if any.
    pub fn user(&self) -> Option<&U> {
        self.user.as_ref()
    }
}

/// Resolves the caller identity for a request before its handler runs.
///
/// Returning `None` means "anonymous"; it is never treated as a failure.
///
/// # Example
///
/// ```ignore
/// struct HeaderUser;
///
/// impl IdentityResolver<String> for HeaderUser {
///     fn resolve<'a>(&'a self, req: &'a Request) -> BoxFuture<'a, Option<String>> {
///         Box::pin(async move { req.get_header("X-User").map(str::to_string) })
///     }
/// }
/// ```
pub trait IdentityResolver<U>: Send + Sync {
    /// Looks up the user for this request.
    fn resolve<'a>(&'a self, req: &'a Request) -> BoxFuture<'a, Option<U>>;
}
