//! Resolves the signed-in user from the session cookie.

use std::sync::Arc;

use shortlink_router::{BoxFuture, IdentityResolver, Request};
use shortlink_store::{get_user, GitHubUser, KvStore};
use tracing::warn;

use crate::session::session_id;

/// Looks up the session cookie in the store before each handler runs.
///
/// A missing cookie, an unknown session or a failing store all leave the
/// request anonymous.
#[derive(Clone)]
pub struct SessionResolver {
    store: Arc<dyn KvStore>,
}

impl SessionResolver {
    /// Creates a resolver over a store.
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self { store }
    }
}

impl IdentityResolver<GitHubUser> for SessionResolver {
    fn resolve<'a>(&'a self, req: &'a Request) -> BoxFuture<'a, Option<GitHubUser>> {
        Box::pin(async move {
            let id = session_id(req)?;
            match get_user(&*self.store, id).await {
                Ok(user) => user,
                Err(err) => {
                    warn!(error = %err, "session lookup failed");
                    None
                }
            }
        })
    }
}
