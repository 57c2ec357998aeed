//! # shortlink-auth
//!
//! Sign-in for shortlink through GitHub OAuth.
//!
//! This crate provides:
//! - Session cookie helpers ([`session_id`], [`set_cookie`], [`clear_cookie`])
//! - [`SessionResolver`], which plugs into the router so handlers see the
//!   signed-in [`GitHubUser`](shortlink_store::GitHubUser)
//! - The [`OAuthHelper`] boundary and its [`GitHubOAuth`] implementation
//! - [`GitHubExchange`], the HTTP client side of the code exchange
//!
//! ## Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use shortlink_auth::{GitHubExchange, GitHubOAuth, OAuthConfig, SessionResolver};
//! use shortlink_router::RouterBuilder;
//!
//! let store: Arc<dyn KvStore> = Arc::new(MemoryStore::new());
//! let config = OAuthConfig::github(client_id, client_secret, redirect_uri);
//! let exchange = Arc::new(GitHubExchange::new(config.clone()));
//! let oauth = GitHubOAuth::new(config, store.clone(), exchange);
//!
//! let router = RouterBuilder::with_identity(SessionResolver::new(store))
//!     .get("/oauth/signin", move |req, _, _| { /* oauth.sign_in(&req) */ })?
//!     .build();
//! ```
//!
//! ## Sessions
//!
//! A successful callback stores the user under `["sessions", <id>]` and sets
//! the `site-session` cookie. Sign-out deletes the entry and clears the
//! cookie.

mod error;
mod exchange;
mod oauth;
mod resolver;
mod session;

pub use error::{AuthError, Result};
pub use exchange::{CodeExchange, GitHubExchange};
pub use oauth::{GitHubOAuth, OAuthConfig, OAuthHelper};
pub use resolver::SessionResolver;
pub use session::{
    clear_cookie, generate_token, session_id, set_cookie, SESSION_COOKIE, SESSION_MAX_AGE_SECS,
    STATE_COOKIE, STATE_MAX_AGE_SECS,
};
