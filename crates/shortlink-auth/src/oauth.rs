//! OAuth sign-in, sign-out and callback handling.

use std::sync::Arc;

use shortlink_router::{BoxFuture, Request, Response};
use shortlink_store::{delete_user, store_user, KvStore};
use tracing::info;
use url::Url;

use crate::error::{AuthError, Result};
use crate::exchange::CodeExchange;
use crate::session::{
    clear_cookie, generate_token, session_id, set_cookie, SESSION_COOKIE, SESSION_MAX_AGE_SECS,
    STATE_COOKIE, STATE_MAX_AGE_SECS,
};

/// The three operations the application delegates to an identity provider.
pub trait OAuthHelper: Send + Sync {
    /// Starts sign-in, usually by redirecting to the provider.
    fn sign_in<'a>(&'a self, req: &'a Request) -> BoxFuture<'a, Result<Response>>;

    /// Ends the current session.
    fn sign_out<'a>(&'a self, req: &'a Request) -> BoxFuture<'a, Result<Response>>;

    /// Completes sign-in when the provider redirects back.
    fn handle_callback<'a>(&'a self, req: &'a Request) -> BoxFuture<'a, Result<Response>>;
}

/// OAuth client settings.
#[derive(Debug, Clone)]
pub struct OAuthConfig {
    /// Application client id.
    pub client_id: String,
    /// Application client secret.
    pub client_secret: String,
    /// Where the provider redirects after authorization.
    pub redirect_uri: String,
    /// Provider authorization endpoint.
    pub authorize_url: String,
    /// Provider token endpoint.
    pub token_url: String,
    /// Where to send the user after signing in or out.
    pub home_path: String,
}

impl OAuthConfig {
    /// Settings for a GitHub OAuth app.
    pub fn github(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        redirect_uri: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            redirect_uri: redirect_uri.into(),
            authorize_url: "https://github.com/login/oauth/authorize".to_string(),
            token_url: "https://github.com/login/oauth/access_token".to_string(),
            home_path: "/".to_string(),
        }
    }
}

/// GitHub sign-in backed by the session store.
pub struct GitHubOAuth {
    config: OAuthConfig,
    store: Arc<dyn KvStore>,
    exchange: Arc<dyn CodeExchange>,
}

impl GitHubOAuth {
    /// Creates the helper.
    pub fn new(
        config: OAuthConfig,
        store: Arc<dyn KvStore>,
        exchange: Arc<dyn CodeExchange>,
    ) -> Self {
        Self {
            config,
            store,
            exchange,
        }
    }

    /// Builds the provider authorization URL for a state token.
    pub fn authorize_url(&self, state: &str) -> Result<String> {
        let url = Url::parse_with_params(
            &self.config.authorize_url,
            &[
                ("client_id", self.config.client_id.as_str()),
                ("redirect_uri", self.config.redirect_uri.as_str()),
                ("state", state),
            ],
        )
        .map_err(|e| AuthError::Exchange(format!("bad authorize URL: {e}")))?;
        Ok(url.into())
    }
}

impl OAuthHelper for GitHubOAuth {
    fn sign_in<'a>(&'a self, _req: &'a Request) -> BoxFuture<'a, Result<Response>> {
        Box::pin(async move {
            let state = generate_token();
            let location = self.authorize_url(&state)?;
            Ok(Response::redirect(location).cookie(set_cookie(
                STATE_COOKIE,
                &state,
                STATE_MAX_AGE_SECS,
            )))
        })
    }

    fn sign_out<'a>(&'a self, req: &'a Request) -> BoxFuture<'a, Result<Response>> {
        Box::pin(async move {
            if let Some(id) = session_id(req) {
                delete_user(&*self.store, id).await?;
            }
            Ok(Response::redirect(&self.config.home_path).cookie(clear_cookie(SESSION_COOKIE)))
        })
    }

    fn handle_callback<'a>(&'a self, req: &'a Request) -> BoxFuture<'a, Result<Response>> {
        Box::pin(async move {
            let code = req.get_query("code").ok_or(AuthError::MissingCode)?;
            let expected = req
                .cookie(STATE_COOKIE)
                .filter(|state| !state.is_empty())
                .ok_or(AuthError::StateMismatch)?;
            if req.get_query("state") != Some(expected) {
                return Err(AuthError::StateMismatch);
            }

            let user = self.exchange.exchange(code).await?;
            let id = generate_token();
            store_user(&*self.store, &id, &user).await?;
            info!(login = %user.login, "user signed in");

            Ok(Response::redirect(&self.config.home_path)
                .cookie(set_cookie(SESSION_COOKIE, &id, SESSION_MAX_AGE_SECS))
                .cookie(clear_cookie(STATE_COOKIE)))
        })
    }
}
