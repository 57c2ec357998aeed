//! Authorization-code exchange against GitHub.

use reqwest::header::{ACCEPT, USER_AGENT};
use serde::Deserialize;
use shortlink_router::BoxFuture;
use shortlink_store::GitHubUser;

use crate::error::{AuthError, Result};
use crate::oauth::OAuthConfig;

/// Turns an authorization code into the signed-in user's profile.
pub trait CodeExchange: Send + Sync {
    /// Exchanges `code` for an access token and fetches the user.
    fn exchange<'a>(&'a self, code: &'a str) -> BoxFuture<'a, Result<GitHubUser>>;
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    error: Option<String>,
    error_description: Option<String>,
}

/// [`CodeExchange`] over GitHub's REST endpoints.
#[derive(Debug, Clone)]
pub struct GitHubExchange {
    client: reqwest::Client,
    config: OAuthConfig,
    user_url: String,
}

impl GitHubExchange {
    /// GitHub's endpoint for the authenticated user.
    pub const USER_URL: &'static str = "https://api.github.com/user";

    /// Creates an exchange using the given client credentials.
    pub fn new(config: OAuthConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
            user_url: Self::USER_URL.to_string(),
        }
    }

    async fn fetch_token(&self, code: &str) -> Result<String> {
        let token: TokenResponse = self
            .client
            .post(&self.config.token_url)
            .header(ACCEPT, "application/json")
            .form(&[
                ("client_id", self.config.client_id.as_str()),
                ("client_secret", self.config.client_secret.as_str()),
                ("code", code),
                ("redirect_uri", self.config.redirect_uri.as_str()),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        token.access_token.ok_or_else(|| {
            AuthError::Exchange(
                token
                    .error_description
                    .or(token.error)
                    .unwrap_or_else(|| "no access token in response".to_string()),
            )
        })
    }

    async fn fetch_user(&self, access_token: &str) -> Result<GitHubUser> {
        let user = self
            .client
            .get(&self.user_url)
            .bearer_auth(access_token)
            .header(ACCEPT, "application/vnd.github+json")
            .header(USER_AGENT, "shortlink")
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(user)
    }
}

impl CodeExchange for GitHubExchange {
    fn exchange<'a>(&'a self, code: &'a str) -> BoxFuture<'a, Result<GitHubUser>> {
        Box::pin(async move {
            let token = self.fetch_token(code).await?;
            self.fetch_user(&token).await
        })
    }
}
