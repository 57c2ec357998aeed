//! The application route table.

use std::future::Future;

use shortlink_auth::SessionResolver;
use shortlink_router::{HandlerResult, MatchResult, Request, RequestContext, Router, RouterBuilder};
use shortlink_store::GitHubUser;

use crate::error::Result;
use crate::handlers;
use crate::state::AppState;

/// Binds a state-taking handler to a clone of `state`.
fn with_state<F, Fut>(
    state: &AppState,
    handler: F,
) -> impl Fn(Request, MatchResult, RequestContext<GitHubUser>) -> Fut + Send + Sync + 'static
where
    F: Fn(AppState, Request, MatchResult, RequestContext<GitHubUser>) -> Fut
        + Send
        + Sync
        + 'static,
    Fut: Future<Output = HandlerResult> + Send + 'static,
{
    let state = state.clone();
    move |req, matched, ctx| handler(state.clone(), req, matched, ctx)
}

/// Builds the frozen router for the application.
///
/// The signed-in user is resolved from the session cookie before every
/// handler runs.
pub fn build_router(state: AppState) -> Result<Router<GitHubUser>> {
    let s = &state;
    Ok(
        RouterBuilder::with_identity(SessionResolver::new(state.store.clone()))
            .get("/", with_state(s, handlers::home))?
            .post("/health-check", with_state(s, handlers::health_check))?
            .get("/oauth/signin", with_state(s, handlers::sign_in))?
            .get("/oauth/signout", with_state(s, handlers::sign_out))?
            .get("/oauth/callback", with_state(s, handlers::callback))?
            .post("/links", with_state(s, handlers::create_link))?
            .get("/links/:id", with_state(s, handlers::get_link))?
            .get("/realm/:code", with_state(s, handlers::link_page))?
            .get("/s/:code", with_state(s, handlers::redirect))?
            .get("/static/*", with_state(s, handlers::static_file))?
            .build(),
    )
}
