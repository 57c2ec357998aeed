//! Request handlers.
//!
//! Each handler receives the shared [`AppState`] along with the usual
//! router arguments. See [`crate::routes`] for how they are mounted.

use std::io::ErrorKind;
use std::path::Path;

use serde::Deserialize;
use shortlink_auth::{AuthError, Result as AuthResult};
use shortlink_router::{
    HandlerError, HandlerResult, MatchResult, Request, RequestContext, Response,
};
use shortlink_store::{
    generate_short_code, get_short_link, record_click, store_short_link, GitHubUser, StoreError,
};
use tracing::{debug, info, warn};

use crate::state::AppState;
use crate::views;

/// Owner recorded for links created without signing in.
pub const ANONYMOUS_USER: &str = "anonymous";

type Ctx = RequestContext<GitHubUser>;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateLink {
    long_url: String,
}

/// `GET /`
pub async fn home(_state: AppState, _req: Request, _m: MatchResult, ctx: Ctx) -> HandlerResult {
    Ok(Response::html(views::render_home(ctx.user())))
}

/// `POST /health-check`
pub async fn health_check(
    _state: AppState,
    _req: Request,
    _m: MatchResult,
    _ctx: Ctx,
) -> HandlerResult {
    Ok(Response::text("It's ALIVE!"))
}

/// `GET /oauth/signin`
pub async fn sign_in(state: AppState, req: Request, _m: MatchResult, _ctx: Ctx) -> HandlerResult {
    oauth_response(state.oauth.sign_in(&req).await)
}

/// `GET /oauth/signout`
pub async fn sign_out(state: AppState, req: Request, _m: MatchResult, _ctx: Ctx) -> HandlerResult {
    oauth_response(state.oauth.sign_out(&req).await)
}

/// `GET /oauth/callback`
pub async fn callback(state: AppState, req: Request, _m: MatchResult, _ctx: Ctx) -> HandlerResult {
    oauth_response(state.oauth.handle_callback(&req).await)
}

/// Maps malformed callbacks to 400 and lets everything else fail the request.
fn oauth_response(result: AuthResult<Response>) -> HandlerResult {
    match result {
        Ok(res) => Ok(res),
        Err(err) if err.is_client_error() => {
            warn!(error = %err, "rejected OAuth request");
            Ok(Response::bad_request(err.to_string()))
        }
        Err(err @ AuthError::Exchange(_)) => {
            warn!(error = %err, "OAuth code exchange refused");
            Ok(Response::error(502, "Sign-in failed"))
        }
        Err(err) => Err(err.into()),
    }
}

/// `POST /links`
///
/// Accepts `longUrl=...` when the body is declared as a form and
/// `{"longUrl": ...}` otherwise, whatever the declared type. JSON requests
/// get the stored link back with 201, form posts are redirected to the link
/// page.
pub async fn create_link(
    state: AppState,
    req: Request,
    _m: MatchResult,
    ctx: Ctx,
) -> HandlerResult {
    let from_form = req.is_form();
    if !from_form && !req.is_json() {
        debug!(
            content_type = ?req.get_header("Content-Type"),
            "reading undeclared body as JSON"
        );
    }
    let long_url = if from_form {
        match req.form().remove("longUrl") {
            Some(url) => url,
            None => return Ok(Response::bad_request("missing longUrl")),
        }
    } else {
        match req.json::<CreateLink>() {
            Ok(body) => body.long_url,
            Err(err) => return Ok(Response::bad_request(format!("invalid body: {err}"))),
        }
    };

    let code = match generate_short_code(&long_url) {
        Ok(code) => code,
        Err(StoreError::InvalidUrl(reason)) => {
            return Ok(Response::bad_request(format!("invalid URL: {reason}")));
        }
        Err(err) => return Err(err.into()),
    };

    let owner = ctx.user().map_or(ANONYMOUS_USER, |u| u.login.as_str());
    let link = store_short_link(&*state.store, &long_url, &code, owner).await?;
    info!(code = %link.short_code, owner = %link.user_id, "short link created");

    if from_form {
        Ok(Response::redirect(format!("/realm/{}", link.short_code)))
    } else {
        Ok(Response::created(&link))
    }
}

/// `GET /links/:id`
pub async fn get_link(state: AppState, _req: Request, m: MatchResult, _ctx: Ctx) -> HandlerResult {
    let code = m.require("id").map_err(HandlerError::new)?;
    match get_short_link(&*state.store, code).await? {
        Some(link) => Ok(Response::json(&link)),
        None => Ok(Response::not_found()),
    }
}

/// `GET /realm/:code`
pub async fn link_page(state: AppState, _req: Request, m: MatchResult, ctx: Ctx) -> HandlerResult {
    let code = m.require("code").map_err(HandlerError::new)?;
    match get_short_link(&*state.store, code).await? {
        Some(link) => Ok(Response::html(views::render_link(&link, ctx.user()))),
        None => Ok(Response::html(views::render_not_found(ctx.user())).status(404)),
    }
}

/// `GET /s/:code`
pub async fn redirect(state: AppState, _req: Request, m: MatchResult, ctx: Ctx) -> HandlerResult {
    let code = m.require("code").map_err(HandlerError::new)?;
    match record_click(&*state.store, code).await? {
        Some(link) => {
            debug!(code = %code, clicks = link.click_count, "redirecting");
            Ok(Response::redirect(link.long_url))
        }
        None => Ok(Response::html(views::render_not_found(ctx.user())).status(404)),
    }
}

/// `GET /static/*`
pub async fn static_file(
    state: AppState,
    _req: Request,
    m: MatchResult,
    _ctx: Ctx,
) -> HandlerResult {
    let Some(relative) = m.wildcard().filter(|p| is_safe_path(p)) else {
        return Ok(Response::not_found());
    };

    let path = state.static_dir.join(relative);
    match tokio::fs::metadata(&path).await {
        Ok(meta) if meta.is_file() => {}
        Ok(_) => return Ok(Response::not_found()),
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Response::not_found()),
        Err(err) => return Err(err.into()),
    }

    let bytes = tokio::fs::read(&path).await?;
    Ok(Response::ok()
        .header("Content-Type", content_type(&path))
        .body(bytes))
}

/// Rejects empty, hidden-relative and parent segments.
fn is_safe_path(relative: &str) -> bool {
    !relative.is_empty()
        && !relative.contains('\\')
        && relative
            .split('/')
            .all(|segment| !segment.is_empty() && segment != "." && segment != "..")
}

fn content_type(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some("html") => "text/html; charset=utf-8",
        Some("css") => "text/css; charset=utf-8",
        Some("js") => "text/javascript; charset=utf-8",
        Some("json") => "application/json",
        Some("txt") => "text/plain; charset=utf-8",
        Some("svg") => "image/svg+xml",
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("ico") => "image/x-icon",
        Some("woff2") => "font/woff2",
        _ => "application/octet-stream",
    }
}
