//! # shortlink-router
//!
//! A minimal HTTP request router.
//!
//! This crate provides:
//! - Path patterns with literal, `:name` parameter and trailing `*` segments
//! - Method-based routing where the first registered match wins
//! - A builder that freezes the route table before serving
//! - Per-request context with optional identity resolution
//! - A total dispatch function: every request yields exactly one response
//!
//! ## Quick Start
//!
//! ```ignore
//! use shortlink_router::{HandlerResult, MatchResult, Request, RequestContext, Response, Router};
//!
//! async fn hello(_req: Request, _m: MatchResult, _ctx: RequestContext<()>) -> HandlerResult {
//!     Ok(Response::text("Hello, World!"))
//! }
//!
//! async fn user(_req: Request, m: MatchResult, _ctx: RequestContext<()>) -> HandlerResult {
//!     Ok(Response::json(&serde_json::json!({"id": m.get("id")})))
//! }
//!
//! let router = Router::builder()
//!     .get("/", hello)?
//!     .get("/users/:id", user)?
//!     .build();
//!
//! let response = router.handle(Request::get("/users/123")).await;
//! ```
//!
//! ## Path Patterns
//!
//! ```ignore
//! router.get("/posts/:post_id/comments/:comment_id", handler)?
//! router.get("/static/*", serve_static)?
//! ```
//!
//! Captures arrive in the handler's [`MatchResult`]; the wildcard remainder
//! is available through [`MatchResult::wildcard`].
//!
//! ## Failures
//!
//! Malformed patterns are rejected at registration with
//! [`RouterError::InvalidPattern`]. Unmatched requests get a 404. A handler
//! that returns an error or panics yields a generic 500 and the cause is
//! logged through `tracing`.

mod context;
mod error;
mod pattern;
mod request;
mod response;
mod router;

pub use context::{BoxFuture, IdentityResolver, RequestContext, RequestMeta};
pub use error::{HandlerError, HandlerResult, Result, RouterError};
pub use pattern::{MatchResult, RoutePattern, Segment};
pub use request::{Method, Request};
pub use response::Response;
pub use router::{Handler, Route, Router, RouterBuilder};
