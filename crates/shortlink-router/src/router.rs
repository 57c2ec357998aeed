//! Route table, registration and dispatch.

use std::any::Any;
use std::fmt;
use std::future::Future;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use futures::FutureExt;
use tracing::{debug, error, warn};

use crate::context::{BoxFuture, IdentityResolver, RequestContext, RequestMeta};
use crate::error::{HandlerResult, Result};
use crate::pattern::{MatchResult, RoutePattern};
use crate::request::{Method, Request};
use crate::response::Response;

/// A boxed async handler function.
pub type Handler<U> = Arc<
    dyn Fn(Request, MatchResult, RequestContext<U>) -> BoxFuture<'static, HandlerResult>
        + Send
        + Sync,
>;

/// A single route definition.
pub struct Route<U> {
    /// HTTP method.
    pub method: Method,
    /// Compiled path pattern.
    pub pattern: RoutePattern,
    /// Request handler.
    pub handler: Handler<U>,
}

impl<U: Send + 'static> Route<U> {
    /// Creates a new route, compiling its pattern.
    pub fn new<F, Fut>(method: Method, pattern: &str, handler: F) -> Result<Self>
    where
        F: Fn(Request, MatchResult, RequestContext<U>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HandlerResult> + Send + 'static,
    {
        Ok(Self {
            method: method.normalized(),
            pattern: RoutePattern::compile(pattern)?,
            handler: Arc::new(
                move |req: Request,
                      matched: MatchResult,
                      ctx: RequestContext<U>|
                      -> BoxFuture<'static, HandlerResult> {
                    Box::pin(handler(req, matched, ctx))
                },
            ),
        })
    }
}

impl<U> fmt::Debug for Route<U> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("method", &self.method)
            .field("pattern", &self.pattern.as_str())
            .finish_non_exhaustive()
    }
}

/// Collects routes during startup and freezes them into a [`Router`].
///
/// Every registration call compiles its pattern immediately, so a malformed
/// pattern is reported to startup code before any traffic is served.
pub struct RouterBuilder<U = ()> {
    routes: Vec<Route<U>>,
    identity: Option<Arc<dyn IdentityResolver<U>>>,
}

impl RouterBuilder {
    /// Creates a builder for a router without identity resolution.
    pub fn new() -> Self {
        Self {
            routes: Vec::new(),
            identity: None,
        }
    }
}

impl Default for RouterBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl<U: Send + Sync + 'static> RouterBuilder<U> {
    /// Creates a builder whose router resolves the caller before each handler.
    pub fn with_identity(resolver: impl IdentityResolver<U> + 'static) -> Self {
        Self {
            routes: Vec::new(),
            identity: Some(Arc::new(resolver)),
        }
    }

    /// Adds a GET route.
    pub fn get<F, Fut>(self, pattern: &str, handler: F) -> Result<Self>
    where
        F: Fn(Request, MatchResult, RequestContext<U>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HandlerResult> + Send + 'static,
    {
        self.route(Method::Get, pattern, handler)
    }

    /// Adds a POST route.
    pub fn post<F, Fut>(self, pattern: &str, handler: F) -> Result<Self>
    where
        F: Fn(Request, MatchResult, RequestContext<U>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HandlerResult> + Send + 'static,
    {
        self.route(Method::Post, pattern, handler)
    }

    /// Adds a PUT route.
    pub fn put<F, Fut>(self, pattern: &str, handler: F) -> Result<Self>
    where
        F: Fn(Request, MatchResult, RequestContext<U>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HandlerResult> + Send + 'static,
    {
        self.route(Method::Put, pattern, handler)
    }

    /// Adds a PATCH route.
    pub fn patch<F, Fut>(self, pattern: &str, handler: F) -> Result<Self>
    where
        F: Fn(Request, MatchResult, RequestContext<U>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HandlerResult> + Send + 'static,
    {
        self.route(Method::Patch, pattern, handler)
    }

    /// Adds a DELETE route.
    pub fn delete<F, Fut>(self, pattern: &str, handler: F) -> Result<Self>
    where
        F: Fn(Request, MatchResult, RequestContext<U>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HandlerResult> + Send + 'static,
    {
        self.route(Method::Delete, pattern, handler)
    }

    /// Adds a route with any method.
    pub fn route<F, Fut>(mut self, method: Method, pattern: &str, handler: F) -> Result<Self>
    where
        F: Fn(Request, MatchResult, RequestContext<U>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HandlerResult> + Send + 'static,
    {
        self.routes.push(Route::new(method, pattern, handler)?);
        Ok(self)
    }

    /// Freezes the route table.
    pub fn build(self) -> Router<U> {
        Router {
            routes: self.routes,
            identity: self.identity,
        }
    }
}

/// An immutable route table with a single dispatch entry point.
///
/// Routes are consulted in registration order and the first match wins.
///
/// # Example
///
/// ```
/// use shortlink_router::{Request, Response, Router};
///
/// # tokio_test::block_on(async {
/// let router = Router::builder()
///     .get("/users/:id", |_req, m, _ctx| async move {
///         Ok(Response::text(format!("user {}", m.get("id").unwrap_or("?"))))
///     })
///     .unwrap()
///     .build();
///
/// let res = router.handle(Request::get("/users/42")).await;
/// assert_eq!(res.body_string().as_deref(), Some("user 42"));
/// # });
/// ```
pub struct Router<U = ()> {
    routes: Vec<Route<U>>,
    identity: Option<Arc<dyn IdentityResolver<U>>>,
}

impl Router {
    /// Starts building a router.
    pub fn builder() -> RouterBuilder {
        RouterBuilder::new()
    }
}

impl<U: Send + Sync + 'static> Router<U> {
    /// Returns the registered routes in order.
    pub fn routes(&self) -> &[Route<U>] {
        &self.routes
    }

    /// Dispatches a request with default metadata.
    pub async fn handle(&self, request: Request) -> Response {
        self.handle_with_meta(request, RequestMeta::default()).await
    }

    /// Dispatches a request.
    ///
    /// Always produces a response: unmatched requests get the 404 fallback,
    /// and handler failures or panics become a generic 500.
    pub async fn handle_with_meta(&self, mut request: Request, meta: RequestMeta) -> Response {
        request.method = request.method.normalized();
        if let Some(pos) = request.path.find('?') {
            let query = request.path.split_off(pos);
            request
                .query
                .extend(Request::parse_query_string(&query[1..]));
        }

        let request_id = meta.request_id;
        let Some((route, matched)) = self.find_route(&request.method, &request.path) else {
            debug!(
                request_id,
                method = %request.method,
                path = %request.path,
                "no route matched"
            );
            return Response::not_found();
        };

        let mut ctx = RequestContext::new(meta);
        if let Some(resolver) = &self.identity {
            ctx.user = match AssertUnwindSafe(resolver.resolve(&request))
                .catch_unwind()
                .await
            {
                Ok(user) => user,
                Err(panic) => {
                    warn!(
                        request_id,
                        path = %request.path,
                        panic = panic_message(&*panic),
                        "identity resolver panicked; treating request as anonymous"
                    );
                    None
                }
            };
        }

        let method = request.method.clone();
        let path = request.path.clone();
        debug!(request_id, %method, %path, route = %route.pattern, "dispatching");

        let handler = &route.handler;
        let future = match panic::catch_unwind(AssertUnwindSafe(|| {
            handler(request, matched, ctx)
        })) {
            Ok(future) => future,
            Err(panic) => {
                error!(
                    request_id,
                    %method,
                    %path,
                    panic = panic_message(&*panic),
                    "handler panicked"
                );
                return Response::internal_server_error();
            }
        };

        match AssertUnwindSafe(future).catch_unwind().await {
            Ok(Ok(response)) => response,
            Ok(Err(err)) => {
                error!(request_id, %method, %path, error = %err, "handler failed");
                Response::internal_server_error()
            }
            Err(panic) => {
                error!(
                    request_id,
                    %method,
                    %path,
                    panic = panic_message(&*panic),
                    "handler panicked"
                );
                Response::internal_server_error()
            }
        }
    }

    /// Finds the first route whose method and pattern match.
    fn find_route(&self, method: &Method, path: &str) -> Option<(&Route<U>, MatchResult)> {
        self.routes
            .iter()
            .filter(|route| route.method == *method)
            .find_map(|route| route.pattern.match_path(path).map(|m| (route, m)))
    }
}

impl<U> fmt::Debug for Router<U> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("routes", &self.routes)
            .field("identity", &self.identity.is_some())
            .finish()
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    panic
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| panic.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("unknown panic")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{HandlerError, RouterError};

    async fn hello_handler(
        _req: Request,
        _m: MatchResult,
        _ctx: RequestContext<()>,
    ) -> HandlerResult {
        Ok(Response::text("Hello, World!"))
    }

    async fn user_handler(
        _req: Request,
        m: MatchResult,
        _ctx: RequestContext<()>,
    ) -> HandlerResult {
        let id = m.require("id").map_err(HandlerError::new)?;
        Ok(Response::text(format!("User: {id}")))
    }

    async fn wildcard_handler(
        _req: Request,
        m: MatchResult,
        _ctx: RequestContext<()>,
    ) -> HandlerResult {
        Ok(Response::text(m.wildcard().unwrap_or_default().to_string()))
    }

    async fn failing_handler(
        _req: Request,
        _m: MatchResult,
        _ctx: RequestContext<()>,
    ) -> HandlerResult {
        Err(HandlerError::new("database password is hunter2"))
    }

    #[tokio::test]
    async fn test_basic_routing() {
        let router = Router::builder()
            .get("/", hello_handler)
            .unwrap()
            .get("/users/:id", user_handler)
            .unwrap()
            .build();

        let res = router.handle(Request::get("/")).await;
        assert_eq!(res.status, 200);
        assert_eq!(res.body_string(), Some("Hello, World!".to_string()));
    }

    #[tokio::test]
    async fn test_path_params() {
        let router = Router::builder()
            .get("/users/:id", user_handler)
            .unwrap()
            .build();

        let res = router.handle(Request::get("/users/42")).await;
        assert_eq!(res.status, 200);
        assert_eq!(res.body_string(), Some("User: 42".to_string()));
    }

    #[tokio::test]
    async fn test_wildcard_capture() {
        let router = Router::builder()
            .get("/static/*", wildcard_handler)
            .unwrap()
            .build();

        let res = router.handle(Request::get("/static/css/app.css")).await;
        assert_eq!(res.body_string(), Some("css/app.css".to_string()));
    }

    #[tokio::test]
    async fn test_not_found() {
        let router = Router::builder().get("/", hello_handler).unwrap().build();

        let res = router.handle(Request::get("/nonexistent")).await;
        assert_eq!(res.status, 404);
        assert_eq!(res.body_string(), Some("Not Found".to_string()));
    }

    #[tokio::test]
    async fn test_method_mismatch_falls_back() {
        let router = Router::builder().get("/", hello_handler).unwrap().build();

        let res = router.handle(Request::post("/")).await;
        assert_eq!(res.status, 404);
    }

    #[tokio::test]
    async fn test_empty_router() {
        let router = Router::builder().build();
        assert!(router.routes().is_empty());

        for req in [
            Request::get("/"),
            Request::post("/links"),
            Request::new(Method::parse("BREW"), "/pot"),
        ] {
            assert_eq!(router.handle(req).await.status, 404);
        }
    }

    #[tokio::test]
    async fn test_first_match_wins() {
        let router = Router::builder()
            .get("/users/:id", |_, _, _| async { Ok(Response::text("param")) })
            .unwrap()
            .get("/users/me", |_, _, _| async { Ok(Response::text("literal")) })
            .unwrap()
            .build();

        let res = router.handle(Request::get("/users/me")).await;
        assert_eq!(res.body_string(), Some("param".to_string()));
    }

    #[tokio::test]
    async fn test_same_pattern_other_method() {
        let router = Router::builder()
            .get("/links", |_, _, _| async { Ok(Response::text("list")) })
            .unwrap()
            .post("/links", |_, _, _| async { Ok(Response::text("create")) })
            .unwrap()
            .build();

        let res = router.handle(Request::post("/links")).await;
        assert_eq!(res.body_string(), Some("create".to_string()));
    }

    #[tokio::test]
    async fn test_method_case_normalized() {
        let router = Router::builder().get("/", hello_handler).unwrap().build();

        let req = Request::new(Method::Other("get".to_string()), "/");
        assert_eq!(router.handle(req).await.status, 200);

        let router = Router::builder()
            .route(Method::Other("purge".to_string()), "/cache", |_, _, _| async {
                Ok(Response::text("purged"))
            })
            .unwrap()
            .build();
        let req = Request::new(Method::parse("PURGE"), "/cache");
        assert_eq!(router.handle(req).await.status, 200);
    }

    #[tokio::test]
    async fn test_query_string_reaches_handler() {
        let router = Router::builder()
            .get("/search", |req: Request, _, _| async move {
                Ok(Response::text(req.get_query("q").unwrap_or("").to_string()))
            })
            .unwrap()
            .build();

        let mut req = Request::get("/search");
        req.path = "/search?q=rust".to_string();
        let res = router.handle(req).await;
        assert_eq!(res.status, 200);
        assert_eq!(res.body_string(), Some("rust".to_string()));
    }

    #[tokio::test]
    async fn test_handler_error_is_contained() {
        let router = Router::builder()
            .get("/boom", failing_handler)
            .unwrap()
            .build();

        let res = router.handle(Request::get("/boom")).await;
        assert_eq!(res.status, 500);
        let body = res.body_string().unwrap();
        assert_eq!(body, "Internal Server Error");
        assert!(!body.contains("hunter2"));
    }

    #[tokio::test]
    async fn test_handler_panic_is_contained() {
        let router = Router::builder()
            .get("/async-panic", |_, _, _| async {
                if true {
                    panic!("async kaboom");
                }
                Ok(Response::ok())
            })
            .unwrap()
            .get("/sync-panic", |_, _, _| -> BoxFuture<'static, HandlerResult> {
                panic!("sync kaboom")
            })
            .unwrap()
            .build();

        assert_eq!(router.handle(Request::get("/async-panic")).await.status, 500);
        assert_eq!(router.handle(Request::get("/sync-panic")).await.status, 500);
    }

    #[test]
    fn test_invalid_pattern_rejected_at_registration() {
        let result = Router::builder().get("/static/*/x", hello_handler);
        assert!(matches!(result, Err(RouterError::InvalidPattern { .. })));

        let result = Router::builder().post("/a/:id/:id", hello_handler);
        assert!(result.is_err());
    }

    struct HeaderUser;

    impl IdentityResolver<String> for HeaderUser {
        fn resolve<'a>(&'a self, req: &'a Request) -> BoxFuture<'a, Option<String>> {
            Box::pin(async move { req.get_header("X-User").map(str::to_string) })
        }
    }

    fn whoami_router() -> Router<String> {
        RouterBuilder::with_identity(HeaderUser)
            .get("/whoami", |_, _, ctx: RequestContext<String>| async move {
                let name = ctx.user().cloned().unwrap_or_else(|| "anonymous".to_string());
                Ok(Response::text(name))
            })
            .unwrap()
            .build()
    }

    #[tokio::test]
    async fn test_identity_resolved_per_request() {
        let router = whoami_router();

        let res = router
            .handle(Request::get("/whoami").header("X-User", "octocat"))
            .await;
        assert_eq!(res.body_string(), Some("octocat".to_string()));

        let res = router.handle(Request::get("/whoami")).await;
        assert_eq!(res.body_string(), Some("anonymous".to_string()));
    }

    struct PanickingResolver;

    impl IdentityResolver<String> for PanickingResolver {
        fn resolve<'a>(&'a self, _req: &'a Request) -> BoxFuture<'a, Option<String>> {
            Box::pin(async move {
                if true {
                    panic!("session backend exploded");
                }
                None
            })
        }
    }

    #[tokio::test]
    async fn test_resolver_panic_leaves_request_anonymous() {
        let router = RouterBuilder::with_identity(PanickingResolver)
            .get("/whoami", |_, _, ctx: RequestContext<String>| async move {
                Ok(Response::text(format!("anonymous={}", ctx.user().is_none())))
            })
            .unwrap()
            .build();

        let res = router.handle(Request::get("/whoami")).await;
        assert_eq!(res.status, 200);
        assert_eq!(res.body_string(), Some("anonymous=true".to_string()));
    }

    #[tokio::test]
    async fn test_concurrent_dispatch_is_isolated() {
        let router = Arc::new(whoami_router());

        let tasks: Vec<_> = (0..32)
            .map(|i| {
                let router = Arc::clone(&router);
                tokio::spawn(async move {
                    let name = format!("user-{i}");
                    let req = Request::get("/whoami").header("X-User", name.clone());
                    let res = router.handle(req).await;
                    (name, res.body_string())
                })
            })
            .collect();

        for task in tasks {
            let (name, body) = task.await.unwrap();
            assert_eq!(body, Some(name));
        }
    }

    #[tokio::test]
    async fn test_meta_reaches_handler() {
        let router = Router::builder()
            .get("/ip", |_, _, ctx: RequestContext<()>| async move {
                let ip = ctx
                    .meta
                    .remote_addr
                    .map(|a| a.ip().to_string())
                    .unwrap_or_default();
                Ok(Response::text(ip))
            })
            .unwrap()
            .build();

        let meta = RequestMeta::new(Some("10.1.2.3:5555".parse().unwrap()));
        let res = router.handle_with_meta(Request::get("/ip"), meta).await;
        assert_eq!(res.body_string(), Some("10.1.2.3".to_string()));
    }

    #[tokio::test]
    async fn test_request_id_reaches_handler() {
        let router = Router::builder()
            .get("/id", |_, _, ctx: RequestContext<()>| async move {
                Ok(Response::text(ctx.meta.request_id.to_string()))
            })
            .unwrap()
            .build();

        let meta = RequestMeta::default();
        let expected = meta.request_id.to_string();
        let res = router.handle_with_meta(Request::get("/id"), meta).await;
        assert_eq!(res.body_string(), Some(expected));

        let first = router.handle(Request::get("/id")).await.body_string();
        let second = router.handle(Request::get("/id")).await.body_string();
        assert_ne!(first, second);
    }
}
