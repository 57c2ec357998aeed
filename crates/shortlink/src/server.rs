//! HTTP/1 server bridging hyper and the router.

use std::convert::Infallible;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use http_body_util::{BodyExt, Full};
use hyper::body::{Bytes, Incoming};
use hyper::header::COOKIE;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request as HyperRequest, Response as HyperResponse, StatusCode};
use hyper_util::rt::TokioIo;
use shortlink_router::{Method, Request, RequestMeta, Response, Router};
use tokio::net::TcpListener;
use tracing::{debug, error, info, warn};

/// Converts a hyper request, dispatches it and converts the response back.
pub async fn handle_request<U>(
    req: HyperRequest<Incoming>,
    router: Arc<Router<U>>,
    remote_addr: SocketAddr,
) -> Result<HyperResponse<Full<Bytes>>, Infallible>
where
    U: Send + Sync + 'static,
{
    let (parts, body) = req.into_parts();

    let mut request = Request::new(Method::parse(parts.method.as_str()), parts.uri.path());
    if let Some(query) = parts.uri.query() {
        request.query = Request::parse_query_string(query);
    }

    for name in parts.headers.keys() {
        let values: Vec<&str> = parts
            .headers
            .get_all(name)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .collect();
        if values.is_empty() {
            continue;
        }
        let separator = if *name == COOKIE { "; " } else { ", " };
        request
            .headers
            .insert(name.as_str().to_string(), values.join(separator));
    }

    request.body = match body.collect().await {
        Ok(collected) => collected.to_bytes().to_vec(),
        Err(err) => {
            warn!(error = %err, "failed to read request body");
            return Ok(into_hyper(Response::bad_request("Bad Request")));
        }
    };

    let response = router
        .handle_with_meta(request, RequestMeta::new(Some(remote_addr)))
        .await;
    Ok(into_hyper(response))
}

fn into_hyper(res: Response) -> HyperResponse<Full<Bytes>> {
    let mut builder = HyperResponse::builder()
        .status(StatusCode::from_u16(res.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR));

    for (key, value) in res.header_lines() {
        builder = builder.header(key, value);
    }

    builder
        .body(Full::new(Bytes::from(res.body)))
        .unwrap_or_else(|err| {
            error!(error = %err, "handler produced an invalid response");
            let mut fallback =
                HyperResponse::new(Full::new(Bytes::from_static(b"Internal Server Error")));
            *fallback.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
            fallback
        })
}

/// Accepts connections until `shutdown` resolves, serving each on its own
/// task.
pub async fn serve<U, F>(
    listener: TcpListener,
    router: Arc<Router<U>>,
    shutdown: F,
) -> std::io::Result<()>
where
    U: Send + Sync + 'static,
    F: Future<Output = ()>,
{
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            () = &mut shutdown => {
                info!("shutting down");
                return Ok(());
            }
            accepted = listener.accept() => {
                let (stream, remote_addr) = match accepted {
                    Ok(pair) => pair,
                    Err(err) => {
                        warn!(error = %err, "failed to accept connection");
                        continue;
                    }
                };
                let io = TokioIo::new(stream);
                let router = Arc::clone(&router);

                tokio::task::spawn(async move {
                    let service = service_fn(move |req| {
                        handle_request(req, Arc::clone(&router), remote_addr)
                    });

                    if let Err(err) = http1::Builder::new().serve_connection(io, service).await {
                        debug!(error = %err, "error serving connection");
                    }
                });
            }
        }
    }
}

/// Resolves on Ctrl-C.
pub async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_cookie_lines_are_split() {
        let res = Response::redirect("/")
            .cookie("a=1; Path=/")
            .cookie("b=2; Path=/");
        let hyper_res = into_hyper(res);

        assert_eq!(hyper_res.status(), StatusCode::FOUND);
        let cookies: Vec<_> = hyper_res
            .headers()
            .get_all("set-cookie")
            .iter()
            .map(|v| v.to_str().unwrap().to_string())
            .collect();
        assert_eq!(cookies, vec!["a=1; Path=/", "b=2; Path=/"]);
    }

    #[test]
    fn test_invalid_header_becomes_500() {
        let res = Response::ok().header("Bad Name", "v");
        assert_eq!(into_hyper(res).status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_unknown_status_becomes_500() {
        assert_eq!(
            into_hyper(Response::new(1000)).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
