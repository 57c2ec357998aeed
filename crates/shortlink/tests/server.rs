//! Serves the application on a real socket.

use std::sync::Arc;

use serde_json::{json, Value};
use shortlink::{build_router, serve, AppState};
use shortlink_auth::{GitHubExchange, GitHubOAuth, OAuthConfig};
use shortlink_store::{KvStore, MemoryStore};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

#[tokio::test]
async fn test_round_trip_over_http() {
    let store: Arc<dyn KvStore> = Arc::new(MemoryStore::new());
    let config = OAuthConfig::github("cid", "secret", "http://localhost/oauth/callback");
    let oauth = Arc::new(GitHubOAuth::new(
        config.clone(),
        Arc::clone(&store),
        Arc::new(GitHubExchange::new(config)),
    ));
    let router = Arc::new(build_router(AppState::new(store, oauth, "static")).unwrap());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    let (stop, stopped) = oneshot::channel::<()>();
    let server = tokio::spawn(serve(listener, router, async {
        let _ = stopped.await;
    }));

    let client = reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap();

    let res = client
        .post(format!("{base}/health-check"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    assert_eq!(res.text().await.unwrap(), "It's ALIVE!");

    let created: Value = client
        .post(format!("{base}/links"))
        .json(&json!({ "longUrl": "https://example.com/over-http" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let code = created["shortCode"].as_str().unwrap();

    let res = client
        .get(format!("{base}/s/{code}"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 302);
    assert_eq!(
        res.headers().get("location").unwrap(),
        "https://example.com/over-http"
    );

    let res = client
        .get(format!("{base}/no/such/route"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 404);

    let res = client
        .get(format!("{base}/oauth/signin"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 302);
    assert!(res
        .headers()
        .get_all("set-cookie")
        .iter()
        .any(|v| v.to_str().unwrap().starts_with("oauth-state=")));

    stop.send(()).unwrap();
    server.await.unwrap().unwrap();
}
