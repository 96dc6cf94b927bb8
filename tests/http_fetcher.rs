// tests/http_fetcher.rs
use std::net::SocketAddr;
use std::time::Duration;

use axum::http::{header, HeaderMap, StatusCode};
use axum::response::Html;
use axum::routing::get;
use axum::Router;

use url_validator::config::FetchConfig;
use url_validator::{ContentFetcher, FetchError, HttpFetcher};

async fn spawn_server() -> SocketAddr {
    let app = Router::new()
        .route(
            "/article",
            get(|| async {
                Html("<html><body><h1>EV outlook</h1><p>Electric car sales rose.</p><p>Adoption keeps increasing.</p></body></html>")
            }),
        )
        .route(
            "/empty",
            get(|| async { Html("<html><body><div>No paragraphs here</div><p>   </p></body></html>") }),
        )
        .route(
            "/slow",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(3)).await;
                Html("<p>too late</p>")
            }),
        )
        .route(
            "/ua",
            get(|headers: HeaderMap| async move {
                let ua = headers
                    .get(header::USER_AGENT)
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or("")
                    .to_string();
                Html(format!("<p>{ua}</p>"))
            }),
        )
        .route("/moved", get(|| async { axum::response::Redirect::temporary("/article") }))
        .route("/boom", get(|| async { StatusCode::INTERNAL_SERVER_ERROR }));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn fetcher(timeout_secs: u64) -> HttpFetcher {
    HttpFetcher::new(&FetchConfig {
        timeout_secs,
        ..FetchConfig::default()
    })
    .unwrap()
}

#[tokio::test]
async fn article_paragraphs_are_joined() {
    let addr = spawn_server().await;
    let url = format!("http://{addr}/article");
    let page = fetcher(5).fetch(&url).await.unwrap();
    assert_eq!(page.text, "Electric car sales rose. Adoption keeps increasing.");
    assert_eq!(page.url, url);
}

#[tokio::test]
async fn redirects_are_followed() {
    let addr = spawn_server().await;
    let page = fetcher(5).fetch(&format!("http://{addr}/moved")).await.unwrap();
    assert!(page.text.starts_with("Electric car sales rose."));
}

#[tokio::test]
async fn whitespace_only_paragraphs_are_empty() {
    let addr = spawn_server().await;
    let res = fetcher(5).fetch(&format!("http://{addr}/empty")).await;
    assert_eq!(res, Err(FetchError::Empty));
}

#[tokio::test]
async fn missing_page_is_http_status() {
    let addr = spawn_server().await;
    let res = fetcher(5).fetch(&format!("http://{addr}/nope")).await;
    assert_eq!(res, Err(FetchError::HttpStatus(404)));
    assert_eq!(
        res.unwrap_err().to_string(),
        "Error: HTTP 404 - Page may not exist."
    );

    let res = fetcher(5).fetch(&format!("http://{addr}/boom")).await;
    assert_eq!(res, Err(FetchError::HttpStatus(500)));
}

#[tokio::test]
async fn slow_page_times_out() {
    let addr = spawn_server().await;
    let res = fetcher(1).fetch(&format!("http://{addr}/slow")).await;
    assert_eq!(res, Err(FetchError::Timeout));
}

#[tokio::test]
async fn configured_user_agent_is_sent() {
    let addr = spawn_server().await;
    let page = fetcher(5).fetch(&format!("http://{addr}/ua")).await.unwrap();
    assert_eq!(page.text, "Mozilla/5.0");

    let custom = HttpFetcher::new(&FetchConfig {
        user_agent: "credibility-bot/1.0".into(),
        ..FetchConfig::default()
    })
    .unwrap();
    let page = custom.fetch(&format!("http://{addr}/ua")).await.unwrap();
    assert_eq!(page.text, "credibility-bot/1.0");
}

#[tokio::test]
async fn closed_port_is_network_error() {
    // Bind, then drop, so nothing listens on the port.
    let addr = {
        let l = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        l.local_addr().unwrap()
    };
    let res = fetcher(5).fetch(&format!("http://{addr}/")).await;
    match res {
        Err(FetchError::Network(msg)) => assert!(!msg.is_empty()),
        other => panic!("expected network error, got {other:?}"),
    }
}
