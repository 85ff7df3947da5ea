//! Integration tests for `FetchClient` against a local `wiremock` server.

use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use cybernews_fetch::{FetchClient, FetchError};

fn test_client() -> FetchClient {
    FetchClient::new(5, "cybernews-test/0.1").expect("failed to build test FetchClient")
}

#[tokio::test]
async fn get_returns_status_headers_and_body() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/feed"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "application/rss+xml")
                .set_body_string("<rss/>"),
        )
        .mount(&server)
        .await;

    let response = test_client()
        .get(&format!("{}/feed", server.uri()))
        .await
        .expect("expected Ok");

    assert_eq!(response.status, 200);
    assert_eq!(response.body, "<rss/>");
    assert_eq!(
        response
            .headers
            .get("content-type")
            .and_then(|v| v.to_str().ok()),
        Some("application/rss+xml")
    );
}

#[tokio::test]
async fn get_sends_configured_user_agent() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/feed"))
        .and(header("user-agent", "cybernews-test/0.1"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .expect(1)
        .mount(&server)
        .await;

    let response = test_client().get(&format!("{}/feed", server.uri())).await;
    assert!(response.is_ok(), "expected Ok, got: {response:?}");
}

#[tokio::test]
async fn get_follows_redirects() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/old"))
        .respond_with(
            ResponseTemplate::new(301).insert_header("location", format!("{}/new", server.uri())),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/new"))
        .respond_with(ResponseTemplate::new(200).set_body_string("moved here"))
        .mount(&server)
        .await;

    let response = test_client()
        .get(&format!("{}/old", server.uri()))
        .await
        .expect("expected redirect to be followed");

    assert_eq!(response.body, "moved here");
    assert!(response.final_url.ends_with("/new"));
}

#[tokio::test]
async fn get_maps_not_found_to_unexpected_status() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = test_client()
        .get(&format!("{}/missing", server.uri()))
        .await
        .unwrap_err();

    assert!(
        matches!(err, FetchError::UnexpectedStatus { status: 404, .. }),
        "expected UnexpectedStatus(404), got: {err:?}"
    );
}

#[tokio::test]
async fn get_maps_server_error_to_unexpected_status() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/boom"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let err = test_client()
        .get(&format!("{}/boom", server.uri()))
        .await
        .unwrap_err();

    // One request only: the client never retries.
    assert!(matches!(err, FetchError::UnexpectedStatus { status: 503, .. }));
}

#[tokio::test]
async fn get_rejects_relative_url() {
    let err = test_client().get("/just/a/path").await.unwrap_err();
    assert!(matches!(err, FetchError::InvalidUrl { .. }));
}

#[tokio::test]
async fn get_reports_connection_failure_as_http_error() {
    // Port 9 (discard) on localhost is not listening in test environments.
    let err = test_client().get("http://127.0.0.1:9/feed").await.unwrap_err();
    assert!(matches!(err, FetchError::Http(_)), "got: {err:?}");
}
