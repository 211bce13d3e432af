//! `HttpTransport` and the full client against a local mock server.

use std::time::Duration;

use chrono::NaiveDate;
use httpmock::prelude::*;
use serde_json::json;
use ted_search_lib::ClientConfig;
use ted_search_lib::Error;
use ted_search_lib::TedClient;
use ted_search_lib::api::query::SearchFacets;
use ted_search_lib::error::TransportError;
use ted_search_lib::retry::RetryConfig;
use ted_search_lib::transport::HttpTransport;
use ted_search_lib::transport::RequestTemplate;
use ted_search_lib::transport::Transport;

fn facets() -> SearchFacets {
    SearchFacets::builder(
        NaiveDate::from_ymd_opt(2025, 6, 18).unwrap(),
        NaiveDate::from_ymd_opt(2025, 9, 16).unwrap(),
    )
    .build()
    .unwrap()
}

async fn send(transport: &HttpTransport, url: String) -> Result<serde_json::Value, TransportError> {
    let template = RequestTemplate::post_json(url, json!({"q": "x"}));
    transport
        .execute(&template.attempt(1, Duration::ZERO))
        .await
        .map(|r| r.body)
}

#[tokio::test]
async fn decodes_json_body() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/search")
                .json_body(json!({"q": "x"}));
            then.status(200).json_body(json!({"notices": [], "total": 0}));
        })
        .await;

    let transport = HttpTransport::new(Duration::from_secs(5)).unwrap();
    let body = send(&transport, server.url("/search")).await.unwrap();

    assert_eq!(body, json!({"notices": [], "total": 0}));
    mock.assert_async().await;
}

#[tokio::test]
async fn classifies_status_codes() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/busy");
            then.status(503).body("try later");
        })
        .await;

    let transport = HttpTransport::new(Duration::from_secs(5)).unwrap();
    let err = send(&transport, server.url("/busy")).await.unwrap_err();

    assert_eq!(err, TransportError::status(503, "try later"));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn malformed_body_is_protocol_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/search");
            then.status(200).body("<html>maintenance</html>");
        })
        .await;

    let transport = HttpTransport::new(Duration::from_secs(5)).unwrap();
    let err = send(&transport, server.url("/search")).await.unwrap_err();

    assert!(matches!(err, TransportError::Protocol(_)));
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn slow_server_times_out() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/slow");
            then.status(200)
                .json_body(json!({}))
                .delay(Duration::from_secs(3));
        })
        .await;

    let transport = HttpTransport::new(Duration::from_millis(200)).unwrap();
    let err = send(&transport, server.url("/slow")).await.unwrap_err();

    assert_eq!(err, TransportError::Timeout(Duration::from_millis(200)));
}

#[tokio::test]
async fn refused_connection_is_connection_failure() {
    let transport = HttpTransport::new(Duration::from_secs(2)).unwrap();
    let err = send(&transport, "http://127.0.0.1:1/search".to_string())
        .await
        .unwrap_err();

    assert!(matches!(err, TransportError::Connection(_)), "{err:?}");
    assert!(err.is_retryable());
}

#[tokio::test]
async fn client_retries_until_exhausted() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/v3/notices/search");
            then.status(500);
        })
        .await;

    let config = ClientConfig::default()
        .with_endpoint(server.url("/v3/notices/search"))
        .with_retry(
            RetryConfig::default()
                .max_attempts(3)
                .base_delay(Duration::from_millis(5))
                .max_delay(Duration::from_millis(10)),
        );
    let client = TedClient::builder().config(config).build().unwrap();

    let err = client.search_page(&facets(), 1, 10).await.unwrap_err();

    assert!(matches!(err, Error::RetryExhausted { attempts: 3, .. }));
    mock.assert_hits_async(3).await;
}

#[tokio::test]
async fn client_iterates_over_http() {
    let server = MockServer::start_async().await;
    let second = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/search")
                .json_body_partial(r#"{"page-token": "T1"}"#);
            then.status(200).json_body(json!({
                "notices": [{"publication-number": "2-2025"}]
            }));
        })
        .await;
    let first = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/search")
                .json_body_partial(r#"{"page": 1}"#);
            then.status(200).json_body(json!({
                "notices": [{"publication-number": "1-2025"}],
                "iterationNextToken": "T1"
            }));
        })
        .await;

    let client = TedClient::builder()
        .endpoint(server.url("/search"))
        .build()
        .unwrap();
    let facets = facets();
    let mut fetcher = client.iterate(&facets);

    let mut numbers = Vec::new();
    while let Some(record) = fetcher.next().await {
        numbers.push(record.unwrap().publication_number().unwrap().to_string());
    }

    assert_eq!(numbers, vec!["1-2025", "2-2025"]);
    first.assert_async().await;
    second.assert_async().await;
}
