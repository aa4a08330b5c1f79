//! Integration tests for the backend client using wiremock

mod backend;

use core::time::Duration;
use hostsight_lib::sources::{Dimension, MetricSource, SourceClient};
use wiremock::matchers::{header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> SourceClient {
    SourceClient::new(&server.uri(), Duration::from_secs(5)).expect("client should build")
}

#[tokio::test]
async fn test_fetch_returns_payload() {
    let server = backend::start(&[]).await;

    let body = client(&server).fetch(Dimension::Logging).await.expect("fetch should succeed");

    assert_eq!(body, backend::fixture(Dimension::Logging));
}

#[tokio::test]
async fn test_fetch_sends_user_agent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/global_visibility"))
        .and(header_exists("user-agent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(backend::fixture(Dimension::Global)))
        .expect(1)
        .mount(&server)
        .await;

    let _ = client(&server).fetch(Dimension::Global).await.expect("fetch should succeed");
}

#[tokio::test]
async fn test_non_success_status_is_transport_error() {
    let server = backend::start(&[Dimension::Regional]).await;

    let err = client(&server).fetch(Dimension::Regional).await.unwrap_err();

    assert!(err.is_transport());
    assert_eq!(err.dimension(), Dimension::Regional);
    assert!(err.to_string().contains("could not load regional visibility"), "{err}");
}

#[tokio::test]
async fn test_malformed_body_is_shape_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/domain_visibility"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&server)
        .await;

    let err = client(&server).fetch(Dimension::Domain).await.unwrap_err();

    assert!(!err.is_transport());
    assert_eq!(err.kind(), "shape");
}

#[tokio::test]
async fn test_timeout_is_transport_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/global_visibility"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
        .mount(&server)
        .await;

    let client = SourceClient::new(&server.uri(), Duration::from_millis(100)).expect("client should build");
    let err = client.fetch(Dimension::Global).await.unwrap_err();

    assert!(err.is_transport());
}

#[tokio::test]
async fn test_unreachable_backend_is_transport_error() {
    let server = MockServer::start().await;
    let uri = server.uri();
    drop(server);

    let client = SourceClient::new(&uri, Duration::from_secs(1)).expect("client should build");
    let err = client.fetch(Dimension::Infrastructure).await.unwrap_err();

    assert!(err.is_transport());
}
