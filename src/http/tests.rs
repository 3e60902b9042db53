//! Tests for the HTTP client module

use super::*;
use crate::api::{IntegrationApi, PageRequest};
use crate::error::Error;
use crate::types::{Identity, IntegrationCredentials, IntegrationKind};
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_string, body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> HttpClient {
    let config = HttpClientConfig::builder().base_url(server.uri()).build();
    HttpClient::with_config(config).unwrap()
}

fn identity() -> Identity {
    Identity::new("TestUser", "TestOrg")
}

#[test]
fn test_http_client_config_default() {
    let config = HttpClientConfig::default();
    assert_eq!(config.base_url, "http://localhost:8000");
    assert!(config.timeout.is_none());
    assert!(config.default_headers.is_empty());
}

#[test]
fn test_http_client_config_builder() {
    let config = HttpClientConfig::builder()
        .base_url("https://backend.example.com")
        .timeout(Duration::from_secs(60))
        .header("X-Custom", "value")
        .user_agent("test-agent/1.0")
        .build();

    assert_eq!(config.base_url, "https://backend.example.com");
    assert_eq!(config.timeout, Some(Duration::from_secs(60)));
    assert_eq!(
        config.default_headers.get("X-Custom"),
        Some(&"value".to_string())
    );
    assert_eq!(config.user_agent, "test-agent/1.0");
}

#[test]
fn test_http_client_rejects_bad_base_url() {
    let config = HttpClientConfig::builder().base_url("::nope::").build();
    let err = HttpClient::with_config(config).unwrap_err();
    assert!(matches!(err, Error::InvalidUrl(_)));
}

#[test]
fn test_http_client_rejects_bad_header() {
    let config = HttpClientConfig::builder()
        .header("bad header", "value")
        .build();
    let err = HttpClient::with_config(config).unwrap_err();
    assert!(err.to_string().contains("Invalid header name"));
}

#[tokio::test]
async fn test_authorize_posts_identity_form() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/integrations/hubspot/authorize"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(body_string("user_id=TestUser&org_id=TestOrg"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!("https://app.hubspot.com/oauth/authorize?state=abc")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let url = client
        .authorize(IntegrationKind::HubSpot, &identity())
        .await
        .unwrap();

    assert_eq!(url, "https://app.hubspot.com/oauth/authorize?state=abc");
}

#[tokio::test]
async fn test_authorize_error_carries_detail() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/integrations/notion/authorize"))
        .respond_with(
            ResponseTemplate::new(422).set_body_json(json!({"detail": "org_id is required"})),
        )
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client
        .authorize(IntegrationKind::Notion, &identity())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Backend { status: 422, .. }));
    assert_eq!(err.detail(), Some("org_id is required"));
}

#[tokio::test]
async fn test_fetch_credentials() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/integrations/airtable/credentials"))
        .and(body_string_contains("org_id=TestOrg"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"access_token": "tok", "expires_in": 1800})),
        )
        .mount(&server)
        .await;

    let client = client_for(&server);
    let creds = client
        .fetch_credentials(IntegrationKind::Airtable, &identity())
        .await
        .unwrap()
        .unwrap();

    assert_eq!(creds.as_value()["access_token"], "tok");
}

#[tokio::test]
async fn test_fetch_credentials_empty_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/integrations/hubspot/credentials"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let creds = client
        .fetch_credentials(IntegrationKind::HubSpot, &identity())
        .await
        .unwrap();

    assert!(creds.is_none());
}

#[tokio::test]
async fn test_disconnect_ignores_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/integrations/hubspot/disconnect"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"message": "Disconnected from HubSpot successfully."})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    client
        .disconnect(IntegrationKind::HubSpot, &identity())
        .await
        .unwrap();
}

#[tokio::test]
async fn test_fetch_page_first_page_has_no_after() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/integrations/hubspot/get_hubspot_items"))
        .and(body_string(
            "credentials=%7B%22access_token%22%3A%22tok%22%7D&limit=100",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{"id": "1", "name": "Alice"}],
            "next_cursor": "c1"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let request = PageRequest {
        credentials: IntegrationCredentials::new(json!({"access_token": "tok"})),
        limit: 100,
        after: None,
    };
    let page = client
        .fetch_page(IntegrationKind::HubSpot, &request)
        .await
        .unwrap();

    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0]["name"], "Alice");
    assert_eq!(page.next_cursor.as_deref(), Some("c1"));
}

#[tokio::test]
async fn test_fetch_page_sends_cursor() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/integrations/notion/get_notion_items"))
        .and(body_string_contains("limit=25"))
        .and(body_string_contains("after=cursor-42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [],
            "next_cursor": null
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let request = PageRequest {
        credentials: IntegrationCredentials::new(json!({"access_token": "tok"})),
        limit: 25,
        after: Some("cursor-42".to_string()),
    };
    let page = client
        .fetch_page(IntegrationKind::Notion, &request)
        .await
        .unwrap();

    assert!(page.items.is_empty());
    assert!(page.next_cursor.is_none());
}

#[tokio::test]
async fn test_server_error_without_detail() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/integrations/hubspot/get_hubspot_items"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let request = PageRequest {
        credentials: IntegrationCredentials::new(json!({"access_token": "tok"})),
        limit: 100,
        after: None,
    };
    let err = client
        .fetch_page(IntegrationKind::HubSpot, &request)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        Error::Backend {
            status: 500,
            detail: None
        }
    ));
}

#[tokio::test]
async fn test_default_headers_sent() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/integrations/hubspot/disconnect"))
        .and(header("X-Request-Source", "cli"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let config = HttpClientConfig::builder()
        .base_url(server.uri())
        .header("X-Request-Source", "cli")
        .build();
    let client = HttpClient::with_config(config).unwrap();
    client
        .disconnect(IntegrationKind::HubSpot, &identity())
        .await
        .unwrap();
}

#[tokio::test]
async fn test_connection_refused_is_http_error() {
    // Nothing listens on port 9 (discard) in the test environment
    let config = HttpClientConfig::builder()
        .base_url("http://127.0.0.1:9")
        .build();
    let client = HttpClient::with_config(config).unwrap();

    let err = client
        .authorize(IntegrationKind::HubSpot, &identity())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Http(_)));
}
