//! HTTP gateway behaviour against a mock backend.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use punchclock_core::{ApiGateway, ApiRequest, CredentialStore};
use punchclock_domain::{ApiError, ApiRoute, ClientConfig, Credential};
use punchclock_infra::observability::metrics::OUTCOME_SUCCESS;
use punchclock_infra::HttpApiGateway;
use serde_json::{json, Value};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config(server: &MockServer) -> ClientConfig {
    let mut config = ClientConfig::new(server.uri());
    config.api.request_timeout_secs = 2;
    config.retry.base_backoff_ms = 1;
    config.retry.max_backoff_ms = 5;
    config
}

fn signed_in_store() -> Arc<CredentialStore> {
    let store = Arc::new(CredentialStore::new());
    store.replace(Credential::new("tok-1", Utc::now()));
    store
}

#[tokio::test]
async fn test_authenticated_get_sends_bearer_json_headers_and_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/Kiosk/SearchTasks"))
        .and(query_param("taskNumber", "1000"))
        .and(header("Authorization", "Bearer tok-1"))
        .and(header("Content-Type", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"Id": 42}])))
        .expect(1)
        .mount(&server)
        .await;

    let gateway = HttpApiGateway::new(&config(&server), signed_in_store()).unwrap();
    let payload = gateway
        .request(ApiRequest::new(ApiRoute::SearchTasks).with_param("taskNumber", "1000"))
        .await
        .unwrap();

    assert_eq!(payload, json!([{"Id": 42}]));
}

#[tokio::test]
async fn test_authenticate_posts_the_json_body_without_a_bearer() {
    let server = MockServer::start().await;
    let body = json!({"Method": "pin", "PinOrganizationCode": "ACME", "PinUserPin": "1234"});
    Mock::given(method("POST"))
        .and(path("/api/Auth/Authenticate"))
        .and(body_json(body.clone()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"AuthToken": "abc"})))
        .expect(1)
        .mount(&server)
        .await;

    let gateway =
        HttpApiGateway::new(&config(&server), Arc::new(CredentialStore::new())).unwrap();
    let payload =
        gateway.request(ApiRequest::new(ApiRoute::Authenticate).with_body(body)).await.unwrap();

    assert_eq!(payload["AuthToken"], "abc");
    let received = &server.received_requests().await.unwrap()[0];
    assert!(!received.headers.contains_key("authorization"));
}

#[tokio::test]
async fn test_missing_credential_fails_fast_without_a_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let gateway =
        HttpApiGateway::new(&config(&server), Arc::new(CredentialStore::new())).unwrap();
    let err = gateway.request(ApiRequest::new(ApiRoute::CurrentPunch)).await.unwrap_err();

    assert_eq!(err, ApiError::Unauthenticated);
}

#[tokio::test]
async fn test_unauthorized_invalidates_the_credential() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/Auth/Me"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let store = signed_in_store();
    let gateway = HttpApiGateway::new(&config(&server), store.clone()).unwrap();

    let err = gateway.request(ApiRequest::new(ApiRoute::Me)).await.unwrap_err();
    assert_eq!(err, ApiError::Unauthorized);
    assert!(!store.is_present());

    let err = gateway.request(ApiRequest::new(ApiRoute::Me)).await.unwrap_err();
    assert_eq!(err, ApiError::Unauthenticated);
}

#[tokio::test]
async fn test_status_classification() {
    let server = MockServer::start().await;
    Mock::given(path("/api/Kiosk/PunchOut"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({"Message": "You are not punched in."})))
        .mount(&server)
        .await;
    Mock::given(path("/api/Kiosk/InventoryItems/Search"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(path("/api/Kiosk/Timecard"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let gateway = HttpApiGateway::new(&config(&server), signed_in_store()).unwrap();

    assert_eq!(
        gateway.request(ApiRequest::new(ApiRoute::PunchOut)).await,
        Err(ApiError::BadRequest("You are not punched in.".into()))
    );
    assert_eq!(
        gateway.request(ApiRequest::new(ApiRoute::InventorySearch)).await,
        Err(ApiError::NotFound)
    );
    assert_eq!(
        gateway.request(ApiRequest::new(ApiRoute::Timecard)).await,
        Err(ApiError::Server { status: 500, body: "boom".into() })
    );
}

#[tokio::test]
async fn test_empty_and_malformed_success_bodies() {
    let server = MockServer::start().await;
    Mock::given(path("/api/Kiosk/Punches/Current"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    Mock::given(path("/api/Kiosk/TimeZones"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let gateway = HttpApiGateway::new(&config(&server), signed_in_store()).unwrap();

    assert_eq!(gateway.request(ApiRequest::new(ApiRoute::CurrentPunch)).await, Ok(Value::Null));
    assert!(matches!(
        gateway.request(ApiRequest::new(ApiRoute::TimeZones)).await,
        Err(ApiError::MalformedResponse(_))
    ));
}

#[tokio::test]
async fn test_unreachable_server_is_a_transport_error() {
    let mut config = ClientConfig::new("http://127.0.0.1:9");
    config.retry.max_attempts = 1;

    let gateway = HttpApiGateway::new(&config, signed_in_store()).unwrap();
    let err = gateway.request(ApiRequest::new(ApiRoute::Customers)).await.unwrap_err();

    assert!(matches!(err, ApiError::Transport(_)));
}

#[tokio::test]
async fn test_cancel_in_flight_aborts_pending_requests_only() {
    let server = MockServer::start().await;
    Mock::given(path("/api/Kiosk/Customers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])).set_delay(Duration::from_millis(500)))
        .mount(&server)
        .await;
    Mock::given(path("/api/Kiosk/Projects"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let gateway = Arc::new(HttpApiGateway::new(&config(&server), signed_in_store()).unwrap());
    let pending = {
        let gateway = gateway.clone();
        tokio::spawn(async move { gateway.request(ApiRequest::new(ApiRoute::Customers)).await })
    };
    tokio::time::sleep(Duration::from_millis(50)).await;
    gateway.cancel_in_flight();

    assert_eq!(pending.await.unwrap(), Err(ApiError::Cancelled));
    assert_eq!(gateway.request(ApiRequest::new(ApiRoute::Projects)).await, Ok(json!([])));
}

#[tokio::test]
async fn test_metrics_count_outcomes() {
    let server = MockServer::start().await;
    Mock::given(path("/api/Kiosk/Customers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;
    Mock::given(path("/api/Kiosk/Tasks"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let gateway = HttpApiGateway::new(&config(&server), signed_in_store()).unwrap();
    gateway.request(ApiRequest::new(ApiRoute::Customers)).await.unwrap();
    gateway.request(ApiRequest::new(ApiRoute::Customers)).await.unwrap();
    gateway.request(ApiRequest::new(ApiRoute::Tasks)).await.unwrap_err();

    let metrics = gateway.metrics();
    let snapshot = metrics.snapshot();
    assert_eq!(snapshot.total_requests, 3);
    assert_eq!(snapshot.count(OUTCOME_SUCCESS), 2);
    assert_eq!(snapshot.count("not_found"), 1);
    assert!(metrics.p50_latency_ms().is_ok());
}

#[test]
fn test_invalid_configuration_is_rejected() {
    let config = ClientConfig::new("not a url");

    assert!(HttpApiGateway::new(&config, Arc::new(CredentialStore::new())).is_err());
}
