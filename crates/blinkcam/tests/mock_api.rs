//! Mock API tests for the blinkcam library.
//!
//! These tests use wiremock to simulate the Blink service and exercise login,
//! discovery and the re-authentication flow without network access.

use std::io;
use std::sync::Arc;

use blinkcam::error::{AuthError, RequestError};
use blinkcam::{AuthHeader, Blink, BlinkConfig, CredentialPrompt, Error, UrlHandler};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const USERNAME: &str = "foobar";
const PASSWORD: &str = "deadbeef";
const TOKEN: &str = "foobarbaz";
const REGION_ID: &str = "ciao";
const REGION_NAME: &str = "Reggio Emilia";

/// Answers prompts with fixed values.
struct FixedPrompt {
    username: &'static str,
    password: &'static str,
}

impl CredentialPrompt for FixedPrompt {
    fn username(&self) -> io::Result<String> {
        Ok(self.username.to_string())
    }

    fn password(&self) -> io::Result<String> {
        Ok(self.password.to_string())
    }
}

/// Fails if asked anything.
struct NoPrompt;

impl CredentialPrompt for NoPrompt {
    fn username(&self) -> io::Result<String> {
        Err(io::Error::other("unexpected username prompt"))
    }

    fn password(&self) -> io::Result<String> {
        Err(io::Error::other("unexpected password prompt"))
    }
}

fn mock_config(server: &MockServer) -> BlinkConfig {
    BlinkConfig::builder()
        .api_base_template(server.uri())
        .build()
}

fn client(server: &MockServer) -> Blink {
    Blink::builder()
        .username(USERNAME)
        .password(PASSWORD)
        .config(mock_config(server))
        .prompt(Arc::new(NoPrompt))
        .build()
        .unwrap()
}

fn anonymous_client(server: &MockServer) -> Blink {
    Blink::builder()
        .config(mock_config(server))
        .prompt(Arc::new(NoPrompt))
        .build()
        .unwrap()
}

fn expected_host() -> String {
    format!("{REGION_ID}.immedia-semi.com")
}

async fn mount_login(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/login"))
        .and(header("host", "prod.immedia-semi.com"))
        .and(body_json(json!({
            "email": USERNAME,
            "password": PASSWORD,
            "client_specifier": "iPhone 9.2 | 2.2 | 222"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "region": {REGION_ID: REGION_NAME},
            "authtoken": {"authtoken": TOKEN, "message": "auth"}
        })))
        .mount(server)
        .await;
}

/// Accepts only the valid token on `route`; anything else gets a 401.
async fn mount_guarded_get(server: &MockServer, route: &str, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(route))
        .and(header("token_auth", TOKEN))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .with_priority(1)
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "code": 101,
            "message": "Unauthorized Access"
        })))
        .with_priority(2)
        .mount(server)
        .await;
}

// ============================================================================
// Credentials
// ============================================================================

#[tokio::test]
async fn test_initialization_keeps_credentials() {
    let server = MockServer::start().await;
    let blink = client(&server);

    let credentials = blink.credentials().await;
    assert_eq!(credentials.username(), Some(USERNAME));
    assert_eq!(credentials.password(), Some(PASSWORD));
    assert!(blink.auth_header().await.is_none());
}

#[tokio::test]
async fn test_no_credentials() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = anonymous_client(&server).get_auth_token().await.unwrap_err();
    assert!(matches!(
        err,
        Error::Auth(AuthError::MissingCredential { field: "username" })
    ));

    let username_only = Blink::builder()
        .username(USERNAME)
        .config(mock_config(&server))
        .prompt(Arc::new(NoPrompt))
        .build()
        .unwrap();
    let err = username_only.get_auth_token().await.unwrap_err();
    assert!(matches!(
        err,
        Error::Auth(AuthError::MissingCredential { field: "password" })
    ));
}

#[tokio::test]
async fn test_credential_supplied_later_still_incomplete() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let blink = anonymous_client(&server);
    let err = blink.get_auth_token().await.unwrap_err();
    assert!(matches!(
        err,
        Error::Auth(AuthError::MissingCredential { field: "username" })
    ));

    blink.set_username(USERNAME).await;
    let err = blink.get_auth_token().await.unwrap_err();
    assert!(matches!(
        err,
        Error::Auth(AuthError::MissingCredential { field: "password" })
    ));
    assert!(blink.auth_header().await.is_none());
}

#[tokio::test]
async fn test_empty_credentials_are_not_sent() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401))
        .expect(0)
        .mount(&server)
        .await;

    let blink = Blink::builder()
        .username("")
        .password("")
        .config(mock_config(&server))
        .prompt(Arc::new(NoPrompt))
        .build()
        .unwrap();
    let err = blink.get_auth_token().await.unwrap_err();
    assert!(matches!(
        err,
        Error::Auth(AuthError::MissingCredential { field: "username" })
    ));

    blink.set_username(USERNAME).await;
    let err = blink.get_auth_token().await.unwrap_err();
    assert!(matches!(
        err,
        Error::Auth(AuthError::MissingCredential { field: "password" })
    ));
}

// ============================================================================
// Authentication
// ============================================================================

#[tokio::test]
async fn test_authentication() {
    let server = MockServer::start().await;
    mount_login(&server).await;

    let blink = client(&server);
    let header = blink.get_auth_token().await.unwrap();

    assert_eq!(header.token(), TOKEN);
    assert_eq!(header.host(), expected_host());
    assert_eq!(blink.auth_header().await, Some(header));

    let region = blink.region().await.unwrap();
    assert_eq!(region.id(), REGION_ID);
    assert_eq!(region.name(), REGION_NAME);
    assert_eq!(blink.urls().await.unwrap().region_id(), REGION_ID);
}

#[tokio::test]
async fn test_login_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "message": "Invalid credentials"
        })))
        .mount(&server)
        .await;

    let blink = client(&server);
    blink
        .restore_auth_header(AuthHeader::new(expected_host(), "old"))
        .await;

    let err = blink.get_auth_token().await.unwrap_err();
    match err {
        Error::Auth(AuthError::LoginRejected { status, message }) => {
            assert_eq!(status, 401);
            assert_eq!(message, "Invalid credentials");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(blink.auth_header().await.is_none());
}

#[tokio::test]
async fn test_malformed_login_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "region": {REGION_ID: REGION_NAME}
        })))
        .mount(&server)
        .await;

    let err = client(&server).get_auth_token().await.unwrap_err();
    assert!(matches!(
        err,
        Error::Auth(AuthError::MalformedLoginResponse { .. })
    ));
}

#[tokio::test]
async fn test_unreachable_login_is_auth_error() {
    // Nothing listens on the discard port.
    let config = BlinkConfig::builder()
        .api_base_template("http://127.0.0.1:9")
        .build();
    let blink = Blink::builder()
        .username(USERNAME)
        .password(PASSWORD)
        .config(config)
        .build()
        .unwrap();

    let err = blink.get_auth_token().await.unwrap_err();
    assert!(matches!(err, Error::Auth(AuthError::Unreachable { .. })));
}

#[tokio::test]
async fn test_manual_login() {
    let server = MockServer::start().await;
    mount_login(&server).await;

    let blink = Blink::builder()
        .config(mock_config(&server))
        .prompt(Arc::new(FixedPrompt {
            username: USERNAME,
            password: PASSWORD,
        }))
        .build()
        .unwrap();

    assert!(blink.login().await.unwrap());

    let credentials = blink.credentials().await;
    assert_eq!(credentials.username(), Some(USERNAME));
    assert_eq!(credentials.password(), Some(PASSWORD));
    assert_eq!(blink.auth_header().await.unwrap().token(), TOKEN);
}

#[tokio::test]
async fn test_manual_login_only_prompts_for_missing_values() {
    let server = MockServer::start().await;
    mount_login(&server).await;

    let blink = Blink::builder()
        .username(USERNAME)
        .config(mock_config(&server))
        .prompt(Arc::new(FixedPrompt {
            username: "someone-else",
            password: PASSWORD,
        }))
        .build()
        .unwrap();

    assert!(blink.login().await.unwrap());
    assert_eq!(blink.credentials().await.username(), Some(USERNAME));
}

#[tokio::test]
async fn test_manual_login_empty_answer() {
    let server = MockServer::start().await;

    let blink = Blink::builder()
        .config(mock_config(&server))
        .prompt(Arc::new(FixedPrompt {
            username: USERNAME,
            password: "",
        }))
        .build()
        .unwrap();

    let err = blink.login().await.unwrap_err();
    assert!(matches!(
        err,
        Error::Auth(AuthError::MissingCredential { field: "password" })
    ));
    assert_eq!(blink.credentials().await.username(), Some(USERNAME));
}

// ============================================================================
// Requests
// ============================================================================

#[tokio::test]
async fn test_no_auth_header() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let blink = client(&server);
    let urls = UrlHandler::from_template(&server.uri(), REGION_ID).unwrap();
    blink.set_urls(urls).await;

    let err = blink.get_ids().await.unwrap_err();
    assert!(matches!(err, Error::Request(RequestError::NoAuthHeader)));

    let err = blink.summary_request().await.unwrap_err();
    assert!(matches!(err, Error::Request(RequestError::NoAuthHeader)));
}

#[tokio::test]
async fn test_unresolved_region() {
    let server = MockServer::start().await;
    let blink = client(&server);
    blink
        .restore_auth_header(AuthHeader::new(expected_host(), TOKEN))
        .await;

    let err = blink.summary_request().await.unwrap_err();
    assert!(matches!(err, Error::Request(RequestError::RegionUnresolved)));
}

#[tokio::test]
async fn test_bad_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/anything"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "code": 101,
            "message": "Unauthorized Access"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let blink = client(&server);
    let url = format!("{}/anything", server.uri());

    let err = blink.http_request("bad", &url, None, false).await.unwrap_err();
    assert!(matches!(
        err,
        Error::Request(RequestError::UnsupportedMethod { .. })
    ));

    let err = blink.http_request("post", &url, None, true).await.unwrap_err();
    assert!(matches!(
        err,
        Error::Auth(AuthError::Rejected {
            status: 401,
            code: Some(101),
            ..
        })
    ));
}

#[tokio::test]
async fn test_server_error_is_not_retried() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    Mock::given(method("GET"))
        .and(path("/homescreen"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream down"))
        .expect(1)
        .mount(&server)
        .await;

    let blink = client(&server);
    blink.get_auth_token().await.unwrap();

    let err = blink.summary_request().await.unwrap_err();
    assert!(matches!(err, Error::Protocol(ref e) if e.status == 500));
    assert!(!err.is_auth_error());
}

#[tokio::test]
async fn test_reauthorization_attempt() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    mount_guarded_get(&server, "/homescreen", json!({"devices": []})).await;

    let blink = client(&server);
    let original_header = blink.get_auth_token().await.unwrap();

    let bad_header = AuthHeader::new(original_header.host(), "BADTOKEN");
    blink.restore_auth_header(bad_header.clone()).await;
    assert_eq!(blink.auth_header().await, Some(bad_header));

    let summary = blink.summary_request().await.unwrap();
    assert_eq!(summary, json!({"devices": []}));
    assert_eq!(blink.auth_header().await, Some(original_header));
}

#[tokio::test]
async fn test_reauthorization_gives_up_after_one_replay() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    Mock::given(method("GET"))
        .and(path("/homescreen"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "code": 101,
            "message": "Unauthorized Access"
        })))
        .expect(2)
        .mount(&server)
        .await;

    let blink = client(&server);
    blink.get_auth_token().await.unwrap();

    let err = blink.summary_request().await.unwrap_err();
    assert!(matches!(err, Error::Auth(AuthError::Rejected { .. })));
}

// ============================================================================
// Discovery
// ============================================================================

#[tokio::test]
async fn test_get_ids() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    mount_guarded_get(
        &server,
        "/networks",
        json!({"networks": [{"id": 4321, "account_id": 1234, "name": "Home"}]}),
    )
    .await;

    let blink = client(&server);
    blink.get_auth_token().await.unwrap();

    let ids = blink.get_ids().await.unwrap();
    assert_eq!(ids.network_id, "4321");
    assert_eq!(ids.account_id, "1234");
    assert_eq!(blink.account_ids().await, Some(ids));
}

#[tokio::test]
async fn test_get_ids_without_networks() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    mount_guarded_get(&server, "/networks", json!({"networks": []})).await;

    let blink = client(&server);
    blink.get_auth_token().await.unwrap();

    let err = blink.get_ids().await.unwrap_err();
    assert!(matches!(err, Error::Protocol(_)));
    assert!(blink.account_ids().await.is_none());
}

#[tokio::test]
async fn test_start_builds_sync_module() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    mount_guarded_get(
        &server,
        "/networks",
        json!({"networks": [{"id": 4321, "account_id": 1234, "name": "Home"}]}),
    )
    .await;
    mount_guarded_get(
        &server,
        "/homescreen",
        json!({
            "devices": [
                {"device_type": "camera", "device_id": 1001, "name": "Porch"},
                {"device_type": "camera", "device_id": 1002, "name": "Garden"},
                {"device_type": "sync_module", "device_id": 5000, "name": "Hub"}
            ]
        }),
    )
    .await;

    let blink = client(&server);
    blink.start().await.unwrap();

    let module = blink.sync_module().await.unwrap();
    assert_eq!(module.name(), "Home");
    assert_eq!(module.network_id(), "4321");
    assert_eq!(module.cameras().len(), 2);
    assert_eq!(module.camera("1001").unwrap().name, "Porch");

    blink.refresh().await.unwrap();
    assert_eq!(blink.sync_module().await.unwrap().cameras().len(), 2);
}

#[tokio::test]
async fn test_refresh_without_start_names_module_from_network() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    mount_guarded_get(
        &server,
        "/networks",
        json!({"networks": [{"id": 4321, "account_id": 1234, "name": "Home"}]}),
    )
    .await;
    mount_guarded_get(
        &server,
        "/homescreen",
        json!({"cameras": [{"id": 1003, "name": "Garage"}]}),
    )
    .await;

    let blink = client(&server);
    blink.get_auth_token().await.unwrap();
    blink.refresh().await.unwrap();

    let module = blink.sync_module().await.unwrap();
    assert_eq!(module.name(), "Home");
    assert_eq!(module.network_id(), "4321");
    assert_eq!(module.camera("1003").unwrap().network_id, "4321");
    assert_eq!(blink.account_ids().await.unwrap().account_id, "1234");
}
