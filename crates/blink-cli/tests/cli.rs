//! CLI tests against a mock Blink API.
//!
//! The binary runs as a child process; wiremock serves the API from its own
//! background thread.

use std::process::{Command, Output, Stdio};

use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Run the CLI binary with arguments, no credentials in the environment and
/// an empty stdin.
async fn run_cli(args: &[&str]) -> Output {
    let args: Vec<String> = args.iter().map(|a| a.to_string()).collect();
    tokio::task::spawn_blocking(move || {
        Command::new(env!("CARGO_BIN_EXE_blink"))
            .args(&args)
            .env_remove("BLINK_USERNAME")
            .env_remove("BLINK_PASSWORD")
            .env_remove("BLINK_API_BASE")
            .env("NO_COLOR", "1")
            .stdin(Stdio::null())
            .output()
            .expect("Failed to execute CLI")
    })
    .await
    .unwrap()
}

async fn mock_api() -> MockServer {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "region": {"ciao": "Reggio Emilia"},
            "authtoken": {"authtoken": "foobarbaz"}
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/networks"))
        .and(header("token_auth", "foobarbaz"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "networks": [{"id": 4321, "account_id": 1234, "name": "Home"}]
        })))
        .mount(&server)
        .await;

    server
}

#[tokio::test]
async fn test_help() {
    let output = run_cli(&["--help"]).await;
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    for command in ["login", "ids", "summary", "cameras"] {
        assert!(stdout.contains(command), "help is missing '{command}'");
    }
}

#[tokio::test]
async fn test_ids() {
    let server = mock_api().await;
    let uri = server.uri();

    let output = run_cli(&[
        "--username",
        "foobar",
        "--password",
        "deadbeef",
        "--api-base",
        &uri,
        "ids",
    ])
    .await;

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(output.status.success(), "ids failed: {stderr}");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("4321"));
    assert!(stdout.contains("1234"));
}

#[tokio::test]
async fn test_login_without_credentials_fails() {
    let server = mock_api().await;
    let uri = server.uri();

    let output = run_cli(&["--api-base", &uri, "login"]).await;

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Failed to login"));
}
