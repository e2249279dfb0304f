//! End-to-end tests for the signet binary against a mock GraphQL endpoint.

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a temp SIGNET_HOME directory for test isolation.
fn temp_signet_home() -> TempDir {
    TempDir::new().expect("create temp signet home")
}

fn can_bind_localhost() -> bool {
    std::net::TcpListener::bind("127.0.0.1:0").is_ok()
}

fn read_store(home: &TempDir) -> serde_json::Value {
    let raw = std::fs::read_to_string(home.path().join("store.json")).expect("read store.json");
    serde_json::from_str(&raw).expect("parse store.json")
}

#[tokio::test]
async fn test_login_writes_token_and_redirects() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let home = temp_signet_home();
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/"))
        .and(body_partial_json(json!({"operationName": "AuthenticateUser"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"authenticateUser": {"id": "u1", "token": "tok-cli-1"}}
        })))
        .expect(1)
        .mount(&server)
        .await;

    cargo_bin_cmd!("signet")
        .env("SIGNET_HOME", home.path())
        .env("SIGNET_ENDPOINT", server.uri())
        .args(["login", "-e", "a@b.com", "-p", "p"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Signed in as a@b.com"))
        .stdout(predicate::str::contains("navigate: /dashboard"));

    let store = read_store(&home);
    assert_eq!(store["AUTH_TOKEN"], "tok-cli-1");
}

#[tokio::test]
async fn test_login_failure_prints_user_message() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let home = temp_signet_home();
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"authenticateUser": null}
        })))
        .expect(1)
        .mount(&server)
        .await;

    cargo_bin_cmd!("signet")
        .env("SIGNET_HOME", home.path())
        .env("SIGNET_ENDPOINT", server.uri())
        .args(["login", "-e", "a@b.com", "-p", "wrong"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid credentials."));

    // The failed attempt leaves no token behind.
    let store_path = home.path().join("store.json");
    if store_path.exists() {
        let store = read_store(&home);
        assert_eq!(store.get("AUTH_TOKEN"), None);
    }
}

#[tokio::test]
async fn test_status_skips_network_without_keep_signed() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let home = temp_signet_home();
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {}})))
        .expect(0)
        .mount(&server)
        .await;

    cargo_bin_cmd!("signet")
        .env("SIGNET_HOME", home.path())
        .env("SIGNET_ENDPOINT", server.uri())
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("keep-signed is disabled"));
}

#[tokio::test]
async fn test_keep_signed_status_revalidates() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let home = temp_signet_home();
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/"))
        .and(body_partial_json(json!({"operationName": "AuthenticateUser"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"authenticateUser": {"id": "u1", "token": "tok-cli-22222222"}}
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/"))
        .and(body_partial_json(json!({"operationName": "LoggedInUser"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"loggedInUser": {"id": "u1"}}
        })))
        .expect(1)
        .mount(&server)
        .await;

    cargo_bin_cmd!("signet")
        .env("SIGNET_HOME", home.path())
        .env("SIGNET_ENDPOINT", server.uri())
        .args(["login", "-e", "a@b.com", "-p", "p", "--keep-signed"])
        .assert()
        .success();

    cargo_bin_cmd!("signet")
        .env("SIGNET_HOME", home.path())
        .env("SIGNET_ENDPOINT", server.uri())
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Signed in (token tok-cli-2222..."));
}

#[tokio::test]
async fn test_logout_clears_store_and_navigates() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let home = temp_signet_home();
    let server = MockServer::start().await;

    std::fs::write(
        home.path().join("store.json"),
        json!({"AUTH_TOKEN": "tok", "KEEP_SIGNED": "true"}).to_string(),
    )
    .expect("seed store.json");

    cargo_bin_cmd!("signet")
        .env("SIGNET_HOME", home.path())
        .env("SIGNET_ENDPOINT", server.uri())
        .arg("logout")
        .assert()
        .success()
        .stdout(predicate::str::contains("navigate: /login"))
        .stdout(predicate::str::contains("Signed out."));

    let store = read_store(&home);
    assert_eq!(store.get("AUTH_TOKEN"), None);
    assert_eq!(store.get("KEEP_SIGNED"), None);
}

#[tokio::test]
async fn test_remember_me_prefills_next_login() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let home = temp_signet_home();
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/"))
        .and(body_partial_json(json!({
            "operationName": "AuthenticateUser",
            "variables": {"email": "a@b.com", "password": "p"},
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"authenticateUser": {"id": "u1", "token": "tok-cli-3"}}
        })))
        .expect(2)
        .mount(&server)
        .await;

    cargo_bin_cmd!("signet")
        .env("SIGNET_HOME", home.path())
        .env("SIGNET_ENDPOINT", server.uri())
        .args(["login", "-e", "a@b.com", "-p", "p", "--remember"])
        .assert()
        .success();

    cargo_bin_cmd!("signet")
        .env("SIGNET_HOME", home.path())
        .env("SIGNET_ENDPOINT", server.uri())
        .arg("remember")
        .assert()
        .success()
        .stdout(predicate::str::contains("prefill for a@b.com"));

    // Second login needs no flags: credentials come from the cache.
    cargo_bin_cmd!("signet")
        .env("SIGNET_HOME", home.path())
        .env("SIGNET_ENDPOINT", server.uri())
        .arg("login")
        .assert()
        .success()
        .stdout(predicate::str::contains("Signed in as a@b.com"));
}

#[test]
fn test_missing_endpoint_is_an_error() {
    let home = temp_signet_home();

    cargo_bin_cmd!("signet")
        .env("SIGNET_HOME", home.path())
        .env_remove("SIGNET_ENDPOINT")
        .arg("status")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No endpoint configured"));
}
