#![allow(deprecated)]

/// Integration tests for the one-shot CLI commands
///
/// The binary runs in a blocking task against a wiremock server.
use assert_cmd::Command;
use predicates::prelude::*;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

mod common;

fn claimdesk(server_uri: &str) -> Command {
    let mut cmd = Command::cargo_bin("claimdesk").unwrap();
    cmd.env_remove("CLAIMDESK_BASE_URL")
        .arg("--config")
        .arg("does-not-exist.yaml")
        .arg("--no-color")
        .arg("--base-url")
        .arg(server_uri);
    cmd
}

#[test]
fn test_help_lists_commands() {
    let mut cmd = Command::cargo_bin("claimdesk").unwrap();
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("server-history"))
        .stdout(predicate::str::contains("query"));
}

#[test]
fn test_invalid_base_url_is_rejected() {
    let (_temp_dir, config_path) =
        common::temp_config_file("backend:\n  base_url: ftp://files.example.com\n");

    let mut cmd = Command::cargo_bin("claimdesk").unwrap();
    cmd.env_remove("CLAIMDESK_BASE_URL")
        .arg("--config")
        .arg(config_path)
        .arg("stats");
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("must use http or https"));
}

#[tokio::test]
async fn test_stats_json_output() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/stats"))
        .respond_with(ResponseTemplate::new(200).set_body_json(common::stats_body(42)))
        .expect(1)
        .mount(&server)
        .await;

    let uri = server.uri();
    let output = tokio::task::spawn_blocking(move || {
        claimdesk(&uri).arg("stats").arg("--json").assert().success().get_output().clone()
    })
    .await
    .unwrap();

    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(parsed["total_queries"], 42);
}

#[tokio::test]
async fn test_stats_fails_when_service_errors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/stats"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let uri = server.uri();
    tokio::task::spawn_blocking(move || {
        claimdesk(&uri)
            .arg("stats")
            .assert()
            .failure()
            .stderr(predicate::str::contains("503"));
    })
    .await
    .unwrap();
}

#[tokio::test]
async fn test_query_json_reports_error_entry() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/query"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let uri = server.uri();
    let output = tokio::task::spawn_blocking(move || {
        claimdesk(&uri)
            .arg("query")
            .arg("35F, cardiac, Delhi")
            .arg("--json")
            .assert()
            .success()
            .get_output()
            .clone()
    })
    .await
    .unwrap();

    let entry: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(entry["decision"], "error");
    assert_eq!(entry["query"], "35F, cardiac, Delhi");
    assert_eq!(entry["confidence_score"], 0.0);
    assert_eq!(entry["synthetic"], true);
}

#[tokio::test]
async fn test_health_reports_healthy() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "healthy",
            "timestamp": "2026-03-01T10:00:00"
        })))
        .mount(&server)
        .await;

    let uri = server.uri();
    tokio::task::spawn_blocking(move || {
        claimdesk(&uri)
            .arg("health")
            .assert()
            .success()
            .stdout(predicate::str::contains("healthy"));
    })
    .await
    .unwrap();
}

#[tokio::test]
async fn test_query_json_keeps_clause_excerpt() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/query"))
        .respond_with(ResponseTemplate::new(200).set_body_json(common::approval_body()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/stats"))
        .respond_with(ResponseTemplate::new(200).set_body_json(common::stats_body(7)))
        .mount(&server)
        .await;

    let uri = server.uri();
    let output = tokio::task::spawn_blocking(move || {
        claimdesk(&uri)
            .arg("query")
            .arg("knee surgery in Pune")
            .arg("--json")
            .assert()
            .success()
            .get_output()
            .clone()
    })
    .await
    .unwrap();

    let entry: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(entry["decision"], "approved");
    assert_eq!(
        entry["referenced_clauses"][0]["content"],
        "Surgical treatment of the knee is covered after 90 days..."
    );
}

#[tokio::test]
async fn test_query_shows_counters_before_and_after() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/stats"))
        .respond_with(ResponseTemplate::new(200).set_body_json(common::stats_body(7)))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/stats"))
        .respond_with(ResponseTemplate::new(200).set_body_json(common::stats_body(8)))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/documents"))
        .respond_with(ResponseTemplate::new(200).set_body_json(common::documents_body()))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/query"))
        .respond_with(ResponseTemplate::new(200).set_body_json(common::approval_body()))
        .mount(&server)
        .await;

    let uri = server.uri();
    tokio::task::spawn_blocking(move || {
        claimdesk(&uri)
            .arg("query")
            .arg("knee surgery in Pune")
            .assert()
            .success()
            .stdout(predicate::str::contains("Before: Documents: 3  Queries: 7"))
            .stdout(predicate::str::contains("After:  Documents: 3  Queries: 8"));
    })
    .await
    .unwrap();
}
