//! Integration tests for idverify
//!
//! These tests run the real HTTP server against a local stand-in for the
//! verification provider, and drive the CLI binary against a record store
//! on disk.

mod cli_test;

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use assert_cmd::cargo;
use idverify::api::AppState;
use idverify::config::{Config, ConfigOverrides};
use idverify::server::tiny_http as app_server;
use serde_json::{Value, json};
use tempfile::TempDir;

/// Helper function to create an idverify command
fn idverify() -> assert_cmd::Command {
    let mut cmd = assert_cmd::Command::new(cargo::cargo_bin!("idverify"));
    for var in [
        "IDVERIFY_CONFIG",
        "HOST",
        "PORT",
        "BASE_URL",
        "DATABASE_URL",
        "UPLOAD_DIR",
        "VERIFIER_TIMEOUT_SECS",
        "WORKERS",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

/// Result payload the way the provider sends it
fn result_payload(tx: &str, verified: &str) -> Value {
    json!({
        "transactionGuid": tx,
        "shortGuid": format!("{tx}-short"),
        "verified": verified,
        "person": {
            "nationalId": "8001015009087",
            "cardId": "C123",
            "surname": "Doe",
            "forenames": "Jane"
        }
    })
}

/// Start a fake verification provider and return its base URL
///
/// Answers `reply` to every multipart upload carrying a `file` field and 400
/// to anything else.
fn start_verifier(reply: Value) -> String {
    let server = tiny_http::Server::http("127.0.0.1:0").unwrap();
    let port = server.server_addr().to_ip().unwrap().port();

    thread::spawn(move || {
        for mut request in server.incoming_requests() {
            let mut body = Vec::new();
            request.as_reader().read_to_end(&mut body).unwrap();
            let has_file = request.url() == "/callback/verification"
                && String::from_utf8_lossy(&body).contains("name=\"file\"");

            let (status, text) = if has_file {
                (200_u16, reply.to_string())
            } else {
                (400, r#"{"success":"false","message":"no file"}"#.to_string())
            };
            let response = tiny_http::Response::from_string(text)
                .with_status_code(tiny_http::StatusCode(status))
                .with_header(
                    tiny_http::Header::from_bytes("Content-Type", "application/json").unwrap(),
                );
            let _ = request.respond(response);
        }
    });

    format!("http://127.0.0.1:{port}")
}

/// Start a fake provider that holds every request for `delay` before answering
fn start_slow_verifier(delay: Duration) -> String {
    let server = tiny_http::Server::http("127.0.0.1:0").unwrap();
    let port = server.server_addr().to_ip().unwrap().port();

    thread::spawn(move || {
        for mut request in server.incoming_requests() {
            let mut body = Vec::new();
            let _ = request.as_reader().read_to_end(&mut body);
            thread::spawn(move || {
                thread::sleep(delay);
                let _ = request.respond(tiny_http::Response::from_string("{}"));
            });
        }
    });

    format!("http://127.0.0.1:{port}")
}

/// A running idverify server backed by a temporary directory
struct TestApp {
    base: String,
    dir: TempDir,
}

impl TestApp {
    fn start(verifier_url: &str) -> Self {
        Self::start_with_timeout(verifier_url, 5)
    }

    fn start_with_timeout(verifier_url: &str, timeout_secs: u64) -> Self {
        let dir = TempDir::new().unwrap();
        let config = Config::default().with_overrides(ConfigOverrides {
            host: Some("127.0.0.1".to_string()),
            port: Some(0),
            base_url: Some(verifier_url.to_string()),
            database_url: Some(dir.path().join("db").display().to_string()),
            upload_dir: Some(dir.path().join("uploads")),
            verifier_timeout_secs: Some(timeout_secs),
            workers: Some(2),
        });

        let state = AppState::from_config(&config).unwrap();
        let server = Arc::new(app_server::bind(&config.bind_addr()).unwrap());
        let port = server.server_addr().to_ip().unwrap().port();
        let workers = config.worker_count();
        thread::spawn(move || app_server::run(server, state, workers));

        Self {
            base: format!("http://127.0.0.1:{port}"),
            dir,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base)
    }
}
