//! Integration tests for the `sprinkly` CLI binary.
//!
//! Argument parsing, help output, and completions run without a device;
//! device-bound commands run against a wiremock server.
#![allow(clippy::unwrap_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `sprinkly` binary with env isolation.
///
/// Clears all `SPRINKLY_*` env vars and points config directories at a
/// nonexistent path so tests never touch the user's real configuration.
fn sprinkly_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("sprinkly");
    cmd.env("HOME", "/tmp/sprinkly-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/sprinkly-cli-test-nonexistent")
        .env_remove("SPRINKLY_PROFILE")
        .env_remove("SPRINKLY_HOST")
        .env_remove("SPRINKLY_PASSWORD")
        .env_remove("SPRINKLY_OUTPUT")
        .env_remove("SPRINKLY_INSECURE")
        .env_remove("SPRINKLY_TIMEOUT")
        .env_remove("RUST_LOG");
    cmd
}

/// `sprinkly` pointed at a mock device.
fn device_cmd(server: &MockServer) -> assert_cmd::Command {
    let mut cmd = sprinkly_cmd();
    cmd.args(["--host", &server.uri(), "--password", "abc", "--color", "never"]);
    cmd
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

async fn mock_device() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ja"))
        .and(query_param("pw", "abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "settings": {
                "en": 1, "rd": 0, "rdst": 0, "rs": 0,
                "lrun": [1, 2, 600, 1_700_000_000],
                "ps": [[0, 0, 0], [3, 120, 1_700_000_100]]
            },
            "options": { "wl": 80 },
            "status": { "sn": [1, 0] }
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/jn"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"snames": ["Front Lawn", "Back Lawn"]})),
        )
        .mount(&server)
        .await;
    server
}

/// An address nothing is listening on.
fn dead_host() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr.to_string()
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = sprinkly_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    sprinkly_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("OpenSprinkler")
            .and(predicate::str::contains("stations"))
            .and(predicate::str::contains("programs"))
            .and(predicate::str::contains("watch")),
    );
}

#[test]
fn test_version_flag() {
    sprinkly_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("sprinkly"));
}

// ── Shell completions ───────────────────────────────────────────────

#[test]
fn test_completions_bash() {
    sprinkly_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn test_completions_zsh() {
    sprinkly_cmd()
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

// ── Error cases ─────────────────────────────────────────────────────

#[test]
fn test_invalid_subcommand() {
    let output = sprinkly_cmd().arg("foobar").output().unwrap();
    assert!(!output.status.success());
    let text = combined_output(&output);
    assert!(
        text.contains("unrecognized") || text.contains("foobar"),
        "Expected error mentioning invalid subcommand:\n{text}"
    );
}

#[test]
fn test_status_without_device_configured() {
    sprinkly_cmd()
        .arg("status")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("No device configured"));
}

#[test]
fn test_unknown_profile() {
    sprinkly_cmd()
        .args(["--profile", "garden", "status"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("garden"));
}

#[test]
fn test_host_without_password() {
    sprinkly_cmd()
        .args(["--host", "10.0.0.5", "status"])
        .assert()
        .code(3);
}

#[test]
fn test_unreachable_device_exit_code() {
    sprinkly_cmd()
        .args(["--host", &dead_host(), "--password", "abc", "status"])
        .assert()
        .code(7);
}

#[test]
fn test_config_path() {
    sprinkly_cmd()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

// ── Device commands ─────────────────────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn test_status_json() {
    let server = mock_device().await;

    let output = device_cmd(&server)
        .args(["-o", "json", "status"])
        .output()
        .unwrap();

    assert!(output.status.success(), "{}", combined_output(&output));
    let status: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(status["water_level"], json!(80));
    assert_eq!(status["enabled"], json!(true));
    assert_eq!(status["rain_delay_until"], json!(null));
    assert_eq!(status["last_run"]["duration_secs"], json!(600));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_status_reads_one_snapshot() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ja"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "settings": { "en": 1, "rd": 0, "rdst": 0, "rs": 0, "lrun": [0, 0, 0, 0] },
            "options": { "wl": 80 },
            "status": { "sn": [0] }
        })))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/ja"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "settings": { "en": 0, "rd": 1, "rdst": 0, "rs": 1, "lrun": [0, 0, 0, 0] },
            "options": { "wl": 20 },
            "status": { "sn": [0] }
        })))
        .mount(&server)
        .await;

    let output = device_cmd(&server)
        .args(["-o", "json", "status"])
        .output()
        .unwrap();

    assert!(output.status.success(), "{}", combined_output(&output));
    let status: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(status["water_level"], json!(80));
    assert_eq!(status["enabled"], json!(true));
    assert_eq!(status["rain_delay"], json!(false));
    assert_eq!(status["rain_sensor"], json!(false));
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_profile_password_env_beats_global_env() {
    let server = mock_device().await;
    let dir = tempfile::tempdir().unwrap();
    let config_dir = dir.path().join("sprinkly");
    std::fs::create_dir_all(&config_dir).unwrap();
    std::fs::write(
        config_dir.join("config.toml"),
        format!(
            "default_profile = \"garden\"\n\n\
             [profiles.garden]\n\
             host = \"{}\"\n\
             password_env = \"GARDEN_PW\"\n",
            server.uri()
        ),
    )
    .unwrap();

    sprinkly_cmd()
        .env("XDG_CONFIG_HOME", dir.path())
        .env("GARDEN_PW", "abc")
        .env("SPRINKLY_PASSWORD", "wrong")
        .args(["--color", "never", "-o", "plain", "stations", "list"])
        .assert()
        .success()
        .stdout("Front Lawn\nBack Lawn\n");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_stations_list_plain() {
    let server = mock_device().await;

    device_cmd(&server)
        .args(["-o", "plain", "stations", "list"])
        .assert()
        .success()
        .stdout("Front Lawn\nBack Lawn\n");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_stations_on_sends_seconds() {
    let server = mock_device().await;
    Mock::given(method("GET"))
        .and(path("/cm"))
        .and(query_param("sid", "1"))
        .and(query_param("en", "1"))
        .and(query_param("t", "300"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"result": 1})))
        .expect(1)
        .mount(&server)
        .await;

    device_cmd(&server)
        .args(["stations", "on", "1", "--minutes", "5"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Back Lawn"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_stations_on_rejects_zero_minutes() {
    let server = mock_device().await;
    Mock::given(method("GET"))
        .and(path("/cm"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"result": 1})))
        .expect(0)
        .mount(&server)
        .await;

    device_cmd(&server)
        .args(["stations", "on", "0", "--minutes", "0"])
        .assert()
        .code(2);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_unknown_station_index() {
    let server = mock_device().await;

    device_cmd(&server)
        .args(["stations", "off", "9"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("stations list"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_watch_reuses_cached_state() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ja"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "settings": { "en": 1, "rd": 0, "rdst": 0, "rs": 0, "lrun": [0, 0, 0, 0] },
            "options": { "wl": 100 },
            "status": { "sn": [0] }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let output = device_cmd(&server)
        .args(["-o", "json-compact", "watch", "--every", "1", "--count", "3"])
        .output()
        .unwrap();

    assert!(output.status.success(), "{}", combined_output(&output));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.lines().count(), 3);
    assert!(stdout.lines().all(|l| l.contains("\"water_level\":100")));
}
