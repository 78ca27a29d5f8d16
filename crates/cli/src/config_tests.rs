// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use super::*;
use tempfile::TempDir;
use yare::parameterized;

fn write_config(dir: &TempDir, content: &str) -> PathBuf {
    let path = dir.path().join("config.toml");
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_defaults() {
    let config = Config::default();
    assert_eq!(config.api_url, "http://localhost:8080/api");
    assert_eq!(config.push_url, "ws://localhost:8081");
    assert_eq!(config.device_name, "Rust Device");
    assert_eq!(config.device_type, "generic");
    assert_eq!(config.establishment_id, None);
    assert_eq!(config.request_timeout_secs, 5);
    assert_eq!(config.connect_timeout_secs, 5);
    assert_eq!(config.heartbeat_interval_ms, 30_000);
    assert_eq!(config.heartbeat_timeout_ms, 0);
    assert!(config.validate().is_ok());
}

#[test]
fn test_empty_file_is_all_defaults() {
    let temp = TempDir::new().unwrap();
    let path = write_config(&temp, "");
    assert_eq!(Config::load_file(&path).unwrap(), Config::default());
}

#[test]
fn test_partial_file_keeps_other_defaults() {
    let temp = TempDir::new().unwrap();
    let path = write_config(
        &temp,
        r#"
device_name = "Front Desk"
establishment_id = "est_009"
heartbeat_interval_ms = 0
"#,
    );

    let config = Config::load_file(&path).unwrap();
    assert_eq!(config.device_name, "Front Desk");
    assert_eq!(config.establishment_id.as_deref(), Some("est_009"));
    assert_eq!(config.heartbeat_interval_ms, 0);
    assert_eq!(config.api_url, "http://localhost:8080/api");
}

#[test]
fn test_load_explicit_missing_file_fails() {
    let temp = TempDir::new().unwrap();
    let result = Config::load(Some(&temp.path().join("absent.toml")));
    let err = result.unwrap_err();
    assert!(err.to_string().contains("failed to read"));
}

#[test]
fn test_malformed_file_fails() {
    let temp = TempDir::new().unwrap();
    let path = write_config(&temp, "api_url = [1, 2");
    let err = Config::load_file(&path).unwrap_err();
    assert!(err.to_string().contains("failed to parse"));
}

#[test]
fn test_overrides_take_precedence() {
    let mut config = Config {
        establishment_id: Some("est_001".to_string()),
        ..Config::default()
    };
    config.apply_overrides(Overrides {
        api_url: Some("https://queue.example/api".to_string()),
        push_url: None,
        establishment_id: Some("est_777".to_string()),
    });

    assert_eq!(config.api_url, "https://queue.example/api");
    assert_eq!(config.push_url, "ws://localhost:8081");
    assert_eq!(config.establishment_id.as_deref(), Some("est_777"));
}

#[parameterized(
    api_ws = { "ws://localhost:8080/api", "ws://localhost:8081", "api_url" },
    api_garbage = { "localhost", "ws://localhost:8081", "api_url" },
    push_http = { "http://localhost:8080/api", "http://localhost:8081", "push_url" },
)]
fn test_validate_rejects_bad_urls(api_url: &str, push_url: &str, field: &str) {
    let config = Config {
        api_url: api_url.to_string(),
        push_url: push_url.to_string(),
        ..Config::default()
    };
    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains(field), "{err}");
}

#[parameterized(
    secure = { "https://q.example/api", "wss://q.example/push" },
    plain = { "http://10.0.0.5:8080/api", "ws://10.0.0.5:8081" },
)]
fn test_validate_accepts_urls(api_url: &str, push_url: &str) {
    let config = Config {
        api_url: api_url.to_string(),
        push_url: push_url.to_string(),
        ..Config::default()
    };
    assert!(config.validate().is_ok());
}

#[test]
fn test_validate_rejects_zero_timeouts_and_empty_names() {
    let config = Config {
        request_timeout_secs: 0,
        ..Config::default()
    };
    assert!(config.validate().is_err());

    let config = Config {
        device_name: " ".to_string(),
        ..Config::default()
    };
    assert!(config.validate().is_err());

    let config = Config {
        establishment_id: Some(String::new()),
        ..Config::default()
    };
    assert!(config.validate().is_err());
}

#[test]
fn test_push_config_heartbeat() {
    let config = Config::default();
    let push = config.push_config();
    assert_eq!(push.url, "ws://localhost:8081");
    assert_eq!(push.connect_timeout, Duration::from_secs(5));
    assert_eq!(push.heartbeat.interval, Duration::from_secs(30));
    assert_eq!(push.heartbeat.pong_timeout, None);

    let config = Config {
        heartbeat_timeout_ms: 10_000,
        ..Config::default()
    };
    assert_eq!(
        config.push_config().heartbeat.pong_timeout,
        Some(Duration::from_secs(10))
    );
}

#[test]
fn test_pull_config() {
    let config = Config {
        request_timeout_secs: 2,
        ..Config::default()
    };
    let pull = config.pull_config();
    assert_eq!(pull.base_url, "http://localhost:8080/api");
    assert_eq!(pull.timeout, Duration::from_secs(2));
}

#[test]
fn test_default_path_ends_with_app_dir() {
    if let Some(path) = Config::default_path() {
        assert!(path.ends_with("qtdev/config.toml"));
    }
}
