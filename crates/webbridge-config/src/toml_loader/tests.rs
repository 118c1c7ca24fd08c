//! Tests for TOML config loading, creation, and path resolution.

use super::*;
use std::path::Path;
use webbridge_common::ConfigError;

#[test]
fn load_from_nonexistent_returns_file_not_found() {
    let result = load_from_path(Path::new("/tmp/nonexistent_webbridge_config.toml"));
    assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
}

#[test]
fn load_valid_partial_toml() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r##"
[window]
title = "Dashboard"
url = "https://example.com/app"

[bridge]
call_timeout_ms = 500
"##,
    )
    .unwrap();

    let config = load_from_path(&path).unwrap();
    assert_eq!(config.window.title, "Dashboard");
    assert_eq!(config.window.url, "https://example.com/app");
    assert_eq!(config.bridge.call_timeout_ms, 500);
    // Defaults preserved
    assert_eq!(config.window.width, 1024);
    assert_eq!(config.logging.level, "info");
}

#[test]
fn load_invalid_toml_returns_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "this is not valid toml {{{").unwrap();

    let result = load_from_path(&path);
    assert!(matches!(result, Err(ConfigError::ParseError(_))));
}

#[test]
fn load_config_with_invalid_values_falls_back_to_default() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
[window]
width = 5
title = "ignored"
"#,
    )
    .unwrap();

    let config = load_from_path(&path).unwrap();
    assert_eq!(config.window.width, 1024);
    assert_eq!(config.window.title, "webbridge");
}

#[test]
fn create_and_load_default_config() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("webbridge").join("config.toml");

    create_default_config(&path).unwrap();
    assert!(path.exists());

    let config = load_from_path(&path).unwrap();
    assert_eq!(config.window.url, "about:blank");
    assert_eq!(config.bridge.call_timeout_ms, 30_000);
}

#[test]
fn default_path_ends_with_webbridge_config() {
    let path = default_config_path().unwrap();
    assert!(path.ends_with("webbridge/config.toml"));
}

#[test]
fn unreadable_path_is_parse_error_not_missing() {
    let dir = tempfile::tempdir().unwrap();

    // A directory exists but cannot be read as a file.
    let result = load_from_path(dir.path());
    assert!(matches!(result, Err(ConfigError::ParseError(msg)) if msg.starts_with("cannot read")));
}

#[test]
fn parse_error_names_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.toml");
    std::fs::write(&path, "[window\n").unwrap();

    match load_from_path(&path) {
        Err(ConfigError::ParseError(msg)) => assert!(msg.contains("broken.toml")),
        other => panic!("expected parse error, got {other:?}"),
    }
}
