//! Configuration loading tests.

use screenguard::config::{load_config, load_config_or_default, Config};
use std::fs;
use tempfile::tempdir;

#[test]
fn test_load_full_config() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(
        &path,
        r#"
[server]
host = "127.0.0.1"
port = 9090

[validation]
requirements_path = "/srv/signage/screenRequirements.json"
max_upload_bytes = 1048576
fps_tolerance = 0.25
upload_dir = "/var/tmp"

[tools]
ffprobe_path = "/opt/ffmpeg/bin/ffprobe"
"#,
    )
    .unwrap();

    let config = load_config(&path).unwrap();
    assert_eq!(config.server.host, "127.0.0.1");
    assert_eq!(config.server.port, 9090);
    assert_eq!(
        config.validation.requirements_path.to_str(),
        Some("/srv/signage/screenRequirements.json")
    );
    assert_eq!(config.validation.max_upload_bytes, 1024 * 1024);
    assert_eq!(config.validation.fps_tolerance, 0.25);
    assert_eq!(
        config.validation.upload_dir.as_deref().and_then(|p| p.to_str()),
        Some("/var/tmp")
    );
    assert_eq!(
        config.tools.ffprobe_path.as_deref().and_then(|p| p.to_str()),
        Some("/opt/ffmpeg/bin/ffprobe")
    );
}

#[test]
fn test_partial_config_keeps_defaults() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "[server]\nport = 8123\n").unwrap();

    let config = load_config(&path).unwrap();
    let defaults = Config::default();
    assert_eq!(config.server.port, 8123);
    assert_eq!(config.server.host, defaults.server.host);
    assert_eq!(
        config.validation.max_upload_bytes,
        defaults.validation.max_upload_bytes
    );
    assert!(config.validation.upload_dir.is_none());
}

#[test]
fn test_relative_requirements_path_follows_config_dir() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(
        &path,
        "[validation]\nrequirements_path = \"screens/requirements.json\"\n",
    )
    .unwrap();

    let config = load_config(&path).unwrap();
    assert_eq!(
        config.validation.requirements_path,
        dir.path().join("screens/requirements.json")
    );
}

#[test]
fn test_default_requirements_path_follows_config_dir() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "").unwrap();

    let config = load_config(&path).unwrap();
    assert_eq!(
        config.validation.requirements_path,
        dir.path().join("screenRequirements.json")
    );
}

#[test]
fn test_invalid_toml_is_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "[server\nport = ").unwrap();

    let err = load_config(&path).unwrap_err();
    assert!(err.to_string().contains("Failed to parse config file"));
}

#[test]
fn test_invalid_values_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "[validation]\nfps_tolerance = -1.0\n").unwrap();
    assert!(load_config(&path).is_err());

    fs::write(&path, "[server]\nport = 0\n").unwrap();
    assert!(load_config(&path).is_err());
}

#[test]
fn test_missing_file_is_error() {
    let dir = tempdir().unwrap();
    let err = load_config(&dir.path().join("absent.toml")).unwrap_err();
    assert!(err.to_string().contains("Failed to read config file"));
}

#[test]
fn test_explicit_path_wins() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("custom.toml");
    fs::write(&path, "[server]\nport = 8555\n").unwrap();

    let config = load_config_or_default(Some(&path)).unwrap();
    assert_eq!(config.server.port, 8555);
}
