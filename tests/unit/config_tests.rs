// ==========================
// tests/unit/config_tests.rs
// ==========================
//! Unit tests for the configuration module
use linkhub_backend_lib::config::Settings;
use linkhub_backend_lib::AppState;
use std::fs;
use std::path::PathBuf;
use tempfile::tempdir;

#[test]
fn test_settings_default() {
    let settings = Settings::default();

    assert_eq!(settings.server.host, "127.0.0.1");
    assert_eq!(settings.server.port, 3000);
    assert_eq!(settings.storage.path, PathBuf::from("data"));
    assert_eq!(settings.auth.token_ttl_secs, 60 * 60 * 24 * 30);
    assert_eq!(settings.password.min_length, 6);
    assert_eq!(settings.log_level, "info");
    assert!(!settings.log_json);
}

#[test]
fn test_settings_from_file() {
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("linkhub.toml");
    fs::write(
        &config_path,
        r#"
        log_json = true

        [server]
        host = "0.0.0.0"
        port = 8443

        [storage]
        path = "/var/lib/linkhub"

        [password]
        min_length = 10
        require_special = true
        "#,
    )
    .unwrap();

    let settings = Settings::load_from(&config_path).unwrap();
    assert_eq!(settings.bind_addr(), "0.0.0.0:8443");
    assert_eq!(settings.storage.path, PathBuf::from("/var/lib/linkhub"));
    assert_eq!(settings.password.min_length, 10);
    assert!(settings.password.require_special);
    assert!(!settings.password.require_digit);
    assert!(settings.log_json);
}

#[test]
fn test_malformed_file_is_an_error() {
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("broken.toml");
    fs::write(&config_path, "[server\nport = ").unwrap();
    assert!(Settings::load_from(&config_path).is_err());
}

#[test]
fn test_state_refuses_invalid_settings() {
    let mut settings = Settings::default();
    settings.auth.token_ttl_secs = 0;
    assert!(AppState::in_memory(settings).is_err());
}
