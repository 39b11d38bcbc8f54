//! Integration tests for configuration resolution
//!
//! Tests cover the full priority chain (arguments, environment, TOML,
//! compiled defaults) and the credential sources. Tests are serialized
//! because credential resolution reads process environment variables.

use linernotes::config::{Args, Config, ConfigError};
use serial_test::serial;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

const ENV_ID: &str = "LINERNOTES_SPOTIFY_CLIENT_ID";
const ENV_SECRET: &str = "LINERNOTES_SPOTIFY_CLIENT_SECRET";

fn clear_credential_env() {
    std::env::remove_var(ENV_ID);
    std::env::remove_var(ENV_SECRET);
}

/// Test helper: write a config file into the temp dir
fn write_config(dir: &TempDir, content: &str) -> PathBuf {
    let path = dir.path().join("config.toml");
    fs::write(&path, content).unwrap();
    path
}

/// Test helper: args pointing at an explicit config file
fn args_with_config(path: PathBuf) -> Args {
    Args {
        config: Some(path),
        ..Args::default()
    }
}

#[test]
#[serial]
fn test_credentials_from_environment() {
    clear_credential_env();
    std::env::set_var(ENV_ID, "env-id");
    std::env::set_var(ENV_SECRET, "env-secret");

    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "");

    let config = Config::resolve(&args_with_config(path)).unwrap();
    assert_eq!(config.credentials.client_id, "env-id");
    assert_eq!(config.credentials.client_secret, "env-secret");

    // Compiled defaults fill everything else
    assert_eq!(config.bind.to_string(), "127.0.0.1:3000");
    assert_eq!(config.market, "GB");

    clear_credential_env();
}

#[test]
#[serial]
fn test_credentials_from_toml() {
    clear_credential_env();

    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        r#"
        spotify_client_id = "toml-id"
        spotify_client_secret = "toml-secret"
        "#,
    );

    let config = Config::resolve(&args_with_config(path)).unwrap();
    assert_eq!(config.credentials.client_id, "toml-id");
    assert_eq!(config.credentials.client_secret, "toml-secret");
}

#[test]
#[serial]
fn test_environment_overrides_toml() {
    clear_credential_env();
    std::env::set_var(ENV_ID, "env-id");
    std::env::set_var(ENV_SECRET, "env-secret");

    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        r#"
        spotify_client_id = "toml-id"
        spotify_client_secret = "toml-secret"
        "#,
    );

    let config = Config::resolve(&args_with_config(path)).unwrap();
    assert_eq!(config.credentials.client_id, "env-id");
    assert_eq!(config.credentials.client_secret, "env-secret");

    clear_credential_env();
}

#[test]
#[serial]
fn test_toml_settings_apply() {
    clear_credential_env();

    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        r#"
        bind = "0.0.0.0:8080"
        database = "/tmp/linernotes-test.db"
        market = "US"
        spotify_client_id = "toml-id"
        spotify_client_secret = "toml-secret"
        "#,
    );

    let config = Config::resolve(&args_with_config(path)).unwrap();
    assert_eq!(config.bind.to_string(), "0.0.0.0:8080");
    assert_eq!(config.database, PathBuf::from("/tmp/linernotes-test.db"));
    assert_eq!(config.market, "US");
}

#[test]
#[serial]
fn test_arguments_override_toml() {
    clear_credential_env();

    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        r#"
        bind = "0.0.0.0:8080"
        market = "US"
        spotify_client_id = "toml-id"
        spotify_client_secret = "toml-secret"
        "#,
    );

    let args = Args {
        bind: Some("127.0.0.1:9090".to_string()),
        database: Some(PathBuf::from("/tmp/args.db")),
        market: Some("DE".to_string()),
        config: Some(path),
    };

    let config = Config::resolve(&args).unwrap();
    assert_eq!(config.bind.to_string(), "127.0.0.1:9090");
    assert_eq!(config.database, PathBuf::from("/tmp/args.db"));
    assert_eq!(config.market, "DE");
}

#[test]
#[serial]
fn test_missing_credentials_is_an_error() {
    clear_credential_env();

    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "");

    let err = Config::resolve(&args_with_config(path)).unwrap_err();
    match err {
        ConfigError::Missing(msg) => {
            assert!(msg.contains("Spotify credentials not configured"));
            assert!(msg.contains("LINERNOTES_SPOTIFY_CLIENT_ID"));
        }
        other => panic!("expected Missing, got {other:?}"),
    }
}

#[test]
#[serial]
fn test_blank_credentials_are_treated_as_missing() {
    clear_credential_env();
    std::env::set_var(ENV_ID, "   ");
    std::env::set_var(ENV_SECRET, "env-secret");

    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "");

    let err = Config::resolve(&args_with_config(path)).unwrap_err();
    assert!(matches!(err, ConfigError::Missing(_)));

    clear_credential_env();
}

#[test]
#[serial]
fn test_invalid_bind_rejected() {
    clear_credential_env();

    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "");

    let args = Args {
        bind: Some("not-an-address".to_string()),
        config: Some(path),
        ..Args::default()
    };

    let err = Config::resolve(&args).unwrap_err();
    match err {
        ConfigError::InvalidBind(value) => assert_eq!(value, "not-an-address"),
        other => panic!("expected InvalidBind, got {other:?}"),
    }
}

#[test]
#[serial]
fn test_explicit_config_path_must_exist() {
    clear_credential_env();

    let args = args_with_config(PathBuf::from("/no/such/dir/config.toml"));

    let err = Config::resolve(&args).unwrap_err();
    match err {
        ConfigError::Missing(msg) => assert!(msg.contains("Config file not found")),
        other => panic!("expected Missing, got {other:?}"),
    }
}
