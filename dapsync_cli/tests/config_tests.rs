//! Layered configuration loading
//!
//! Environment variables are process-global, so every test that touches them
//! runs inside a `figment::Jail`.

use dapsync_cli::config::{ConfigError, ConfigManager, Profile};
use figment::Jail;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;
use tempfile::TempDir;

fn write_config(temp_dir: &TempDir, contents: &str) -> ConfigManager {
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, contents).unwrap();
    ConfigManager::with_path(config_path)
}

#[test]
fn test_missing_file_uses_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let manager = ConfigManager::with_path(temp_dir.path().join("absent.toml"));

    let config = manager.load().unwrap();
    assert_eq!(config.sync.namespace, "canvas");
    assert_eq!(config.dap.executable, "dap");
}

#[test]
fn test_file_values_resolve() {
    let temp_dir = TempDir::new().unwrap();
    let manager = write_config(
        &temp_dir,
        r#"
[dap]
client_id = "file-client"
client_secret = "file-secret"
executable = "/opt/dap/bin/dap"
connection_string_supabase = "postgresql://supabase.invalid/postgres"

[sync]
tables = ["users", "courses", "users"]
max_concurrency = 8
table_timeout_seconds = 900

[output]
format = "json"
"#,
    );

    let config = manager.load().unwrap();
    assert_eq!(config.output.format, "json");

    let settings = config.resolve(Profile::Supabase).unwrap();
    assert_eq!(settings.session.credentials().client_id(), "file-client");
    assert_eq!(settings.executable, PathBuf::from("/opt/dap/bin/dap"));
    assert_eq!(settings.tables.len(), 2);
    assert_eq!(settings.orchestrator.max_concurrency, Some(8));
    assert_eq!(
        settings.orchestrator.table_timeout,
        Some(Duration::from_secs(900))
    );
}

#[test]
fn test_malformed_file_is_load_error() {
    let temp_dir = TempDir::new().unwrap();
    let manager = write_config(&temp_dir, "[sync\nmax_concurrency = ");

    assert!(matches!(manager.load(), Err(ConfigError::Load(_))));
}

#[test]
fn test_legacy_dap_environment_variables() {
    Jail::expect_with(|jail| {
        jail.set_env("DAP_CLIENT_ID", "env-client");
        jail.set_env("DAP_CLIENT_SECRET", "env-secret");
        jail.set_env("DAP_CONNECTION_STRING_LOCAL", "postgresql://localhost/env");
        jail.set_env("DAP_API_URL", "https://dap.example.invalid");

        let manager = ConfigManager::with_path(jail.directory().join("config.toml"));
        let settings = manager.load().unwrap().resolve(Profile::Local).unwrap();

        assert_eq!(settings.session.base_url(), "https://dap.example.invalid");
        assert_eq!(settings.session.credentials().client_id(), "env-client");
        assert_eq!(
            settings.session.connection_string().expose_secret(),
            "postgresql://localhost/env"
        );
        Ok(())
    });
}

#[test]
fn test_environment_overrides_file() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[dap]
client_id = "file-client"

[sync]
namespace = "canvas"
"#,
        )?;
        jail.set_env("DAP_CLIENT_ID", "env-client");
        jail.set_env("DAPSYNC_SYNC__NAMESPACE", "canvas_logs");

        let manager = ConfigManager::with_path(jail.directory().join("config.toml"));
        let config = manager.load().unwrap();

        assert_eq!(config.dap.client_id.as_deref(), Some("env-client"));
        assert_eq!(config.sync.namespace, "canvas_logs");
        Ok(())
    });
}

#[test]
fn test_unrelated_dap_variables_are_ignored() {
    Jail::expect_with(|jail| {
        jail.set_env("DAP_SOMETHING_ELSE", "ignored");

        let manager = ConfigManager::with_path(jail.directory().join("config.toml"));
        assert!(manager.load().is_ok());
        Ok(())
    });
}
