//! Layered configuration
//!
//! Priority, lowest first: built-in defaults, the TOML config file,
//! `DAPSYNC_`-prefixed environment variables (`__` separates sections), the
//! plain `DAP_*` variables the DAP tooling already uses, and finally command
//! line flags.

use clap::ValueEnum;
use dapsync_core::primitives::dap_cli::DEFAULT_DAP_EXECUTABLE;
use dapsync_core::{
    CANVAS_TABLES, Credentials, DEFAULT_NAMESPACE, OrchestratorConfig, RunSession, TableSet,
};
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Default DAP API gateway
pub const DEFAULT_API_URL: &str = "https://api-gateway.instructure.com";

/// `DAP_*` variables read as the `dap` section
const LEGACY_DAP_KEYS: &[&str] = &[
    "api_url",
    "client_id",
    "client_secret",
    "connection_string_local",
    "connection_string_supabase",
];

/// Destination database profile, selected by the positional argument
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Profile {
    /// Local PostgreSQL instance
    Local,
    /// Hosted Supabase database
    Supabase,
}

impl Profile {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Supabase => "supabase",
        }
    }
}

/// Configuration errors, all detected before any table is processed
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] Box<figment::Error>),

    #[error("Missing required setting '{key}' (set {env} or add it to the config file)")]
    Missing { key: String, env: String },

    #[error(transparent)]
    Invalid(#[from] dapsync_core::Error),
}

impl ConfigError {
    fn missing(key: &str, env: &str) -> Self {
        Self::Missing {
            key: key.to_string(),
            env: env.to_string(),
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Default, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub dap: DapConfig,

    #[serde(default)]
    pub sync: SyncConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct DapConfig {
    pub api_url: String,
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    /// Path or name of the `dap` executable
    pub executable: String,
    pub connection_string_local: Option<String>,
    pub connection_string_supabase: Option<String>,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct SyncConfig {
    pub namespace: String,
    pub tables: Vec<String>,
    /// Unset or 0 runs every table at once
    pub max_concurrency: Option<usize>,
    pub table_timeout_seconds: Option<u64>,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct OutputConfig {
    pub format: String,
    pub color_enabled: bool,
}

impl Default for DapConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            client_id: None,
            client_secret: None,
            executable: DEFAULT_DAP_EXECUTABLE.to_string(),
            connection_string_local: None,
            connection_string_supabase: None,
        }
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.to_string(),
            tables: CANVAS_TABLES.iter().map(|t| t.to_string()).collect(),
            max_concurrency: None,
            table_timeout_seconds: None,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: "human".to_string(),
            color_enabled: true,
        }
    }
}

/// Command line overrides, applied on top of every other layer
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub tables: Vec<String>,
    pub max_concurrency: Option<usize>,
    pub table_timeout_seconds: Option<u64>,
}

/// Everything a run needs, validated
#[derive(Debug, Clone)]
pub struct RunSettings {
    pub session: RunSession,
    pub tables: TableSet,
    pub orchestrator: OrchestratorConfig,
    pub executable: PathBuf,
}

impl AppConfig {
    /// Apply CLI argument overrides to the configuration
    pub fn apply_cli_overrides(&mut self, overrides: &CliOverrides) {
        if !overrides.tables.is_empty() {
            self.sync.tables = overrides.tables.clone();
        }
        if let Some(limit) = overrides.max_concurrency {
            self.sync.max_concurrency = Some(limit);
        }
        if let Some(seconds) = overrides.table_timeout_seconds {
            self.sync.table_timeout_seconds = Some(seconds);
        }
    }

    /// Connection string for the selected profile
    pub fn connection_string(&self, profile: Profile) -> Option<&str> {
        let value = match profile {
            Profile::Local => self.dap.connection_string_local.as_deref(),
            Profile::Supabase => self.dap.connection_string_supabase.as_deref(),
        };
        value.filter(|v| !v.trim().is_empty())
    }

    /// Validate the configuration for `profile` and build the run inputs
    pub fn resolve(&self, profile: Profile) -> Result<RunSettings, ConfigError> {
        let client_id = non_blank(&self.dap.client_id)
            .ok_or_else(|| ConfigError::missing("dap.client_id", "DAP_CLIENT_ID"))?;
        let client_secret = non_blank(&self.dap.client_secret)
            .ok_or_else(|| ConfigError::missing("dap.client_secret", "DAP_CLIENT_SECRET"))?;

        let connection_string = self.connection_string(profile).ok_or_else(|| {
            let env = format!(
                "DAP_CONNECTION_STRING_{}",
                profile.as_str().to_ascii_uppercase()
            );
            ConfigError::missing(
                &format!("dap.connection_string_{}", profile.as_str()),
                &env,
            )
        })?;

        let credentials = Credentials::create(client_id, client_secret)?;
        let session = RunSession::new(
            self.dap.api_url.clone(),
            self.sync.namespace.clone(),
            credentials,
            connection_string,
        )?;
        let tables = TableSet::from_names(&self.sync.tables)?;

        Ok(RunSettings {
            session,
            tables,
            orchestrator: OrchestratorConfig {
                max_concurrency: self.sync.max_concurrency,
                table_timeout: self
                    .sync
                    .table_timeout_seconds
                    .filter(|s| *s > 0)
                    .map(Duration::from_secs),
            },
            executable: PathBuf::from(&self.dap.executable),
        })
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

/// Configuration manager that handles XDG-compliant paths and layered configuration
pub struct ConfigManager {
    config_path: PathBuf,
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigManager {
    /// Create a new ConfigManager with default XDG-compliant paths
    pub fn new() -> Self {
        Self {
            config_path: Self::default_config_path(),
        }
    }

    /// Create a ConfigManager with a specific path
    pub fn with_path(path: PathBuf) -> Self {
        Self { config_path: path }
    }

    pub fn get_config_path(&self) -> PathBuf {
        self.config_path.clone()
    }

    fn default_config_path() -> PathBuf {
        #[cfg(not(target_os = "windows"))]
        if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
            return PathBuf::from(xdg_config).join("dapsync/config.toml");
        }

        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("dapsync")
            .join("config.toml")
    }

    /// Build the layered figment without extracting it
    pub fn figment(&self) -> Figment {
        let mut figment = Figment::new();

        // Layer 1: Defaults
        figment = figment.merge(Serialized::defaults(AppConfig::default()));

        // Layer 2: Config file (if exists)
        if self.config_path.exists() {
            figment = figment.merge(Toml::file(&self.config_path));
        }

        // Layer 3: Namespaced environment variables
        figment = figment.merge(Env::prefixed("DAPSYNC_").split("__"));

        // Layer 4: Plain DAP_* variables
        figment.merge(
            Env::prefixed("DAP_")
                .only(LEGACY_DAP_KEYS)
                .map(|key| format!("dap.{key}").into()),
        )
    }

    /// Load configuration with layered priority: ENV > File > Defaults
    pub fn load(&self) -> Result<AppConfig, ConfigError> {
        self.figment()
            .extract()
            .map_err(|e| ConfigError::Load(Box::new(e)))
    }
}
