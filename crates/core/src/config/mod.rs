//! Application configuration with layered loading.
//!
//! Loading precedence (highest wins):
//!
//! 1. Environment variables (TOPVIEW_*)
//! 2. TOML config file (if TOPVIEW_CONFIG_FILE set)
//! 3. Built-in defaults

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use url::Url;

mod validation;

pub use validation::ConfigError;

/// Versioned name of the shell cache namespace.
pub const DEFAULT_CACHE_NAME: &str = "topview-shell-v1";

/// Resources cached at install time, relative to the application origin.
pub const DEFAULT_SHELL_ASSETS: &[&str] = &["/", "/index.html", "/manifest.json"];

/// Application configuration with layered loading.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Path to the SQLite cache database.
    ///
    /// Set via TOPVIEW_DB_PATH.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// Origin the dashboard is served from; relative shell assets resolve
    /// against it.
    ///
    /// Set via TOPVIEW_ORIGIN.
    #[serde(default = "default_origin")]
    pub origin: String,

    /// Cache namespace version string. Changing it orphans the previous
    /// namespace.
    ///
    /// Set via TOPVIEW_CACHE_NAME.
    #[serde(default = "default_cache_name")]
    pub cache_name: String,

    /// Ordered shell asset set populated at install.
    ///
    /// Set via TOPVIEW_SHELL_ASSETS (e.g. `["/", "/index.html"]`).
    #[serde(default = "default_shell_assets")]
    pub shell_assets: Vec<String>,

    /// User-Agent string for outbound requests.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Network request timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Maximum response body size in bytes.
    #[serde(default = "default_max_bytes")]
    pub max_bytes: usize,

    /// How many times the host attempts install before giving up.
    #[serde(default = "default_install_attempts")]
    pub install_attempts: u32,

    /// Base delay between install attempts, multiplied by the attempt number.
    #[serde(default = "default_install_backoff_ms")]
    pub install_backoff_ms: u64,
}

fn default_db_path() -> PathBuf {
    PathBuf::from("./topview-shell-cache.sqlite")
}

fn default_origin() -> String {
    "http://localhost:8080".into()
}

fn default_cache_name() -> String {
    DEFAULT_CACHE_NAME.into()
}

fn default_shell_assets() -> Vec<String> {
    DEFAULT_SHELL_ASSETS.iter().map(|s| s.to_string()).collect()
}

fn default_user_agent() -> String {
    "topview-shell/0.1".into()
}

fn default_timeout_ms() -> u64 {
    20_000
}

fn default_max_bytes() -> usize {
    5_242_880 // 5MB
}

fn default_install_attempts() -> u32 {
    3
}

fn default_install_backoff_ms() -> u64 {
    1_000
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            origin: default_origin(),
            cache_name: default_cache_name(),
            shell_assets: default_shell_assets(),
            user_agent: default_user_agent(),
            timeout_ms: default_timeout_ms(),
            max_bytes: default_max_bytes(),
            install_attempts: default_install_attempts(),
            install_backoff_ms: default_install_backoff_ms(),
        }
    }
}

impl AppConfig {
    /// Timeout as Duration for use with reqwest.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Delay before the given (1-based) install retry.
    pub fn install_backoff(&self, attempt: u32) -> Duration {
        Duration::from_millis(self.install_backoff_ms.saturating_mul(u64::from(attempt)))
    }

    /// Parsed application origin.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if `origin` is not an absolute URL.
    pub fn origin_url(&self) -> Result<Url, ConfigError> {
        Url::parse(&self.origin)
            .map_err(|e| ConfigError::Invalid { field: "origin".into(), reason: e.to_string() })
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file or environment cannot be parsed, or
    /// if validation fails after loading.
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("TOPVIEW_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("TOPVIEW_")
                .ignore(&["CONFIG_FILE"])
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }
}
