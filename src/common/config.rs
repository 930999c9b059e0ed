//! Configuration file handling

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::paths::{config_path, DEFAULT_REPORT_PATH};
use super::{Error, Result};

/// Environment variable overriding the target base URL
pub const BASE_URL_ENV: &str = "SOFTSYNC_BASE_URL";

/// Main configuration structure
#[derive(Debug, Deserialize, Serialize, Default)]
pub struct Config {
    /// Target API settings
    #[serde(default)]
    pub target: TargetConfig,

    /// Timeout settings
    #[serde(default)]
    pub timeouts: Timeouts,

    /// Credentials used for the throwaway test account
    #[serde(default)]
    pub credentials: Credentials,

    /// Report file settings
    #[serde(default)]
    pub report: ReportConfig,
}

/// Target API settings
#[derive(Debug, Deserialize, Serialize)]
pub struct TargetConfig {
    /// Base URL of the deployment, without the `/api` prefix
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

fn default_base_url() -> String {
    "https://timekeep-33.preview.emergentagent.com".to_string()
}

/// Timeout settings in seconds
#[derive(Debug, Deserialize, Serialize)]
pub struct Timeouts {
    /// Per-request timeout
    #[serde(default = "default_request")]
    pub request_secs: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            request_secs: default_request(),
        }
    }
}

fn default_request() -> u64 {
    30
}

/// Test account credentials
#[derive(Debug, Deserialize, Serialize)]
pub struct Credentials {
    /// Fixed email; a unique one is generated per run when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(default = "default_password")]
    pub password: String,

    #[serde(default = "default_name")]
    pub name: String,
}

impl Default for Credentials {
    fn default() -> Self {
        Self {
            email: None,
            password: default_password(),
            name: default_name(),
        }
    }
}

fn default_password() -> String {
    "TestPass123!".to_string()
}
fn default_name() -> String {
    "Test User".to_string()
}

/// Report file configuration
#[derive(Debug, Deserialize, Serialize)]
pub struct ReportConfig {
    /// Where the JSON report is written
    #[serde(default = "default_report_path")]
    pub path: PathBuf,

    /// Whether to write the report at all
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            path: default_report_path(),
            enabled: true,
        }
    }
}

fn default_report_path() -> PathBuf {
    PathBuf::from(DEFAULT_REPORT_PATH)
}
fn default_true() -> bool {
    true
}

impl Config {
    /// Load configuration from the default config file
    ///
    /// Returns default configuration if file doesn't exist. The
    /// `SOFTSYNC_BASE_URL` environment variable overrides the file.
    pub fn load() -> Result<Self> {
        let mut config = match config_path() {
            Some(path) if path.exists() => Self::load_from(&path)?,
            _ => Self::default(),
        };

        if let Ok(url) = std::env::var(BASE_URL_ENV) {
            if !url.trim().is_empty() {
                config.target.base_url = url;
            }
        }

        Ok(config)
    }

    /// Load configuration from an explicit file
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::file_read(path, e))?;
        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::ConfigParse(e.to_string()))
    }

    /// Render the effective configuration as TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::Config(e.to_string()))
    }
}
