//! Configuration loading from TOML files
//!
//! Config file is selected via:
//! 1. --config <path> command line argument
//! 2. CONFIG_FILE environment variable
//! 3. Default: config/dev.toml
//!
//! CRM credentials are secrets and may be supplied (or overridden) via the
//! GHL_API_KEY and GHL_LOCATION_ID environment variables so they stay out
//! of checked-in files.

use anyhow::Context;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { bind_address: default_bind_address(), port: default_port() }
    }
}

fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8787
}

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogConfig {
    /// Path to the CMS-exported retreats JSON file
    #[serde(default = "default_catalog_file")]
    pub file: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self { file: default_catalog_file() }
    }
}

fn default_catalog_file() -> String {
    "data/retreats.json".to_string()
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct CmsConfig {
    /// Headless CMS project id (content is authored externally)
    #[serde(default)]
    pub project_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CrmConfig {
    #[serde(default = "default_crm_endpoint")]
    pub endpoint: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub location_id: Option<String>,
    #[serde(default = "default_crm_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for CrmConfig {
    fn default() -> Self {
        Self {
            endpoint: default_crm_endpoint(),
            api_key: None,
            location_id: None,
            timeout_ms: default_crm_timeout_ms(),
        }
    }
}

fn default_crm_endpoint() -> String {
    "https://rest.gohighlevel.com/v1/contacts/".to_string()
}

fn default_crm_timeout_ms() -> u64 {
    5000
}

#[derive(Debug, Clone, Deserialize)]
pub struct MetricsConfig {
    #[serde(default = "default_metrics_interval")]
    pub interval_secs: u64,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self { interval_secs: default_metrics_interval() }
    }
}

fn default_metrics_interval() -> u64 {
    60
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct TomlConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub cms: CmsConfig,
    #[serde(default)]
    pub crm: CrmConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
}

/// Main configuration struct used throughout the application
#[derive(Debug, Clone)]
pub struct Config {
    bind_address: String,
    port: u16,
    catalog_file: String,
    cms_project_id: Option<String>,
    crm_endpoint: String,
    crm_api_key: Option<String>,
    crm_location_id: Option<String>,
    crm_timeout_ms: u64,
    metrics_interval_secs: u64,
    config_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Self::from_toml(TomlConfig::default(), "default")
    }
}

impl Config {
    fn from_toml(toml_config: TomlConfig, config_file: &str) -> Self {
        Self {
            bind_address: toml_config.server.bind_address,
            port: toml_config.server.port,
            catalog_file: toml_config.catalog.file,
            cms_project_id: toml_config.cms.project_id,
            crm_endpoint: toml_config.crm.endpoint,
            crm_api_key: toml_config.crm.api_key,
            crm_location_id: toml_config.crm.location_id,
            crm_timeout_ms: toml_config.crm.timeout_ms,
            metrics_interval_secs: toml_config.metrics.interval_secs,
            config_file: config_file.to_string(),
        }
    }

    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        let toml_config: TomlConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        Ok(Self::from_toml(toml_config, &path.display().to_string()))
    }

    /// Load configuration - tries the TOML file first, falls back to
    /// defaults, then applies environment overrides for credentials.
    pub fn load_from_path(path: &str) -> Self {
        let mut config = match Self::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(error = %e, "config_fallback_to_defaults");
                Self::default()
            }
        };
        config.apply_env_overrides();
        config
    }

    /// GHL_API_KEY / GHL_LOCATION_ID env vars override file values.
    fn apply_env_overrides(&mut self) {
        if let Ok(api_key) = env::var("GHL_API_KEY") {
            if !api_key.is_empty() {
                self.crm_api_key = Some(api_key);
            }
        }
        if let Ok(location_id) = env::var("GHL_LOCATION_ID") {
            if !location_id.is_empty() {
                self.crm_location_id = Some(location_id);
            }
        }
    }

    /// Both CRM credentials present - leads are forwarded rather than
    /// logged locally.
    pub fn has_crm_credentials(&self) -> bool {
        self.crm_api_key.is_some() && self.crm_location_id.is_some()
    }

    // Getters for all config fields
    pub fn bind_address(&self) -> &str {
        &self.bind_address
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn catalog_file(&self) -> &str {
        &self.catalog_file
    }

    pub fn cms_project_id(&self) -> Option<&str> {
        self.cms_project_id.as_deref()
    }

    pub fn crm_endpoint(&self) -> &str {
        &self.crm_endpoint
    }

    pub fn crm_api_key(&self) -> Option<&str> {
        self.crm_api_key.as_deref()
    }

    pub fn crm_location_id(&self) -> Option<&str> {
        self.crm_location_id.as_deref()
    }

    pub fn crm_timeout_ms(&self) -> u64 {
        self.crm_timeout_ms
    }

    pub fn metrics_interval_secs(&self) -> u64 {
        self.metrics_interval_secs
    }

    pub fn config_file(&self) -> &str {
        &self.config_file
    }

    /// Builder method for tests to set CRM credentials
    #[cfg(test)]
    pub fn with_crm_credentials(mut self, api_key: &str, location_id: &str) -> Self {
        self.crm_api_key = Some(api_key.to_string());
        self.crm_location_id = Some(location_id.to_string());
        self
    }
}
