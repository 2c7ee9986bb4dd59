use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::identity::{DEFAULT_API_VERSION, DEFAULT_RESOURCE};
use crate::retry::RetryPolicy;
use crate::transport::CurlOptions;

/// Which built-in retry policy to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RetryStrategy {
    Never,
    Fixed,
    #[default]
    Exponential,
}

/// Retry policy parameters (optional section in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    #[serde(default)]
    pub strategy: RetryStrategy,
    /// Maximum number of attempts per request (including the first).
    pub max_attempts: u32,
    /// Base delay in seconds (fixed delay, or exponential base; e.g. 0.25 = 250ms).
    pub base_delay_secs: f64,
    /// Maximum backoff delay in seconds.
    pub max_delay_secs: u64,
    /// Also retry when no HTTP status was received (connection refused, timeout).
    #[serde(default)]
    pub retry_transport_errors: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            strategy: RetryStrategy::Exponential,
            max_attempts: 5,
            base_delay_secs: 1.0,
            max_delay_secs: 60,
            retry_transport_errors: false,
        }
    }
}

impl RetryConfig {
    pub fn to_policy(&self) -> RetryPolicy {
        // Negative, NaN or overflowing values fall back to no delay.
        let base_delay = Duration::try_from_secs_f64(self.base_delay_secs).unwrap_or(Duration::ZERO);
        match self.strategy {
            RetryStrategy::Never => RetryPolicy::Never,
            RetryStrategy::Fixed => RetryPolicy::FixedDelay {
                delay: base_delay,
                max_attempts: self.max_attempts,
            },
            RetryStrategy::Exponential => RetryPolicy::Exponential {
                base_delay,
                max_delay: Duration::from_secs(self.max_delay_secs),
                max_attempts: self.max_attempts,
            },
        }
    }
}

/// Managed-identity endpoint and token scope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityConfig {
    /// Token endpoint; the `IDENTITY_ENDPOINT` environment variable takes precedence.
    #[serde(default)]
    pub endpoint: Option<String>,
    pub api_version: String,
    /// Audience of requested tokens.
    pub resource: String,
    /// User-assigned identity by client id (exclusive with `object_id`).
    #[serde(default)]
    pub client_id: Option<String>,
    /// User-assigned identity by object id (exclusive with `client_id`).
    #[serde(default)]
    pub object_id: Option<String>,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            api_version: DEFAULT_API_VERSION.to_string(),
            resource: DEFAULT_RESOURCE.to_string(),
            client_id: None,
            object_id: None,
        }
    }
}

/// Timeouts and TLS material for the curl transport.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransportConfig {
    pub connect_timeout_secs: u64,
    pub timeout_secs: u64,
    #[serde(default)]
    pub client_cert: Option<PathBuf>,
    #[serde(default)]
    pub client_key: Option<PathBuf>,
    #[serde(default = "default_verify_peer")]
    pub verify_peer: bool,
}

fn default_verify_peer() -> bool {
    true
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 15,
            timeout_secs: 60,
            client_cert: None,
            client_key: None,
            verify_peer: true,
        }
    }
}

impl TransportConfig {
    pub fn curl_options(&self) -> CurlOptions {
        CurlOptions {
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            timeout: Duration::from_secs(self.timeout_secs),
            client_cert: self.client_cert.clone(),
            client_key: self.client_key.clone(),
            verify_peer: self.verify_peer,
        }
    }
}

/// Global configuration loaded from `~/.config/extkit/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtkitConfig {
    /// Optional retry policy; if missing, built-in defaults are used.
    #[serde(default)]
    pub retry: Option<RetryConfig>,
    #[serde(default)]
    pub identity: IdentityConfig,
    #[serde(default)]
    pub transport: TransportConfig,
}

impl ExtkitConfig {
    pub fn retry_config(&self) -> RetryConfig {
        self.retry.clone().unwrap_or_default()
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("extkit")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<ExtkitConfig> {
    load_or_init_at(&config_path()?)
}

/// Like [`load_or_init`] for an explicit path.
pub fn load_or_init_at(path: &Path) -> Result<ExtkitConfig> {
    if !path.exists() {
        let default_cfg = ExtkitConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }
    load_from(path)
}

/// Read and parse an existing config file.
pub fn load_from(path: &Path) -> Result<ExtkitConfig> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    let cfg: ExtkitConfig =
        toml::from_str(&data).with_context(|| format!("parsing config {}", path.display()))?;
    Ok(cfg)
}
