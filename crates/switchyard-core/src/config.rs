use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::idempotency::{IdempotencyChain, IDEMPOTENCY_KEY, METHOD_OVERRIDE};
use crate::retry::{Backoff, RetryPolicy};

/// Retry policy parameters (optional section in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Retries after the first attempt.
    pub max_retries: u32,
    /// Total time budget for one call in seconds (None = unbounded).
    #[serde(default)]
    pub max_duration_secs: Option<u64>,
    /// Base delay in seconds for exponential backoff (e.g. 0.25 = 250ms).
    pub base_delay_secs: f64,
    /// Maximum backoff delay in seconds.
    pub max_delay_secs: u64,
    /// Upper bound on a server `Retry-After` in seconds; unset means
    /// `max_delay_secs`.
    #[serde(default)]
    pub max_retry_after_secs: Option<u64>,
    /// Retry 429/503/5xx before routing them.
    #[serde(default = "default_true")]
    pub retry_server_errors: bool,
}

fn default_true() -> bool {
    true
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 4,
            max_duration_secs: None,
            base_delay_secs: 0.25,
            max_delay_secs: 30,
            max_retry_after_secs: None,
            retry_server_errors: true,
        }
    }
}

impl RetryConfig {
    pub fn to_policy(&self) -> RetryPolicy {
        let base = Duration::try_from_secs_f64(self.base_delay_secs).unwrap_or(Duration::ZERO);
        RetryPolicy {
            max_retries: self.max_retries,
            max_duration: self.max_duration_secs.map(Duration::from_secs),
            backoff: Backoff::Exponential {
                base,
                max: Duration::from_secs(self.max_delay_secs),
            },
            max_retry_after: Some(Duration::from_secs(
                self.max_retry_after_secs.unwrap_or(self.max_delay_secs),
            )),
            retry_server_errors: self.retry_server_errors,
        }
    }
}

/// Header names and opt-in detectors for the idempotency chain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdempotencyConfig {
    pub idempotency_key_header: String,
    pub method_override_header: String,
    /// Treat `If-Match` / `If-None-Match` / `If-Unmodified-Since` as retry-safe.
    #[serde(default)]
    pub conditional_requests: bool,
}

impl Default for IdempotencyConfig {
    fn default() -> Self {
        Self {
            idempotency_key_header: IDEMPOTENCY_KEY.to_string(),
            method_override_header: METHOD_OVERRIDE.to_string(),
            conditional_requests: false,
        }
    }
}

impl IdempotencyConfig {
    pub fn to_chain(&self) -> IdempotencyChain {
        let chain =
            IdempotencyChain::with_headers(&self.idempotency_key_header, &self.method_override_header);
        if self.conditional_requests {
            chain.with_conditional_requests()
        } else {
            chain
        }
    }
}

/// Global configuration loaded from `~/.config/switchyard/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SwitchyardConfig {
    /// Base URL for relative request templates.
    #[serde(default)]
    pub base_url: Option<String>,
    /// Optional retry policy; if missing, calls are not retried.
    #[serde(default)]
    pub retry: Option<RetryConfig>,
    /// Optional idempotency settings; if missing, built-in defaults are used.
    #[serde(default)]
    pub idempotency: Option<IdempotencyConfig>,
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("switchyard")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<SwitchyardConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = SwitchyardConfig {
            retry: Some(RetryConfig::default()),
            idempotency: Some(IdempotencyConfig::default()),
            ..SwitchyardConfig::default()
        };
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    load_from_path(&path)
}

pub fn load_from_path(path: &Path) -> Result<SwitchyardConfig> {
    let data = fs::read_to_string(path)?;
    let cfg: SwitchyardConfig = toml::from_str(&data)?;
    Ok(cfg)
}
