use crate::retry::{RetryPolicy, DEFAULT_RETRYABLE_STATUS_CODES};
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable overriding `upstream_url`.
pub const ENV_UPSTREAM_URL: &str = "UPSTREAM_URL";
/// Environment variable overriding `listen_addr`.
pub const ENV_LISTEN_ADDR: &str = "LISTEN_ADDR";

/// Retry policy parameters (optional `[retry]` section in config.toml).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of upstream attempts per request (including the first).
    pub max_attempts: u32,
    /// Fixed delay between attempts, in milliseconds.
    pub delay_ms: u64,
    /// Per-attempt timeout in seconds (e.g. 5.0).
    pub attempt_timeout_secs: f64,
    /// Upstream statuses that are retried.
    pub retryable_status_codes: Vec<u16>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay_ms: 500,
            attempt_timeout_secs: 5.0,
            retryable_status_codes: DEFAULT_RETRYABLE_STATUS_CODES.to_vec(),
        }
    }
}

impl RetryConfig {
    pub fn to_policy(&self) -> Result<RetryPolicy> {
        if !self.attempt_timeout_secs.is_finite() || self.attempt_timeout_secs <= 0.0 {
            bail!(
                "attempt_timeout_secs must be positive, got {}",
                self.attempt_timeout_secs
            );
        }
        let policy = RetryPolicy::new(
            self.max_attempts,
            Duration::from_millis(self.delay_ms),
            Duration::from_secs_f64(self.attempt_timeout_secs),
            self.retryable_status_codes.iter().copied(),
        )?;
        Ok(policy)
    }
}

/// Service configuration loaded from `~/.config/downstream/config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DownstreamConfig {
    /// Base URL of the upstream service; requests go to `<upstream_url>/api/data`.
    pub upstream_url: String,
    /// Address the HTTP server binds to.
    pub listen_addr: String,
    /// Value of the `source` field in every response.
    pub source_name: String,
    /// Optional retry policy; if missing, built-in defaults are used.
    #[serde(default)]
    pub retry: Option<RetryConfig>,
}

impl Default for DownstreamConfig {
    fn default() -> Self {
        Self {
            upstream_url: "http://go-upstream:7000".to_string(),
            listen_addr: "0.0.0.0:8000".to_string(),
            source_name: "downstream".to_string(),
            retry: None,
        }
    }
}

impl DownstreamConfig {
    pub fn retry_policy(&self) -> Result<RetryPolicy> {
        self.retry.clone().unwrap_or_default().to_policy()
    }

    /// Apply overrides from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from `lookup` (non-empty values only).
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        if let Some(url) = get(ENV_UPSTREAM_URL) {
            self.upstream_url = url;
        }
        if let Some(addr) = get(ENV_LISTEN_ADDR) {
            self.listen_addr = addr;
        }
    }

    pub fn validate(&self) -> Result<()> {
        let url = url::Url::parse(&self.upstream_url)
            .with_context(|| format!("invalid upstream_url {:?}", self.upstream_url))?;
        if !matches!(url.scheme(), "http" | "https") {
            bail!("upstream_url must be http or https, got {:?}", url.scheme());
        }
        self.retry_policy().context("invalid [retry] section")?;
        Ok(())
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("downstream")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
/// Environment overrides are applied and the result is validated.
pub fn load_or_init() -> Result<DownstreamConfig> {
    load_or_init_with(|_| {})
}

/// Like [`load_or_init`], but applies `overrides` after the environment and
/// before validation (e.g. command-line flags).
///
/// An unusable config dir (read-only filesystem, missing HOME) is not fatal:
/// built-in defaults are used so the environment alone can configure the service.
/// A config file that exists but cannot be read or parsed is still an error.
pub fn load_or_init_with<F>(overrides: F) -> Result<DownstreamConfig>
where
    F: FnOnce(&mut DownstreamConfig),
{
    let cfg = match config_path() {
        Ok(path) if path.exists() => read_file(&path)?,
        Ok(path) => {
            let default_cfg = DownstreamConfig::default();
            match write_default(&path, &default_cfg) {
                Ok(()) => tracing::info!("created default config at {}", path.display()),
                Err(e) => tracing::warn!(
                    "cannot create default config at {} ({:#}); using built-in defaults",
                    path.display(),
                    e
                ),
            }
            default_cfg
        }
        Err(e) => {
            tracing::warn!("config dir unavailable ({:#}); using built-in defaults", e);
            DownstreamConfig::default()
        }
    };
    finalize(cfg, overrides)
}

/// Load configuration from an explicit file, then apply environment overrides.
pub fn load_from(path: &Path) -> Result<DownstreamConfig> {
    load_from_with(path, |_| {})
}

/// Like [`load_from`], with `overrides` applied after the environment.
pub fn load_from_with<F>(path: &Path, overrides: F) -> Result<DownstreamConfig>
where
    F: FnOnce(&mut DownstreamConfig),
{
    finalize(read_file(path)?, overrides)
}

fn read_file(path: &Path) -> Result<DownstreamConfig> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    toml::from_str(&data).with_context(|| format!("parsing config {}", path.display()))
}

fn write_default(path: &Path, cfg: &DownstreamConfig) -> Result<()> {
    let toml = toml::to_string_pretty(cfg)?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, toml)?;
    Ok(())
}

fn finalize<F>(mut cfg: DownstreamConfig, overrides: F) -> Result<DownstreamConfig>
where
    F: FnOnce(&mut DownstreamConfig),
{
    cfg.apply_env();
    overrides(&mut cfg);
    cfg.validate()?;
    Ok(cfg)
}
