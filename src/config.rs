//! Dashboard configuration: built-in defaults, then an optional YAML file,
//! then environment variables, then command-line flags.

use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{Context, Result};
use serde::Deserialize;

pub const DEFAULT_API_BASE: &str = "http://18.220.226.139:7077";
pub const DEFAULT_POLL_SECS: u64 = 5;
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

pub const ENV_API_BASE: &str = "DEAAS_API_BASE";
pub const ENV_POLL_SECS: &str = "DEAAS_POLL_SECS";

#[derive(Clone, Debug, PartialEq)]
pub struct DashboardConfig {
    pub api_base: String,
    pub poll_interval: Duration,
    pub request_timeout: Duration,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            poll_interval: Duration::from_secs(DEFAULT_POLL_SECS),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

/// Values supplied on the command line; they win over every other layer.
#[derive(Clone, Debug, Default)]
pub struct Overrides {
    pub config_path: Option<PathBuf>,
    pub api_base: Option<String>,
    pub poll_interval_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    api_base: Option<String>,
    #[serde(default)]
    poll_interval_secs: Option<u64>,
    #[serde(default)]
    request_timeout_secs: Option<u64>,
}

impl ConfigFile {
    fn load_from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read dashboard config at {}", path.display()))?;
        serde_yaml::from_str(&text)
            .with_context(|| format!("failed to parse dashboard config at {}", path.display()))
    }
}

impl DashboardConfig {
    pub fn load(overrides: &Overrides) -> Result<Self> {
        Self::resolve(overrides, |key| std::env::var(key).ok())
    }

    /// Layer the sources; `env` is injected so callers can resolve without touching the process env.
    pub fn resolve<F>(overrides: &Overrides, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();

        if let Some(path) = &overrides.config_path {
            let file = ConfigFile::load_from_file(path)?;
            tracing::debug!(path = %path.display(), "loaded dashboard config file");
            if let Some(base) = file.api_base {
                cfg.api_base = base;
            }
            if let Some(secs) = file.poll_interval_secs {
                cfg.poll_interval = Duration::from_secs(secs);
            }
            if let Some(secs) = file.request_timeout_secs {
                cfg.request_timeout = Duration::from_secs(secs);
            }
        }

        if let Some(base) = env(ENV_API_BASE).filter(|v| !v.trim().is_empty()) {
            cfg.api_base = base;
        }
        if let Some(raw) = env(ENV_POLL_SECS).filter(|v| !v.trim().is_empty()) {
            let secs: u64 = raw
                .trim()
                .parse()
                .with_context(|| format!("{ENV_POLL_SECS} must be whole seconds, got {raw:?}"))?;
            cfg.poll_interval = Duration::from_secs(secs);
        }

        if let Some(base) = &overrides.api_base {
            cfg.api_base = base.clone();
        }
        if let Some(secs) = overrides.poll_interval_secs {
            cfg.poll_interval = Duration::from_secs(secs);
        }

        cfg.api_base = cfg.api_base.trim().trim_end_matches('/').to_string();
        if cfg.api_base.is_empty() {
            anyhow::bail!("api base URL is empty");
        }
        if cfg.poll_interval.is_zero() {
            anyhow::bail!("poll interval must be at least one second");
        }
        Ok(cfg)
    }
}
