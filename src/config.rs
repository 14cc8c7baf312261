//! Configuration Management
//!
//! Provider settings come from, in order of precedence: CLI flags, the
//! environment (`TENANT` then `HOST`, and `TOKEN`), a JSON or YAML file, and
//! compile-time defaults.

use crate::pam::http::DEFAULT_TIMEOUT;
use crate::pam::retry::{DEFAULT_MAX_RETRIES, DEFAULT_REQUEST_SLEEP_SECS};
use crate::pam::{ClientOptions, RetryPolicy, DEFAULT_HOST_AGENT};
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

pub const ENV_TENANT: &str = "TENANT";
pub const ENV_HOST: &str = "HOST";
pub const ENV_TOKEN: &str = "TOKEN";

/// Provider configuration
#[derive(Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    /// Tenant base URL; `https://` is assumed when no scheme is given
    #[serde(default)]
    pub tenant: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    #[serde(default)]
    pub max_retries: Option<u32>,
    #[serde(default)]
    pub request_sleep_secs: Option<u64>,
    /// Orchestrator token appended to the user agent
    #[serde(default)]
    pub host_agent: Option<String>,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("tenant", &self.tenant)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("timeout_secs", &self.timeout_secs)
            .field("max_retries", &self.max_retries)
            .field("request_sleep_secs", &self.request_sleep_secs)
            .field("host_agent", &self.host_agent)
            .finish()
    }
}

impl Config {
    /// Default config file path
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("pam-provider").join("config.json"))
    }

    /// Load from `path`, or from the default location when `None`
    ///
    /// An explicit path must exist; a missing default file yields defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => match Self::config_path() {
                Some(path) if path.exists() => path,
                _ => return Ok(Self::default()),
            },
        };

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::parse(&content, &path)
    }

    /// Parse file content; `.yaml`/`.yml` files are YAML, anything else JSON
    pub fn parse(content: &str, path: &Path) -> Result<Self> {
        let is_yaml = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("yaml") || e.eq_ignore_ascii_case("yml"));

        if is_yaml {
            serde_yaml::from_str(content).with_context(|| format!("Invalid YAML in {}", path.display()))
        } else {
            serde_json::from_str(content).with_context(|| format!("Invalid JSON in {}", path.display()))
        }
    }

    /// Overlay values from the environment
    ///
    /// `env` is injectable so tests never touch the process environment.
    pub fn with_env<F>(mut self, env: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| env(key).filter(|v| !v.trim().is_empty());
        if let Some(tenant) = non_empty(ENV_TENANT).or_else(|| non_empty(ENV_HOST)) {
            self.tenant = Some(tenant);
        }
        if let Some(token) = non_empty(ENV_TOKEN) {
            self.token = Some(token);
        }
        self
    }

    /// Overlay values given on the command line
    pub fn with_overrides(mut self, tenant: Option<String>, token: Option<String>) -> Self {
        if tenant.is_some() {
            self.tenant = tenant;
        }
        if token.is_some() {
            self.token = token;
        }
        self
    }

    /// Validate and turn into client options
    pub fn to_client_options(&self) -> Result<ClientOptions> {
        let Some(tenant) = self.tenant.as_deref().filter(|t| !t.trim().is_empty()) else {
            bail!("No tenant configured: pass --tenant or set {} (or {})", ENV_TENANT, ENV_HOST);
        };
        let Some(token) = self.token.as_deref().filter(|t| !t.trim().is_empty()) else {
            bail!("No token configured: pass --token or set {}", ENV_TOKEN);
        };

        let retry = RetryPolicy::new(
            self.max_retries.unwrap_or(DEFAULT_MAX_RETRIES),
            Duration::from_secs(self.request_sleep_secs.unwrap_or(DEFAULT_REQUEST_SLEEP_SECS)),
        );
        let timeout = self.timeout_secs.map(Duration::from_secs).unwrap_or(DEFAULT_TIMEOUT);

        Ok(ClientOptions::new(normalize_tenant(tenant)?, token.trim())
            .with_retry(retry)
            .with_timeout(timeout)
            .with_host_agent(self.host_agent.as_deref().unwrap_or(DEFAULT_HOST_AGENT)))
    }
}

/// Add a missing `https://`, drop trailing slashes, require an absolute URL
pub fn normalize_tenant(raw: &str) -> Result<String> {
    let raw = raw.trim();
    let with_scheme = if raw.contains("://") {
        raw.to_string()
    } else {
        format!("https://{}", raw)
    };
    let trimmed = with_scheme.trim_end_matches('/');

    let parsed = Url::parse(trimmed).with_context(|| format!("Invalid tenant URL {:?}", raw))?;
    if parsed.host_str().is_none() {
        bail!("Tenant URL {:?} has no host", raw);
    }
    Ok(trimmed.to_string())
}
