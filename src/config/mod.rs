//! Configuration handling for the service.
//!
//! Everything comes from environment variables (the binary loads a local
//! `.env` first). `Config::from_env` applies development defaults for
//! everything except the upstream API key, which has no sensible default.

use std::env;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

use crate::upstream::UpstreamConfig;

/// Environment variable names.
pub const ENV_UPSTREAM_API_KEY: &str = "UPSTREAM_API_KEY";
/// Older name for the upstream key, still honored.
pub const ENV_UPSTREAM_API_KEY_LEGACY: &str = "API52_KEY";
pub const ENV_SERVICE_API_KEY: &str = "SERVICE_API_KEY";
pub const ENV_DEBUG: &str = "DEBUG";
pub const ENV_HOST: &str = "HOST";
pub const ENV_PORT: &str = "PORT";
pub const ENV_UPSTREAM_BASE_URL: &str = "UPSTREAM_BASE_URL";
pub const ENV_UPSTREAM_TIMEOUT_SECS: &str = "UPSTREAM_TIMEOUT_SECS";
pub const ENV_UPSTREAM_MAX_RETRIES: &str = "UPSTREAM_MAX_RETRIES";
pub const ENV_UPSTREAM_PASSTHROUGH_ERRORS: &str = "UPSTREAM_PASSTHROUGH_ERRORS";

const DEFAULT_SERVICE_API_KEY: &str = "test_api_key";
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8088;
const DEFAULT_UPSTREAM_BASE_URL: &str = crate::upstream::client::DEFAULT_BASE_URL;
const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 30;
const DEFAULT_UPSTREAM_MAX_RETRIES: u32 = crate::upstream::client::DEFAULT_MAX_RETRIES;

/// Application runtime configuration.
#[derive(Clone, PartialEq, Eq)]
pub struct Config {
    upstream_api_key: String,
    service_api_key: String,
    debug: bool,
    host: String,
    port: u16,
    upstream_base_url: String,
    upstream_timeout_secs: u64,
    upstream_max_retries: u32,
    passthrough_errors: bool,
}

impl Config {
    /// Load from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load using an arbitrary key lookup. Empty values count as unset, except
    /// for the service key, where an empty value is an error.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let upstream_api_key = get(ENV_UPSTREAM_API_KEY)
            .or_else(|| get(ENV_UPSTREAM_API_KEY_LEGACY))
            .ok_or(ConfigError::Missing(ENV_UPSTREAM_API_KEY))?;

        // Set-but-blank must not fall back to the well-known default key
        let service_api_key = match lookup(ENV_SERVICE_API_KEY) {
            None => DEFAULT_SERVICE_API_KEY.to_string(),
            Some(v) if v.trim().is_empty() => {
                return Err(ConfigError::InvalidValue {
                    field: ENV_SERVICE_API_KEY,
                    reason: "must not be empty".to_string(),
                });
            }
            Some(v) => v,
        };

        Ok(Self {
            upstream_api_key,
            service_api_key,
            debug: get(ENV_DEBUG)
                .map(|v| parse_bool(ENV_DEBUG, &v))
                .transpose()?
                .unwrap_or(false),
            host: get(ENV_HOST).unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: get(ENV_PORT)
                .map(|v| parse_number(ENV_PORT, &v))
                .transpose()?
                .unwrap_or(DEFAULT_PORT),
            upstream_base_url: get(ENV_UPSTREAM_BASE_URL)
                .unwrap_or_else(|| DEFAULT_UPSTREAM_BASE_URL.to_string()),
            upstream_timeout_secs: get(ENV_UPSTREAM_TIMEOUT_SECS)
                .map(|v| parse_number(ENV_UPSTREAM_TIMEOUT_SECS, &v))
                .transpose()?
                .unwrap_or(DEFAULT_UPSTREAM_TIMEOUT_SECS),
            upstream_max_retries: get(ENV_UPSTREAM_MAX_RETRIES)
                .map(|v| parse_number(ENV_UPSTREAM_MAX_RETRIES, &v))
                .transpose()?
                .unwrap_or(DEFAULT_UPSTREAM_MAX_RETRIES),
            passthrough_errors: get(ENV_UPSTREAM_PASSTHROUGH_ERRORS)
                .map(|v| parse_bool(ENV_UPSTREAM_PASSTHROUGH_ERRORS, &v))
                .transpose()?
                .unwrap_or(true),
        })
    }

    pub fn upstream_api_key(&self) -> &str {
        &self.upstream_api_key
    }
    /// Key callers must present in `X-API-Key`.
    pub fn service_api_key(&self) -> &str {
        &self.service_api_key
    }
    pub fn debug(&self) -> bool {
        self.debug
    }
    /// TCP bind address (host:port) for the HTTP server.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
    /// Whether upstream error payloads are returned to callers verbatim.
    pub fn passthrough_errors(&self) -> bool {
        self.passthrough_errors
    }

    /// Default tracing filter when `RUST_LOG` is unset.
    pub fn log_filter(&self) -> &'static str {
        if self.debug { "debug" } else { "info" }
    }

    pub fn upstream(&self) -> UpstreamConfig {
        UpstreamConfig::new(self.upstream_api_key.clone())
            .with_base_url(self.upstream_base_url.clone())
            .with_timeout(Duration::from_secs(self.upstream_timeout_secs))
            .with_max_retries(self.upstream_max_retries)
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("upstream_api_key", &mask_secret(&self.upstream_api_key))
            .field("service_api_key", &mask_secret(&self.service_api_key))
            .field("debug", &self.debug)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("upstream_base_url", &self.upstream_base_url)
            .field("upstream_timeout_secs", &self.upstream_timeout_secs)
            .field("upstream_max_retries", &self.upstream_max_retries)
            .field("passthrough_errors", &self.passthrough_errors)
            .finish()
    }
}

/// Errors that can occur while building a configuration.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    #[error("invalid value for '{field}': {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

/// Show only the first few characters of a secret.
pub fn mask_secret(secret: &str) -> String {
    let prefix: String = secret.chars().take(5).collect();
    format!("{prefix}...")
}

fn parse_bool(field: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        other => Err(ConfigError::InvalidValue {
            field,
            reason: format!("expected a boolean, got '{other}'"),
        }),
    }
}

fn parse_number<T>(field: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: fmt::Display,
{
    value.trim().parse().map_err(|e: T::Err| ConfigError::InvalidValue {
        field,
        reason: e.to_string(),
    })
}
