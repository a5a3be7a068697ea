//! Configuration loaded from `.env` files and `FCODER_`-prefixed environment variables.
//!
//! # Example
//!
//! ```ignore
//! use fcoder_client::config::ClientConfig;
//!
//! // FCODER_API_ENDPOINT=https://api.fcoder.dev
//! let config = ClientConfig::load()?;
//! assert_eq!(config.api_base(), "https://api.fcoder.dev/api/v1");
//! ```

use serde::Deserialize;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Prefix shared by every configuration variable.
pub const ENV_PREFIX: &str = "FCODER_";

/// Variable selecting the [`Environment`].
pub const ENV_VAR: &str = "FCODER_ENV";

const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Error type for configuration loading failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Environment variable deserialization failed.
    #[error("Configuration error: {0}")]
    Env(#[from] envy::Error),
    /// The API endpoint is empty or not an http(s) URL.
    #[error("Invalid API endpoint: '{0}'")]
    InvalidEndpoint(String),
    /// A zero timeout would fail every request before it is sent.
    #[error("Request timeout must be greater than zero")]
    ZeroTimeout,
}

/// Deployment profile, from `FCODER_ENV`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
    Custom(String),
}

impl Environment {
    /// Detect the current environment from `FCODER_ENV`, defaulting to development.
    pub fn current() -> Self {
        Self::from_value(std::env::var(ENV_VAR).ok().as_deref())
    }

    pub fn from_value(value: Option<&str>) -> Self {
        match value {
            Some("production") | Some("prod") => Self::Production,
            Some("development") | Some("dev") | None => Self::Development,
            Some(other) => Self::Custom(other.to_string()),
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
            Self::Custom(name) => name,
        }
    }

    /// Default log filter: debug while developing, info elsewhere.
    pub fn default_log_level(&self) -> &'static str {
        match self {
            Self::Development => "debug",
            Self::Production | Self::Custom(_) => "info",
        }
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::current()
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

/// Settings for talking to the FCoder REST API.
///
/// Field names map to `FCODER_API_ENDPOINT` and `FCODER_REQUEST_TIMEOUT_MS`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ClientConfig {
    /// Server origin, without the `/api/v1` suffix.
    pub api_endpoint: String,
    #[serde(default = "default_timeout_ms")]
    pub request_timeout_ms: u64,
}

impl ClientConfig {
    pub fn new(api_endpoint: impl Into<String>) -> Self {
        Self {
            api_endpoint: api_endpoint.into(),
            request_timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }

    /// Sub-millisecond remainders round up, so only `Duration::ZERO` maps to zero.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        let millis = timeout.as_micros().div_ceil(1000);
        self.request_timeout_ms = u64::try_from(millis).unwrap_or(u64::MAX);
        self
    }

    /// Load `.env` (if present) and then read the environment.
    pub fn load() -> Result<Self, ConfigError> {
        load_dotenv();
        Self::from_env()
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        envy::prefixed(ENV_PREFIX)
            .from_env::<Self>()
            .map_err(ConfigError::from)
            .and_then(Self::validated)
    }

    /// Read from explicit `(name, value)` pairs, using the same prefix rules.
    pub fn from_vars<I>(vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::prefixed(ENV_PREFIX)
            .from_iter::<_, Self>(vars)
            .map_err(ConfigError::from)
            .and_then(Self::validated)
    }

    /// Check the endpoint scheme and that the timeout is non-zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let endpoint = self.api_endpoint.trim();
        if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
            return Err(ConfigError::InvalidEndpoint(self.api_endpoint.clone()));
        }
        if self.request_timeout_ms == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        Ok(())
    }

    fn validated(self) -> Result<Self, ConfigError> {
        self.validate()?;
        Ok(self)
    }

    /// Versioned API root, e.g. `https://api.fcoder.dev/api/v1`.
    pub fn api_base(&self) -> String {
        format!("{}/api/v1", self.api_endpoint.trim().trim_end_matches('/'))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

/// Load variables from `.env` in the working directory. Existing
/// variables win; a missing file is not an error.
pub fn load_dotenv() {
    if let Err(err) = dotenvy::dotenv() {
        if !err.not_found() {
            tracing::warn!(error = %err, "failed to read .env file");
        }
    }
}
