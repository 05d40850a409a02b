//! Client configuration.
//!
//! A [`ComputeConfig`] is built once, handed to a
//! [`ComputeClient`](crate::ComputeClient), and never mutated afterwards. To
//! change credentials or the target server, build another client.

use std::time::Duration;

use rcompute_common::auth::Credentials;
use rcompute_common::error::{ComputeError, Result};

/// The hosted public compute service.
pub const DEFAULT_BASE_ADDRESS: &str = "https://compute.rhino3d.com";

/// Client name reported in the `User-Agent` header.
pub const CLIENT_NAME: &str = "rcompute";

/// Environment variable holding the base address.
pub const ENV_BASE_ADDRESS: &str = "RHINO_COMPUTE_URL";
/// Environment variable holding the bearer token.
pub const ENV_BEARER_TOKEN: &str = "RHINO_COMPUTE_TOKEN";
/// Environment variable holding the API key.
pub const ENV_API_KEY: &str = "RHINO_COMPUTE_KEY";
/// Environment variable holding the request timeout, in milliseconds.
pub const ENV_TIMEOUT_MS: &str = "RHINO_COMPUTE_TIMEOUT_MS";

/// Settings shared by every call made through one client.
///
/// # Default Configuration
///
/// - `base_address`: [`DEFAULT_BASE_ADDRESS`]
/// - no bearer token, no API key
/// - `client_version`: this crate's version
/// - no request timeout
///
/// The default address requires a bearer token; calls made without one fail
/// locally with [`ComputeError::Configuration`].
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use rcompute_client::ComputeConfig;
///
/// let config = ComputeConfig::new("http://127.0.0.1:8081")
///     .with_api_key("local-key")
///     .with_timeout(Duration::from_secs(60));
///
/// assert!(config.validate().is_ok());
/// assert_eq!(config.user_agent(), format!("rcompute/{}", env!("CARGO_PKG_VERSION")));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ComputeConfig {
    base_address: String,
    credentials: Credentials,
    client_version: String,
    timeout: Option<Duration>,
}

impl Default for ComputeConfig {
    fn default() -> Self {
        Self {
            base_address: DEFAULT_BASE_ADDRESS.to_string(),
            credentials: Credentials::default(),
            client_version: env!("CARGO_PKG_VERSION").to_string(),
            timeout: None,
        }
    }
}

impl ComputeConfig {
    /// Default configuration pointed at `base_address`.
    pub fn new(base_address: impl Into<String>) -> Self {
        Self::default().with_base_address(base_address)
    }

    /// Reads configuration from the process environment.
    ///
    /// | Variable | Meaning |
    /// |---|---|
    /// | `RHINO_COMPUTE_URL` | base address (default: public service) |
    /// | `RHINO_COMPUTE_TOKEN` | bearer token |
    /// | `RHINO_COMPUTE_KEY` | API key |
    /// | `RHINO_COMPUTE_TIMEOUT_MS` | request timeout in milliseconds |
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`from_env`](Self::from_env) with a custom variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();
        if let Some(url) = lookup(ENV_BASE_ADDRESS) {
            config = config.with_base_address(url);
        }
        if let Some(token) = lookup(ENV_BEARER_TOKEN) {
            config = config.with_bearer_token(token);
        }
        if let Some(key) = lookup(ENV_API_KEY) {
            config = config.with_api_key(key);
        }
        if let Some(ms) = lookup(ENV_TIMEOUT_MS) {
            let ms: u64 = ms.trim().parse().map_err(|e| {
                ComputeError::Configuration(format!("{} must be a number of milliseconds: {}", ENV_TIMEOUT_MS, e))
            })?;
            config = config.with_timeout(Duration::from_millis(ms));
        }
        Ok(config)
    }

    /// Sets the server base address.
    ///
    /// Surrounding whitespace and trailing slashes are dropped. An empty
    /// address falls back to [`DEFAULT_BASE_ADDRESS`].
    pub fn with_base_address(mut self, base_address: impl Into<String>) -> Self {
        let base_address = base_address.into();
        let trimmed = base_address.trim();
        self.base_address = if trimmed.is_empty() {
            DEFAULT_BASE_ADDRESS.to_string()
        } else {
            trimmed.trim_end_matches('/').to_string()
        };
        self
    }

    /// Sets the bearer token sent as `Authorization: Bearer <token>`.
    ///
    /// An empty or whitespace-only token clears it.
    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        self.credentials = self.credentials.with_bearer_token(token);
        self
    }

    /// Sets the API key sent in the `RhinoComputeKey` header.
    ///
    /// An empty or whitespace-only key clears it.
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.credentials = self.credentials.with_api_key(key);
        self
    }

    /// Overrides the version reported in the `User-Agent` header.
    pub fn with_client_version(mut self, version: impl Into<String>) -> Self {
        self.client_version = version.into();
        self
    }

    /// Bounds each call; an expired call fails with [`ComputeError::Timeout`].
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Base address without a trailing slash.
    pub fn base_address(&self) -> &str {
        &self.base_address
    }

    /// Credentials attached to every request.
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Version reported in the `User-Agent` header.
    pub fn client_version(&self) -> &str {
        &self.client_version
    }

    /// Per-call timeout, if any.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// `User-Agent` value, e.g. `rcompute/0.1.0`.
    pub fn user_agent(&self) -> String {
        format!("{}/{}", CLIENT_NAME, self.client_version)
    }

    /// Whether this config targets the public service (case-insensitive).
    pub fn is_default_address(&self) -> bool {
        self.base_address.eq_ignore_ascii_case(DEFAULT_BASE_ADDRESS)
    }

    /// Checks the configuration before a call is sent.
    ///
    /// # Errors
    ///
    /// Returns [`ComputeError::Configuration`] if:
    /// - the base address is not an `http://` or `https://` URL
    /// - the base address is the public service and no bearer token is set
    pub fn validate(&self) -> Result<()> {
        let lower = self.base_address.to_ascii_lowercase();
        if !(lower.starts_with("http://") || lower.starts_with("https://")) {
            return Err(ComputeError::Configuration(format!(
                "base address '{}' must start with http:// or https://",
                self.base_address
            )));
        }
        if self.is_default_address() && !self.credentials.has_bearer_token() {
            return Err(ComputeError::Configuration(format!(
                "a bearer token is required for {}; set {} or call with_bearer_token",
                DEFAULT_BASE_ADDRESS, ENV_BEARER_TOKEN
            )));
        }
        Ok(())
    }
}
