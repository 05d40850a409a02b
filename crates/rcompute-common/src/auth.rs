//! Authentication for the compute service.
//!
//! Two independent credentials are supported:
//!
//! - **Bearer token**: required by the hosted public service, sent as
//!   `Authorization: Bearer <token>`
//! - **API key**: used by self-hosted deployments, sent in the
//!   `RhinoComputeKey` header
//!
//! Both may be set at once; the server decides which one wins.
//!
//! # Example
//!
//! ```
//! use rcompute_common::auth::Credentials;
//!
//! let creds = Credentials::default()
//!     .with_bearer_token("token-123")
//!     .with_api_key("key-456");
//!
//! let headers = creds.headers();
//! assert_eq!(headers.len(), 2);
//! assert_eq!(format!("{}", creds), "Bearer(*****) + ApiKey(*****)");
//! ```

use std::fmt;

/// Header carrying the bearer token.
pub const AUTHORIZATION_HEADER: &str = "Authorization";

/// Header carrying the API key for self-hosted servers.
pub const API_KEY_HEADER: &str = "RhinoComputeKey";

/// Credentials attached to every request.
///
/// Empty strings are treated the same as unset values.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    bearer_token: Option<String>,
    api_key: Option<String>,
}

impl Credentials {
    /// Sets the bearer token. An empty or whitespace-only token clears it.
    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = non_empty(token.into());
        self
    }

    /// Sets the API key. An empty or whitespace-only key clears it.
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = non_empty(key.into());
        self
    }

    /// Returns the bearer token, if set.
    pub fn bearer_token(&self) -> Option<&str> {
        self.bearer_token.as_deref()
    }

    /// Returns the API key, if set.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    /// Returns `true` if a bearer token is set.
    pub fn has_bearer_token(&self) -> bool {
        self.bearer_token.is_some()
    }

    /// Header name/value pairs for the configured credentials.
    pub fn headers(&self) -> Vec<(&'static str, String)> {
        let mut headers = Vec::with_capacity(2);
        if let Some(token) = &self.bearer_token {
            headers.push((AUTHORIZATION_HEADER, format!("Bearer {}", token)));
        }
        if let Some(key) = &self.api_key {
            headers.push((API_KEY_HEADER, key.clone()));
        }
        headers
    }
}

fn non_empty(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

impl fmt::Display for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.bearer_token, &self.api_key) {
            (Some(_), Some(_)) => write!(f, "Bearer(*****) + ApiKey(*****)"),
            (Some(_), None) => write!(f, "Bearer(*****)"),
            (None, Some(_)) => write!(f, "ApiKey(*****)"),
            (None, None) => write!(f, "Anonymous"),
        }
    }
}

// Never print secrets, even in debug output.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Credentials({})", self)
    }
}
