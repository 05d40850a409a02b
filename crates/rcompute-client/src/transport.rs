//! HTTP transport.
//!
//! The transport sends exactly one POST per call and hands back the raw
//! response body. It does not retry, and it does not interpret the body.
//! Timeouts and cancellation are applied by the
//! [`ComputeClient`](crate::ComputeClient) around whichever transport is in
//! use.

use std::future::Future;

use bytes::Bytes;
use rcompute_common::error::{ComputeError, Result};
use rcompute_common::OperationAddress;

use crate::config::ComputeConfig;

/// A fully prepared request.
#[derive(Debug, Clone, PartialEq)]
pub struct PostRequest {
    pub url: String,
    pub headers: Vec<(&'static str, String)>,
    pub body: String,
}

impl PostRequest {
    /// Builds the request for `address` with the headers implied by `config`.
    ///
    /// Headers, in order:
    /// - `Content-Type: application/json`
    /// - `User-Agent: rcompute/<version>`
    /// - `Authorization: Bearer <token>`, if a token is configured
    /// - `RhinoComputeKey: <key>`, if an API key is configured
    pub fn new(config: &ComputeConfig, address: &OperationAddress, body: String, multiple: bool) -> Self {
        let mut headers = vec![
            ("Content-Type", "application/json".to_string()),
            ("User-Agent", config.user_agent()),
        ];
        headers.extend(config.credentials().headers());

        Self {
            url: address.url(config.base_address(), multiple),
            headers,
            body,
        }
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Sends a prepared request and returns the response body.
///
/// Implementations must map non-2xx responses to [`ComputeError::Status`].
pub trait Transport: Send + Sync + 'static {
    fn post(&self, request: PostRequest) -> impl Future<Output = Result<Bytes>> + Send;
}

/// [`Transport`] backed by a pooled `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| ComputeError::Transport(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { client })
    }

    /// Wraps an existing `reqwest` client, e.g. one with custom TLS roots.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl Transport for HttpTransport {
    async fn post(&self, request: PostRequest) -> Result<Bytes> {
        let PostRequest { url, headers, body } = request;

        let mut builder = self.client.post(&url).body(body);
        for (name, value) in &headers {
            builder = builder.header(*name, value.as_str());
        }

        let response = builder
            .send()
            .await
            .map_err(|e| ComputeError::Transport(format!("HTTP request to {} failed: {}", url, e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::debug!("POST {} returned {}", url, status);
            return Err(ComputeError::Status {
                status: status.as_u16(),
                body,
            });
        }

        response
            .bytes()
            .await
            .map_err(|e| ComputeError::Transport(format!("Failed to read response from {}: {}", url, e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_headers_anonymous() {
        let config = ComputeConfig::new("http://127.0.0.1:8081").with_client_version("1.2.3");
        let addr = OperationAddress::new("Rhino.Geometry.Curve", "Offset");
        let request = PostRequest::new(&config, &addr, "[]".into(), false);

        assert_eq!(request.url, "http://127.0.0.1:8081/rhino/geometry/curve/offset");
        assert_eq!(request.header("content-type"), Some("application/json"));
        assert_eq!(request.header("User-Agent"), Some("rcompute/1.2.3"));
        assert!(request.header("Authorization").is_none());
        assert!(request.header("RhinoComputeKey").is_none());
        assert_eq!(request.body, "[]");
    }

    #[test]
    fn test_request_headers_with_credentials() {
        let config = ComputeConfig::default()
            .with_bearer_token("tok")
            .with_api_key("key");
        let addr = OperationAddress::new("Rhino.Geometry.Brep", "Split");
        let request = PostRequest::new(&config, &addr, "[1]".into(), true);

        assert_eq!(
            request.url,
            "https://compute.rhino3d.com/rhino/geometry/brep/split?multiple=true"
        );
        assert_eq!(request.header("Authorization"), Some("Bearer tok"));
        assert_eq!(request.header("RhinoComputeKey"), Some("key"));
        assert_eq!(request.headers.len(), 4);
    }

    #[test]
    fn test_http_transport_builds() {
        assert!(HttpTransport::new().is_ok());
    }
}
