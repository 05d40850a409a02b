//! rcompute Client
//!
//! Async client for a remote geometry compute service.
//!
//! - [`ComputeConfig`] - base address, credentials, timeout
//! - [`ComputeClient`] - encodes arguments, performs one POST, decodes 1-3 results
//! - [`Transport`] / [`HttpTransport`] - the HTTP seam
//! - [`geometry`] - typed wrappers for a few endpoints

pub mod client;
pub mod config;
pub mod geometry;
pub mod transport;

pub use client::ComputeClient;
pub use config::{ComputeConfig, DEFAULT_BASE_ADDRESS};
pub use transport::{HttpTransport, PostRequest, Transport};
pub use tokio_util::sync::CancellationToken;
