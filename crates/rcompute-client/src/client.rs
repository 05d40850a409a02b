use std::any::Any;
use std::sync::Arc;

use bytes::Bytes;
use rcompute_common::argument::{encode_arguments, encode_batch, Argument};
use rcompute_common::converter::ConverterRegistry;
use rcompute_common::decode;
use rcompute_common::error::{ComputeError, Result};
use rcompute_common::OperationAddress;
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;

use crate::config::ComputeConfig;
use crate::transport::{HttpTransport, PostRequest, Transport};

/// Dispatcher for remote compute calls.
///
/// Every call encodes its arguments, performs exactly one POST, and decodes
/// the declared number of results. Nothing is cached or retried.
///
/// Clients are cheap to clone. Clones share the configuration snapshot, the
/// transport (and so its connection pool) and the converter registry.
///
/// # Example
///
/// ```no_run
/// use rcompute_client::{ComputeClient, ComputeConfig};
/// use rcompute_common::{Argument, OperationAddress, Remote};
/// use serde_json::Value;
///
/// # async fn run() -> rcompute_common::Result<()> {
/// let client = ComputeClient::new(ComputeConfig::new("http://127.0.0.1:8081"))?;
///
/// let brep: Remote<Value> = Remote::url("https://files.example.com/part.json");
/// let addr = OperationAddress::with_overload("Rhino.Geometry.Mesh", "CreateFromBrep", &["Brep"]);
/// let meshes: Vec<Value> = client.call(&addr, &[Argument::remote(&brep)]).await?;
/// # Ok(())
/// # }
/// ```
pub struct ComputeClient<T = HttpTransport> {
    config: Arc<ComputeConfig>,
    transport: Arc<T>,
    converters: Arc<ConverterRegistry>,
    cancel: CancellationToken,
}

impl ComputeClient<HttpTransport> {
    /// Creates a client that talks HTTP to `config.base_address()`.
    pub fn new(config: ComputeConfig) -> Result<Self> {
        Ok(Self::with_transport(config, HttpTransport::new()?))
    }

    /// Creates a client configured from `RHINO_COMPUTE_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::new(ComputeConfig::from_env()?)
    }
}

impl<T: Transport> ComputeClient<T> {
    pub fn with_transport(config: ComputeConfig, transport: T) -> Self {
        Self {
            config: Arc::new(config),
            transport: Arc::new(transport),
            converters: Arc::new(ConverterRegistry::with_defaults()),
            cancel: CancellationToken::new(),
        }
    }

    /// Replaces the converter registry used for arguments and results.
    pub fn with_converters(mut self, converters: ConverterRegistry) -> Self {
        self.converters = Arc::new(converters);
        self
    }

    /// Returns a client whose calls abort with [`ComputeError::Cancelled`]
    /// once `token` is cancelled.
    pub fn with_cancellation(&self, token: CancellationToken) -> Self {
        Self {
            cancel: token,
            ..self.clone()
        }
    }

    pub fn config(&self) -> &ComputeConfig {
        &self.config
    }

    pub fn converters(&self) -> &ConverterRegistry {
        &self.converters
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Calls an operation that returns a single result.
    pub async fn call<R>(&self, address: impl Into<OperationAddress>, args: &[Argument<'_>]) -> Result<R>
    where
        R: DeserializeOwned + Any,
    {
        let address = address.into();
        self.config.validate()?;
        let body = encode_arguments(args, &self.converters)?;
        let response = self.dispatch(&address, body, false).await?;
        decode::decode_single(&response, &self.converters)
    }

    /// Calls an operation that returns a value plus one out value.
    pub async fn call2<R0, R1>(
        &self,
        address: impl Into<OperationAddress>,
        args: &[Argument<'_>],
    ) -> Result<(R0, R1)>
    where
        R0: DeserializeOwned + Any,
        R1: DeserializeOwned + Any,
    {
        let address = address.into();
        self.config.validate()?;
        let body = encode_arguments(args, &self.converters)?;
        let response = self.dispatch(&address, body, false).await?;
        decode::decode_pair(&response, &self.converters)
    }

    /// Calls an operation that returns a value plus two out values.
    pub async fn call3<R0, R1, R2>(
        &self,
        address: impl Into<OperationAddress>,
        args: &[Argument<'_>],
    ) -> Result<(R0, R1, R2)>
    where
        R0: DeserializeOwned + Any,
        R1: DeserializeOwned + Any,
        R2: DeserializeOwned + Any,
    {
        let address = address.into();
        self.config.validate()?;
        let body = encode_arguments(args, &self.converters)?;
        let response = self.dispatch(&address, body, false).await?;
        decode::decode_triple(&response, &self.converters)
    }

    /// Runs one operation over several argument lists in a single request.
    ///
    /// The server evaluates each list independently and answers with one
    /// result per list, in order. An empty `batches` slice returns an empty
    /// vector without contacting the server.
    pub async fn call_multiple<R>(
        &self,
        address: impl Into<OperationAddress>,
        batches: &[Vec<Argument<'_>>],
    ) -> Result<Vec<R>>
    where
        R: DeserializeOwned + Any,
    {
        let address = address.into();
        self.config.validate()?;
        if batches.is_empty() {
            return Ok(Vec::new());
        }
        let body = encode_batch(batches, &self.converters)?;
        let response = self.dispatch(&address, body, true).await?;
        decode::decode_batch(&response, batches.len(), &self.converters)
    }

    async fn dispatch(&self, address: &OperationAddress, body: String, multiple: bool) -> Result<Bytes> {
        if self.cancel.is_cancelled() {
            return Err(ComputeError::Cancelled);
        }

        tracing::debug!("POST {} ({} bytes, multiple={})", address, body.len(), multiple);
        tracing::trace!("Request body: {}", body);

        let request = PostRequest::new(&self.config, address, body, multiple);
        let send = self.transport.post(request);

        let response = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => return Err(ComputeError::Cancelled),
            response = with_timeout(self.config.timeout(), send) => response?,
        };

        tracing::debug!("{} answered with {} bytes", address, response.len());
        Ok(response)
    }
}

async fn with_timeout<F>(timeout: Option<std::time::Duration>, fut: F) -> Result<Bytes>
where
    F: std::future::Future<Output = Result<Bytes>>,
{
    match timeout {
        Some(limit) => tokio::time::timeout(limit, fut)
            .await
            .map_err(|_| ComputeError::Timeout(limit.as_millis() as u64))?,
        None => fut.await,
    }
}

impl<T> Clone for ComputeClient<T> {
    fn clone(&self) -> Self {
        Self {
            config: Arc::clone(&self.config),
            transport: Arc::clone(&self.transport),
            converters: Arc::clone(&self.converters),
            cancel: self.cancel.clone(),
        }
    }
}
