//! The two transport seams: JSON-RPC to a chain node, GraphQL to a subgraph.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::TransportError;
use crate::request::{JsonRpcRequest, JsonRpcResponse, OperationRequest, ResolvedResponse};

/// A JSON-RPC connection to a chain: a wallet provider or a public node.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` for use across Tokio tasks.
///
/// # Object Safety
/// The trait is object-safe and is stored as `Arc<dyn RpcTransport>`.
#[async_trait]
pub trait RpcTransport: Send + Sync + 'static {
    /// Send a single JSON-RPC request and return the response.
    async fn send(&self, req: JsonRpcRequest) -> Result<JsonRpcResponse, TransportError>;

    /// Return the transport's identifier (URL or wallet name).
    fn url(&self) -> &str;
}

/// Convenience: call a method and deserialize the result.
pub async fn call<T: DeserializeOwned>(
    transport: &(impl RpcTransport + ?Sized),
    id: u64,
    method: &str,
    params: Vec<Value>,
) -> Result<T, TransportError> {
    let req = JsonRpcRequest::new(id, method, params);
    let resp = transport.send(req).await?;
    let result = resp.into_result().map_err(TransportError::Rpc)?;
    serde_json::from_value(result).map_err(TransportError::Deserialization)
}

/// A request/response client for a remote subgraph.
///
/// The endpoint URL is chosen per call so one client serves every chain.
#[async_trait]
pub trait SubgraphTransport: Send + Sync + 'static {
    /// Post `op` to `url` and return the `{ data, errors }` body as received.
    async fn execute(
        &self,
        url: &str,
        op: &OperationRequest,
    ) -> Result<ResolvedResponse, TransportError>;
}
