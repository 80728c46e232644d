//! Read-only provider selection.
//!
//! With no wallet connected, bindings talk to a node picked here: Infura
//! when an access key is configured and Infura serves the chain, otherwise
//! the chain's public RPC.

use std::sync::Arc;

use nsroute_core::error::NsError;
use nsroute_core::transport::RpcTransport;
use nsroute_networks::{infura, public};

/// Opens read-only transports for a chain.
pub trait ProviderConnector: Send + Sync {
    fn read_only_transport(&self, chain_id: u64) -> Result<Arc<dyn RpcTransport>, NsError>;
}

/// Connector backed by Infura and the public RPC catalogue.
#[derive(Debug, Clone, Default)]
pub struct PublicConnector {
    infura_id: Option<String>,
}

impl PublicConnector {
    pub fn new(infura_id: Option<String>) -> Self {
        Self { infura_id }
    }
}

impl ProviderConnector for PublicConnector {
    fn read_only_transport(&self, chain_id: u64) -> Result<Arc<dyn RpcTransport>, NsError> {
        if let Some(client) = self
            .infura_id
            .as_deref()
            .and_then(|key| infura::http_client(key, chain_id))
        {
            tracing::debug!(chain_id, "read-only binding via infura");
            return Ok(Arc::new(client));
        }
        match public::http_client(chain_id) {
            Some(client) => {
                tracing::debug!(chain_id, url = client.url(), "read-only binding via public rpc");
                Ok(Arc::new(client))
            }
            None => Err(NsError::NoPublicRpc { chain_id }),
        }
    }
}
