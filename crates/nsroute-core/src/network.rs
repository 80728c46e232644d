//! Snapshot of the active network: chain, wallet provider and readiness.

use std::sync::Arc;

use crate::transport::RpcTransport;

/// Point-in-time view of the session.
///
/// Readers receive clones; only the session's transition operations
/// (connect / disconnect / switch chain) produce new values.
#[derive(Clone)]
pub struct NetworkState {
    /// Active chain id.
    pub chain_id: u64,
    /// `true` while no wallet is connected; bindings use a public node.
    pub is_read_only: bool,
    /// `true` once the bindings for `chain_id` were rebuilt successfully.
    pub is_ready: bool,
    /// Wallet provider, absent in read-only mode.
    pub provider: Option<Arc<dyn RpcTransport>>,
    /// Message of the last failed rebuild, cleared on success.
    pub last_error: Option<String>,
}

impl NetworkState {
    /// Initial state: read-only, not ready, no provider.
    pub fn read_only(chain_id: u64) -> Self {
        Self {
            chain_id,
            is_read_only: true,
            is_ready: false,
            provider: None,
            last_error: None,
        }
    }

    /// URL or name of the wallet provider, if connected.
    pub fn provider_url(&self) -> Option<&str> {
        self.provider.as_deref().map(RpcTransport::url)
    }
}

impl std::fmt::Debug for NetworkState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NetworkState")
            .field("chain_id", &self.chain_id)
            .field("is_read_only", &self.is_read_only)
            .field("is_ready", &self.is_ready)
            .field("provider", &self.provider_url())
            .field("last_error", &self.last_error)
            .finish()
    }
}
