//! Chain/Network session: the single writer for [`NetworkState`] and the
//! active [`Binding`].
//!
//! Transitions (`initialize`, `connect`, `disconnect`, `switch_chain`) hold
//! the write lock for the whole rebuild, so a `capture` queued behind a
//! switch observes the new chain. A [`ChainSnapshot`] taken before the switch
//! keeps its own `Arc<Binding>` and finishes against the old chain.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use alloy_primitives::Address;
use tokio::sync::{watch, RwLock};

use nsroute_core::config::RouterConfig;
use nsroute_core::error::{ConfigError, NsError};
use nsroute_core::network::NetworkState;
use nsroute_core::transport::RpcTransport;

use crate::binding::{Binding, BuildRequest};
use crate::connector::{ProviderConnector, PublicConnector};
use crate::contracts::{parse_address, BaseRegistrar};

struct Active {
    state: NetworkState,
    binding: Option<Arc<Binding>>,
}

/// A requested state transition, resolved against the state current when it runs.
enum Intent {
    Initialize,
    Connect(Arc<dyn RpcTransport>),
    Disconnect,
    Switch(u64),
}

impl Intent {
    fn name(&self) -> &'static str {
        match self {
            Self::Initialize => "initialize",
            Self::Connect(_) => "connect",
            Self::Disconnect => "disconnect",
            Self::Switch(_) => "switch_chain",
        }
    }
}

/// Network state and binding captured together at the start of an operation.
#[derive(Clone)]
pub struct ChainSnapshot {
    state: NetworkState,
    binding: Option<Arc<Binding>>,
}

impl ChainSnapshot {
    pub fn state(&self) -> &NetworkState {
        &self.state
    }

    pub fn chain_id(&self) -> u64 {
        self.state.chain_id
    }

    /// Root binding, or `NotReady` if the last rebuild did not succeed.
    pub fn root(&self) -> Result<&Arc<Binding>, NsError> {
        self.binding
            .as_ref()
            .ok_or_else(|| NsError::not_ready(format!("root binding for chain {}", self.state.chain_id)))
    }

    /// Registrar for `tld` on the captured binding.
    pub async fn registrar(&self, tld: &str) -> Result<Arc<BaseRegistrar>, NsError> {
        self.root()?.registrar(tld).await
    }
}

/// Owner of the process-wide network state.
pub struct NetworkSession {
    connector: Arc<dyn ProviderConnector>,
    registry_overrides: BTreeMap<u64, Address>,
    active: RwLock<Active>,
    state_tx: watch::Sender<NetworkState>,
    versions: AtomicU64,
}

impl NetworkSession {
    pub fn new(config: &RouterConfig, connector: Arc<dyn ProviderConnector>) -> Result<Self, ConfigError> {
        let registry_overrides = config
            .registry_overrides
            .iter()
            .map(|(chain_id, value)| {
                parse_address(value)
                    .map(|address| (*chain_id, address))
                    .map_err(|_| ConfigError::InvalidAddress {
                        chain_id: *chain_id,
                        value: value.clone(),
                    })
            })
            .collect::<Result<BTreeMap<_, _>, _>>()?;

        let initial = NetworkState::read_only(config.initial_chain_id);
        let (state_tx, _) = watch::channel(initial.clone());
        Ok(Self {
            connector,
            registry_overrides,
            active: RwLock::new(Active {
                state: initial,
                binding: None,
            }),
            state_tx,
            versions: AtomicU64::new(0),
        })
    }

    /// Session using Infura / public RPC for read-only bindings.
    pub fn from_config(config: &RouterConfig) -> Result<Self, ConfigError> {
        Self::new(config, Arc::new(PublicConnector::new(config.infura_id.clone())))
    }

    /// Build the first binding for the current chain.
    pub async fn initialize(&self) -> Result<(), NsError> {
        self.transition(Intent::Initialize).await
    }

    /// Adopt a wallet provider and the chain it reports.
    pub async fn connect(&self, provider: Arc<dyn RpcTransport>) -> Result<(), NsError> {
        self.transition(Intent::Connect(provider)).await
    }

    /// Drop the wallet and rebind read-only on the current chain.
    pub async fn disconnect(&self) -> Result<(), NsError> {
        self.transition(Intent::Disconnect).await
    }

    /// Rebind on `chain_id`, keeping the current provider and read-only flag.
    ///
    /// With a wallet connected, the wallet must already be on `chain_id`.
    pub async fn switch_chain(&self, chain_id: u64) -> Result<(), NsError> {
        self.transition(Intent::Switch(chain_id)).await
    }

    /// Current state and binding. Waits for any rebuild in progress.
    pub async fn capture(&self) -> ChainSnapshot {
        let active = self.active.read().await;
        ChainSnapshot {
            state: active.state.clone(),
            binding: active.binding.clone(),
        }
    }

    pub async fn root_binding(&self) -> Result<Arc<Binding>, NsError> {
        self.capture().await.root().cloned()
    }

    pub async fn registrar_binding(&self, tld: &str) -> Result<Arc<BaseRegistrar>, NsError> {
        self.capture().await.registrar(tld).await
    }

    /// Latest published state, including the not-ready state of a rebuild in progress.
    pub fn state(&self) -> NetworkState {
        self.state_tx.borrow().clone()
    }

    /// Observe every published state.
    pub fn subscribe(&self) -> watch::Receiver<NetworkState> {
        self.state_tx.subscribe()
    }

    async fn transition(&self, intent: Intent) -> Result<(), NsError> {
        let mut active = self.active.write().await;
        let kind = intent.name();
        // Resolved under the lock so a queued transition sees the result of the one before it.
        let current = &active.state;
        let (chain_id, provider, adopt_chain) = match intent {
            Intent::Initialize => (current.chain_id, current.provider.clone(), false),
            Intent::Connect(provider) => (current.chain_id, Some(provider), true),
            Intent::Disconnect => (current.chain_id, None, false),
            Intent::Switch(chain_id) => (chain_id, current.provider.clone(), false),
        };
        let version = self.versions.fetch_add(1, Ordering::SeqCst) + 1;

        let mut next = NetworkState {
            chain_id,
            is_read_only: provider.is_none(),
            is_ready: false,
            provider: provider.clone(),
            last_error: None,
        };
        active.binding = None;
        active.state = next.clone();
        self.state_tx.send_replace(next.clone());

        tracing::debug!(transition = kind, chain_id, version, "rebuilding bindings");
        let outcome = match self.build(provider, chain_id, adopt_chain, version).await {
            Ok(binding) => {
                next.chain_id = binding.chain_id();
                next.is_ready = true;
                active.binding = Some(Arc::new(binding));
                tracing::info!(
                    transition = kind,
                    chain_id = next.chain_id,
                    read_only = next.is_read_only,
                    version,
                    "network ready"
                );
                Ok(())
            }
            Err(e) => {
                next.last_error = Some(e.to_string());
                tracing::warn!(transition = kind, chain_id, version, error = %e, "binding rebuild failed");
                Err(e)
            }
        };
        active.state = next.clone();
        self.state_tx.send_replace(next);
        outcome
    }

    async fn build(
        &self,
        provider: Option<Arc<dyn RpcTransport>>,
        chain_id: u64,
        adopt_chain: bool,
        version: u64,
    ) -> Result<Binding, NsError> {
        let read_only = provider.is_none();
        let transport = match provider {
            Some(provider) => provider,
            None => self.connector.read_only_transport(chain_id)?,
        };
        Binding::build(BuildRequest {
            transport,
            expected_chain: (!adopt_chain).then_some(chain_id),
            read_only,
            registry_overrides: &self.registry_overrides,
            version,
        })
        .await
    }
}
