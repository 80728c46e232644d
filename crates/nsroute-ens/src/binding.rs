//! ENS Binding Manager.
//!
//! A [`Binding`] is the set of contract handles for one chain, built once per
//! connect / disconnect / switch. Each rebuild produces a fresh `Arc<Binding>`
//! with a new version; callers holding an older `Arc` keep talking to the
//! chain they started on.
//!
//! The registrar is bound lazily inside the binding through [`BindState`]:
//!
//! ```text
//! Unbound ──ensure_bound_to(t)──▶ BoundTo(t)
//! BoundTo(a) ──ensure_bound_to(a)──▶ BoundTo(a)   (no rebuild)
//! BoundTo(a) ──ensure_bound_to(b)──▶ BoundTo(b)   (rebuild)
//! ```

use std::collections::{BTreeMap, HashMap};
use std::future::Future;
use std::sync::Arc;

use alloy_primitives::Address;
use tokio::sync::Mutex;

use nsroute_core::error::NsError;
use nsroute_core::namehash::namehash;
use nsroute_core::transport::RpcTransport;

use crate::contracts::{self, BaseRegistrar, Erc20, Registry};

/// Lazily bound, scope-keyed value.
#[derive(Debug, Clone, Default)]
pub enum BindState<T> {
    #[default]
    Unbound,
    BoundTo { scope: String, value: T },
}

impl<T: Clone> BindState<T> {
    /// The currently bound scope.
    pub fn scope(&self) -> Option<&str> {
        match self {
            Self::Unbound => None,
            Self::BoundTo { scope, .. } => Some(scope),
        }
    }

    /// Return the value bound to `scope`, building it only on mismatch.
    ///
    /// A failed build leaves the previous state untouched.
    pub async fn ensure_bound_to<F, Fut>(&mut self, scope: &str, build: F) -> Result<T, NsError>
    where
        F: FnOnce(String) -> Fut,
        Fut: Future<Output = Result<T, NsError>>,
    {
        if let Self::BoundTo { scope: bound, value } = self {
            if bound == scope {
                return Ok(value.clone());
            }
        }
        let value = build(scope.to_string()).await?;
        *self = Self::BoundTo {
            scope: scope.to_string(),
            value: value.clone(),
        };
        Ok(value)
    }
}

/// Inputs for one binding rebuild.
pub(crate) struct BuildRequest<'a> {
    pub transport: Arc<dyn RpcTransport>,
    /// Chain the transport must be on; `None` adopts whatever it reports.
    pub expected_chain: Option<u64>,
    pub read_only: bool,
    pub registry_overrides: &'a BTreeMap<u64, Address>,
    pub version: u64,
}

/// Contract handles scoped to one chain.
pub struct Binding {
    chain_id: u64,
    version: u64,
    read_only: bool,
    transport: Arc<dyn RpcTransport>,
    registry: Registry,
    registrar: Mutex<BindState<Arc<BaseRegistrar>>>,
    tokens: Mutex<HashMap<Address, Arc<Erc20>>>,
}

impl Binding {
    /// Probe the transport and construct the root binding.
    ///
    /// Nothing is returned unless every check succeeded.
    pub(crate) async fn build(req: BuildRequest<'_>) -> Result<Self, NsError> {
        let chain_id = contracts::chain_id(req.transport.as_ref()).await?;
        if let Some(expected) = req.expected_chain {
            if expected != chain_id {
                return Err(NsError::ChainMismatch {
                    expected,
                    actual: chain_id,
                });
            }
        }

        let registry_address = match req.registry_overrides.get(&chain_id) {
            Some(address) => *address,
            None => nsroute_networks::registry_address(chain_id)
                .ok_or(NsError::MissingRegistry { chain_id })
                .and_then(contracts::parse_address)?,
        };

        if !contracts::has_code(req.transport.as_ref(), registry_address).await? {
            return Err(NsError::ContractNotDeployed {
                address: registry_address.to_string(),
            });
        }

        tracing::info!(
            chain_id,
            version = req.version,
            read_only = req.read_only,
            registry = %registry_address,
            via = req.transport.url(),
            "root binding ready"
        );

        Ok(Self {
            chain_id,
            version: req.version,
            read_only: req.read_only,
            registry: Registry::new(registry_address, req.transport.clone()),
            transport: req.transport,
            registrar: Mutex::new(BindState::Unbound),
            tokens: Mutex::new(HashMap::new()),
        })
    }

    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    /// Monotonic rebuild counter; distinct for every binding a session creates.
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// The root (registry) contract.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Address recorded by the root binding.
    pub fn registry_address(&self) -> Address {
        self.registry.address()
    }

    pub fn transport(&self) -> &Arc<dyn RpcTransport> {
        &self.transport
    }

    /// TLD the registrar is currently bound to.
    pub async fn registrar_scope(&self) -> Option<String> {
        self.registrar.lock().await.scope().map(str::to_string)
    }

    /// Base registrar for `tld`, rebinding only when the scope changes.
    ///
    /// The registrar is the registry owner of `namehash(tld)`.
    pub async fn registrar(&self, tld: &str) -> Result<Arc<BaseRegistrar>, NsError> {
        let mut state = self.registrar.lock().await;
        state
            .ensure_bound_to(tld, |tld| async move {
                let owner = self.registry.owner(namehash(&tld)).await?;
                if owner.is_zero() {
                    return Err(NsError::UnknownTld { tld });
                }
                tracing::debug!(
                    chain_id = self.chain_id,
                    tld = %tld,
                    registrar = %owner,
                    "registrar bound"
                );
                Ok(Arc::new(BaseRegistrar::new(tld, owner, self.transport.clone())))
            })
            .await
    }

    /// ERC-20 handle for `address`, cached for the lifetime of this binding.
    pub async fn token(&self, address: Address) -> Arc<Erc20> {
        let mut tokens = self.tokens.lock().await;
        tokens
            .entry(address)
            .or_insert_with(|| Arc::new(Erc20::new(address, self.transport.clone())))
            .clone()
    }

    /// Sender for transactions; fails in read-only mode.
    pub async fn sender(&self) -> Result<Address, NsError> {
        if self.read_only {
            return Err(NsError::ReadOnly);
        }
        contracts::first_account(self.transport.as_ref()).await
    }
}
