//! Contract handles: the name registry, public resolvers, base registrars
//! and ERC-20 tokens. Reads go through `eth_call`; writes through
//! `eth_sendTransaction` on the wallet provider.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use alloy_dyn_abi::{DynSolType, DynSolValue};
use alloy_primitives::Address;
use serde_json::{json, Value};

use nsroute_core::error::NsError;
use nsroute_core::namehash::{labelhash, Node};
use nsroute_core::transport::{self, RpcTransport};

use crate::abi;

static REQUEST_ID: AtomicU64 = AtomicU64::new(1);

fn next_id() -> u64 {
    REQUEST_ID.fetch_add(1, Ordering::Relaxed)
}

/// Parse a `0x…` address string.
pub fn parse_address(s: &str) -> Result<Address, NsError> {
    s.parse::<Address>()
        .map_err(|e| NsError::InvalidVariables(format!("invalid address '{s}': {e}")))
}

fn decode_hex(s: &str) -> Result<Vec<u8>, NsError> {
    hex::decode(s.strip_prefix("0x").unwrap_or(s))
        .map_err(|e| NsError::Contract(format!("invalid hex from node: {e}")))
}

/// An address plus the transport used to reach it.
#[derive(Clone)]
pub struct ContractHandle {
    address: Address,
    transport: Arc<dyn RpcTransport>,
}

impl ContractHandle {
    pub fn new(address: Address, transport: Arc<dyn RpcTransport>) -> Self {
        Self { address, transport }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    /// `eth_call` against the latest block, decoding `returns`.
    pub async fn read(
        &self,
        signature: &str,
        args: Vec<DynSolValue>,
        returns: Vec<DynSolType>,
    ) -> Result<Vec<DynSolValue>, NsError> {
        let data = abi::encode_call(signature, args);
        let call = json!({
            "to": self.address.to_string(),
            "data": format!("0x{}", hex::encode(&data)),
        });
        let raw: String =
            transport::call(self.transport.as_ref(), next_id(), "eth_call", vec![call, json!("latest")])
                .await?;
        abi::decode_returns(returns, &decode_hex(&raw)?)
    }

    /// `eth_sendTransaction` from `from`; returns the transaction hash.
    pub async fn send(
        &self,
        from: Address,
        signature: &str,
        args: Vec<DynSolValue>,
    ) -> Result<String, NsError> {
        let data = abi::encode_call(signature, args);
        let tx = json!({
            "from": from.to_string(),
            "to": self.address.to_string(),
            "data": format!("0x{}", hex::encode(&data)),
        });
        let hash: String =
            transport::call(self.transport.as_ref(), next_id(), "eth_sendTransaction", vec![tx]).await?;
        tracing::info!(to = %self.address, signature, tx = %hash, "transaction submitted");
        Ok(hash)
    }
}

/// Chain id reported by `transport`.
pub async fn chain_id(transport: &dyn RpcTransport) -> Result<u64, NsError> {
    let raw: String = transport::call(transport, next_id(), "eth_chainId", vec![]).await?;
    u64::from_str_radix(raw.trim_start_matches("0x"), 16)
        .map_err(|e| NsError::Contract(format!("invalid chain id '{raw}': {e}")))
}

/// Returns `true` if `address` holds contract code.
pub async fn has_code(transport: &dyn RpcTransport, address: Address) -> Result<bool, NsError> {
    let raw: String = transport::call(
        transport,
        next_id(),
        "eth_getCode",
        vec![json!(address.to_string()), json!("latest")],
    )
    .await?;
    Ok(!decode_hex(&raw)?.is_empty())
}

/// First account exposed by a wallet provider.
pub async fn first_account(transport: &dyn RpcTransport) -> Result<Address, NsError> {
    let accounts: Vec<String> = transport::call(transport, next_id(), "eth_accounts", vec![]).await?;
    let first = accounts.first().ok_or(NsError::ReadOnly)?;
    parse_address(first)
}

/// The name registry (root contract).
#[derive(Clone)]
pub struct Registry {
    handle: ContractHandle,
}

impl Registry {
    pub fn new(address: Address, transport: Arc<dyn RpcTransport>) -> Self {
        Self {
            handle: ContractHandle::new(address, transport),
        }
    }

    pub fn address(&self) -> Address {
        self.handle.address()
    }

    pub async fn owner(&self, node: Node) -> Result<Address, NsError> {
        let vals = self
            .handle
            .read("owner(bytes32)", vec![abi::node(node)], vec![DynSolType::Address])
            .await?;
        abi::as_address(abi::first(vals)?)
    }

    pub async fn resolver(&self, node: Node) -> Result<Address, NsError> {
        let vals = self
            .handle
            .read("resolver(bytes32)", vec![abi::node(node)], vec![DynSolType::Address])
            .await?;
        abi::as_address(abi::first(vals)?)
    }

    /// Resolver contract for `node`, or `None` if no resolver is set.
    pub async fn resolver_contract(&self, node: Node) -> Result<Option<PublicResolver>, NsError> {
        let address = self.resolver(node).await?;
        if address.is_zero() {
            return Ok(None);
        }
        Ok(Some(PublicResolver {
            handle: ContractHandle::new(address, self.handle.transport.clone()),
        }))
    }

    pub async fn set_owner(&self, from: Address, node: Node, owner: Address) -> Result<String, NsError> {
        self.handle
            .send(from, "setOwner(bytes32,address)", vec![abi::node(node), abi::address(owner)])
            .await
    }

    pub async fn set_resolver(
        &self,
        from: Address,
        node: Node,
        resolver: Address,
    ) -> Result<String, NsError> {
        self.handle
            .send(from, "setResolver(bytes32,address)", vec![abi::node(node), abi::address(resolver)])
            .await
    }
}

/// A resolver contract holding address and reverse records.
#[derive(Clone)]
pub struct PublicResolver {
    handle: ContractHandle,
}

impl PublicResolver {
    pub fn address(&self) -> Address {
        self.handle.address()
    }

    pub async fn addr(&self, node: Node) -> Result<Address, NsError> {
        let vals = self
            .handle
            .read("addr(bytes32)", vec![abi::node(node)], vec![DynSolType::Address])
            .await?;
        abi::as_address(abi::first(vals)?)
    }

    pub async fn name(&self, node: Node) -> Result<String, NsError> {
        let vals = self
            .handle
            .read("name(bytes32)", vec![abi::node(node)], vec![DynSolType::String])
            .await?;
        abi::as_string(abi::first(vals)?)
    }

    pub async fn set_addr(&self, from: Address, node: Node, addr: Address) -> Result<String, NsError> {
        self.handle
            .send(from, "setAddr(bytes32,address)", vec![abi::node(node), abi::address(addr)])
            .await
    }
}

/// Base registrar for one top-level domain. Token ids are label hashes.
#[derive(Clone)]
pub struct BaseRegistrar {
    tld: String,
    handle: ContractHandle,
}

impl BaseRegistrar {
    pub fn new(tld: impl Into<String>, address: Address, transport: Arc<dyn RpcTransport>) -> Self {
        Self {
            tld: tld.into(),
            handle: ContractHandle::new(address, transport),
        }
    }

    /// The TLD this registrar is scoped to.
    pub fn tld(&self) -> &str {
        &self.tld
    }

    pub fn address(&self) -> Address {
        self.handle.address()
    }

    pub async fn available(&self, label: &str) -> Result<bool, NsError> {
        let vals = self
            .handle
            .read("available(uint256)", vec![abi::uint(labelhash(label))], vec![DynSolType::Bool])
            .await?;
        abi::as_bool(abi::first(vals)?)
    }

    /// Expiry as a unix timestamp; `0` for never-registered names.
    pub async fn name_expires(&self, label: &str) -> Result<u64, NsError> {
        let vals = self
            .handle
            .read("nameExpires(uint256)", vec![abi::uint(labelhash(label))], vec![DynSolType::Uint(256)])
            .await?;
        let expires = abi::as_uint(abi::first(vals)?)?;
        u64::try_from(expires).map_err(|e| NsError::Contract(format!("expiry out of range: {e}")))
    }
}

/// ERC-20 token metadata reader.
#[derive(Clone)]
pub struct Erc20 {
    handle: ContractHandle,
}

impl Erc20 {
    pub fn new(address: Address, transport: Arc<dyn RpcTransport>) -> Self {
        Self {
            handle: ContractHandle::new(address, transport),
        }
    }

    pub async fn name(&self) -> Result<String, NsError> {
        let vals = self.handle.read("name()", vec![], vec![DynSolType::String]).await?;
        abi::as_string(abi::first(vals)?)
    }

    pub async fn symbol(&self) -> Result<String, NsError> {
        let vals = self.handle.read("symbol()", vec![], vec![DynSolType::String]).await?;
        abi::as_string(abi::first(vals)?)
    }
}

pub(crate) fn address_value(address: Address) -> Value {
    if address.is_zero() {
        Value::Null
    } else {
        Value::String(address.to_string())
    }
}
