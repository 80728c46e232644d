//! Scripted in-memory chain, connector and subgraph used by the unit tests.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Arc, Mutex};

use alloy_dyn_abi::DynSolValue;
use alloy_primitives::{address, Address, U256};
use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::sync::Semaphore;

use nsroute_core::error::{NsError, TransportError};
use nsroute_core::namehash::{labelhash, namehash, reverse_node};
use nsroute_core::request::{
    JsonRpcError, JsonRpcRequest, JsonRpcResponse, OperationRequest, ResolvedResponse,
};
use nsroute_core::transport::{RpcTransport, SubgraphTransport};

use crate::abi;
use crate::connector::ProviderConnector;

pub(crate) const REGISTRY: Address = address!("eeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeee");
pub(crate) const TX_HASH: &str = "0xabababababababababababababababababababababababababababababababab";

pub(crate) struct MockChain {
    url: String,
    chain_id: u64,
    code: Mutex<HashSet<Address>>,
    calls: Mutex<HashMap<(Address, Vec<u8>), Vec<u8>>>,
    call_log: Mutex<Vec<Address>>,
    accounts: Mutex<Vec<String>>,
    sent: Mutex<Vec<Value>>,
    hold: Mutex<Option<Arc<Semaphore>>>,
    chain_id_gate: Mutex<Option<Arc<Semaphore>>>,
    chain_id_requests: Mutex<usize>,
}

impl MockChain {
    pub(crate) fn new(chain_id: u64) -> Arc<Self> {
        Self::at(chain_id, format!("mock://chain/{chain_id}"))
    }

    /// Wallet provider on `chain_id` with registry code, told apart by `name`.
    pub(crate) fn wallet(chain_id: u64, name: &str) -> Arc<Self> {
        let chain = Self::at(chain_id, format!("mock://wallet/{name}"));
        chain.code.lock().unwrap().insert(REGISTRY);
        chain
    }

    fn at(chain_id: u64, url: String) -> Arc<Self> {
        Arc::new(Self {
            url,
            chain_id,
            code: Mutex::new(HashSet::new()),
            calls: Mutex::new(HashMap::new()),
            call_log: Mutex::new(Vec::new()),
            accounts: Mutex::new(Vec::new()),
            sent: Mutex::new(Vec::new()),
            hold: Mutex::new(None),
            chain_id_gate: Mutex::new(None),
            chain_id_requests: Mutex::new(0),
        })
    }

    /// Chain with registry code deployed at [`REGISTRY`].
    pub(crate) fn ens(chain_id: u64) -> Arc<Self> {
        let chain = Self::new(chain_id);
        chain.code.lock().unwrap().insert(REGISTRY);
        chain
    }

    pub(crate) fn overrides(chain_id: u64) -> BTreeMap<u64, Address> {
        BTreeMap::from([(chain_id, REGISTRY)])
    }

    pub(crate) fn registrar_address(n: u8) -> Address {
        Address::repeat_byte(n)
    }

    pub(crate) fn with_accounts(&self, accounts: &[&str]) {
        *self.accounts.lock().unwrap() = accounts.iter().map(|a| a.to_string()).collect();
    }

    /// Block every `eth_call` until a permit is added to the returned semaphore.
    pub(crate) fn hold(&self) -> Arc<Semaphore> {
        let sem = Arc::new(Semaphore::new(0));
        *self.hold.lock().unwrap() = Some(sem.clone());
        sem
    }

    /// Block `eth_chainId` until a permit is added to the returned semaphore.
    pub(crate) fn hold_chain_id(&self) -> Arc<Semaphore> {
        let sem = Arc::new(Semaphore::new(0));
        *self.chain_id_gate.lock().unwrap() = Some(sem.clone());
        sem
    }

    pub(crate) fn chain_id_requests(&self) -> usize {
        *self.chain_id_requests.lock().unwrap()
    }

    async fn eth_chain_id(&self) -> Result<Value, JsonRpcError> {
        *self.chain_id_requests.lock().unwrap() += 1;
        let gate = self.chain_id_gate.lock().unwrap().clone();
        if let Some(sem) = gate {
            let _permit = sem.acquire().await.map_err(|_| rpc_error(-32000, "closed"))?;
        }
        Ok(json!(format!("0x{:x}", self.chain_id)))
    }

    pub(crate) fn stub_call(&self, to: Address, data: Vec<u8>, ret: Vec<DynSolValue>) {
        self.calls
            .lock()
            .unwrap()
            .insert((to, data), DynSolValue::Tuple(ret).abi_encode_params());
    }

    pub(crate) fn stub_owner(&self, registry: Address, name: &str, owner: Address) {
        let data = abi::encode_call("owner(bytes32)", vec![abi::node(namehash(name))]);
        self.stub_call(registry, data, vec![DynSolValue::Address(owner)]);
    }

    pub(crate) fn stub_resolver(&self, registry: Address, name: &str, resolver: Address) {
        let data = abi::encode_call("resolver(bytes32)", vec![abi::node(namehash(name))]);
        self.stub_call(registry, data, vec![DynSolValue::Address(resolver)]);
    }

    pub(crate) fn stub_addr(&self, resolver: Address, name: &str, addr: Address) {
        let data = abi::encode_call("addr(bytes32)", vec![abi::node(namehash(name))]);
        self.stub_call(resolver, data, vec![DynSolValue::Address(addr)]);
    }

    pub(crate) fn stub_reverse(&self, registry: Address, resolver: Address, address: &str, name: &str) {
        let node = reverse_node(address);
        let data = abi::encode_call("resolver(bytes32)", vec![abi::node(node)]);
        self.stub_call(registry, data, vec![DynSolValue::Address(resolver)]);
        let data = abi::encode_call("name(bytes32)", vec![abi::node(node)]);
        self.stub_call(resolver, data, vec![DynSolValue::String(name.into())]);
    }

    pub(crate) fn stub_available(&self, registrar: Address, label: &str, available: bool) {
        let data = abi::encode_call("available(uint256)", vec![abi::uint(labelhash(label))]);
        self.stub_call(registrar, data, vec![DynSolValue::Bool(available)]);
    }

    pub(crate) fn stub_expiry(&self, registrar: Address, label: &str, expires: u64) {
        let data = abi::encode_call("nameExpires(uint256)", vec![abi::uint(labelhash(label))]);
        self.stub_call(registrar, data, vec![DynSolValue::Uint(U256::from(expires), 256)]);
    }

    pub(crate) fn stub_token(&self, token: Address, name: &str, symbol: &str) {
        self.code.lock().unwrap().insert(token);
        self.stub_call(token, abi::encode_call("name()", vec![]), vec![DynSolValue::String(name.into())]);
        self.stub_call(token, abi::encode_call("symbol()", vec![]), vec![DynSolValue::String(symbol.into())]);
    }

    pub(crate) fn eth_call_count(&self) -> usize {
        self.call_log.lock().unwrap().len()
    }

    pub(crate) fn eth_calls_to(&self, to: Address) -> usize {
        self.call_log.lock().unwrap().iter().filter(|a| **a == to).count()
    }

    pub(crate) fn sent(&self) -> Vec<Value> {
        self.sent.lock().unwrap().clone()
    }

    async fn eth_call(&self, params: &[Value]) -> Result<Value, JsonRpcError> {
        let call = params.first().ok_or_else(|| rpc_error(-32602, "missing call"))?;
        let to: Address = call["to"]
            .as_str()
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| rpc_error(-32602, "bad to"))?;
        let data = call["data"]
            .as_str()
            .and_then(|s| hex::decode(s.trim_start_matches("0x")).ok())
            .ok_or_else(|| rpc_error(-32602, "bad data"))?;
        self.call_log.lock().unwrap().push(to);

        let hold = self.hold.lock().unwrap().clone();
        if let Some(sem) = hold {
            let _permit = sem.acquire().await.map_err(|_| rpc_error(-32000, "closed"))?;
        }

        let ret = self.calls.lock().unwrap().get(&(to, data)).cloned();
        match ret {
            Some(bytes) => Ok(json!(format!("0x{}", hex::encode(bytes)))),
            None => Err(rpc_error(3, "execution reverted")),
        }
    }
}

fn rpc_error(code: i64, message: &str) -> JsonRpcError {
    JsonRpcError {
        code,
        message: message.into(),
        data: None,
    }
}

#[async_trait]
impl RpcTransport for MockChain {
    async fn send(&self, req: JsonRpcRequest) -> Result<JsonRpcResponse, TransportError> {
        let result = match req.method.as_str() {
            "eth_chainId" => self.eth_chain_id().await,
            "eth_getCode" => {
                let address: Option<Address> = req.params.first().and_then(|v| v.as_str()).and_then(|s| s.parse().ok());
                let deployed = address.map(|a| self.code.lock().unwrap().contains(&a)).unwrap_or(false);
                Ok(json!(if deployed { "0x6080" } else { "0x" }))
            }
            "eth_call" => self.eth_call(&req.params).await,
            "eth_accounts" => Ok(json!(self.accounts.lock().unwrap().clone())),
            "eth_sendTransaction" => {
                self.sent.lock().unwrap().push(req.params.first().cloned().unwrap_or(Value::Null));
                Ok(json!(TX_HASH))
            }
            other => Err(rpc_error(-32601, &format!("method {other} not found"))),
        };
        let (result, error) = match result {
            Ok(v) => (Some(v), None),
            Err(e) => (None, Some(e)),
        };
        Ok(JsonRpcResponse {
            jsonrpc: "2.0".into(),
            id: req.id,
            result,
            error,
        })
    }

    fn url(&self) -> &str {
        &self.url
    }
}

/// Hands out scripted chains as read-only transports.
#[derive(Default)]
pub(crate) struct MockConnector {
    chains: Mutex<HashMap<u64, Arc<MockChain>>>,
}

impl MockConnector {
    pub(crate) fn with(chains: &[&Arc<MockChain>]) -> Arc<Self> {
        let connector = Self::default();
        for chain in chains {
            connector.chains.lock().unwrap().insert(chain.chain_id, (*chain).clone());
        }
        Arc::new(connector)
    }
}

impl ProviderConnector for MockConnector {
    fn read_only_transport(&self, chain_id: u64) -> Result<Arc<dyn RpcTransport>, NsError> {
        let chain = self.chains.lock().unwrap().get(&chain_id).cloned();
        match chain {
            Some(chain) => Ok(chain),
            None => Err(NsError::NoPublicRpc { chain_id }),
        }
    }
}

/// Records forwarded operations and answers with a fixed body.
pub(crate) struct MockSubgraph {
    pub(crate) calls: Mutex<Vec<(String, OperationRequest)>>,
    reply: Mutex<Option<ResolvedResponse>>,
}

impl MockSubgraph {
    pub(crate) fn replying(reply: ResolvedResponse) -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            reply: Mutex::new(Some(reply)),
        })
    }

    /// A subgraph whose requests fail at the HTTP layer.
    pub(crate) fn failing() -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            reply: Mutex::new(None),
        })
    }

    pub(crate) fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl SubgraphTransport for MockSubgraph {
    async fn execute(
        &self,
        url: &str,
        op: &OperationRequest,
    ) -> Result<ResolvedResponse, TransportError> {
        self.calls.lock().unwrap().push((url.to_string(), op.clone()));
        self.reply
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| TransportError::Http("HTTP 502: bad gateway".into()))
    }
}
