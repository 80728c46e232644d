//! Scripted chain and subgraph shared by the integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use alloy_dyn_abi::DynSolValue;
use alloy_primitives::{address, Address};
use async_trait::async_trait;
use serde_json::{json, Value};

use nsroute_core::namehash::{labelhash, namehash};
use nsroute_core::request::{JsonRpcError, JsonRpcRequest, JsonRpcResponse, OperationRequest, ResolvedResponse};
use nsroute_core::{NsError, RouterConfig, RpcTransport, SubgraphTransport, TransportError};
use nsroute_ens::abi;
use nsroute_ens::ProviderConnector;

pub const REGISTRY: Address = address!("eeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeee");

/// A chain answering `eth_call` from a table keyed by `(to, calldata)`.
pub struct ScriptedChain {
    chain_id: u64,
    url: String,
    calls: Mutex<HashMap<(Address, Vec<u8>), Vec<u8>>>,
    pub eth_calls: Mutex<Vec<Address>>,
}

impl ScriptedChain {
    pub fn new(chain_id: u64) -> Arc<Self> {
        Arc::new(Self {
            chain_id,
            url: format!("scripted://{chain_id}"),
            calls: Mutex::new(HashMap::new()),
            eth_calls: Mutex::new(Vec::new()),
        })
    }

    pub fn stub(&self, to: Address, signature: &str, args: Vec<DynSolValue>, ret: Vec<DynSolValue>) {
        let data = abi::encode_call(signature, args);
        self.calls
            .lock()
            .unwrap()
            .insert((to, data), DynSolValue::Tuple(ret).abi_encode_params());
    }

    pub fn stub_owner(&self, name: &str, owner: Address) {
        self.stub(REGISTRY, "owner(bytes32)", vec![abi::node(namehash(name))], vec![DynSolValue::Address(owner)]);
    }

    pub fn stub_available(&self, registrar: Address, label: &str, available: bool) {
        self.stub(
            registrar,
            "available(uint256)",
            vec![abi::uint(labelhash(label))],
            vec![DynSolValue::Bool(available)],
        );
    }

    pub fn calls_to(&self, to: Address) -> usize {
        self.eth_calls.lock().unwrap().iter().filter(|a| **a == to).count()
    }

    fn answer(&self, req: &JsonRpcRequest) -> Result<Value, JsonRpcError> {
        let reverted = || JsonRpcError {
            code: 3,
            message: "execution reverted".into(),
            data: None,
        };
        match req.method.as_str() {
            "eth_chainId" => Ok(json!(format!("0x{:x}", self.chain_id))),
            // Every address looks deployed.
            "eth_getCode" => Ok(json!("0x6080")),
            "eth_call" => {
                let call = &req.params[0];
                let to: Address = call["to"].as_str().unwrap().parse().unwrap();
                let data = hex::decode(call["data"].as_str().unwrap().trim_start_matches("0x")).unwrap();
                self.eth_calls.lock().unwrap().push(to);
                let ret = self.calls.lock().unwrap().get(&(to, data)).cloned();
                ret.map(|bytes| json!(format!("0x{}", hex::encode(bytes)))).ok_or_else(reverted)
            }
            _ => Err(reverted()),
        }
    }
}

#[async_trait]
impl RpcTransport for ScriptedChain {
    async fn send(&self, req: JsonRpcRequest) -> Result<JsonRpcResponse, TransportError> {
        let (result, error) = match self.answer(&req) {
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

/// Serves the given chains as read-only transports.
pub struct Chains(pub Vec<Arc<ScriptedChain>>);

impl ProviderConnector for Chains {
    fn read_only_transport(&self, chain_id: u64) -> Result<Arc<dyn RpcTransport>, NsError> {
        self.0
            .iter()
            .find(|c| c.chain_id == chain_id)
            .map(|c| c.clone() as Arc<dyn RpcTransport>)
            .ok_or(NsError::NoPublicRpc { chain_id })
    }
}

/// Records every forwarded operation and replies with an empty success.
#[derive(Default)]
pub struct RecordingSubgraph {
    pub seen: Mutex<Vec<(String, OperationRequest)>>,
}

#[async_trait]
impl SubgraphTransport for RecordingSubgraph {
    async fn execute(&self, url: &str, op: &OperationRequest) -> Result<ResolvedResponse, TransportError> {
        self.seen.lock().unwrap().push((url.to_string(), op.clone()));
        Ok(ResolvedResponse {
            data: Some(json!({ "echo": op.operation_name })),
            ..Default::default()
        })
    }
}

pub fn config(initial: u64, chains: &[u64]) -> RouterConfig {
    let mut config = RouterConfig::default();
    config.initial_chain_id = initial;
    for id in chains {
        config.registry_overrides.insert(*id, REGISTRY.to_string());
    }
    config
}

pub fn vars(value: Value) -> nsroute_core::Variables {
    value.as_object().cloned().unwrap()
}
