//! End-to-end routing tests: session transitions, local resolution and
//! subgraph forwarding through the public API.

mod common;

use std::sync::Arc;

use alloy_dyn_abi::DynSolValue;
use alloy_primitives::Address;
use serde_json::json;

use common::{config, vars, Chains, RecordingSubgraph, ScriptedChain, REGISTRY};
use nsroute_core::{ConfigError, EndpointRegistry, RouterConfig, Variables};
use nsroute_ens::{default_table, NetworkSession, ResolutionRouter};

// ─── Helpers ──────────────────────────────────────────────────────────────────

async fn build_router(
    chains: Vec<Arc<ScriptedChain>>,
    initial: u64,
    ids: &[u64],
) -> (ResolutionRouter, Arc<RecordingSubgraph>) {
    let session = NetworkSession::new(&config(initial, ids), Arc::new(Chains(chains))).unwrap();
    session.initialize().await.unwrap();
    let subgraph = Arc::new(RecordingSubgraph::default());
    let endpoints = EndpointRegistry::new().with_override("https://custom/graph").unwrap();
    let router = ResolutionRouter::new(Arc::new(session), default_table().unwrap(), endpoints, subgraph.clone());
    (router, subgraph)
}

// ─── Endpoint registry ────────────────────────────────────────────────────────

#[test]
fn endpoint_scenarios() {
    let plain = EndpointRegistry::new();
    assert_eq!(plain.endpoint_for(1), "https://api.thegraph.com/subgraphs/name/ensdomains/ens");

    let custom = EndpointRegistry::new().with_override("https://custom/graph").unwrap();
    assert_eq!(custom.endpoint_for(99999), "https://custom/graph");
    assert_eq!(custom.endpoint_for(42), plain.endpoint_for(1));
}

#[test]
fn malformed_override_fails_router_construction() {
    let mut config = RouterConfig::default();
    config.graph_node_uri = Some("not a url".into());
    let err = ResolutionRouter::from_config(&config).err().unwrap();
    assert!(matches!(err, ConfigError::InvalidOverride { .. }));
}

// ─── Routing ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn token_info_resolves_without_remote_fetch() {
    let chain = ScriptedChain::new(10000);
    let token = Address::repeat_byte(0xab);
    chain.stub(token, "name()", vec![], vec![DynSolValue::String("Bitcoin Cash Domains".into())]);
    chain.stub(token, "symbol()", vec![], vec![DynSolValue::String("BCHD".into())]);
    let (router, subgraph) = build_router(vec![chain], 10000, &[10000]).await;

    let address = token.to_string();
    let resp = router.route("getTokenInfo", vars(json!({ "address": address }))).await;
    assert_eq!(
        serde_json::to_value(&resp).unwrap(),
        json!({
            "data": { "getTokenInfo": { "name": "Bitcoin Cash Domains", "symbol": "BCHD", "address": address } },
            "errors": []
        })
    );
    assert!(subgraph.seen.lock().unwrap().is_empty());
}

#[tokio::test]
async fn every_registered_operation_stays_local() {
    let chain = ScriptedChain::new(10000);
    let (router, subgraph) = build_router(vec![chain], 10000, &[10000]).await;
    for name in ["isENSReady", "getNetwork", "getEtherScanAddr", "getOwner", "setOwner"] {
        router.route(name, Variables::new()).await;
    }
    assert!(subgraph.seen.lock().unwrap().is_empty());
}

#[tokio::test]
async fn unknown_operations_follow_the_active_chain() {
    let a = ScriptedChain::new(10000);
    let b = ScriptedChain::new(2000);
    let (router, subgraph) = build_router(vec![a, b], 10000, &[10000, 2000]).await;

    router.route("getDomains", vars(json!({ "first": 1 }))).await;
    router.session().switch_chain(2000).await.unwrap();
    let resp = router.route("getDomains", vars(json!({ "first": 1 }))).await;
    assert_eq!(resp.field("echo"), Some(&json!("getDomains")));

    let seen = subgraph.seen.lock().unwrap();
    assert_eq!(seen[0].0, router.endpoints().endpoint_for(10000));
    assert_eq!(seen[1].0, router.endpoints().endpoint_for(2000));
    assert_eq!(seen[1].1.variables, vars(json!({ "first": 1 })));
}

#[tokio::test]
async fn registrar_rebinds_for_a_new_tld() {
    let chain = ScriptedChain::new(10000);
    let bch = Address::repeat_byte(0x01);
    let doge = Address::repeat_byte(0x02);
    chain.stub_owner("bch", bch);
    chain.stub_owner("doge", doge);
    chain.stub_available(bch, "alice", true);
    chain.stub_available(doge, "alice", false);
    let (router, _) = build_router(vec![chain.clone()], 10000, &[10000]).await;

    let resp = router.route("getAvailability", vars(json!({ "name": "alice.bch" }))).await;
    assert_eq!(resp.field("getAvailability"), Some(&json!(true)));
    let resp = router.route("getAvailability", vars(json!({ "name": "alice.doge" }))).await;
    assert_eq!(resp.field("getAvailability"), Some(&json!(false)));

    let root = router.session().root_binding().await.unwrap();
    assert_eq!(root.registrar_scope().await.as_deref(), Some("doge"));
    assert_eq!(root.registry_address(), REGISTRY);
    assert_eq!(chain.calls_to(REGISTRY), 2);
}

// ─── Session ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn disconnect_leaves_a_ready_read_only_binding() {
    let public = ScriptedChain::new(10000);
    let wallet = ScriptedChain::new(10000);
    let (router, _) = build_router(vec![public], 10000, &[10000]).await;
    let session = router.session();

    session.connect(wallet).await.unwrap();
    assert!(!session.state().is_read_only);

    session.disconnect().await.unwrap();
    let state = session.state();
    assert!(state.is_read_only);
    assert!(state.is_ready);
    assert!(session.root_binding().await.is_ok());

    let resp = router.route("isENSReady", Variables::new()).await;
    assert_eq!(resp.field("isENSReady"), Some(&json!(true)));
}

#[tokio::test]
async fn failed_switch_is_reported_in_responses() {
    let chain = ScriptedChain::new(10000);
    let (router, subgraph) = build_router(vec![chain], 10000, &[10000]).await;

    assert!(router.session().switch_chain(2000).await.is_err());
    let state = router.session().state();
    assert!(!state.is_ready);
    assert!(state.last_error.is_some());

    let resp = router.route("getOwner", vars(json!({ "name": "alice.bch" }))).await;
    assert!(resp.data.is_none());
    assert_eq!(resp.errors[0].extensions["cause"], "NOT_READY");
    assert!(subgraph.seen.lock().unwrap().is_empty());
}
