//! Infura endpoints for read-only bindings on Ethereum networks.

use nsroute_http::{HttpClientConfig, HttpRpcClient};

/// Chain ids at or above this value are never served by Infura.
pub const INFURA_CHAIN_LIMIT: u64 = 10_000;

/// Infura network slug for `chain_id`, if Infura serves it.
pub fn network(chain_id: u64) -> Option<&'static str> {
    if chain_id >= INFURA_CHAIN_LIMIT {
        return None;
    }
    match chain_id {
        1 => Some("mainnet"),
        3 => Some("ropsten"),
        4 => Some("rinkeby"),
        5 => Some("goerli"),
        11155111 => Some("sepolia"),
        _ => None,
    }
}

pub fn http_url(project_id: &str, chain_id: u64) -> Option<String> {
    let network = network(chain_id)?;
    Some(format!("https://{network}.infura.io/v3/{project_id}"))
}

/// Build an Infura HTTP client for the given chain and project ID.
pub fn http_client(project_id: &str, chain_id: u64) -> Option<HttpRpcClient> {
    let url = http_url(project_id, chain_id)?;
    Some(HttpRpcClient::new(url, HttpClientConfig::default()))
}
