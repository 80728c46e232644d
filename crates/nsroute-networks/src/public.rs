//! Public / community RPC endpoints.
//!
//! Free, no-API-key endpoints used when no wallet is connected and no keyed
//! provider serves the chain.

use nsroute_http::{HttpClientConfig, HttpRpcClient};
use std::time::Duration;

fn conservative_config() -> HttpClientConfig {
    HttpClientConfig {
        request_timeout: Duration::from_secs(20),
    }
}

pub fn http_url(chain_id: u64) -> Option<&'static str> {
    crate::chain(chain_id).and_then(|c| c.public_rpc)
}

/// Public RPC client for `chain_id`, if the chain has one.
pub fn http_client(chain_id: u64) -> Option<HttpRpcClient> {
    http_url(chain_id).map(|url| HttpRpcClient::new(url, conservative_config()))
}
