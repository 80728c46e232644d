//! nsroute-http: `reqwest`-backed transports.
//!
//! - [`HttpRpcClient`]: JSON-RPC over HTTP, used for read-only bindings
//! - [`HttpSubgraphClient`]: GraphQL POST to a subgraph endpoint

pub mod client;
pub mod subgraph;

pub use client::{HttpClientConfig, HttpRpcClient};
pub use subgraph::HttpSubgraphClient;

pub(crate) fn build_http(timeout: std::time::Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_else(|e| {
            tracing::warn!(error = %e, "falling back to default HTTP client");
            reqwest::Client::new()
        })
}
