//! Chain id → subgraph URL mapping.
//!
//! Resolution order for `endpoint_for(chain_id)`:
//! 1. the mapped URL, if the chain is in the table
//! 2. the configured override, if `chain_id > threshold`
//! 3. the chain-1 default

use std::collections::BTreeMap;

use crate::error::ConfigError;

/// Default chain whose endpoint is used as the last-resort fallback.
pub const DEFAULT_CHAIN_ID: u64 = 1;

/// Chain ids above this value are treated as custom networks.
pub const CUSTOM_CHAIN_THRESHOLD: u64 = 100;

/// Hosted subgraphs for the enumerated chains.
pub const DEFAULT_ENDPOINTS: &[(u64, &str)] = &[
    (1, "https://api.thegraph.com/subgraphs/name/ensdomains/ens"),
    (3, "https://api.thegraph.com/subgraphs/name/ensdomains/ensropsten"),
    (4, "https://api.thegraph.com/subgraphs/name/ensdomains/ensrinkeby"),
    (5, "https://api.thegraph.com/subgraphs/name/ensdomains/ensgoerli"),
    (568, "https://graph.dogedomains.wf/subgraphs/name/graphprotocol/ens-dogechain-testnet"),
    (2000, "https://graph.dogedomains.wf/subgraphs/name/graphprotocol/ens-dogechain"),
    (10000, "https://graph.bch.domains/subgraphs/name/graphprotocol/ens"),
    (10001, "https://graph.bch.domains/subgraphs/name/graphprotocol/ens-ethpow"),
];

/// Static endpoint table with a deterministic fallback. Never fails.
#[derive(Debug, Clone)]
pub struct EndpointRegistry {
    table: BTreeMap<u64, String>,
    override_url: Option<String>,
    threshold: u64,
}

impl Default for EndpointRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl EndpointRegistry {
    /// Registry over [`DEFAULT_ENDPOINTS`] with no override.
    pub fn new() -> Self {
        Self::from_table(DEFAULT_ENDPOINTS.iter().map(|(id, url)| (*id, url.to_string())))
    }

    /// Registry over a custom table. The table must contain chain 1.
    pub fn from_table(entries: impl IntoIterator<Item = (u64, String)>) -> Self {
        Self {
            table: entries.into_iter().collect(),
            override_url: None,
            threshold: CUSTOM_CHAIN_THRESHOLD,
        }
    }

    /// Set the custom-network override. Rejects URLs that do not parse.
    pub fn with_override(mut self, url: impl Into<String>) -> Result<Self, ConfigError> {
        let url = url.into();
        url::Url::parse(&url).map_err(|e| ConfigError::InvalidOverride {
            value: url.clone(),
            reason: e.to_string(),
        })?;
        self.override_url = Some(url);
        Ok(self)
    }

    pub fn with_threshold(mut self, threshold: u64) -> Self {
        self.threshold = threshold;
        self
    }

    /// The subgraph URL for `chain_id`.
    pub fn endpoint_for(&self, chain_id: u64) -> &str {
        if let Some(url) = self.table.get(&chain_id) {
            return url;
        }
        if chain_id > self.threshold {
            if let Some(url) = &self.override_url {
                return url;
            }
        }
        self.default_endpoint()
    }

    /// Returns `true` if `chain_id` has its own entry.
    pub fn is_mapped(&self, chain_id: u64) -> bool {
        self.table.contains_key(&chain_id)
    }

    pub fn chain_ids(&self) -> impl Iterator<Item = u64> + '_ {
        self.table.keys().copied()
    }

    fn default_endpoint(&self) -> &str {
        self.table
            .get(&DEFAULT_CHAIN_ID)
            .map(String::as_str)
            .unwrap_or(DEFAULT_ENDPOINTS[0].1)
    }
}
