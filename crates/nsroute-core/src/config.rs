//! Runtime configuration.
//!
//! Everything has a usable default; `from_env` layers the environment on top.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::endpoints::{EndpointRegistry, CUSTOM_CHAIN_THRESHOLD, DEFAULT_CHAIN_ID};
use crate::error::ConfigError;

/// Subgraph override for unmapped custom networks.
pub const ENV_GRAPH_NODE_URI: &str = "NSROUTE_GRAPH_NODE_URI";
/// Access key injected into read-only Infura bindings.
pub const ENV_INFURA_ID: &str = "NSROUTE_INFURA_ID";
/// Log directive, e.g. `"debug"` or `"info,nsroute_ens=trace"`.
pub const ENV_LOG: &str = "NSROUTE_LOG";

/// Public read-only access key shipped with the client.
pub const DEFAULT_INFURA_ID: &str = "58a380d3ecd545b2b5b3dad5d2b18bf0";

/// Log level per component.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// Global default level: "trace" | "debug" | "info" | "warn" | "error"
    #[serde(default = "default_level")]
    pub level: String,
    /// Override per component: component_name → level
    #[serde(default)]
    pub components: HashMap<String, String>,
    /// Emit JSON structured logs (true) or human-readable text (false)
    #[serde(default)]
    pub json: bool,
}

fn default_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            components: HashMap::new(),
            json: false,
        }
    }
}

/// Configuration for the session and router.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouterConfig {
    /// Chain the session starts on before any wallet connects.
    #[serde(default = "default_chain_id")]
    pub initial_chain_id: u64,
    /// Subgraph URL for unmapped chains above `custom_threshold`.
    #[serde(default)]
    pub graph_node_uri: Option<String>,
    /// Static key for read-only Infura bindings. `None` disables Infura.
    #[serde(default = "default_infura_id")]
    pub infura_id: Option<String>,
    /// Registry address per chain, taking precedence over the catalogue.
    #[serde(default)]
    pub registry_overrides: BTreeMap<u64, String>,
    #[serde(default = "default_threshold")]
    pub custom_threshold: u64,
    #[serde(default)]
    pub log: LogConfig,
}

fn default_chain_id() -> u64 {
    DEFAULT_CHAIN_ID
}

fn default_infura_id() -> Option<String> {
    Some(DEFAULT_INFURA_ID.to_string())
}

fn default_threshold() -> u64 {
    CUSTOM_CHAIN_THRESHOLD
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            initial_chain_id: default_chain_id(),
            graph_node_uri: None,
            infura_id: default_infura_id(),
            registry_overrides: BTreeMap::new(),
            custom_threshold: default_threshold(),
            log: LogConfig::default(),
        }
    }
}

impl RouterConfig {
    /// Defaults overlaid with `NSROUTE_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overlaid with values from `lookup`; empty values are ignored.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();
        if let Some(uri) = get(ENV_GRAPH_NODE_URI) {
            config.graph_node_uri = Some(uri);
        }
        if let Some(id) = get(ENV_INFURA_ID) {
            config.infura_id = Some(id);
        }
        if let Some(level) = get(ENV_LOG) {
            config.log.level = level;
        }
        config
    }

    /// Reject malformed override URLs and registry addresses.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.endpoint_registry()?;
        for (chain_id, address) in &self.registry_overrides {
            if !is_hex_address(address) {
                return Err(ConfigError::InvalidAddress {
                    chain_id: *chain_id,
                    value: address.clone(),
                });
            }
        }
        Ok(())
    }

    /// Endpoint registry honouring `graph_node_uri` and `custom_threshold`.
    pub fn endpoint_registry(&self) -> Result<EndpointRegistry, ConfigError> {
        let registry = EndpointRegistry::new().with_threshold(self.custom_threshold);
        match &self.graph_node_uri {
            Some(uri) => registry.with_override(uri.clone()),
            None => Ok(registry),
        }
    }
}

fn is_hex_address(s: &str) -> bool {
    match s.strip_prefix("0x") {
        Some(body) => body.len() == 40 && hex::decode(body).is_ok(),
        None => false,
    }
}
