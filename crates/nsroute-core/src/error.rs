//! Error taxonomy shared by every nsroute crate.

use thiserror::Error;

use crate::request::JsonRpcError;

/// Errors that can occur while talking to a chain node or a subgraph.
#[derive(Debug, Error)]
pub enum TransportError {
    /// HTTP request failed (connection refused, non-2xx status, etc.).
    #[error("HTTP error: {0}")]
    Http(String),

    /// JSON-RPC protocol-level error returned by the node.
    #[error("RPC error {}: {}", .0.code, .0.message)]
    Rpc(JsonRpcError),

    /// Request timed out after the configured duration.
    #[error("Request timed out after {ms}ms")]
    Timeout { ms: u64 },

    /// Response could not be deserialized.
    #[error("Deserialization error: {0}")]
    Deserialization(#[from] serde_json::Error),

    /// An unexpected error.
    #[error("{0}")]
    Other(String),
}

impl TransportError {
    /// Returns `true` if this error is transient.
    ///
    /// nsroute never retries on its own; the classification is for callers
    /// that wrap the router in their own retry policy.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Http(_) | Self::Timeout { .. })
    }

    /// Returns `true` if this is a node-side execution error (e.g. a revert).
    pub fn is_execution_error(&self) -> bool {
        matches!(self, Self::Rpc(_))
    }
}

/// Errors raised by the binding, session and routing layers.
#[derive(Debug, Error)]
pub enum NsError {
    /// A binding or registrar was requested before a successful rebuild.
    #[error("not ready: {what}")]
    NotReady { what: String },

    /// A local resolver failed while answering an operation.
    #[error("resolver '{operation}' failed: {reason}")]
    Resolution { operation: String, reason: String },

    /// The node or the subgraph request failed.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// No local resolver and no remote endpoint could take the operation.
    #[error("operation '{operation}' cannot be routed")]
    Unroutable { operation: String },

    /// The provider reports a different chain than the one requested.
    #[error("chain mismatch: expected {expected}, provider is on {actual}")]
    ChainMismatch { expected: u64, actual: u64 },

    /// No registry address is known or configured for the chain.
    #[error("no name registry configured for chain {chain_id}")]
    MissingRegistry { chain_id: u64 },

    /// No read-only RPC endpoint is known for the chain.
    #[error("no public RPC endpoint for chain {chain_id}")]
    NoPublicRpc { chain_id: u64 },

    /// No registrar owns the requested top-level domain.
    #[error("no registrar for top-level domain '{tld}'")]
    UnknownTld { tld: String },

    /// The checked address holds no contract code.
    #[error("no contract deployed at {address}")]
    ContractNotDeployed { address: String },

    /// A transaction was requested while no wallet is connected.
    #[error("read-only mode: connect a wallet to send transactions")]
    ReadOnly,

    /// Operation variables are missing or malformed.
    #[error("invalid variables: {0}")]
    InvalidVariables(String),

    /// Contract call encoding or decoding failed.
    #[error("contract error: {0}")]
    Contract(String),
}

impl NsError {
    /// Stable machine-readable code carried in response error extensions.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotReady { .. } => "NOT_READY",
            Self::Resolution { .. } => "RESOLUTION_ERROR",
            Self::Transport(_) => "TRANSPORT_ERROR",
            Self::Unroutable { .. } => "UNROUTABLE_OPERATION",
            Self::ChainMismatch { .. } => "CHAIN_MISMATCH",
            Self::MissingRegistry { .. } => "MISSING_REGISTRY",
            Self::NoPublicRpc { .. } => "NO_PUBLIC_RPC",
            Self::UnknownTld { .. } => "UNKNOWN_TLD",
            Self::ContractNotDeployed { .. } => "CONTRACT_NOT_DEPLOYED",
            Self::ReadOnly => "READ_ONLY",
            Self::InvalidVariables(_) => "INVALID_VARIABLES",
            Self::Contract(_) => "CONTRACT_ERROR",
        }
    }

    pub fn not_ready(what: impl Into<String>) -> Self {
        Self::NotReady { what: what.into() }
    }

    /// Returns `true` if retrying after readiness is signalled may succeed.
    pub fn is_not_ready(&self) -> bool {
        matches!(self, Self::NotReady { .. })
    }
}

/// Errors detected while building configuration or startup tables.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The subgraph override URL does not parse.
    #[error("invalid subgraph override URL '{value}': {reason}")]
    InvalidOverride { value: String, reason: String },

    /// The same operation name was registered twice.
    #[error("operation '{operation}' registered more than once")]
    DuplicateOperation { operation: String },

    /// A registry address override does not parse.
    #[error("invalid registry address for chain {chain_id}: {value}")]
    InvalidAddress { chain_id: u64, value: String },
}
