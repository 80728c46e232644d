//! nsroute-core: foundation types for the nsroute resolution layer.
//!
//! # Overview
//!
//! nsroute answers named name-service operations either by reading chain
//! state directly or by forwarding them to a hosted subgraph. This crate
//! defines the pieces every other crate shares:
//!
//! - [`RpcTransport`] / [`SubgraphTransport`]: the two async transport seams
//! - [`JsonRpcRequest`] / [`OperationRequest`] / [`ResolvedResponse`]: wire types
//! - [`NsError`] / [`TransportError`]: structured error taxonomy
//! - [`EndpointRegistry`]: chain id → subgraph URL with fallback
//! - [`NetworkState`]: snapshot of the active chain, provider and readiness
//! - [`namehash`]: ENS node and label hashing
//! - [`config`] / [`logging`]: runtime configuration and tracing setup

pub mod config;
pub mod endpoints;
pub mod error;
pub mod logging;
pub mod namehash;
pub mod network;
pub mod request;
pub mod transport;

pub use config::{LogConfig, RouterConfig};
pub use endpoints::EndpointRegistry;
pub use error::{ConfigError, NsError, TransportError};
pub use network::NetworkState;
pub use request::{
    JsonRpcRequest, JsonRpcResponse, OperationRequest, ResolvedResponse, ResponseError, RpcId,
    Variables,
};
pub use transport::{RpcTransport, SubgraphTransport};
