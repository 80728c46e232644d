//! nsroute-ens: name-service bindings and the resolution router.
//!
//! # Layers
//!
//! - [`contracts`]: registry, resolver, base registrar and ERC-20 handles
//! - [`binding`]: per-chain [`Binding`] with a lazily bound registrar
//! - [`session`]: [`NetworkSession`], the only writer of network state
//! - [`resolvers`]: the immutable [`ResolverTable`]
//! - [`router`]: [`ResolutionRouter`], local resolver or remote subgraph
//!
//! # Example
//!
//! ```rust,no_run
//! use nsroute_core::RouterConfig;
//! use nsroute_ens::ResolutionRouter;
//! use serde_json::json;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let router = ResolutionRouter::from_config(&RouterConfig::from_env())?;
//! router.session().initialize().await?;
//!
//! let vars = json!({ "name": "alice.eth" }).as_object().cloned().unwrap_or_default();
//! let resp = router.route("getOwner", vars).await;
//! println!("{:?} {:?}", resp.data, resp.errors);
//! # Ok(())
//! # }
//! ```

pub mod abi;
pub mod binding;
pub mod connector;
pub mod contracts;
pub mod resolvers;
pub mod router;
pub mod session;

#[cfg(test)]
pub(crate) mod mock;

pub use binding::{BindState, Binding};
pub use connector::{ProviderConnector, PublicConnector};
pub use resolvers::{default_table, Operation, OperationKind, ResolverTable};
pub use router::ResolutionRouter;
pub use session::{ChainSnapshot, NetworkSession};
