//! Transaction-sending resolvers. They need a wallet; read-only bindings
//! reject them before anything is sent.

use serde_json::{json, Value};

use nsroute_core::error::NsError;
use nsroute_core::namehash::namehash;
use nsroute_core::request::Variables;

use crate::session::ChainSnapshot;

use super::vars;

pub(super) async fn set_owner(snapshot: ChainSnapshot, vars: Variables) -> Result<Value, NsError> {
    let name = vars::string(&vars, "name")?;
    let owner = vars::address(&vars, "address")?;
    let root = snapshot.root()?;
    let from = root.sender().await?;
    let tx = root.registry().set_owner(from, namehash(name), owner).await?;
    Ok(json!(tx))
}

pub(super) async fn set_resolver(snapshot: ChainSnapshot, vars: Variables) -> Result<Value, NsError> {
    let name = vars::string(&vars, "name")?;
    let resolver = vars::address(&vars, "address")?;
    let root = snapshot.root()?;
    let from = root.sender().await?;
    let tx = root.registry().set_resolver(from, namehash(name), resolver).await?;
    Ok(json!(tx))
}

/// Set the address record through the name's current resolver.
pub(super) async fn set_address(snapshot: ChainSnapshot, vars: Variables) -> Result<Value, NsError> {
    let name = vars::string(&vars, "name")?;
    let addr = vars::address(&vars, "address")?;
    let node = namehash(name);
    let root = snapshot.root()?;
    let from = root.sender().await?;
    let resolver = root
        .registry()
        .resolver_contract(node)
        .await?
        .ok_or_else(|| NsError::Contract(format!("no resolver set for '{name}'")))?;
    let tx = resolver.set_addr(from, node, addr).await?;
    Ok(json!(tx))
}
