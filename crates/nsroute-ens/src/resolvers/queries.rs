//! Read-only resolvers. Each reads through the captured binding only.

use serde_json::{json, Value};

use nsroute_core::error::NsError;
use nsroute_core::namehash::{namehash, reverse_node, to_hex};
use nsroute_core::request::Variables;

use crate::contracts::address_value;
use crate::session::ChainSnapshot;

use super::vars;

pub(super) async fn is_ens_ready(snapshot: ChainSnapshot, _: Variables) -> Result<Value, NsError> {
    Ok(Value::Bool(snapshot.state().is_ready))
}

pub(super) async fn get_network(snapshot: ChainSnapshot, _: Variables) -> Result<Value, NsError> {
    let state = snapshot.state();
    let info = nsroute_networks::chain(state.chain_id);
    Ok(json!({
        "chainId": state.chain_id,
        "network": info.map(|c| c.network),
        "displayName": info.map(|c| c.display_name),
        "isReadOnly": state.is_read_only,
        "tlds": nsroute_networks::supported_tlds(state.chain_id),
    }))
}

pub(super) async fn get_etherscan_addr(snapshot: ChainSnapshot, _: Variables) -> Result<Value, NsError> {
    Ok(json!(nsroute_networks::explorer_url(snapshot.chain_id())))
}

pub(super) async fn get_owner(snapshot: ChainSnapshot, vars: Variables) -> Result<Value, NsError> {
    let name = vars::string(&vars, "name")?;
    let owner = snapshot.root()?.registry().owner(namehash(name)).await?;
    Ok(address_value(owner))
}

pub(super) async fn get_resolver(snapshot: ChainSnapshot, vars: Variables) -> Result<Value, NsError> {
    let name = vars::string(&vars, "name")?;
    let resolver = snapshot.root()?.registry().resolver(namehash(name)).await?;
    Ok(address_value(resolver))
}

pub(super) async fn get_addr(snapshot: ChainSnapshot, vars: Variables) -> Result<Value, NsError> {
    let name = vars::string(&vars, "name")?;
    let node = namehash(name);
    match snapshot.root()?.registry().resolver_contract(node).await? {
        Some(resolver) => Ok(address_value(resolver.addr(node).await?)),
        None => Ok(Value::Null),
    }
}

/// Reverse record of `address`.
pub(super) async fn get_name(snapshot: ChainSnapshot, vars: Variables) -> Result<Value, NsError> {
    let address = vars::address(&vars, "address")?;
    let node = reverse_node(&address.to_string());
    let name = match snapshot.root()?.registry().resolver_contract(node).await? {
        Some(resolver) => Some(resolver.name(node).await?).filter(|n| !n.is_empty()),
        None => None,
    };
    Ok(json!({ "address": address.to_string(), "name": name }))
}

pub(super) async fn get_availability(snapshot: ChainSnapshot, vars: Variables) -> Result<Value, NsError> {
    let name = vars::string(&vars, "name")?;
    let (label, tld) = vars::label_and_tld(name)?;
    let registrar = snapshot.registrar(tld).await?;
    Ok(Value::Bool(registrar.available(label).await?))
}

/// Expiry as unix seconds; `null` when the name was never registered.
pub(super) async fn get_expiry_date(snapshot: ChainSnapshot, vars: Variables) -> Result<Value, NsError> {
    let name = vars::string(&vars, "name")?;
    let (label, tld) = vars::label_and_tld(name)?;
    let registrar = snapshot.registrar(tld).await?;
    let expires = registrar.name_expires(label).await?;
    Ok(if expires == 0 { Value::Null } else { json!(expires) })
}

pub(super) async fn get_domain(snapshot: ChainSnapshot, vars: Variables) -> Result<Value, NsError> {
    let name = vars::string(&vars, "name")?;
    let node = namehash(name);
    let registry = snapshot.root()?.registry();

    let (owner, resolver) = futures::try_join!(registry.owner(node), registry.resolver_contract(node))?;
    let addr = match &resolver {
        Some(resolver) => address_value(resolver.addr(node).await?),
        None => Value::Null,
    };

    let mut domain = json!({
        "name": name,
        "nameHash": to_hex(&node),
        "owner": address_value(owner),
        "resolver": resolver.as_ref().map(|r| r.address().to_string()),
        "addr": addr,
    });
    // Second-level names also carry registrar state; null when no registrar owns the TLD.
    if let Some((label, tld)) = name.split_once('.').filter(|(_, rest)| !rest.contains('.')) {
        domain["available"] = Value::Null;
        domain["expiryDate"] = Value::Null;
        match snapshot.registrar(tld).await {
            Ok(registrar) => {
                let (available, expires) =
                    futures::try_join!(registrar.available(label), registrar.name_expires(label))?;
                domain["available"] = json!(available);
                if expires != 0 {
                    domain["expiryDate"] = json!(expires);
                }
            }
            Err(NsError::UnknownTld { .. }) => {}
            Err(e) => return Err(e),
        }
    }
    Ok(domain)
}

/// ERC-20 name and symbol; `address` is echoed as given.
pub(super) async fn get_token_info(snapshot: ChainSnapshot, vars: Variables) -> Result<Value, NsError> {
    let raw = vars::string(&vars, "address")?;
    let address = vars::address(&vars, "address")?;
    let token = snapshot.root()?.token(address).await;
    let (name, symbol) = futures::try_join!(token.name(), token.symbol())?;
    Ok(json!({ "name": name, "symbol": symbol, "address": raw }))
}
