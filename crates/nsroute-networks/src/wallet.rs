//! Parameters for `wallet_switchEthereumChain` / `wallet_addEthereumChain`.
//!
//! The session never drives the wallet UI; callers pass these to the wallet
//! and then call `switch_chain` once the wallet reports the new chain.

use serde::Serialize;

use crate::ChainInfo;

/// Wallet error code meaning "chain not added yet".
pub const UNRECOGNIZED_CHAIN: i64 = 4902;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SwitchChainParams {
    pub chain_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CurrencyParams {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddChainParams {
    pub chain_id: String,
    pub chain_name: String,
    pub native_currency: CurrencyParams,
    pub rpc_urls: Vec<String>,
    pub block_explorer_urls: Vec<String>,
}

/// `0x`-prefixed, uppercase hex chain id as wallets expect (`2000` → `"0x7D0"`).
pub fn hex_chain_id(chain_id: u64) -> String {
    format!("0x{chain_id:X}")
}

pub fn switch_params(chain_id: u64) -> SwitchChainParams {
    SwitchChainParams {
        chain_id: hex_chain_id(chain_id),
    }
}

/// Add-chain parameters; only chains with a public RPC can be added.
pub fn add_params(chain_id: u64) -> Option<AddChainParams> {
    let ChainInfo {
        display_name,
        currency,
        public_rpc,
        explorer,
        ..
    } = *crate::chain(chain_id)?;
    Some(AddChainParams {
        chain_id: hex_chain_id(chain_id),
        chain_name: display_name.to_string(),
        native_currency: CurrencyParams {
            name: currency.name.to_string(),
            symbol: currency.symbol.to_string(),
            decimals: currency.decimals,
        },
        rpc_urls: vec![public_rpc?.to_string()],
        block_explorer_urls: vec![explorer.trim_end_matches('/').to_string()],
    })
}
