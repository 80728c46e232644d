//! nsroute-networks: static knowledge about the supported chains.
//!
//! Each entry knows the chain's display name, native currency, public RPC,
//! block explorer, the TLDs its registrar serves and, where one is deployed
//! at a well-known address, the name registry.
//!
//! # Quick start
//! ```rust,no_run
//! use nsroute_networks::{chain, public};
//!
//! let dogechain = chain(2000).unwrap();
//! assert_eq!(dogechain.tlds, &["doge", "dc"]);
//! let client = public::http_client(2000);
//! ```

pub mod infura;
pub mod public;
pub mod wallet;

/// Well-known ENS registry address on Ethereum networks.
pub const ENS_REGISTRY: &str = "0x00000000000C2E074eC69A0dFb2997BA6C7d2e1e";

/// Fallback explorer for chains not in the catalogue.
pub const DEFAULT_EXPLORER: &str = "https://etherscan.io/";

/// Native currency of a chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NativeCurrency {
    pub name: &'static str,
    pub symbol: &'static str,
    pub decimals: u8,
}

const ETHER: NativeCurrency = NativeCurrency { name: "Ether", symbol: "ETH", decimals: 18 };
const DOGE: NativeCurrency = NativeCurrency { name: "Doge", symbol: "DOGE", decimals: 18 };

/// Static description of one chain.
#[derive(Debug, Clone, Copy)]
pub struct ChainInfo {
    pub chain_id: u64,
    /// Short network name (`"smartbch"`, `"dogechain"`, …).
    pub network: &'static str,
    /// Human-readable chain name shown by wallets.
    pub display_name: &'static str,
    pub currency: NativeCurrency,
    /// Keyless public RPC, if the chain has one.
    pub public_rpc: Option<&'static str>,
    pub explorer: &'static str,
    /// TLDs the chain's registrars serve.
    pub tlds: &'static [&'static str],
    /// Registry address, when deployed at a well-known address.
    pub registry: Option<&'static str>,
}

pub const CHAINS: &[ChainInfo] = &[
    ChainInfo {
        chain_id: 1,
        network: "mainnet",
        display_name: "Ethereum",
        currency: ETHER,
        public_rpc: Some("https://cloudflare-eth.com"),
        explorer: "https://etherscan.io/",
        tlds: &["eth"],
        registry: Some(ENS_REGISTRY),
    },
    ChainInfo {
        chain_id: 3,
        network: "ropsten",
        display_name: "Ropsten",
        currency: ETHER,
        public_rpc: None,
        explorer: "https://ropsten.etherscan.io/",
        tlds: &["eth"],
        registry: Some(ENS_REGISTRY),
    },
    ChainInfo {
        chain_id: 4,
        network: "rinkeby",
        display_name: "Rinkeby",
        currency: ETHER,
        public_rpc: None,
        explorer: "https://rinkeby.etherscan.io/",
        tlds: &["eth"],
        registry: Some(ENS_REGISTRY),
    },
    ChainInfo {
        chain_id: 5,
        network: "goerli",
        display_name: "Goerli",
        currency: ETHER,
        public_rpc: None,
        explorer: "https://goerli.etherscan.io/",
        tlds: &["eth"],
        registry: Some(ENS_REGISTRY),
    },
    ChainInfo {
        chain_id: 568,
        network: "dogechain-testnet",
        display_name: "DogeChain Testnet",
        currency: DOGE,
        public_rpc: Some("https://rpc-testnet.dogechain.dog"),
        explorer: "https://explorer-testnet.dogechain.dog/",
        tlds: &["doge", "dc"],
        registry: None,
    },
    ChainInfo {
        chain_id: 2000,
        network: "dogechain",
        display_name: "DogeChain",
        currency: DOGE,
        public_rpc: Some("https://rpc.yodeswap.dog"),
        explorer: "https://explorer.dogmoney.money/",
        tlds: &["doge", "dc"],
        registry: None,
    },
    ChainInfo {
        chain_id: 10000,
        network: "smartbch",
        display_name: "SmartBCH",
        currency: NativeCurrency { name: "SmartBCH", symbol: "BCH", decimals: 18 },
        public_rpc: Some("https://smartbch.fountainhead.cash/mainnet"),
        explorer: "https://sonar.cash/",
        tlds: &["bch"],
        registry: None,
    },
    ChainInfo {
        chain_id: 10001,
        network: "ethpow",
        display_name: "Ethereum POW",
        currency: NativeCurrency { name: "Ethereum POW", symbol: "ETHW", decimals: 18 },
        public_rpc: Some("https://mainnet.ethereumpow.org"),
        explorer: "https://mainnet.ethwscan.com/",
        tlds: &["bch"],
        registry: None,
    },
];

/// Catalogue entry for `chain_id`.
pub fn chain(chain_id: u64) -> Option<&'static ChainInfo> {
    CHAINS.iter().find(|c| c.chain_id == chain_id)
}

/// Block explorer base URL, falling back to Etherscan.
pub fn explorer_url(chain_id: u64) -> &'static str {
    chain(chain_id).map(|c| c.explorer).unwrap_or(DEFAULT_EXPLORER)
}

/// TLDs served on `chain_id`; empty for unknown chains.
pub fn supported_tlds(chain_id: u64) -> &'static [&'static str] {
    chain(chain_id).map(|c| c.tlds).unwrap_or(&[])
}

/// Well-known registry address for `chain_id`.
pub fn registry_address(chain_id: u64) -> Option<&'static str> {
    chain(chain_id).and_then(|c| c.registry)
}
