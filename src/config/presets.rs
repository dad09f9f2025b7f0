//! Named network presets.
//!
//! Presets carry endpoints, chain IDs and fee defaults only. Enter L2 publishes
//! no canonical token addresses, so `tokens` starts empty: list symbols under
//! `[tokens]` in a config file, or fill the registry on a preset before
//! building the client.

use crate::config::schema::{EnterL2Config, FeeConfig, NetworkConfig};

/// Enter L2 main network.
pub fn mainnet() -> EnterL2Config {
    EnterL2Config {
        network: NetworkConfig {
            name: "enterl2-mainnet".to_string(),
            l2_rpc_url: "https://rpc.enterl2.com".to_string(),
            failover_urls: Vec::new(),
            l1_rpc_url: None,
            chain_id: 1223,
            l1_chain_id: Some(1),
            ..NetworkConfig::default()
        },
        fees: FeeConfig {
            confirmation_blocks: 3,
            ..FeeConfig::default()
        },
        ..EnterL2Config::default()
    }
}

/// Enter L2 test network (settles on Sepolia).
pub fn testnet() -> EnterL2Config {
    EnterL2Config {
        network: NetworkConfig {
            name: "enterl2-testnet".to_string(),
            l2_rpc_url: "https://testnet-rpc.enterl2.com".to_string(),
            failover_urls: Vec::new(),
            l1_rpc_url: None,
            chain_id: 12231,
            l1_chain_id: Some(11155111),
            ..NetworkConfig::default()
        },
        fees: FeeConfig {
            gas_price_multiplier: 1.1,
            confirmation_blocks: 1,
            ..FeeConfig::default()
        },
        ..EnterL2Config::default()
    }
}

/// Resolve a preset by name (`mainnet`, `testnet`, `local`).
pub fn by_name(name: &str) -> Option<EnterL2Config> {
    match name.to_ascii_lowercase().as_str() {
        "mainnet" => Some(mainnet()),
        "testnet" => Some(testnet()),
        "local" => Some(EnterL2Config::default()),
        _ => None,
    }
}
