//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the client.
//! All types derive Serde traits for deserialization from config files.

use alloy::primitives::Address;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

/// Root configuration for the Enter L2 client.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct EnterL2Config {
    /// Endpoints, chain identifiers and timeouts.
    pub network: NetworkConfig,

    /// Fee strategy for submitted transactions.
    pub fees: FeeConfig,

    /// Deployed contract addresses.
    pub contracts: ContractAddresses,

    /// Supported tokens (symbol -> contract address).
    pub tokens: TokenRegistry,

    /// Logging settings.
    pub observability: ObservabilityConfig,
}

impl EnterL2Config {
    /// Default timeout applied to every RPC call.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.network.timeout_secs)
    }
}

/// Network endpoints and chain settings.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct NetworkConfig {
    /// Human readable network name reported by `get_network_info`.
    pub name: String,

    /// L2 JSON-RPC endpoint URL.
    pub l2_rpc_url: String,

    /// Failover L2 JSON-RPC endpoint URLs.
    pub failover_urls: Vec<String>,

    /// L1 JSON-RPC endpoint URL, needed for bridge deposits.
    pub l1_rpc_url: Option<String>,

    /// L2 chain ID.
    pub chain_id: u64,

    /// L1 chain ID.
    pub l1_chain_id: Option<u64>,

    /// RPC request timeout in seconds.
    pub timeout_secs: u64,

    /// First delay between receipt polls in milliseconds.
    pub poll_interval_ms: u64,

    /// Upper bound on the delay between receipt polls in milliseconds.
    pub max_poll_interval_ms: u64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            name: "local".to_string(),
            l2_rpc_url: "http://localhost:8545".to_string(),
            failover_urls: Vec::new(),
            l1_rpc_url: None,
            chain_id: 31337, // Anvil default
            l1_chain_id: None,
            timeout_secs: 30,
            poll_interval_ms: 2000,
            max_poll_interval_ms: 8000,
        }
    }
}

/// Fee strategy parameters.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct FeeConfig {
    /// Gas price multiplier (1.0 = node estimate, 1.2 = 20% buffer).
    pub gas_price_multiplier: f64,

    /// Maximum gas price in gwei (protection against spikes).
    pub max_gas_price_gwei: u64,

    /// Confirmations used when the caller does not ask for a specific count.
    pub confirmation_blocks: u64,
}

impl Default for FeeConfig {
    fn default() -> Self {
        Self {
            gas_price_multiplier: 1.2,
            max_gas_price_gwei: 500,
            confirmation_blocks: 1,
        }
    }
}

/// Addresses of the Enter L2 system contracts.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct ContractAddresses {
    /// Bridge contract on L1 (deposits).
    pub l1_bridge: Option<Address>,
    /// Bridge contract on L2 (withdrawals).
    pub l2_bridge: Option<Address>,
    pub wallet_factory: Option<Address>,
    pub name_registry: Option<Address>,
    /// Resolver used when a name is registered without one.
    pub default_resolver: Option<Address>,
    pub staking_pool: Option<Address>,
}

/// Token registry mapping symbols to contract addresses.
///
/// Symbol lookups are case-insensitive.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(transparent)]
pub struct TokenRegistry(BTreeMap<String, Address>);

impl TokenRegistry {
    /// Build a registry from `(symbol, address)` pairs.
    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, Address)>,
        S: Into<String>,
    {
        Self(pairs.into_iter().map(|(s, a)| (s.into(), a)).collect())
    }

    /// Look up a token address by symbol.
    pub fn get(&self, symbol: &str) -> Option<Address> {
        self.0
            .iter()
            .find(|(s, _)| s.eq_ignore_ascii_case(symbol))
            .map(|(_, a)| *a)
    }

    /// Reverse lookup: symbol of a registered token address.
    pub fn symbol_of(&self, address: &Address) -> Option<&str> {
        self.0
            .iter()
            .find(|(_, a)| *a == address)
            .map(|(s, _)| s.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Address)> {
        self.0.iter().map(|(s, a)| (s.as_str(), a))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Emit JSON log lines instead of the human readable format.
    pub json: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::address;

    #[test]
    fn test_default_config() {
        let config = EnterL2Config::default();
        assert_eq!(config.network.chain_id, 31337);
        assert_eq!(config.network.timeout_secs, 30);
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert_eq!(config.fees.confirmation_blocks, 1);
        assert!(config.tokens.is_empty());
    }

    #[test]
    fn test_token_registry_lookup() {
        let usdc = address!("0x1111111111111111111111111111111111111111");
        let registry = TokenRegistry::from_pairs([("USDC", usdc)]);

        assert_eq!(registry.get("usdc"), Some(usdc));
        assert_eq!(registry.get("USDC"), Some(usdc));
        assert_eq!(registry.get("USDT"), None);
        assert_eq!(registry.symbol_of(&usdc), Some("USDC"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: EnterL2Config = toml::from_str(
            r#"
            [network]
            chain_id = 42

            [tokens]
            USDT = "0x2222222222222222222222222222222222222222"
            "#,
        )
        .unwrap();

        assert_eq!(config.network.chain_id, 42);
        assert_eq!(config.network.l2_rpc_url, "http://localhost:8545");
        assert_eq!(config.fees.max_gas_price_gwei, 500);
        assert!(config.tokens.get("usdt").is_some());
        assert!(config.contracts.l2_bridge.is_none());
    }
}
