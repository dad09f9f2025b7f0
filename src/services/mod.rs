//! Domain facades: payments, bridge, naming, staking and wallet creation.
//!
//! Each facade turns one high-level intent into one chain call. The traits
//! are the seam the client delegates through; the `Rpc*` types implement
//! them over [`RpcProvider`].

pub mod bridge;
pub mod contracts;
pub mod naming;
pub mod payment;
pub mod staking;
pub mod wallets;

use alloy::primitives::{Address, TxHash, U256};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::sync::Arc;

use crate::blockchain::{
    ChainProvider, MerchantOptions, RpcProvider, TransactionKind, TransactionResponse, WalletKind,
};
use crate::config::{ConfigError, EnterL2Config};
use crate::error::{EnterL2Error, Result, TransactionError};
use crate::observability::metrics;

pub use bridge::RpcBridge;
pub use naming::RpcNaming;
pub use payment::RpcPayments;
pub use staking::RpcStaking;
pub use wallets::RpcWallets;

/// A payment from the session address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentRequest {
    pub to: Address,
    /// Amount in base units.
    pub amount: U256,
    /// Token contract, `None` for the native token.
    pub token_address: Option<Address>,
    pub description: Option<String>,
}

/// A bridge transfer (deposit L1 → L2 or withdrawal L2 → L1).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeRequest {
    pub token: Address,
    pub amount: U256,
    /// Receiving address on the destination layer.
    pub recipient: Address,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameRegistration {
    pub name: String,
    /// `None` falls back to the configured default resolver.
    pub resolver: Option<Address>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakeRequest {
    pub amount: U256,
    /// Lock period in seconds.
    pub lock_period: u64,
}

#[async_trait]
pub trait WalletManager: Send + Sync {
    /// Deploy a smart wallet owned by the session address and return its address.
    async fn create_wallet(
        &self,
        kind: WalletKind,
        options: Option<MerchantOptions>,
    ) -> Result<Address>;
}

#[async_trait]
pub trait PaymentService: Send + Sync {
    async fn send_payment(&self, request: PaymentRequest) -> Result<TransactionResponse>;
}

#[async_trait]
pub trait BridgeService: Send + Sync {
    async fn deposit(&self, request: BridgeRequest) -> Result<TransactionResponse>;
    async fn withdraw(&self, request: BridgeRequest) -> Result<TransactionResponse>;
}

#[async_trait]
pub trait NamingService: Send + Sync {
    async fn register_name(&self, request: NameRegistration) -> Result<TransactionResponse>;
}

#[async_trait]
pub trait StakingService: Send + Sync {
    async fn stake(&self, request: StakeRequest) -> Result<TransactionResponse>;
    async fn unstake(&self, amount: U256) -> Result<TransactionResponse>;
    async fn claim_rewards(&self) -> Result<TransactionResponse>;
}

/// Everything a client delegates to.
#[derive(Clone)]
pub struct Services {
    pub provider: Arc<dyn ChainProvider>,
    pub wallets: Arc<dyn WalletManager>,
    pub payment: Arc<dyn PaymentService>,
    pub bridge: Arc<dyn BridgeService>,
    pub naming: Arc<dyn NamingService>,
    pub staking: Arc<dyn StakingService>,
}

impl Services {
    /// RPC-backed services for `config`.
    pub fn rpc(config: Arc<EnterL2Config>) -> Result<Self> {
        Ok(Self::from_rpc(Arc::new(RpcProvider::new(config)?)))
    }

    /// All facades sharing one provider (and so one signing session).
    pub fn from_rpc(rpc: Arc<RpcProvider>) -> Self {
        Self {
            wallets: Arc::new(RpcWallets::new(rpc.clone())),
            payment: Arc::new(RpcPayments::new(rpc.clone())),
            bridge: Arc::new(RpcBridge::new(rpc.clone())),
            naming: Arc::new(RpcNaming::new(rpc.clone())),
            staking: Arc::new(RpcStaking::new(rpc.clone())),
            provider: rpc,
        }
    }

    /// One object serving every facade.
    pub fn from_backend<B>(backend: Arc<B>) -> Self
    where
        B: ChainProvider
            + WalletManager
            + PaymentService
            + BridgeService
            + NamingService
            + StakingService
            + 'static,
    {
        Self {
            provider: backend.clone(),
            wallets: backend.clone(),
            payment: backend.clone(),
            bridge: backend.clone(),
            naming: backend.clone(),
            staking: backend,
        }
    }
}

/// Address of a configured contract, or `MissingContract`.
pub(crate) fn contract(address: Option<Address>, name: &'static str) -> Result<Address> {
    address.ok_or_else(|| ConfigError::MissingContract(name).into())
}

/// The node refused a transaction we tried to submit.
pub(crate) fn rejected(e: impl Display) -> EnterL2Error {
    TransactionError::Rejected(e.to_string()).into()
}

/// Log and count a broadcast transaction, returning its pending response.
pub(crate) fn submitted(kind: TransactionKind, hash: TxHash, from: Address) -> TransactionResponse {
    metrics::record_transaction_submitted(kind);
    tracing::info!(tx_hash = %hash, kind = %kind, from = %from, "Transaction submitted");
    TransactionResponse::pending(hash, kind).with_from(from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_contract() {
        let err = contract(None, "staking_pool").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Contract address not configured: staking_pool"
        );
        assert_eq!(contract(Some(Address::ZERO), "x").unwrap(), Address::ZERO);
    }

    #[test]
    fn test_submitted_response() {
        let from = Address::repeat_byte(0x11);
        let tx = submitted(TransactionKind::Staking, TxHash::repeat_byte(0xab), from);
        assert_eq!(tx.kind, TransactionKind::Staking);
        assert_eq!(tx.from, Some(from));
        assert!(!tx.is_final());
    }

    #[test]
    fn test_rpc_services_share_provider() {
        let mut config = EnterL2Config::default();
        config.network.l2_rpc_url = "http://127.0.0.1:1".to_string();
        let services = Services::rpc(Arc::new(config)).unwrap();
        // five facades plus the provider handle itself
        assert_eq!(Arc::strong_count(&services.provider), 6);
    }
}
