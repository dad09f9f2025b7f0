//! Chain access: the provider facade and its alloy implementation.
//!
//! # Data Flow
//! ```text
//! Client::connect(secret key)
//!     → wallet.rs (key parsing, signing identity)
//!     → ChainProvider::set_account (signing session swap)
//! Client queries
//!     → client.rs (RPC with failover and timeouts)
//!     → transaction.rs (fee policy, confirmation polling)
//! ```
//!
//! # Security Constraints
//! - Never log private keys or sensitive data
//! - All RPC calls have configurable timeouts

pub mod backoff;
pub mod client;
pub mod transaction;
pub mod types;
pub mod wallet;

use alloy::primitives::{Address, TxHash, U256};
use async_trait::async_trait;
use std::time::Duration;

use crate::error::Result;

pub use client::RpcProvider;
pub use transaction::FeePolicy;
pub use types::{
    ChainId, MerchantOptions, NetworkInfo, TransactionKind, TransactionResponse,
    TransactionStatus, WalletKind,
};
pub use wallet::Wallet;

/// Single point of contact with the chain.
///
/// The client delegates every read to this trait and binds the signing
/// identity through `set_account`. Errors are returned as `Network` or
/// `Transaction` and surface to SDK callers unchanged.
#[async_trait]
pub trait ChainProvider: Send + Sync {
    async fn get_network_info(&self) -> Result<NetworkInfo>;

    /// Native balance when `token` is `None`, ERC-20 balance otherwise.
    async fn get_balance(&self, address: Address, token: Option<Address>) -> Result<U256>;

    /// `decimals()` of an ERC-20 token contract.
    async fn get_token_decimals(&self, token: Address) -> Result<u8>;

    /// `None` when the node does not know the hash.
    async fn get_transaction(&self, hash: TxHash) -> Result<Option<TransactionResponse>>;

    async fn wait_for_transaction(
        &self,
        hash: TxHash,
        confirmations: u64,
        timeout: Duration,
    ) -> Result<TransactionResponse>;

    /// Bind or clear the signing identity.
    fn set_account(&self, account: Option<Wallet>);

    async fn close(&self) -> Result<()>;
}
