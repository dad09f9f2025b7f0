//! Smart wallet creation through the wallet factory.

use alloy::primitives::{Address, U256};
use async_trait::async_trait;
use std::sync::Arc;

use crate::blockchain::{MerchantOptions, RpcProvider, TransactionKind, WalletKind};
use crate::error::{EnterL2Error, Result, TransactionError};
use crate::services::contracts::IWalletFactory;
use crate::services::{contract, rejected, submitted, WalletManager};

pub struct RpcWallets {
    rpc: Arc<RpcProvider>,
}

impl RpcWallets {
    pub fn new(rpc: Arc<RpcProvider>) -> Self {
        Self { rpc }
    }
}

#[async_trait]
impl WalletManager for RpcWallets {
    /// The wallet address is read from a simulation of the factory call,
    /// then the call is sent and its receipt checked.
    async fn create_wallet(
        &self,
        kind: WalletKind,
        options: Option<MerchantOptions>,
    ) -> Result<Address> {
        let session = self.rpc.signing_session()?;
        let factory_address =
            contract(self.rpc.config().contracts.wallet_factory, "wallet_factory")?;
        let gas_price = self.rpc.gas_price_on(&session.l2).await?;
        let owner = session.wallet.address();

        let factory = IWalletFactory::new(factory_address, session.l2.clone());
        let (wallet, pending) = match kind {
            WalletKind::Consumer => {
                let call = factory.createConsumerWallet(owner);
                let wallet = call.call().await.map_err(rejected)?;
                let pending = call.gas_price(gas_price).send().await.map_err(rejected)?;
                (wallet, pending)
            }
            WalletKind::Merchant => {
                let options = options.unwrap_or_default();
                let call = factory.createMerchantWallet(
                    owner,
                    options.whitelist_enabled,
                    options.daily_limit.unwrap_or(U256::ZERO),
                );
                let wallet = call.call().await.map_err(rejected)?;
                let pending = call.gas_price(gas_price).send().await.map_err(rejected)?;
                (wallet, pending)
            }
        };

        let hash = *pending.tx_hash();
        submitted(TransactionKind::WalletCreation, hash, owner);

        let receipt = pending
            .with_timeout(Some(self.rpc.config().timeout()))
            .get_receipt()
            .await
            .map_err(|e| {
                EnterL2Error::Network(format!("Receipt for {} unavailable: {}", hash, e))
            })?;
        if !receipt.status() {
            return Err(TransactionError::Reverted { hash }.into());
        }

        tracing::info!(wallet = %wallet, kind = ?kind, owner = %owner, "Wallet created");
        Ok(wallet)
    }
}
