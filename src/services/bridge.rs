//! Bridge: deposits are sent on L1, withdrawals on L2.

use async_trait::async_trait;
use std::sync::Arc;

use crate::blockchain::{RpcProvider, TransactionKind, TransactionResponse};
use crate::config::ConfigError;
use crate::error::Result;
use crate::services::contracts::{IL1Bridge, IL2Bridge};
use crate::services::{contract, rejected, submitted, BridgeRequest, BridgeService};

pub struct RpcBridge {
    rpc: Arc<RpcProvider>,
}

impl RpcBridge {
    pub fn new(rpc: Arc<RpcProvider>) -> Self {
        Self { rpc }
    }
}

#[async_trait]
impl BridgeService for RpcBridge {
    async fn deposit(&self, request: BridgeRequest) -> Result<TransactionResponse> {
        let session = self.rpc.signing_session()?;
        let bridge_address = contract(self.rpc.config().contracts.l1_bridge, "l1_bridge")?;
        let l1 = session.l1.clone().ok_or(ConfigError::MissingL1Endpoint)?;
        let gas_price = self.rpc.gas_price_on(&l1).await?;

        let bridge = IL1Bridge::new(bridge_address, l1);
        let pending = bridge
            .depositERC20(request.token, request.amount, request.recipient)
            .gas_price(gas_price)
            .send()
            .await
            .map_err(rejected)?;

        Ok(
            submitted(TransactionKind::Deposit, *pending.tx_hash(), session.wallet.address())
                .with_to(request.recipient)
                .with_amount(request.amount)
                .with_token(Some(request.token)),
        )
    }

    async fn withdraw(&self, request: BridgeRequest) -> Result<TransactionResponse> {
        let session = self.rpc.signing_session()?;
        let bridge_address = contract(self.rpc.config().contracts.l2_bridge, "l2_bridge")?;
        let gas_price = self.rpc.gas_price_on(&session.l2).await?;

        let bridge = IL2Bridge::new(bridge_address, session.l2.clone());
        let pending = bridge
            .withdraw(request.token, request.amount, request.recipient)
            .gas_price(gas_price)
            .send()
            .await
            .map_err(rejected)?;

        Ok(
            submitted(TransactionKind::Withdrawal, *pending.tx_hash(), session.wallet.address())
                .with_to(request.recipient)
                .with_amount(request.amount)
                .with_token(Some(request.token)),
        )
    }
}
