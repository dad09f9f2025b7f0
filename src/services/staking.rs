//! Staking pool operations.

use alloy::primitives::U256;
use async_trait::async_trait;
use std::sync::Arc;

use crate::blockchain::{RpcProvider, TransactionKind, TransactionResponse};
use crate::error::Result;
use crate::services::contracts::IStakingPool;
use crate::services::{contract, rejected, submitted, StakeRequest, StakingService};

pub struct RpcStaking {
    rpc: Arc<RpcProvider>,
}

impl RpcStaking {
    pub fn new(rpc: Arc<RpcProvider>) -> Self {
        Self { rpc }
    }
}

#[async_trait]
impl StakingService for RpcStaking {
    async fn stake(&self, request: StakeRequest) -> Result<TransactionResponse> {
        let session = self.rpc.signing_session()?;
        let pool_address = contract(self.rpc.config().contracts.staking_pool, "staking_pool")?;
        let gas_price = self.rpc.gas_price_on(&session.l2).await?;

        let pool = IStakingPool::new(pool_address, session.l2.clone());
        let pending = pool
            .stake(request.amount, U256::from(request.lock_period))
            .gas_price(gas_price)
            .send()
            .await
            .map_err(rejected)?;

        Ok(
            submitted(TransactionKind::Staking, *pending.tx_hash(), session.wallet.address())
                .with_to(pool_address)
                .with_amount(request.amount),
        )
    }

    async fn unstake(&self, amount: U256) -> Result<TransactionResponse> {
        let session = self.rpc.signing_session()?;
        let pool_address = contract(self.rpc.config().contracts.staking_pool, "staking_pool")?;
        let gas_price = self.rpc.gas_price_on(&session.l2).await?;

        let pool = IStakingPool::new(pool_address, session.l2.clone());
        let pending = pool
            .unstake(amount)
            .gas_price(gas_price)
            .send()
            .await
            .map_err(rejected)?;

        Ok(
            submitted(TransactionKind::Unstaking, *pending.tx_hash(), session.wallet.address())
                .with_to(pool_address)
                .with_amount(amount),
        )
    }

    async fn claim_rewards(&self) -> Result<TransactionResponse> {
        let session = self.rpc.signing_session()?;
        let pool_address = contract(self.rpc.config().contracts.staking_pool, "staking_pool")?;
        let gas_price = self.rpc.gas_price_on(&session.l2).await?;

        let pool = IStakingPool::new(pool_address, session.l2.clone());
        let pending = pool
            .claimRewards()
            .gas_price(gas_price)
            .send()
            .await
            .map_err(rejected)?;

        Ok(
            submitted(TransactionKind::RewardClaim, *pending.tx_hash(), session.wallet.address())
                .with_to(pool_address),
        )
    }
}
