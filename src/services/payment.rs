//! Payments: native value transfers and ERC-20 transfers on L2.

use alloy::network::TransactionBuilder;
use alloy::providers::Provider;
use alloy::rpc::types::TransactionRequest;
use async_trait::async_trait;
use std::sync::Arc;

use crate::blockchain::{RpcProvider, TransactionKind, TransactionResponse};
use crate::error::Result;
use crate::services::contracts::IERC20;
use crate::services::{rejected, submitted, PaymentRequest, PaymentService};

pub struct RpcPayments {
    rpc: Arc<RpcProvider>,
}

impl RpcPayments {
    pub fn new(rpc: Arc<RpcProvider>) -> Self {
        Self { rpc }
    }
}

#[async_trait]
impl PaymentService for RpcPayments {
    async fn send_payment(&self, request: PaymentRequest) -> Result<TransactionResponse> {
        let session = self.rpc.signing_session()?;
        let gas_price = self.rpc.gas_price_on(&session.l2).await?;
        let from = session.wallet.address();

        let hash = match request.token_address {
            None => {
                let tx = TransactionRequest::default()
                    .with_from(from)
                    .with_to(request.to)
                    .with_value(request.amount)
                    .with_gas_price(gas_price);
                let pending = session.l2.send_transaction(tx).await.map_err(rejected)?;
                *pending.tx_hash()
            }
            Some(token) => {
                let erc20 = IERC20::new(token, session.l2.clone());
                let pending = erc20
                    .transfer(request.to, request.amount)
                    .gas_price(gas_price)
                    .send()
                    .await
                    .map_err(rejected)?;
                *pending.tx_hash()
            }
        };

        Ok(submitted(TransactionKind::Transfer, hash, from)
            .with_to(request.to)
            .with_amount(request.amount)
            .with_token(request.token_address)
            .with_description(request.description))
    }
}
