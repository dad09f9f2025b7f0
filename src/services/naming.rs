//! Name registration.

use alloy::primitives::Address;
use async_trait::async_trait;
use std::sync::Arc;

use crate::blockchain::{RpcProvider, TransactionKind, TransactionResponse};
use crate::error::Result;
use crate::services::contracts::INameRegistry;
use crate::services::{contract, rejected, submitted, NameRegistration, NamingService};

pub struct RpcNaming {
    rpc: Arc<RpcProvider>,
}

impl RpcNaming {
    pub fn new(rpc: Arc<RpcProvider>) -> Self {
        Self { rpc }
    }
}

/// Explicit resolver, else the configured default, else the zero address.
pub fn resolve_resolver(requested: Option<Address>, default: Option<Address>) -> Address {
    requested.or(default).unwrap_or(Address::ZERO)
}

#[async_trait]
impl NamingService for RpcNaming {
    async fn register_name(&self, request: NameRegistration) -> Result<TransactionResponse> {
        let session = self.rpc.signing_session()?;
        let contracts = &self.rpc.config().contracts;
        let registry_address = contract(contracts.name_registry, "name_registry")?;
        let resolver = resolve_resolver(request.resolver, contracts.default_resolver);
        let gas_price = self.rpc.gas_price_on(&session.l2).await?;

        let registry = INameRegistry::new(registry_address, session.l2.clone());
        let pending = registry
            .register(request.name.clone(), resolver)
            .gas_price(gas_price)
            .send()
            .await
            .map_err(rejected)?;

        tracing::debug!(name = %request.name, resolver = %resolver, "Name registration sent");

        Ok(
            submitted(TransactionKind::NameRegistration, *pending.tx_hash(), session.wallet.address())
                .with_to(registry_address)
                .with_description(Some(request.name)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolver_fallback() {
        let explicit = Address::repeat_byte(1);
        let default = Address::repeat_byte(2);

        assert_eq!(resolve_resolver(Some(explicit), Some(default)), explicit);
        assert_eq!(resolve_resolver(None, Some(default)), default);
        assert_eq!(resolve_resolver(None, None), Address::ZERO);
    }
}
