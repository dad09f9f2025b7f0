//! Chain-facing value types shared by the provider and the domain services.

use alloy::primitives::{Address, TxHash, U256};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Chain ID type for strong typing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChainId(pub u64);

impl From<u64> for ChainId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl From<ChainId> for u64 {
    fn from(id: ChainId) -> Self {
        id.0
    }
}

/// Snapshot of the network the client talks to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkInfo {
    pub name: String,
    pub chain_id: ChainId,
    pub block_number: u64,
    /// Current gas price in wei.
    pub gas_price: u128,
}

/// What a transaction was submitted for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Transfer,
    Deposit,
    Withdrawal,
    NameRegistration,
    Staking,
    Unstaking,
    RewardClaim,
    WalletCreation,
    /// Looked up by hash; the SDK did not submit it.
    Other,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Transfer => "transfer",
            TransactionKind::Deposit => "deposit",
            TransactionKind::Withdrawal => "withdrawal",
            TransactionKind::NameRegistration => "name_registration",
            TransactionKind::Staking => "staking",
            TransactionKind::Unstaking => "unstaking",
            TransactionKind::RewardClaim => "reward_claim",
            TransactionKind::WalletCreation => "wallet_creation",
            TransactionKind::Other => "other",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Transaction lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    /// Broadcast, no receipt yet.
    Pending,
    /// Mined successfully.
    Confirmed,
    /// Mined and reverted.
    Failed,
}

/// Transaction as reported back to SDK callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionResponse {
    pub hash: TxHash,
    pub kind: TransactionKind,
    pub status: TransactionStatus,
    pub from: Option<Address>,
    pub to: Option<Address>,
    /// Native value or token amount, in base units.
    pub amount: U256,
    /// Token contract, `None` for the native token.
    pub token: Option<Address>,
    pub block_number: Option<u64>,
    pub gas_used: Option<u64>,
    pub description: Option<String>,
}

impl TransactionResponse {
    /// A freshly broadcast transaction.
    pub fn pending(hash: TxHash, kind: TransactionKind) -> Self {
        Self {
            hash,
            kind,
            status: TransactionStatus::Pending,
            from: None,
            to: None,
            amount: U256::ZERO,
            token: None,
            block_number: None,
            gas_used: None,
            description: None,
        }
    }

    pub fn with_from(mut self, from: Address) -> Self {
        self.from = Some(from);
        self
    }

    pub fn with_to(mut self, to: Address) -> Self {
        self.to = Some(to);
        self
    }

    pub fn with_amount(mut self, amount: U256) -> Self {
        self.amount = amount;
        self
    }

    pub fn with_token(mut self, token: Option<Address>) -> Self {
        self.token = token;
        self
    }

    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = description;
        self
    }

    pub fn is_final(&self) -> bool {
        self.status != TransactionStatus::Pending
    }
}

/// Kind of smart wallet created through the wallet factory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WalletKind {
    Consumer,
    Merchant,
}

/// Options accepted when creating a merchant wallet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MerchantOptions {
    /// Only whitelisted recipients may be paid.
    pub whitelist_enabled: bool,
    /// Daily spending limit in base units; `None` means unlimited.
    pub daily_limit: Option<U256>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chain_id_conversion() {
        let chain_id = ChainId::from(1u64);
        assert_eq!(chain_id.0, 1);
        assert_eq!(u64::from(chain_id), 1);
    }

    #[test]
    fn test_pending_response_builder() {
        let tx = TransactionResponse::pending(TxHash::ZERO, TransactionKind::Transfer)
            .with_to(Address::ZERO)
            .with_amount(U256::from(10))
            .with_description(Some("coffee".to_string()));

        assert_eq!(tx.status, TransactionStatus::Pending);
        assert!(!tx.is_final());
        assert_eq!(tx.amount, U256::from(10));
        assert_eq!(tx.token, None);
        assert_eq!(tx.description.as_deref(), Some("coffee"));
    }

    #[test]
    fn test_kind_serializes_snake_case() {
        let json = serde_json::to_string(&TransactionKind::NameRegistration).unwrap();
        assert_eq!(json, "\"name_registration\"");
        assert_eq!(TransactionKind::RewardClaim.to_string(), "reward_claim");
    }
}
