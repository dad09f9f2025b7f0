//! Error taxonomy for the SDK.
//!
//! Session-guard failures (`NotConnected`) and key parsing failures
//! (`Connection`) are raised locally. `Network` and `Transaction` come from
//! the provider facade and are passed through the client untouched.

use alloy::primitives::TxHash;
use alloy::signers::local::LocalSignerError;
use std::time::Duration;
use thiserror::Error;

use crate::config::ConfigError;

/// Errors that can occur while using the Enter L2 client.
#[derive(Debug, Error)]
pub enum EnterL2Error {
    /// Malformed key material or a connect-time failure.
    #[error("Failed to connect: {0}")]
    Connection(#[source] LocalSignerError),

    /// A call that needs a signing identity was made without one.
    #[error("Client not connected")]
    NotConnected,

    /// RPC or transport failure.
    #[error("Network error: {0}")]
    Network(String),

    /// The local signer could not produce a signature.
    #[error("Signing failed: {0}")]
    Signing(String),

    /// An amount string that does not parse in the token's units.
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// On-chain failure.
    #[error(transparent)]
    Transaction(#[from] TransactionError),

    /// Configuration problem (file, validation, missing contract).
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl EnterL2Error {
    /// True for the session-guard failure.
    pub fn is_not_connected(&self) -> bool {
        matches!(self, EnterL2Error::NotConnected)
    }
}

/// On-chain failures reported by the provider facade.
#[derive(Debug, Error)]
pub enum TransactionError {
    /// Transaction was mined but reverted.
    #[error("Transaction {hash} reverted")]
    Reverted { hash: TxHash },

    /// Transaction was not confirmed before the deadline.
    #[error("Transaction {hash} not confirmed within {timeout:?}")]
    ConfirmationTimeout { hash: TxHash, timeout: Duration },

    /// Gas price exceeded the configured cap. `current_gwei` is rounded up.
    #[error("Gas price {current_gwei} gwei exceeds maximum {max_gwei} gwei")]
    GasPriceTooHigh { current_gwei: u64, max_gwei: u64 },

    /// The node refused the transaction (estimation failure, bad nonce, ...).
    #[error("Transaction rejected: {0}")]
    Rejected(String),

    /// No transaction with this hash is known to the node.
    #[error("Transaction {hash} not found")]
    NotFound { hash: TxHash },
}

/// Result type for SDK operations.
pub type Result<T> = std::result::Result<T, EnterL2Error>;
