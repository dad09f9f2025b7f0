//! Signing identity derived from secret key material.
//!
//! # Security
//! - Keys are never logged or serialized
//! - The CLI reads key material only from an environment variable

use alloy::primitives::Address;
use alloy::signers::local::PrivateKeySigner;
use alloy::signers::{Signature, Signer};
use std::env;

use crate::error::{EnterL2Error, Result};

/// Environment variable name for the private key.
pub const PRIVATE_KEY_ENV_VAR: &str = "ENTERL2_PRIVATE_KEY";

/// A local signing identity bound to one chain.
#[derive(Debug, Clone)]
pub struct Wallet {
    signer: PrivateKeySigner,
}

impl Wallet {
    /// Create a wallet from a hex-encoded private key string.
    ///
    /// # Arguments
    /// * `private_key_hex` - Hex string (with or without 0x prefix)
    /// * `chain_id` - Chain ID for EIP-155 replay protection
    pub fn from_private_key(private_key_hex: &str, chain_id: u64) -> Result<Self> {
        let key_hex = private_key_hex.trim();
        let key_hex = key_hex.strip_prefix("0x").unwrap_or(key_hex);

        let signer = key_hex
            .parse::<PrivateKeySigner>()
            .map_err(EnterL2Error::Connection)?
            .with_chain_id(Some(chain_id));

        Ok(Self { signer })
    }

    /// Load wallet from `ENTERL2_PRIVATE_KEY`.
    ///
    /// Returns `Ok(None)` when the variable is not set.
    pub fn from_env(chain_id: u64) -> Result<Option<Self>> {
        match env::var(PRIVATE_KEY_ENV_VAR) {
            Ok(key) => Self::from_private_key(&key, chain_id).map(Some),
            Err(_) => Ok(None),
        }
    }

    /// Get the wallet's address.
    pub fn address(&self) -> Address {
        self.signer.address()
    }

    /// Chain ID this wallet signs for.
    pub fn chain_id(&self) -> Option<u64> {
        self.signer.chain_id()
    }

    /// The same key, signing for another chain (used for L1 bridge calls).
    pub fn for_chain(&self, chain_id: u64) -> Self {
        Self {
            signer: self.signer.clone().with_chain_id(Some(chain_id)),
        }
    }

    /// Underlying alloy signer.
    pub fn signer(&self) -> &PrivateKeySigner {
        &self.signer
    }

    /// Sign arbitrary message bytes (EIP-191 prefixed).
    pub async fn sign_message(&self, message: &[u8]) -> Result<Signature> {
        self.signer
            .sign_message(message)
            .await
            .map_err(|e| EnterL2Error::Signing(e.to_string()))
    }
}
