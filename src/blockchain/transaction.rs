//! Fee policy and confirmation monitoring.
//!
//! # Responsibilities
//! - Price outgoing transactions (gas price cap + multiplier)
//! - Poll receipts until the requested confirmation depth or the deadline

use alloy::primitives::TxHash;
use async_trait::async_trait;
use std::time::Duration;
use tokio::time::{sleep, timeout};

use crate::blockchain::backoff::poll_delay;
use crate::config::FeeConfig;
use crate::error::{EnterL2Error, Result, TransactionError};

const WEI_PER_GWEI: u128 = 1_000_000_000;

/// Gas pricing rules applied to every transaction the SDK submits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeePolicy {
    multiplier: f64,
    max_gas_price_gwei: u64,
}

impl FeePolicy {
    pub fn new(config: &FeeConfig) -> Self {
        Self {
            multiplier: config.gas_price_multiplier,
            max_gas_price_gwei: config.max_gas_price_gwei,
        }
    }

    /// Gas price to submit with, given the node's current estimate in wei.
    pub fn gas_price(&self, node_gas_price: u128) -> Result<u128> {
        let max_wei = self.max_gas_price_gwei as u128 * WEI_PER_GWEI;
        if node_gas_price > max_wei {
            return Err(TransactionError::GasPriceTooHigh {
                current_gwei: u64::try_from(node_gas_price.div_ceil(WEI_PER_GWEI))
                    .unwrap_or(u64::MAX),
                max_gwei: self.max_gas_price_gwei,
            }
            .into());
        }

        // Never exceed the cap after applying the buffer.
        let adjusted = (node_gas_price as f64 * self.multiplier) as u128;
        Ok(adjusted.min(max_wei))
    }
}

/// The parts of a receipt the confirmation loop looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReceiptInfo {
    pub success: bool,
    pub block_number: Option<u64>,
    pub gas_used: u64,
}

/// Where the confirmation loop reads chain state from.
#[async_trait]
pub trait ReceiptSource: Send + Sync {
    async fn receipt(&self, hash: TxHash) -> Result<Option<ReceiptInfo>>;
    async fn block_number(&self) -> Result<u64>;
}

/// Receipt poll schedule.
#[derive(Debug, Clone, Copy)]
pub struct PollSchedule {
    pub base_ms: u64,
    pub max_ms: u64,
}

/// Wait until `hash` has `confirmations` blocks (the mining block counts
/// as the first), or fail once `deadline` has elapsed.
///
/// `confirmations` of 0 or 1 both return as soon as a receipt exists.
/// A reverted receipt fails immediately with `Reverted`.
pub async fn wait_for_confirmation<S>(
    source: &S,
    hash: TxHash,
    confirmations: u64,
    deadline: Duration,
    schedule: PollSchedule,
) -> Result<ReceiptInfo>
where
    S: ReceiptSource + ?Sized,
{
    let result = timeout(deadline, async {
        let mut attempt = 0u32;

        loop {
            sleep(poll_delay(attempt, schedule.base_ms, schedule.max_ms)).await;
            attempt = attempt.saturating_add(1);

            let receipt = match source.receipt(hash).await {
                Ok(Some(r)) => r,
                Ok(None) => {
                    tracing::debug!(tx_hash = %hash, "Transaction pending");
                    continue;
                }
                Err(e) => {
                    tracing::warn!(tx_hash = %hash, error = %e, "Receipt lookup failed, polling again");
                    continue;
                }
            };

            if !receipt.success {
                return Err(EnterL2Error::from(TransactionError::Reverted { hash }));
            }

            if confirmations <= 1 {
                return Ok(receipt);
            }

            let current_block = match source.block_number().await {
                Ok(n) => n,
                Err(e) => {
                    tracing::warn!(error = %e, "Block number lookup failed, polling again");
                    continue;
                }
            };
            let tx_block = receipt.block_number.unwrap_or(current_block);
            let depth = current_block.saturating_sub(tx_block) + 1;

            if depth >= confirmations {
                return Ok(receipt);
            }

            tracing::debug!(
                tx_hash = %hash,
                confirmations = depth,
                required = confirmations,
                "Waiting for confirmations"
            );
        }
    })
    .await;

    match result {
        Ok(outcome) => outcome,
        Err(_) => Err(TransactionError::ConfirmationTimeout {
            hash,
            timeout: deadline,
        }
        .into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};

    const FAST: PollSchedule = PollSchedule { base_ms: 1, max_ms: 2 };

    /// Receipt appears after `pending_polls` lookups; the chain advances one
    /// block per `block_number` call.
    struct FakeChain {
        pending_polls: u64,
        polls: AtomicU64,
        head: AtomicU64,
        success: bool,
        mined_at: u64,
    }

    impl FakeChain {
        fn new(pending_polls: u64, success: bool) -> Self {
            Self {
                pending_polls,
                polls: AtomicU64::new(0),
                head: AtomicU64::new(100),
                success,
                mined_at: 100,
            }
        }
    }

    #[async_trait]
    impl ReceiptSource for FakeChain {
        async fn receipt(&self, _hash: TxHash) -> Result<Option<ReceiptInfo>> {
            if self.polls.fetch_add(1, Ordering::SeqCst) < self.pending_polls {
                return Ok(None);
            }
            Ok(Some(ReceiptInfo {
                success: self.success,
                block_number: Some(self.mined_at),
                gas_used: 21_000,
            }))
        }

        async fn block_number(&self) -> Result<u64> {
            Ok(self.head.fetch_add(1, Ordering::SeqCst))
        }
    }

    #[test]
    fn test_fee_policy_applies_multiplier() {
        let policy = FeePolicy::new(&FeeConfig {
            gas_price_multiplier: 1.5,
            max_gas_price_gwei: 100,
            confirmation_blocks: 1,
        });
        assert_eq!(policy.gas_price(10 * WEI_PER_GWEI).unwrap(), 15 * WEI_PER_GWEI);
    }

    #[test]
    fn test_fee_policy_caps_buffered_price() {
        let policy = FeePolicy::new(&FeeConfig {
            gas_price_multiplier: 2.0,
            max_gas_price_gwei: 100,
            confirmation_blocks: 1,
        });
        assert_eq!(policy.gas_price(90 * WEI_PER_GWEI).unwrap(), 100 * WEI_PER_GWEI);
    }

    #[test]
    fn test_fee_policy_rejects_spikes() {
        let policy = FeePolicy::new(&FeeConfig::default());
        let err = policy.gas_price(600 * WEI_PER_GWEI).unwrap_err();
        assert!(matches!(
            err,
            EnterL2Error::Transaction(TransactionError::GasPriceTooHigh {
                current_gwei: 600,
                max_gwei: 500
            })
        ));
    }

    #[test]
    fn test_fee_policy_rejects_fractional_gwei_over_cap() {
        let policy = FeePolicy::new(&FeeConfig::default());
        let err = policy
            .gas_price(500 * WEI_PER_GWEI + 900_000_000)
            .unwrap_err();
        assert!(matches!(
            err,
            EnterL2Error::Transaction(TransactionError::GasPriceTooHigh {
                current_gwei: 501,
                max_gwei: 500
            })
        ));

        // exactly at the cap is still accepted, then capped after the buffer
        assert_eq!(
            policy.gas_price(500 * WEI_PER_GWEI).unwrap(),
            500 * WEI_PER_GWEI
        );
    }

    #[tokio::test]
    async fn test_wait_returns_once_mined() {
        let chain = FakeChain::new(3, true);
        let receipt = wait_for_confirmation(&chain, TxHash::ZERO, 1, Duration::from_secs(5), FAST)
            .await
            .unwrap();
        assert_eq!(receipt.block_number, Some(100));
        assert_eq!(chain.polls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn test_wait_for_depth() {
        let chain = FakeChain::new(0, true);
        wait_for_confirmation(&chain, TxHash::ZERO, 3, Duration::from_secs(5), FAST)
            .await
            .unwrap();
        // head 100, 101 are too shallow; 102 gives depth 3
        assert_eq!(chain.head.load(Ordering::SeqCst), 103);
    }

    #[tokio::test]
    async fn test_reverted_fails_fast() {
        let chain = FakeChain::new(0, false);
        let err = wait_for_confirmation(&chain, TxHash::ZERO, 1, Duration::from_secs(5), FAST)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            EnterL2Error::Transaction(TransactionError::Reverted { .. })
        ));
    }

    #[tokio::test]
    async fn test_deadline() {
        let chain = FakeChain::new(u64::MAX, true);
        let err = wait_for_confirmation(&chain, TxHash::ZERO, 1, Duration::from_millis(50), FAST)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            EnterL2Error::Transaction(TransactionError::ConfirmationTimeout { timeout, .. })
                if timeout == Duration::from_millis(50)
        ));
        assert!(err.to_string().ends_with("within 50ms"));
    }
}
