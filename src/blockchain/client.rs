//! Alloy-backed provider facade with endpoint failover and timeouts.
//!
//! # Responsibilities
//! - Connect to the L2 JSON-RPC endpoint (plus failovers and optional L1)
//! - Query chain state (network info, balances, transactions, receipts)
//! - Hold the signing session bound by `set_account`
//! - Handle timeouts and network errors gracefully

use alloy::consensus::Transaction as ConsensusTransaction;
use alloy::network::TransactionResponse as _;
use alloy::primitives::{Address, TxHash, U256};
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use arc_swap::ArcSwapOption;
use async_trait::async_trait;
use std::fmt::Display;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::timeout;
use url::Url;

use crate::blockchain::transaction::{
    wait_for_confirmation, FeePolicy, PollSchedule, ReceiptInfo, ReceiptSource,
};
use crate::blockchain::types::{
    ChainId, NetworkInfo, TransactionKind, TransactionResponse, TransactionStatus,
};
use crate::blockchain::wallet::Wallet;
use crate::blockchain::ChainProvider;
use crate::config::{validate_config, ConfigError, EnterL2Config};
use crate::error::{EnterL2Error, Result, TransactionError};
use crate::observability::metrics;
use crate::services::contracts::IERC20;

/// Signing identity plus the providers that sign with it.
pub struct SigningSession {
    pub wallet: Wallet,
    /// Signs on L2.
    pub l2: DynProvider,
    /// Signs on L1, when an L1 endpoint is configured.
    pub l1: Option<DynProvider>,
}

/// Provider facade over one or more L2 endpoints.
pub struct RpcProvider {
    /// Read providers (primary + failovers).
    providers: Vec<DynProvider>,
    l2_url: Url,
    l1_url: Option<Url>,
    config: Arc<EnterL2Config>,
    timeout_duration: Duration,
    fees: FeePolicy,
    session: ArcSwapOption<SigningSession>,
    closed: AtomicBool,
}

impl RpcProvider {
    /// Create a provider from a validated configuration.
    ///
    /// No network round trip happens here.
    pub fn new(config: Arc<EnterL2Config>) -> Result<Self> {
        validate_config(&config).map_err(ConfigError::Validation)?;

        let network = &config.network;
        let l2_url: Url = network.l2_rpc_url.parse().map_err(|e| {
            EnterL2Error::Network(format!("Invalid RPC URL '{}': {}", network.l2_rpc_url, e))
        })?;

        let mut providers = vec![ProviderBuilder::new().connect_http(l2_url.clone()).erased()];
        for url_str in &network.failover_urls {
            match url_str.parse::<Url>() {
                Ok(url) => providers.push(ProviderBuilder::new().connect_http(url).erased()),
                Err(_) => tracing::warn!(url = %url_str, "Ignoring invalid failover RPC URL"),
            }
        }

        let l1_url = match &network.l1_rpc_url {
            Some(url_str) => Some(url_str.parse::<Url>().map_err(|e| {
                EnterL2Error::Network(format!("Invalid L1 RPC URL '{}': {}", url_str, e))
            })?),
            None => None,
        };

        tracing::info!(
            network = %network.name,
            rpc_url = %network.l2_rpc_url,
            failovers = providers.len() - 1,
            chain_id = network.chain_id,
            l1 = l1_url.is_some(),
            "Provider initialized"
        );

        Ok(Self {
            providers,
            l2_url,
            l1_url,
            timeout_duration: config.timeout(),
            fees: FeePolicy::new(&config.fees),
            config,
            session: ArcSwapOption::empty(),
            closed: AtomicBool::new(false),
        })
    }

    /// Run one read against each endpoint in turn until one answers.
    async fn with_failover<T, E, F, Fut>(&self, method: &'static str, call: F) -> Result<T>
    where
        F: Fn(DynProvider) -> Fut,
        Fut: Future<Output = std::result::Result<T, E>>,
        E: Display,
    {
        self.ensure_open()?;
        let start = Instant::now();

        for (i, provider) in self.providers.iter().enumerate() {
            match timeout(self.timeout_duration, call(provider.clone())).await {
                Ok(Ok(result)) => {
                    metrics::record_rpc(method, "ok", start);
                    return Ok(result);
                }
                Ok(Err(e)) => {
                    tracing::warn!(provider_idx = i, method, error = %e, "RPC error, trying next provider");
                }
                Err(_) => {
                    tracing::warn!(provider_idx = i, method, "RPC timeout, trying next provider");
                }
            }
        }

        metrics::record_rpc(method, "error", start);
        Err(EnterL2Error::Network(format!(
            "All RPC providers failed: {}",
            method
        )))
    }

    fn ensure_open(&self) -> Result<()> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(EnterL2Error::Network("provider closed".to_string()));
        }
        Ok(())
    }

    /// Get the chain ID from the RPC.
    pub async fn get_chain_id(&self) -> Result<ChainId> {
        self.with_failover("eth_chainId", |p| async move { p.get_chain_id().await })
            .await
            .map(ChainId)
    }

    /// Get the latest block number.
    pub async fn get_block_number(&self) -> Result<u64> {
        self.with_failover("eth_blockNumber", |p| async move { p.get_block_number().await })
            .await
    }

    /// Get current gas price in wei.
    pub async fn get_gas_price(&self) -> Result<u128> {
        self.with_failover("eth_gasPrice", |p| async move { p.get_gas_price().await })
            .await
    }

    /// Get a transaction receipt by hash.
    pub async fn get_receipt(&self, hash: TxHash) -> Result<Option<ReceiptInfo>> {
        let receipt = self
            .with_failover("eth_getTransactionReceipt", move |p| async move {
                p.get_transaction_receipt(hash).await
            })
            .await?;

        Ok(receipt.map(|r| ReceiptInfo {
            success: r.status(),
            block_number: r.block_number,
            gas_used: r.gas_used,
        }))
    }

    /// Gas price for a transaction submitted through `provider`, after the fee policy.
    pub async fn gas_price_on(&self, provider: &DynProvider) -> Result<u128> {
        let node_price = match timeout(self.timeout_duration, provider.get_gas_price()).await {
            Ok(Ok(price)) => price,
            Ok(Err(e)) => return Err(EnterL2Error::Network(format!("eth_gasPrice failed: {}", e))),
            Err(_) => return Err(EnterL2Error::Network("eth_gasPrice timed out".to_string())),
        };
        self.fees.gas_price(node_price)
    }

    /// The active signing session, or `NotConnected`.
    pub fn signing_session(&self) -> Result<Arc<SigningSession>> {
        self.ensure_open()?;
        self.session.load_full().ok_or(EnterL2Error::NotConnected)
    }

    /// Get the configuration.
    pub fn config(&self) -> &EnterL2Config {
        &self.config
    }

    fn build_session(&self, wallet: Wallet) -> SigningSession {
        let l2 = ProviderBuilder::new()
            .wallet(wallet.signer().clone())
            .connect_http(self.l2_url.clone())
            .erased();

        let l1 = self.l1_url.clone().map(|url| {
            let l1_wallet = match self.config.network.l1_chain_id {
                Some(chain_id) => wallet.for_chain(chain_id),
                None => wallet.clone(),
            };
            ProviderBuilder::new()
                .wallet(l1_wallet.signer().clone())
                .connect_http(url)
                .erased()
        });

        SigningSession { wallet, l2, l1 }
    }
}

#[async_trait]
impl ReceiptSource for RpcProvider {
    async fn receipt(&self, hash: TxHash) -> Result<Option<ReceiptInfo>> {
        self.get_receipt(hash).await
    }

    async fn block_number(&self) -> Result<u64> {
        self.get_block_number().await
    }
}

#[async_trait]
impl ChainProvider for RpcProvider {
    async fn get_network_info(&self) -> Result<NetworkInfo> {
        let (chain_id, block_number, gas_price) = tokio::try_join!(
            self.get_chain_id(),
            self.get_block_number(),
            self.get_gas_price()
        )?;

        Ok(NetworkInfo {
            name: self.config.network.name.clone(),
            chain_id,
            block_number,
            gas_price,
        })
    }

    async fn get_balance(&self, address: Address, token: Option<Address>) -> Result<U256> {
        match token {
            None => {
                self.with_failover("eth_getBalance", move |p| async move {
                    p.get_balance(address).await
                })
                .await
            }
            Some(token) => {
                self.with_failover("erc20_balanceOf", move |p| async move {
                    let erc20 = IERC20::new(token, p);
                    let balance = erc20.balanceOf(address).call().await;
                    balance
                })
                .await
            }
        }
    }

    async fn get_token_decimals(&self, token: Address) -> Result<u8> {
        self.with_failover("erc20_decimals", move |p| async move {
            let erc20 = IERC20::new(token, p);
            let decimals = erc20.decimals().call().await;
            decimals
        })
        .await
    }

    async fn get_transaction(&self, hash: TxHash) -> Result<Option<TransactionResponse>> {
        let tx = self
            .with_failover("eth_getTransactionByHash", move |p| async move {
                p.get_transaction_by_hash(hash).await
            })
            .await?;

        let Some(tx) = tx else {
            return Ok(None);
        };

        let mut response = TransactionResponse::pending(hash, TransactionKind::Other)
            .with_from(tx.from())
            .with_amount(ConsensusTransaction::value(&tx));
        response.to = ConsensusTransaction::to(&tx);

        if let Some(receipt) = self.get_receipt(hash).await? {
            response.status = if receipt.success {
                TransactionStatus::Confirmed
            } else {
                TransactionStatus::Failed
            };
            response.block_number = receipt.block_number;
            response.gas_used = Some(receipt.gas_used);
        }

        Ok(Some(response))
    }

    async fn wait_for_transaction(
        &self,
        hash: TxHash,
        confirmations: u64,
        timeout: Duration,
    ) -> Result<TransactionResponse> {
        let schedule = PollSchedule {
            base_ms: self.config.network.poll_interval_ms,
            max_ms: self.config.network.max_poll_interval_ms,
        };
        let receipt = wait_for_confirmation(self, hash, confirmations, timeout, schedule).await?;

        let mut response = self
            .get_transaction(hash)
            .await?
            .ok_or(TransactionError::NotFound { hash })?;
        response.status = TransactionStatus::Confirmed;
        response.block_number = receipt.block_number;
        response.gas_used = Some(receipt.gas_used);

        tracing::info!(
            tx_hash = %hash,
            block_number = ?receipt.block_number,
            confirmations,
            "Transaction confirmed"
        );
        Ok(response)
    }

    fn set_account(&self, account: Option<Wallet>) {
        let session = account.map(|wallet| Arc::new(self.build_session(wallet)));
        self.session.store(session);
    }

    async fn close(&self) -> Result<()> {
        self.session.store(None);
        self.closed.store(true, Ordering::SeqCst);
        tracing::debug!(network = %self.config.network.name, "Provider closed");
        Ok(())
    }
}

impl std::fmt::Debug for RpcProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RpcProvider")
            .field("rpc_url", &self.config.network.l2_rpc_url)
            .field("chain_id", &self.config.network.chain_id)
            .field("endpoints", &self.providers.len())
            .field("timeout_secs", &self.config.network.timeout_secs)
            .field("closed", &self.closed.load(Ordering::SeqCst))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_PRIVATE_KEY: &str =
        "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    fn test_config() -> EnterL2Config {
        let mut config = EnterL2Config::default();
        // Nothing listens on port 1
        config.network.l2_rpc_url = "http://127.0.0.1:1".to_string();
        config.network.timeout_secs = 2;
        config
    }

    #[test]
    fn test_provider_creation() {
        let provider = RpcProvider::new(Arc::new(test_config())).unwrap();
        assert_eq!(provider.providers.len(), 1);
        assert!(provider.signing_session().is_err());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = test_config();
        config.network.chain_id = 0;
        let err = RpcProvider::new(Arc::new(config)).unwrap_err();
        assert!(matches!(err, EnterL2Error::Config(ConfigError::Validation(_))));
    }

    #[tokio::test]
    async fn test_rpc_failover() {
        let mut config = test_config();
        config.network.failover_urls.push("http://127.0.0.1:2".to_string());
        let provider = RpcProvider::new(Arc::new(config)).unwrap();
        assert_eq!(provider.providers.len(), 2);

        let err = provider.get_chain_id().await.unwrap_err();
        assert!(matches!(err, EnterL2Error::Network(_)));
        assert!(err.to_string().contains("All RPC providers failed"));
    }

    #[test]
    fn test_set_account_swaps_session() {
        let provider = RpcProvider::new(Arc::new(test_config())).unwrap();
        let wallet = Wallet::from_private_key(TEST_PRIVATE_KEY, 31337).unwrap();
        let address = wallet.address();

        provider.set_account(Some(wallet));
        let session = provider.signing_session().unwrap();
        assert_eq!(session.wallet.address(), address);
        assert!(session.l1.is_none());

        provider.set_account(None);
        assert!(matches!(
            provider.signing_session(),
            Err(EnterL2Error::NotConnected)
        ));
    }

    #[test]
    fn test_l1_session_uses_l1_chain() {
        let mut config = test_config();
        config.network.l1_rpc_url = Some("http://127.0.0.1:3".to_string());
        config.network.l1_chain_id = Some(11155111);
        let provider = RpcProvider::new(Arc::new(config)).unwrap();

        provider.set_account(Some(Wallet::from_private_key(TEST_PRIVATE_KEY, 31337).unwrap()));
        assert!(provider.signing_session().unwrap().l1.is_some());
    }

    #[tokio::test]
    async fn test_closed_provider_refuses_calls() {
        let provider = RpcProvider::new(Arc::new(test_config())).unwrap();
        provider.set_account(Some(Wallet::from_private_key(TEST_PRIVATE_KEY, 31337).unwrap()));

        provider.close().await.unwrap();

        let err = provider.get_block_number().await.unwrap_err();
        assert_eq!(err.to_string(), "Network error: provider closed");
        assert!(provider.signing_session().is_err());
    }
}
