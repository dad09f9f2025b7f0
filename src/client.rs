//! The Enter L2 client.
//!
//! Owns the configuration, the session guard, the event registry and the
//! service bundle it delegates to. Every call that needs a signing identity
//! checks the session before building a request.

use alloy::primitives::{Address, TxHash, U256};
use alloy::signers::Signature;
use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use serde_json::{json, Value};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::blockchain::{MerchantOptions, NetworkInfo, TransactionResponse, Wallet, WalletKind};
use crate::config::EnterL2Config;
use crate::error::{Result, TransactionError};
use crate::events::{
    Callback, EventDispatcher, FailureSink, EVENT_CONNECTED, EVENT_DISCONNECTED,
    EVENT_TRANSACTION,
};
use crate::services::{BridgeRequest, NameRegistration, PaymentRequest, Services, StakeRequest};
use crate::session::{resolve_recipient, Session};
use crate::utils::{self, NATIVE_DECIMALS};

pub struct Client {
    config: Arc<EnterL2Config>,
    services: Services,
    session: Session,
    events: EventDispatcher,
}

impl Client {
    /// Client backed by JSON-RPC endpoints from `config`.
    pub fn new(config: EnterL2Config) -> Result<Self> {
        let config = Arc::new(config);
        let services = Services::rpc(config.clone())?;
        Ok(Self::with_services(config, services))
    }

    /// Client delegating to caller-supplied services.
    pub fn with_services(config: Arc<EnterL2Config>, services: Services) -> Self {
        info!(
            network = %config.network.name,
            chain_id = config.network.chain_id,
            "Enter L2 client created"
        );
        Self {
            config,
            services,
            session: Session::new(),
            events: EventDispatcher::new(),
        }
    }

    pub fn config(&self) -> &EnterL2Config {
        &self.config
    }

    /// Registered token contract for `symbol` (case-insensitive).
    pub fn token_address(&self, symbol: &str) -> Option<Address> {
        self.config.tokens.get(symbol)
    }

    // Session

    /// Parse `private_key` and bind it as the signing identity.
    ///
    /// Malformed keys fail with `Connection` and leave any existing session untouched.
    pub fn connect(&mut self, private_key: &str) -> Result<Address> {
        let wallet = Wallet::from_private_key(private_key, self.config.network.chain_id)?;
        Ok(self.connect_wallet(wallet))
    }

    /// Bind an already parsed identity, e.g. from [`Wallet::from_env`].
    pub fn connect_wallet(&mut self, wallet: Wallet) -> Address {
        let address = wallet.address();

        self.services.provider.set_account(Some(wallet.clone()));
        self.session.bind(wallet);

        info!(%address, "Connected");
        self.events
            .emit(EVENT_CONNECTED, &json!({ "address": address.to_string() }));
        address
    }

    /// Clear the session. Calling it while disconnected does nothing.
    pub fn disconnect(&mut self) {
        let Some(wallet) = self.session.clear() else {
            return;
        };
        self.services.provider.set_account(None);

        let address = wallet.address();
        info!(%address, "Disconnected");
        self.events
            .emit(EVENT_DISCONNECTED, &json!({ "address": address.to_string() }));
    }

    /// Session address, `None` when disconnected.
    pub fn address(&self) -> Option<Address> {
        self.session.address()
    }

    pub fn is_connected(&self) -> bool {
        self.session.is_connected()
    }

    // Queries

    pub async fn get_network_info(&self) -> Result<NetworkInfo> {
        self.services.provider.get_network_info().await
    }

    /// Balance of the session address; native when `token` is `None`.
    pub async fn get_balance(&self, token: Option<Address>) -> Result<U256> {
        let address = self.session.require()?.address();
        self.services.provider.get_balance(address, token).await
    }

    /// Balance of any address. Does not need a session.
    pub async fn balance_of(&self, address: Address, token: Option<Address>) -> Result<U256> {
        self.services.provider.get_balance(address, token).await
    }

    /// Decimals of `token`, or of the native token when `None`.
    pub async fn token_decimals(&self, token: Option<Address>) -> Result<u8> {
        match token {
            None => Ok(NATIVE_DECIMALS),
            Some(token) => self.services.provider.get_token_decimals(token).await,
        }
    }

    /// Decimal string (`"1.5"`) to base units of `token`.
    pub async fn parse_amount(&self, amount: &str, token: Option<Address>) -> Result<U256> {
        utils::parse_units(amount, self.token_decimals(token).await?)
    }

    /// Base units of `token` to a decimal string.
    pub async fn format_amount(&self, value: U256, token: Option<Address>) -> Result<String> {
        utils::format_units(value, self.token_decimals(token).await?)
    }

    pub async fn get_transaction(&self, hash: TxHash) -> Result<Option<TransactionResponse>> {
        self.services.provider.get_transaction(hash).await
    }

    /// Like [`Client::get_transaction`], but an unknown hash is `TransactionError::NotFound`.
    pub async fn find_transaction(&self, hash: TxHash) -> Result<TransactionResponse> {
        self.get_transaction(hash)
            .await?
            .ok_or_else(|| TransactionError::NotFound { hash }.into())
    }

    /// Wait until `hash` has `confirmations` blocks or `timeout` passes.
    ///
    /// Defaults come from `fees.confirmation_blocks` and `network.timeout_secs`.
    pub async fn wait_for_transaction(
        &self,
        hash: TxHash,
        confirmations: Option<u64>,
        timeout: Option<Duration>,
    ) -> Result<TransactionResponse> {
        let confirmations = confirmations.unwrap_or(self.config.fees.confirmation_blocks);
        let timeout = timeout.unwrap_or_else(|| self.config.timeout());
        self.services
            .provider
            .wait_for_transaction(hash, confirmations, timeout)
            .await
    }

    // Wallets

    pub async fn create_consumer_wallet(&self) -> Result<Address> {
        self.session.require()?;
        self.services
            .wallets
            .create_wallet(WalletKind::Consumer, None)
            .await
    }

    pub async fn create_merchant_wallet(
        &self,
        whitelist_enabled: bool,
        daily_limit: Option<U256>,
    ) -> Result<Address> {
        self.session.require()?;
        let options = MerchantOptions {
            whitelist_enabled,
            daily_limit,
        };
        self.services
            .wallets
            .create_wallet(WalletKind::Merchant, Some(options))
            .await
    }

    // Payments

    pub async fn send_payment(
        &self,
        to: Address,
        amount: U256,
        token_address: Option<Address>,
        description: Option<String>,
    ) -> Result<TransactionResponse> {
        self.session.require()?;
        let request = PaymentRequest {
            to,
            amount,
            token_address,
            description,
        };
        let tx = self.services.payment.send_payment(request).await?;
        self.emit_transaction(&tx);
        Ok(tx)
    }

    // Bridge

    /// Deposit from L1 to L2. The recipient defaults to the session address.
    pub async fn deposit(
        &self,
        token: Address,
        amount: U256,
        l2_recipient: Option<Address>,
    ) -> Result<TransactionResponse> {
        let wallet = self.session.require()?;
        let request = BridgeRequest {
            token,
            amount,
            recipient: resolve_recipient(l2_recipient, wallet.address()),
        };
        let tx = self.services.bridge.deposit(request).await?;
        self.emit_transaction(&tx);
        Ok(tx)
    }

    /// Withdraw from L2 to L1. The recipient defaults to the session address.
    pub async fn withdraw(
        &self,
        token: Address,
        amount: U256,
        l1_recipient: Option<Address>,
    ) -> Result<TransactionResponse> {
        let wallet = self.session.require()?;
        let request = BridgeRequest {
            token,
            amount,
            recipient: resolve_recipient(l1_recipient, wallet.address()),
        };
        let tx = self.services.bridge.withdraw(request).await?;
        self.emit_transaction(&tx);
        Ok(tx)
    }

    // Naming

    pub async fn register_name(
        &self,
        name: impl Into<String>,
        resolver: Option<Address>,
    ) -> Result<TransactionResponse> {
        self.session.require()?;
        let request = NameRegistration {
            name: name.into(),
            resolver,
        };
        let tx = self.services.naming.register_name(request).await?;
        self.emit_transaction(&tx);
        Ok(tx)
    }

    // Staking

    /// Stake `amount`, locked for `lock_period` seconds.
    pub async fn stake(&self, amount: U256, lock_period: u64) -> Result<TransactionResponse> {
        self.session.require()?;
        let request = StakeRequest {
            amount,
            lock_period,
        };
        let tx = self.services.staking.stake(request).await?;
        self.emit_transaction(&tx);
        Ok(tx)
    }

    pub async fn unstake(&self, amount: U256) -> Result<TransactionResponse> {
        self.session.require()?;
        let tx = self.services.staking.unstake(amount).await?;
        self.emit_transaction(&tx);
        Ok(tx)
    }

    pub async fn claim_rewards(&self) -> Result<TransactionResponse> {
        self.session.require()?;
        let tx = self.services.staking.claim_rewards().await?;
        self.emit_transaction(&tx);
        Ok(tx)
    }

    /// EIP-191 signature over `message` with the session key.
    pub async fn sign_message(&self, message: &[u8]) -> Result<Signature> {
        self.session.require()?.sign_message(message).await
    }

    // Events

    pub fn on(&mut self, event: impl Into<String>, callback: Callback) {
        self.events.on(event, callback);
    }

    /// Remove the first registration of `callback`; returns whether one was found.
    pub fn off(&mut self, event: &str, callback: &Callback) -> bool {
        self.events.off(event, callback)
    }

    pub fn emit(&self, event: &str, data: &Value) {
        self.events.emit(event, data);
    }

    pub fn set_failure_sink(&mut self, sink: FailureSink) {
        self.events.set_failure_sink(sink);
    }

    pub fn listener_count(&self, event: &str) -> usize {
        self.events.listener_count(event)
    }

    fn emit_transaction(&self, tx: &TransactionResponse) {
        self.events.emit(
            EVENT_TRANSACTION,
            &json!({ "kind": tx.kind.as_str(), "hash": tx.hash.to_string() }),
        );
    }

    // Lifecycle

    /// Drop the session, release the provider and clear the event registry.
    ///
    /// The session and registry are cleared even when the provider fails to close.
    pub async fn close(&mut self) -> Result<()> {
        self.disconnect();
        let result = self.services.provider.close().await;
        self.events.clear();

        match &result {
            Ok(()) => debug!("Client closed"),
            Err(e) => warn!(error = %e, "Provider close failed"),
        }
        result
    }

    /// Run `f` with this client and close it on every exit path.
    ///
    /// An error from `f` wins over an error from `close`. A panic in `f` is
    /// resumed after the client is closed.
    pub async fn scoped<T, F>(mut self, f: F) -> Result<T>
    where
        F: for<'c> FnOnce(&'c mut Client) -> BoxFuture<'c, Result<T>>,
    {
        let outcome = AssertUnwindSafe(f(&mut self)).catch_unwind().await;
        let closed = self.close().await;

        match outcome {
            Err(payload) => panic::resume_unwind(payload),
            Ok(result) => {
                let value = result?;
                closed?;
                Ok(value)
            }
        }
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("network", &self.config.network.name)
            .field("chain_id", &self.config.network.chain_id)
            .field("address", &self.session.address())
            .field("events", &self.events)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::presets;

    const KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    fn offline_config() -> EnterL2Config {
        let mut config = presets::testnet();
        config.network.l2_rpc_url = "http://127.0.0.1:1".to_string();
        config.network.l1_rpc_url = None;
        config
    }

    #[test]
    fn test_new_client_is_disconnected() {
        let client = Client::new(offline_config()).unwrap();
        assert!(!client.is_connected());
        assert_eq!(client.address(), None);
        assert_eq!(client.config().network.chain_id, 12231);
    }

    #[test]
    fn test_connect_and_disconnect_over_rpc() {
        let mut client = Client::new(offline_config()).unwrap();

        let address = client.connect(KEY).unwrap();
        assert_eq!(
            address.to_string(),
            "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266"
        );
        assert_eq!(client.address(), Some(address));

        client.disconnect();
        client.disconnect();
        assert!(!client.is_connected());
    }

    #[tokio::test]
    async fn test_guard_runs_before_rpc() {
        let client = Client::new(offline_config()).unwrap();
        let err = client.claim_rewards().await.unwrap_err();
        assert!(err.is_not_connected());
        let err = client.get_balance(None).await.unwrap_err();
        assert!(err.is_not_connected());
    }
}
