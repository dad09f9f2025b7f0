//! Shared utilities for client integration tests.

use alloy::primitives::{address, Address, TxHash, U256};
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use enterl2_sdk::blockchain::{
    ChainId, ChainProvider, MerchantOptions, NetworkInfo, TransactionKind, TransactionResponse,
    Wallet, WalletKind,
};
use enterl2_sdk::config::presets;
use enterl2_sdk::services::{
    BridgeRequest, BridgeService, NameRegistration, NamingService, PaymentRequest,
    PaymentService, Services, StakeRequest, StakingService, WalletManager,
};
use enterl2_sdk::{Client, EnterL2Error, Result};

/// Anvil's first account.
pub const KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

#[allow(dead_code)]
pub const WALLET: Address = address!("0x7777777777777777777777777777777777777777");

/// One call made by the client into its services.
#[derive(Debug, Clone, PartialEq)]
#[allow(dead_code)]
pub enum Call {
    NetworkInfo,
    Balance {
        address: Address,
        token: Option<Address>,
    },
    Decimals(Address),
    Transaction(TxHash),
    Wait {
        hash: TxHash,
        confirmations: u64,
        timeout: Duration,
    },
    SetAccount(Option<Address>),
    Close,
    CreateWallet {
        kind: WalletKind,
        options: Option<MerchantOptions>,
    },
    Payment(PaymentRequest),
    Deposit(BridgeRequest),
    Withdraw(BridgeRequest),
    RegisterName(NameRegistration),
    Stake(StakeRequest),
    Unstake(U256),
    ClaimRewards,
}

/// Deterministic response the backend returns for a submission of `kind`.
#[allow(dead_code)]
pub fn response_for(kind: TransactionKind) -> TransactionResponse {
    TransactionResponse::pending(TxHash::repeat_byte(0xaa), kind)
        .with_amount(U256::from(kind as u64))
}

/// Serves every facade and records each call.
#[derive(Default)]
pub struct RecordingBackend {
    calls: Mutex<Vec<Call>>,
    fail_network: AtomicBool,
    fail_close: AtomicBool,
}

#[allow(dead_code)]
impl RecordingBackend {
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    /// Calls other than session binding and teardown.
    pub fn chain_calls(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| !matches!(c, Call::SetAccount(_) | Call::Close))
            .collect()
    }

    /// Make every subsequent chain call fail with a network error.
    pub fn fail_network(&self) {
        self.fail_network.store(true, Ordering::SeqCst);
    }

    pub fn fail_close(&self) {
        self.fail_close.store(true, Ordering::SeqCst);
    }

    fn record(&self, call: Call) -> Result<()> {
        self.calls.lock().unwrap().push(call);
        if self.fail_network.load(Ordering::SeqCst) {
            return Err(EnterL2Error::Network("injected failure".to_string()));
        }
        Ok(())
    }

    fn submit(&self, call: Call, kind: TransactionKind) -> Result<TransactionResponse> {
        self.record(call)?;
        Ok(response_for(kind))
    }
}

#[async_trait]
impl ChainProvider for RecordingBackend {
    async fn get_network_info(&self) -> Result<NetworkInfo> {
        self.record(Call::NetworkInfo)?;
        Ok(NetworkInfo {
            name: "mock".to_string(),
            chain_id: ChainId(12231),
            block_number: 100,
            gas_price: 1_000_000_000,
        })
    }

    async fn get_balance(&self, address: Address, token: Option<Address>) -> Result<U256> {
        self.record(Call::Balance { address, token })?;
        Ok(U256::from(1_000u64))
    }

    /// Every token looks like a 6-decimal stablecoin.
    async fn get_token_decimals(&self, token: Address) -> Result<u8> {
        self.record(Call::Decimals(token))?;
        Ok(6)
    }

    async fn get_transaction(&self, hash: TxHash) -> Result<Option<TransactionResponse>> {
        self.record(Call::Transaction(hash))?;
        Ok(None)
    }

    async fn wait_for_transaction(
        &self,
        hash: TxHash,
        confirmations: u64,
        timeout: Duration,
    ) -> Result<TransactionResponse> {
        self.record(Call::Wait {
            hash,
            confirmations,
            timeout,
        })?;
        Ok(response_for(TransactionKind::Other))
    }

    fn set_account(&self, account: Option<Wallet>) {
        self.calls
            .lock()
            .unwrap()
            .push(Call::SetAccount(account.map(|w| w.address())));
    }

    async fn close(&self) -> Result<()> {
        self.calls.lock().unwrap().push(Call::Close);
        if self.fail_close.load(Ordering::SeqCst) {
            return Err(EnterL2Error::Network("close failed".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl WalletManager for RecordingBackend {
    async fn create_wallet(
        &self,
        kind: WalletKind,
        options: Option<MerchantOptions>,
    ) -> Result<Address> {
        self.record(Call::CreateWallet { kind, options })?;
        Ok(WALLET)
    }
}

#[async_trait]
impl PaymentService for RecordingBackend {
    async fn send_payment(&self, request: PaymentRequest) -> Result<TransactionResponse> {
        self.submit(Call::Payment(request), TransactionKind::Transfer)
    }
}

#[async_trait]
impl BridgeService for RecordingBackend {
    async fn deposit(&self, request: BridgeRequest) -> Result<TransactionResponse> {
        self.submit(Call::Deposit(request), TransactionKind::Deposit)
    }

    async fn withdraw(&self, request: BridgeRequest) -> Result<TransactionResponse> {
        self.submit(Call::Withdraw(request), TransactionKind::Withdrawal)
    }
}

#[async_trait]
impl NamingService for RecordingBackend {
    async fn register_name(&self, request: NameRegistration) -> Result<TransactionResponse> {
        self.submit(Call::RegisterName(request), TransactionKind::NameRegistration)
    }
}

#[async_trait]
impl StakingService for RecordingBackend {
    async fn stake(&self, request: StakeRequest) -> Result<TransactionResponse> {
        self.submit(Call::Stake(request), TransactionKind::Staking)
    }

    async fn unstake(&self, amount: U256) -> Result<TransactionResponse> {
        self.submit(Call::Unstake(amount), TransactionKind::Unstaking)
    }

    async fn claim_rewards(&self) -> Result<TransactionResponse> {
        self.submit(Call::ClaimRewards, TransactionKind::RewardClaim)
    }
}

/// Test-network client wired to a fresh recording backend.
pub fn mock_client() -> (Client, Arc<RecordingBackend>) {
    let backend = Arc::new(RecordingBackend::default());
    let client = Client::with_services(
        Arc::new(presets::testnet()),
        Services::from_backend(backend.clone()),
    );
    (client, backend)
}
