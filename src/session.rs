//! Session guard: the optional signing identity bound to a client.

use alloy::primitives::Address;

use crate::blockchain::Wallet;
use crate::error::{EnterL2Error, Result};

/// At most one signing identity per client.
#[derive(Debug, Default)]
pub struct Session {
    wallet: Option<Wallet>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `wallet`, returning the identity it replaced.
    pub fn bind(&mut self, wallet: Wallet) -> Option<Wallet> {
        self.wallet.replace(wallet)
    }

    /// Clear the session. Returns the identity that was bound, if any.
    pub fn clear(&mut self) -> Option<Wallet> {
        self.wallet.take()
    }

    pub fn is_connected(&self) -> bool {
        self.wallet.is_some()
    }

    /// Session address, `None` when disconnected.
    pub fn address(&self) -> Option<Address> {
        self.wallet.as_ref().map(Wallet::address)
    }

    /// The bound identity or `NotConnected`.
    pub fn require(&self) -> Result<&Wallet> {
        self.wallet.as_ref().ok_or(EnterL2Error::NotConnected)
    }
}

/// An explicit recipient wins; otherwise funds go to the session address.
pub fn resolve_recipient(explicit: Option<Address>, session: Address) -> Address {
    explicit.unwrap_or(session)
}
