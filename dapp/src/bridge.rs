//! Wallet-contract bridge.
//!
//! Owns the wallet provider, the contract binding and the connection state.
//! Each public operation is one user action; none of them retries and none of
//! them refreshes the balance as a side effect.

use std::future::Future;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use alloy_primitives::{Address, U256};

use crate::abi::AbiError;
use crate::contract::DonationContract;
use crate::error::DappError;
use crate::provider::{ProviderError, Receipt, TransactionRequest, WalletProvider};
use crate::units;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected(Address),
}

pub struct Bridge<P> {
    provider: P,
    contract: DonationContract,
    connection: Mutex<ConnectionState>,
    timeout: Option<Duration>,
}

impl<P: WalletProvider> Bridge<P> {
    pub fn new(provider: P, contract: DonationContract) -> Self {
        Self {
            provider,
            contract,
            connection: Mutex::new(ConnectionState::Disconnected),
            timeout: None,
        }
    }

    /// Bound every provider round-trip by `timeout`.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn contract(&self) -> &DonationContract {
        &self.contract
    }

    pub fn connection(&self) -> ConnectionState {
        *self.lock()
    }

    /// The cached account, if connected.
    pub fn account(&self) -> Option<Address> {
        match self.connection() {
            ConnectionState::Connected(addr) => Some(addr),
            _ => None,
        }
    }

    /// Ask the wallet for account access and return the first account.
    ///
    /// A cached account stays usable until the wallet answers.
    pub async fn connect(&self) -> Result<Address, DappError> {
        {
            let mut state = self.lock();
            if !matches!(*state, ConnectionState::Connected(_)) {
                *state = ConnectionState::Connecting;
            }
        }

        let accounts = match self.bounded(self.provider.request_accounts()).await {
            Ok(accounts) => accounts,
            Err(e) => {
                self.set_connection(ConnectionState::Disconnected);
                return Err(DappError::on_connect(e));
            }
        };

        match accounts.first() {
            Some(&account) => {
                log::info!("🔗 Wallet connected: {}", account);
                self.set_connection(ConnectionState::Connected(account));
                Ok(account)
            }
            None => {
                log::warn!("Wallet returned no accounts");
                self.set_connection(ConnectionState::Disconnected);
                Err(DappError::WalletUnavailable(
                    "no authorized accounts".to_string(),
                ))
            }
        }
    }

    /// Donate `amount` ether to the contract.
    ///
    /// The amount is validated before the wallet is contacted.
    pub async fn donate(&self, amount: &str) -> Result<Receipt, DappError> {
        let value = units::parse_ether(amount)?;
        let from = self.ensure_account().await?;
        log::info!("💸 Donating {} wei from {}", value, from);
        self.submit(self.contract.donate(from, value)).await
    }

    /// Ask the contract to pay out. Whether the caller may do so is up to
    /// the contract.
    pub async fn withdraw(&self) -> Result<Receipt, DappError> {
        let from = self.ensure_account().await?;
        log::info!("🏧 Requesting withdrawal as {}", from);
        self.submit(self.contract.withdraw(from)).await
    }

    /// Send `amount` ether straight to the contract's receive function.
    pub async fn transfer(&self, amount: &str) -> Result<Receipt, DappError> {
        let value = units::parse_ether(amount)?;
        if !self.contract.accepts_transfers() {
            return Err(AbiError::NoReceiveFunction.into());
        }
        let from = self.ensure_account().await?;
        self.submit(self.contract.transfer(from, value)).await
    }

    /// Read the contract balance in wei.
    pub async fn balance(&self) -> Result<U256, DappError> {
        let output = self
            .bounded(self.provider.call(self.contract.balance_call()))
            .await
            .map_err(DappError::on_read)?;

        DonationContract::decode_balance(&output)
            .map_err(|e| DappError::on_read(ProviderError::InvalidResponse(e.to_string())))
    }

    /// Reuse the cached account, requesting access only when disconnected.
    async fn ensure_account(&self) -> Result<Address, DappError> {
        match self.account() {
            Some(account) => Ok(account),
            None => self.connect().await,
        }
    }

    async fn submit(&self, tx: TransactionRequest) -> Result<Receipt, DappError> {
        match self.bounded(self.provider.send_transaction(tx)).await {
            Ok(receipt) => Ok(receipt),
            Err(ProviderError::Unauthorized(msg)) => {
                log::warn!("Wallet revoked access: {}", msg);
                self.set_connection(ConnectionState::Disconnected);
                Err(DappError::UserRejected)
            }
            Err(e) => Err(DappError::on_send(e)),
        }
    }

    async fn bounded<T, F>(&self, fut: F) -> Result<T, ProviderError>
    where
        F: Future<Output = Result<T, ProviderError>>,
    {
        match self.timeout {
            Some(limit) => tokio::time::timeout(limit, fut)
                .await
                .map_err(|_| ProviderError::Timeout)?,
            None => fut.await,
        }
    }

    fn set_connection(&self, state: ConnectionState) {
        *self.lock() = state;
    }

    fn lock(&self) -> MutexGuard<'_, ConnectionState> {
        self.connection
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
