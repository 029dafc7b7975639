use thiserror::Error;

use crate::abi::AbiError;
use crate::provider::ProviderError;
use crate::units::AmountError;

/// Outcome classes of a user action.
#[derive(Debug, Error)]
pub enum DappError {
    #[error("Wallet unavailable: {0}")]
    WalletUnavailable(String),

    #[error("User rejected the wallet request")]
    UserRejected,

    #[error("Invalid amount: {0}")]
    InvalidAmount(#[from] AmountError),

    #[error("Transaction failed: {0}")]
    TransactionFailure(#[source] ProviderError),

    #[error("Balance read failed: {0}")]
    ReadFailure(#[source] ProviderError),

    #[error("Contract binding does not support this call: {0}")]
    Binding(#[from] AbiError),
}

impl DappError {
    /// Failure while requesting accounts.
    pub fn on_connect(err: ProviderError) -> Self {
        match err {
            ProviderError::Rejected(_) | ProviderError::Unauthorized(_) => Self::UserRejected,
            other => Self::WalletUnavailable(other.to_string()),
        }
    }

    /// Failure while signing, broadcasting or executing a transaction.
    pub fn on_send(err: ProviderError) -> Self {
        match err {
            ProviderError::Unavailable(msg) | ProviderError::Disconnected(msg) => {
                Self::WalletUnavailable(msg)
            }
            ProviderError::Rejected(_) => Self::UserRejected,
            other => Self::TransactionFailure(other),
        }
    }

    /// Failure of a read-only call.
    pub fn on_read(err: ProviderError) -> Self {
        Self::ReadFailure(err)
    }

    /// Whether the wallet could not be reached or refused access.
    pub fn is_connection_error(&self) -> bool {
        matches!(self, Self::WalletUnavailable(_) | Self::UserRejected)
    }
}
