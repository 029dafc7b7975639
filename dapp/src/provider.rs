//! Wallet provider abstraction.
//!
//! The bridge never talks to a transport directly. Anything that can list the
//! user's accounts, sign-and-send a transaction and perform a read-only call
//! can stand in as the wallet: the JSON-RPC client in [`crate::rpc_wallet`]
//! in production, hand-written mocks in tests.

use alloy_primitives::{Address, B256, U256};
use async_trait::async_trait;
use thiserror::Error;

/// EIP-1193: the user rejected the request.
pub const CODE_USER_REJECTED: i64 = 4001;
/// EIP-1193: the requested account or method is not authorized.
pub const CODE_UNAUTHORIZED: i64 = 4100;
/// EIP-1193: the provider is disconnected from all chains.
pub const CODE_DISCONNECTED: i64 = 4900;
/// EIP-1193: the provider is not connected to the requested chain.
pub const CODE_CHAIN_DISCONNECTED: i64 = 4901;
/// JSON-RPC: method not found.
pub const CODE_METHOD_NOT_FOUND: i64 = -32601;

/// A state-changing call to be signed by the wallet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionRequest {
    pub from: Address,
    pub to: Address,
    /// Attached value in wei.
    pub value: U256,
    pub data: Vec<u8>,
}

/// A read-only call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallRequest {
    pub to: Address,
    pub data: Vec<u8>,
}

/// Confirmation of an included transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    pub transaction_hash: B256,
    pub block_number: Option<u64>,
    pub gas_used: Option<U256>,
    /// `false` when execution reverted.
    pub success: bool,
}

#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// Ask the wallet for account access. The first entry is the active account.
    async fn request_accounts(&self) -> Result<Vec<Address>, ProviderError>;

    /// Sign, broadcast and wait for the transaction to be included.
    async fn send_transaction(&self, tx: TransactionRequest) -> Result<Receipt, ProviderError>;

    /// Execute a call against the latest block and return the raw output.
    async fn call(&self, call: CallRequest) -> Result<Vec<u8>, ProviderError>;
}

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Wallet provider unavailable: {0}")]
    Unavailable(String),

    #[error("Request rejected by user: {0}")]
    Rejected(String),

    #[error("Not authorized: {0}")]
    Unauthorized(String),

    #[error("Provider disconnected: {0}")]
    Disconnected(String),

    #[error("HTTP error {0}")]
    Http(u16),

    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("Transaction {0} reverted")]
    Reverted(B256),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),
}

impl ProviderError {
    /// Classify a JSON-RPC error object by its code.
    pub fn from_rpc(code: i64, message: String) -> Self {
        match code {
            CODE_USER_REJECTED => Self::Rejected(message),
            CODE_UNAUTHORIZED => Self::Unauthorized(message),
            CODE_DISCONNECTED | CODE_CHAIN_DISCONNECTED => Self::Disconnected(message),
            _ => Self::Rpc { code, message },
        }
    }

    /// Classify a transport failure. Refused connections mean nothing is
    /// listening at the wallet endpoint.
    pub fn from_transport(err: reqwest::Error) -> Self {
        if err.is_connect() {
            Self::Unavailable(err.to_string())
        } else if err.is_timeout() {
            Self::Timeout
        } else {
            Self::Request(err)
        }
    }

    pub fn is_method_not_found(&self) -> bool {
        matches!(self, Self::Rpc { code, .. } if *code == CODE_METHOD_NOT_FOUND)
    }
}
