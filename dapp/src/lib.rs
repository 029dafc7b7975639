//! Donation Dapp bridge
//!
//! Client side of the donation contract:
//! - Exact ether ↔ wei conversion on decimal strings
//! - JSON ABI parsing and a typed binding for `donate`, `withdraw`, `balance`
//! - A wallet provider trait with a JSON-RPC implementation
//! - The bridge controller with explicit connection state
//! - Single-slot notifications and the action runner that drives them
//!
//! Contract accounting, access control and custody stay on chain.

pub mod abi;
pub mod action;
pub mod bridge;
pub mod contract;
pub mod error;
pub mod notification;
pub mod provider;
pub mod rpc_wallet;
pub mod units;

pub use abi::{Abi, AbiError, AbiFunction, Selector, StateMutability, DONATION_ABI};
pub use action::{failure_message, run_action, Action};
pub use bridge::{Bridge, ConnectionState};
pub use contract::{DonationContract, DEFAULT_CONTRACT_ADDRESS};
pub use error::DappError;
pub use notification::{Notification, NotificationKind, NotificationSlot};
pub use provider::{CallRequest, ProviderError, Receipt, TransactionRequest, WalletProvider};
pub use rpc_wallet::RpcWallet;
pub use units::{format_ether, parse_ether, AmountError, WEI_PER_ETHER};

pub use alloy_primitives::{Address, U256};
