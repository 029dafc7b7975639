//! Binding for the deployed donation contract.

use alloy_primitives::{Address, U256};

use crate::abi::{Abi, AbiError, AbiFunction, Selector, StateMutability, DONATION_ABI};
use crate::provider::{CallRequest, TransactionRequest};

/// Address of the deployed donation contract.
pub const DEFAULT_CONTRACT_ADDRESS: &str = "0x80D0cc0695127FA57b2031bC10f2Db589B249131";

/// Contract address plus the selectors of the methods this client calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DonationContract {
    address: Address,
    donate: Selector,
    withdraw: Selector,
    balance: Selector,
    accepts_transfers: bool,
}

impl DonationContract {
    /// Bind `address` using `abi`, checking that the methods have the
    /// expected shape.
    pub fn new(address: Address, abi: &Abi) -> Result<Self, AbiError> {
        let donate = require(abi, "donate")?;
        if donate.state_mutability != StateMutability::Payable {
            return Err(shape("donate", "must be payable"));
        }

        let withdraw = require(abi, "withdraw")?;
        if !withdraw.state_mutability.is_mutating() {
            return Err(shape("withdraw", "must be state-changing"));
        }

        let balance = require(abi, "balance")?;
        if balance.state_mutability.is_mutating() {
            return Err(shape("balance", "must be view or pure"));
        }
        match balance.outputs.as_slice() {
            [out] if out.kind == "uint256" => {}
            _ => return Err(shape("balance", "must return a single uint256")),
        }

        Ok(Self {
            address,
            donate: donate.selector(),
            withdraw: withdraw.selector(),
            balance: balance.selector(),
            accepts_transfers: abi.accepts_transfers(),
        })
    }

    /// Bind `address` with the embedded ABI.
    pub fn embedded(address: Address) -> Result<Self, AbiError> {
        Self::new(address, &Abi::from_json(DONATION_ABI)?)
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn accepts_transfers(&self) -> bool {
        self.accepts_transfers
    }

    /// `donate()` with `value` wei attached.
    pub fn donate(&self, from: Address, value: U256) -> TransactionRequest {
        self.transaction(from, value, self.donate.to_vec())
    }

    /// `withdraw()` with nothing attached.
    pub fn withdraw(&self, from: Address) -> TransactionRequest {
        self.transaction(from, U256::ZERO, self.withdraw.to_vec())
    }

    /// Plain transfer handled by the contract's receive function.
    pub fn transfer(&self, from: Address, value: U256) -> TransactionRequest {
        self.transaction(from, value, Vec::new())
    }

    /// Read-only `balance()`.
    pub fn balance_call(&self) -> CallRequest {
        CallRequest {
            to: self.address,
            data: self.balance.to_vec(),
        }
    }

    /// Decode the `uint256` returned by `balance()`.
    pub fn decode_balance(output: &[u8]) -> Result<U256, AbiError> {
        if output.len() < 32 {
            return Err(AbiError::ShortReturnData(output.len()));
        }
        Ok(U256::from_be_slice(&output[..32]))
    }

    fn transaction(&self, from: Address, value: U256, data: Vec<u8>) -> TransactionRequest {
        TransactionRequest {
            from,
            to: self.address,
            value,
            data,
        }
    }
}

fn require<'a>(abi: &'a Abi, name: &str) -> Result<&'a AbiFunction, AbiError> {
    let function = abi
        .function(name)
        .ok_or_else(|| AbiError::MissingFunction(name.to_string()))?;
    if !function.inputs.is_empty() {
        return Err(shape(name, "must take no arguments"));
    }
    Ok(function)
}

fn shape(name: &str, reason: &'static str) -> AbiError {
    AbiError::UnexpectedShape {
        name: name.to_string(),
        reason,
    }
}
