//! Minimal JSON ABI model.
//!
//! Only the parts needed to bind the donation contract are modelled: function
//! names, parameter types and state mutability. Events, errors and any other
//! entry kinds are accepted and ignored.

use alloy_primitives::keccak256;
use serde::Deserialize;
use thiserror::Error;

/// ABI of the deployed donation contract.
pub const DONATION_ABI: &str = r#"[
  {
    "inputs": [],
    "name": "donate",
    "outputs": [],
    "stateMutability": "payable",
    "type": "function"
  },
  {
    "inputs": [],
    "stateMutability": "nonpayable",
    "type": "constructor"
  },
  {
    "inputs": [],
    "name": "withdraw",
    "outputs": [],
    "stateMutability": "payable",
    "type": "function"
  },
  {
    "stateMutability": "payable",
    "type": "receive"
  },
  {
    "inputs": [],
    "name": "balance",
    "outputs": [{ "internalType": "uint256", "name": "", "type": "uint256" }],
    "stateMutability": "view",
    "type": "function"
  }
]"#;

/// 4-byte function selector.
pub type Selector = [u8; 4];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StateMutability {
    Pure,
    View,
    Nonpayable,
    Payable,
}

impl StateMutability {
    /// Whether calls must go through a transaction.
    pub fn is_mutating(self) -> bool {
        matches!(self, Self::Nonpayable | Self::Payable)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AbiParam {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(rename = "internalType", default)]
    pub internal_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AbiFunction {
    pub name: String,
    #[serde(default)]
    pub inputs: Vec<AbiParam>,
    #[serde(default)]
    pub outputs: Vec<AbiParam>,
    #[serde(rename = "stateMutability")]
    pub state_mutability: StateMutability,
}

impl AbiFunction {
    /// Canonical signature, e.g. `transfer(address,uint256)`.
    pub fn signature(&self) -> String {
        let types: Vec<&str> = self.inputs.iter().map(|p| p.kind.as_str()).collect();
        format!("{}({})", self.name, types.join(","))
    }

    pub fn selector(&self) -> Selector {
        selector(&self.signature())
    }
}

/// Constructor, receive and fallback entries.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AbiSpecial {
    #[serde(default)]
    pub inputs: Vec<AbiParam>,
    #[serde(rename = "stateMutability", default)]
    pub state_mutability: Option<StateMutability>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum AbiItem {
    Function(AbiFunction),
    Constructor(AbiSpecial),
    Receive(AbiSpecial),
    Fallback(AbiSpecial),
    #[serde(other)]
    Other,
}

/// Parsed contract ABI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Abi {
    items: Vec<AbiItem>,
}

impl Abi {
    pub fn from_json(json: &str) -> Result<Self, AbiError> {
        let items: Vec<AbiItem> = serde_json::from_str(json)?;
        Ok(Self { items })
    }

    pub fn functions(&self) -> impl Iterator<Item = &AbiFunction> {
        self.items.iter().filter_map(|item| match item {
            AbiItem::Function(f) => Some(f),
            _ => None,
        })
    }

    /// First function with the given name.
    pub fn function(&self, name: &str) -> Option<&AbiFunction> {
        self.functions().find(|f| f.name == name)
    }

    /// Whether plain value transfers are accepted.
    pub fn accepts_transfers(&self) -> bool {
        self.items.iter().any(|item| match item {
            AbiItem::Receive(_) => true,
            AbiItem::Fallback(special) => special.state_mutability == Some(StateMutability::Payable),
            _ => false,
        })
    }
}

/// Selector for a canonical function signature.
pub fn selector(signature: &str) -> Selector {
    let hash = keccak256(signature.as_bytes());
    [hash[0], hash[1], hash[2], hash[3]]
}

#[derive(Debug, Error)]
pub enum AbiError {
    #[error("ABI JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("ABI has no function named `{0}`")]
    MissingFunction(String),

    #[error("function `{name}` has an unexpected shape: {reason}")]
    UnexpectedShape { name: String, reason: &'static str },

    #[error("return data too short: {0} bytes")]
    ShortReturnData(usize),

    #[error("contract has no payable receive or fallback function")]
    NoReceiveFunction,
}
