//! Wallet provider over Ethereum JSON-RPC.
//!
//! Talks JSON-RPC 2.0 over HTTP to a wallet endpoint that holds the user's
//! keys: a signer daemon or a development node with unlocked accounts.
//! Account access goes through `eth_requestAccounts`, transactions through
//! `eth_sendTransaction` followed by receipt polling, reads through `eth_call`.

use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use alloy_primitives::{hex, Address, B256, U256};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::provider::{CallRequest, ProviderError, Receipt, TransactionRequest, WalletProvider};

static REQUEST_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Debug, Clone)]
pub struct RpcWallet {
    endpoint: String,
    client: Client,
    poll_interval: Duration,
}

/// JSON-RPC 2.0 request
#[derive(Debug, Serialize)]
struct JsonRpcRequest<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: Value,
}

/// JSON-RPC 2.0 response
#[derive(Debug, Deserialize)]
struct JsonRpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<JsonRpcError>,
}

#[derive(Debug, Deserialize)]
struct JsonRpcError {
    code: i64,
    message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawReceipt {
    transaction_hash: String,
    #[serde(default)]
    block_number: Option<String>,
    #[serde(default)]
    gas_used: Option<String>,
    #[serde(default)]
    status: Option<String>,
}

impl RpcWallet {
    pub fn new(
        endpoint: &str,
        request_timeout: Duration,
        poll_interval: Duration,
    ) -> Result<Self, ProviderError> {
        let endpoint = if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
            endpoint.to_string()
        } else {
            format!("http://{}", endpoint)
        };

        let client = Client::builder()
            .timeout(request_timeout)
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        log::info!("📡 Wallet JSON-RPC provider initialized: {}", endpoint);

        Ok(Self {
            endpoint,
            client,
            poll_interval,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Send a JSON-RPC 2.0 request and return the result. A `null` result is
    /// returned as `Value::Null`.
    async fn rpc_call(&self, method: &str, params: Value) -> Result<Value, ProviderError> {
        let request = JsonRpcRequest {
            jsonrpc: "2.0",
            id: REQUEST_ID.fetch_add(1, Ordering::Relaxed),
            method,
            params,
        };

        log::debug!("→ RPC {}: {}", method, request.params);

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(ProviderError::from_transport)?;

        if !response.status().is_success() {
            return Err(ProviderError::Http(response.status().as_u16()));
        }

        let rpc_response: JsonRpcResponse = response.json().await.map_err(|e| {
            ProviderError::InvalidResponse(format!("Failed to parse JSON-RPC response: {}", e))
        })?;

        if let Some(error) = rpc_response.error {
            log::debug!("← RPC {} error {}: {}", method, error.code, error.message);
            return Err(ProviderError::from_rpc(error.code, error.message));
        }

        Ok(rpc_response.result.unwrap_or(Value::Null))
    }

    async fn wait_for_receipt(&self, hash: B256) -> Result<Receipt, ProviderError> {
        loop {
            let result = self
                .rpc_call("eth_getTransactionReceipt", json!([hash.to_string()]))
                .await?;
            if !result.is_null() {
                let raw: RawReceipt = serde_json::from_value(result)
                    .map_err(|e| ProviderError::InvalidResponse(format!("bad receipt: {}", e)))?;
                return parse_receipt(raw);
            }
            log::debug!("⏳ Waiting for receipt of {}", hash);
            tokio::time::sleep(self.poll_interval).await;
        }
    }
}

#[async_trait]
impl WalletProvider for RpcWallet {
    async fn request_accounts(&self) -> Result<Vec<Address>, ProviderError> {
        let result = match self.rpc_call("eth_requestAccounts", json!([])).await {
            Err(e) if e.is_method_not_found() => {
                log::debug!("eth_requestAccounts unsupported, falling back to eth_accounts");
                self.rpc_call("eth_accounts", json!([])).await?
            }
            other => other?,
        };

        let accounts: Vec<String> = serde_json::from_value(result)
            .map_err(|e| ProviderError::InvalidResponse(format!("bad account list: {}", e)))?;
        accounts
            .iter()
            .map(|a| {
                Address::from_str(a)
                    .map_err(|_| ProviderError::InvalidResponse(format!("bad address: {}", a)))
            })
            .collect()
    }

    async fn send_transaction(&self, tx: TransactionRequest) -> Result<Receipt, ProviderError> {
        let result = self
            .rpc_call("eth_sendTransaction", json!([transaction_params(&tx)]))
            .await?;
        let hash = result
            .as_str()
            .and_then(|s| B256::from_str(s).ok())
            .ok_or_else(|| ProviderError::InvalidResponse(format!("bad tx hash: {}", result)))?;

        log::info!("📤 Transaction submitted: {}", hash);

        let receipt = self.wait_for_receipt(hash).await?;
        if !receipt.success {
            return Err(ProviderError::Reverted(receipt.transaction_hash));
        }
        Ok(receipt)
    }

    async fn call(&self, call: CallRequest) -> Result<Vec<u8>, ProviderError> {
        let params = json!([
            { "to": call.to.to_string(), "data": hex::encode_prefixed(&call.data) },
            "latest"
        ]);
        let result = self.rpc_call("eth_call", params).await?;
        let data = result
            .as_str()
            .ok_or_else(|| ProviderError::InvalidResponse(format!("bad call output: {}", result)))?;
        hex::decode(data).map_err(|e| ProviderError::InvalidResponse(format!("bad hex: {}", e)))
    }
}

/// `eth_sendTransaction` parameter object.
fn transaction_params(tx: &TransactionRequest) -> Value {
    json!({
        "from": tx.from.to_string(),
        "to": tx.to.to_string(),
        "value": quantity(tx.value),
        "data": hex::encode_prefixed(&tx.data),
    })
}

/// Hex quantity encoding: `0x`-prefixed, no leading zeros.
pub fn quantity(value: U256) -> String {
    format!("0x{:x}", value)
}

pub fn parse_quantity(s: &str) -> Result<U256, ProviderError> {
    let digits = s
        .strip_prefix("0x")
        .ok_or_else(|| ProviderError::InvalidResponse(format!("bad quantity: {}", s)))?;
    U256::from_str_radix(digits, 16)
        .map_err(|_| ProviderError::InvalidResponse(format!("bad quantity: {}", s)))
}

fn parse_receipt(raw: RawReceipt) -> Result<Receipt, ProviderError> {
    let transaction_hash = B256::from_str(&raw.transaction_hash)
        .map_err(|_| ProviderError::InvalidResponse(format!("bad tx hash: {}", raw.transaction_hash)))?;
    let block_number = raw
        .block_number
        .as_deref()
        .map(parse_quantity)
        .transpose()?
        .map(|n| u64::try_from(n).unwrap_or(u64::MAX));
    let gas_used = raw.gas_used.as_deref().map(parse_quantity).transpose()?;
    // Receipts without a status field predate EIP-658 and carry no failure signal.
    let success = match raw.status.as_deref() {
        None => true,
        Some(status) => !parse_quantity(status)?.is_zero(),
    };

    Ok(Receipt {
        transaction_hash,
        block_number,
        gas_used,
        success,
    })
}
