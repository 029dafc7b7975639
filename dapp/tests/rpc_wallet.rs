//! JSON-RPC wallet provider against a local stub endpoint.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use dapp::{
    format_ether, Address, Bridge, DappError, DonationContract, ProviderError, RpcWallet,
    WalletProvider, DEFAULT_CONTRACT_ADDRESS, U256,
};
use serde_json::{json, Value};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

type Reply = Result<Value, (i64, &'static str)>;
type Calls = Arc<Mutex<Vec<(String, Value)>>>;

/// Serve JSON-RPC over HTTP on a random local port, answering each request
/// with `responder(method, params)`. Returns the endpoint URL and the log of
/// received calls.
async fn stub<F>(responder: F) -> (String, Calls)
where
    F: Fn(&str, &Value) -> Reply + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let responder = Arc::new(responder);
    let calls: Calls = Arc::default();
    let log = calls.clone();

    tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            let responder = responder.clone();
            let log = log.clone();
            tokio::spawn(async move {
                handle(stream, responder.as_ref(), &log).await;
            });
        }
    });

    (format!("http://{}", addr), calls)
}

async fn handle<F>(mut stream: TcpStream, responder: &F, log: &Calls)
where
    F: Fn(&str, &Value) -> Reply,
{
    let body = read_body(&mut stream).await;
    let request: Value = serde_json::from_slice(&body).unwrap();
    let method = request["method"].as_str().unwrap_or_default().to_string();
    let params = request["params"].clone();
    log.lock().unwrap().push((method.clone(), params.clone()));

    let payload = match responder(&method, &params) {
        Ok(result) => json!({ "jsonrpc": "2.0", "id": request["id"], "result": result }),
        Err((code, message)) => json!({
            "jsonrpc": "2.0",
            "id": request["id"],
            "error": { "code": code, "message": message }
        }),
    };
    let text = payload.to_string();
    let response = format!(
        "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        text.len(),
        text
    );
    stream.write_all(response.as_bytes()).await.unwrap();
    let _ = stream.shutdown().await;
}

async fn read_body(stream: &mut TcpStream) -> Vec<u8> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    loop {
        let n = stream.read(&mut chunk).await.unwrap();
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);

        if let Some(header_end) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            let headers = String::from_utf8_lossy(&buf[..header_end]).to_lowercase();
            let length = headers
                .lines()
                .find_map(|l| l.strip_prefix("content-length:"))
                .and_then(|v| v.trim().parse::<usize>().ok())
                .unwrap_or(0);
            let body_start = header_end + 4;
            if buf.len() >= body_start + length {
                return buf[body_start..body_start + length].to_vec();
            }
        }
    }
    Vec::new()
}

fn wallet(endpoint: &str) -> RpcWallet {
    RpcWallet::new(endpoint, Duration::from_secs(5), Duration::from_millis(10)).unwrap()
}

fn contract() -> DonationContract {
    DonationContract::embedded(DEFAULT_CONTRACT_ADDRESS.parse().unwrap()).unwrap()
}

const ACCOUNT: &str = "0x4242424242424242424242424242424242424242";

fn receipt(status: &str) -> Value {
    json!({
        "transactionHash": format!("0x{}", "ab".repeat(32)),
        "blockNumber": "0x2a",
        "gasUsed": "0x5208",
        "status": status,
    })
}

#[tokio::test]
async fn test_request_accounts() {
    let (url, calls) = stub(|method, _| match method {
        "eth_requestAccounts" => Ok(json!([ACCOUNT])),
        _ => Err((-32601, "method not found")),
    })
    .await;

    let accounts = wallet(&url).request_accounts().await.unwrap();
    assert_eq!(accounts, vec![ACCOUNT.parse::<Address>().unwrap()]);
    assert_eq!(calls.lock().unwrap()[0].0, "eth_requestAccounts");
}

#[tokio::test]
async fn test_request_accounts_falls_back_to_eth_accounts() {
    let (url, calls) = stub(|method, _| match method {
        "eth_accounts" => Ok(json!([ACCOUNT])),
        _ => Err((-32601, "method not found")),
    })
    .await;

    let accounts = wallet(&url).request_accounts().await.unwrap();
    assert_eq!(accounts.len(), 1);
    let methods: Vec<String> = calls.lock().unwrap().iter().map(|c| c.0.clone()).collect();
    assert_eq!(methods, vec!["eth_requestAccounts", "eth_accounts"]);
}

#[tokio::test]
async fn test_user_rejection() {
    let (url, _) = stub(|_, _| Err((4001, "User rejected the request."))).await;

    let err = wallet(&url).request_accounts().await.unwrap_err();
    assert!(matches!(err, ProviderError::Rejected(_)));

    let bridge = Bridge::new(wallet(&url), contract());
    assert!(matches!(bridge.connect().await, Err(DappError::UserRejected)));
}

#[tokio::test]
async fn test_donation_waits_for_receipt() {
    let polls = Arc::new(AtomicUsize::new(0));
    let seen_polls = polls.clone();
    let (url, calls) = stub(move |method, _| match method {
        "eth_requestAccounts" => Ok(json!([ACCOUNT])),
        "eth_sendTransaction" => Ok(json!(format!("0x{}", "ab".repeat(32)))),
        "eth_getTransactionReceipt" => {
            // Not mined on the first poll.
            if seen_polls.fetch_add(1, Ordering::SeqCst) == 0 {
                Ok(Value::Null)
            } else {
                Ok(receipt("0x1"))
            }
        }
        _ => Err((-32601, "method not found")),
    })
    .await;

    let bridge = Bridge::new(wallet(&url), contract());
    let receipt = bridge.donate("1.5").await.unwrap();
    assert!(receipt.success);
    assert_eq!(receipt.block_number, Some(42));
    assert_eq!(polls.load(Ordering::SeqCst), 2);

    let calls = calls.lock().unwrap();
    let (_, params) = calls
        .iter()
        .find(|(m, _)| m == "eth_sendTransaction")
        .unwrap();
    assert_eq!(params[0]["value"], "0x14d1120d7b160000");
    assert_eq!(params[0]["data"], "0xed88c68e");
    assert_eq!(
        params[0]["from"].as_str().unwrap().to_lowercase(),
        ACCOUNT
    );
}

#[tokio::test]
async fn test_reverted_withdrawal() {
    let (url, _) = stub(|method, _| match method {
        "eth_requestAccounts" => Ok(json!([ACCOUNT])),
        "eth_sendTransaction" => Ok(json!(format!("0x{}", "cd".repeat(32)))),
        "eth_getTransactionReceipt" => Ok(receipt("0x0")),
        _ => Err((-32601, "method not found")),
    })
    .await;

    let bridge = Bridge::new(wallet(&url), contract());
    let err = bridge.withdraw().await.unwrap_err();
    assert!(matches!(
        err,
        DappError::TransactionFailure(ProviderError::Reverted(_))
    ));
}

#[tokio::test]
async fn test_balance_call() {
    let (url, calls) = stub(|method, _| match method {
        "eth_call" => Ok(json!(format!("0x{:064x}", 2_000_000_000_000_000_000u64))),
        _ => Err((-32601, "method not found")),
    })
    .await;

    let bridge = Bridge::new(wallet(&url), contract());
    let wei = bridge.balance().await.unwrap();
    assert_eq!(wei, U256::from(2_000_000_000_000_000_000u64));
    assert_eq!(format_ether(wei), "2");

    let calls = calls.lock().unwrap();
    assert_eq!(calls[0].1[0]["data"], "0xb69ef8a8");
    assert_eq!(calls[0].1[1], "latest");
}

#[tokio::test]
async fn test_empty_call_output_is_read_failure() {
    let (url, _) = stub(|_, _| Ok(json!("0x"))).await;

    let bridge = Bridge::new(wallet(&url), contract());
    assert!(matches!(bridge.balance().await, Err(DappError::ReadFailure(_))));
}

#[tokio::test]
async fn test_unreachable_wallet() {
    // Grab a free port, then close it so nothing is listening.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let err = wallet(&url).request_accounts().await.unwrap_err();
    assert!(matches!(err, ProviderError::Unavailable(_)));

    let bridge = Bridge::new(wallet(&url), contract());
    assert!(matches!(
        bridge.donate("1").await,
        Err(DappError::WalletUnavailable(_))
    ));
}
