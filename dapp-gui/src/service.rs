//! Background service task: one `select!` loop that owns the bridge.
//!
//! The service receives [`UiEvent`]s from the UI thread, runs each accepted
//! action on its own task and sends [`ServiceEvent`]s back. At most one action
//! of each kind is in flight; repeats are dropped until it resolves.

use std::collections::HashSet;
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use dapp::{
    failure_message, parse_ether, run_action, AbiError, Action, Bridge, DappError,
    DonationContract, NotificationKind, ProviderError, Receipt, RpcWallet, WalletProvider,
};

use crate::config::{Config, ConfigError};
use crate::events::{ServiceEvent, UiEvent};

#[derive(Debug, thiserror::Error)]
enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Contract binding failed: {0}")]
    Binding(#[from] AbiError),

    #[error(transparent)]
    Provider(#[from] ProviderError),
}

/// Run the service loop until the cancellation token fires.
pub async fn run(
    token: CancellationToken,
    ui_rx: mpsc::UnboundedReceiver<UiEvent>,
    svc_tx: mpsc::UnboundedSender<ServiceEvent>,
    config: Config,
) {
    match build_bridge(&config) {
        Ok(bridge) => serve(token, ui_rx, svc_tx, Arc::new(bridge)).await,
        Err(e) => {
            log::error!("❌ Cannot start wallet bridge: {}", e);
            serve_unavailable(token, ui_rx, svc_tx).await;
        }
    }
}

fn build_bridge(config: &Config) -> Result<Bridge<RpcWallet>, StartupError> {
    let address = config.contract()?;
    let abi = config.load_abi()?;
    let contract = DonationContract::new(address, &abi)?;
    let wallet = RpcWallet::new(
        &config.provider_url,
        config.request_timeout(),
        config.receipt_poll_interval(),
    )?;

    log::info!("📜 Bound donation contract at {}", contract.address());
    Ok(Bridge::new(wallet, contract).with_timeout(config.action_timeout()))
}

/// Dispatch UI commands against `bridge` until cancelled or told to stop.
pub async fn serve<P>(
    token: CancellationToken,
    mut ui_rx: mpsc::UnboundedReceiver<UiEvent>,
    svc_tx: mpsc::UnboundedSender<ServiceEvent>,
    bridge: Arc<Bridge<P>>,
) where
    P: WalletProvider + 'static,
{
    let (done_tx, mut done_rx) = mpsc::unbounded_channel::<Action>();
    let mut in_flight: HashSet<Action> = HashSet::new();

    log::info!("🚀 Service loop started");

    loop {
        tokio::select! {
            _ = token.cancelled() => {
                log::info!("🛑 Service loop shutting down");
                break;
            }

            Some(action) = done_rx.recv() => {
                in_flight.remove(&action);
                let _ = svc_tx.send(ServiceEvent::ActionFinished(action));
            }

            event = ui_rx.recv() => {
                let Some(event) = event else {
                    log::info!("🛑 UI channel closed");
                    break;
                };
                let Some(action) = event.action() else {
                    log::info!("🛑 Shutdown requested");
                    break;
                };
                if !in_flight.insert(action) {
                    log::debug!("{} already in flight, ignoring", action);
                    continue;
                }

                let _ = svc_tx.send(ServiceEvent::ActionStarted(action));
                tokio::spawn(execute(
                    bridge.clone(),
                    event,
                    action,
                    svc_tx.clone(),
                    done_tx.clone(),
                    token.child_token(),
                ));
            }
        }
    }

    token.cancel();
}

/// Answer every action with its failure notification. Used when the bridge
/// could not be built.
async fn serve_unavailable(
    token: CancellationToken,
    mut ui_rx: mpsc::UnboundedReceiver<UiEvent>,
    svc_tx: mpsc::UnboundedSender<ServiceEvent>,
) {
    loop {
        tokio::select! {
            _ = token.cancelled() => break,

            event = ui_rx.recv() => {
                let Some(event) = event else {
                    break;
                };
                let Some(message) = unavailable_message(&event) else {
                    break;
                };
                let _ = svc_tx.send(ServiceEvent::Notify {
                    kind: NotificationKind::Error,
                    message,
                });
            }
        }
    }
}

/// Failure toast for `event` when there is no bridge. Amounts are still
/// validated locally.
fn unavailable_message(event: &UiEvent) -> Option<&'static str> {
    let action = event.action()?;
    let message = match event {
        UiEvent::Donate { amount } => match parse_ether(amount) {
            Err(e) => failure_message(action, &DappError::InvalidAmount(e)),
            Ok(_) => action.failure_message(),
        },
        _ => action.failure_message(),
    };
    Some(message)
}

async fn execute<P>(
    bridge: Arc<Bridge<P>>,
    event: UiEvent,
    action: Action,
    svc_tx: mpsc::UnboundedSender<ServiceEvent>,
    done_tx: mpsc::UnboundedSender<Action>,
    token: CancellationToken,
) where
    P: WalletProvider + 'static,
{
    tokio::select! {
        _ = token.cancelled() => {
            log::debug!("{} abandoned on shutdown", action);
            return;
        }
        _ = perform(&bridge, event, &svc_tx) => {}
    }

    let _ = svc_tx.send(ServiceEvent::AccountChanged(bridge.account()));
    let _ = done_tx.send(action);
}

async fn perform<P: WalletProvider>(
    bridge: &Bridge<P>,
    event: UiEvent,
    svc_tx: &mpsc::UnboundedSender<ServiceEvent>,
) {
    let notify = |kind: NotificationKind, message: &'static str| {
        let _ = svc_tx.send(ServiceEvent::Notify { kind, message });
    };

    match event {
        UiEvent::ConnectWallet => {
            let _ = run_action(Action::Connect, notify, bridge.connect()).await;
        }

        UiEvent::Donate { amount } => {
            if let Ok(receipt) = run_action(Action::Donate, notify, bridge.donate(&amount)).await {
                log_receipt("Donation", &receipt);
            }
        }

        UiEvent::Withdraw => {
            if let Ok(receipt) = run_action(Action::Withdraw, notify, bridge.withdraw()).await {
                log_receipt("Withdrawal", &receipt);
            }
        }

        UiEvent::CheckBalance => {
            let fetch = async {
                let wei = bridge.balance().await?;
                let _ = svc_tx.send(ServiceEvent::BalanceUpdated(wei));
                Ok::<_, DappError>(wei)
            };
            if let Ok(wei) = run_action(Action::CheckBalance, notify, fetch).await {
                log::info!("📦 Contract balance: {} wei", wei);
            }
        }

        UiEvent::Shutdown => {}
    }
}

fn log_receipt(what: &str, receipt: &Receipt) {
    log::info!(
        "✅ {} confirmed: tx={} block={} gas={}",
        what,
        receipt.transaction_hash,
        receipt
            .block_number
            .map(|n| n.to_string())
            .unwrap_or_else(|| "pending".to_string()),
        receipt
            .gas_used
            .map(|g| g.to_string())
            .unwrap_or_else(|| "?".to_string()),
    );
}
