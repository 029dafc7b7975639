//! Event types for communication between UI and service task.
//!
//! These two enums are the *only* interface between the synchronous egui render
//! loop and the asynchronous service task.

use dapp::{Action, Address, NotificationKind, U256};

// ============================================================================
// UI → Service
// ============================================================================

/// Commands sent from the UI thread to the background service task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    /// Ask the wallet for account access.
    ConnectWallet,

    /// Donate the given ether amount, exactly as typed.
    Donate { amount: String },

    /// Ask the contract to pay out.
    Withdraw,

    /// Read the contract balance.
    CheckBalance,

    /// Clean shutdown.
    Shutdown,
}

impl UiEvent {
    /// The user action this command starts, if any.
    pub fn action(&self) -> Option<Action> {
        match self {
            UiEvent::ConnectWallet => Some(Action::Connect),
            UiEvent::Donate { .. } => Some(Action::Donate),
            UiEvent::Withdraw => Some(Action::Withdraw),
            UiEvent::CheckBalance => Some(Action::CheckBalance),
            UiEvent::Shutdown => None,
        }
    }
}

// ============================================================================
// Service → UI
// ============================================================================

/// Events sent from the service task back to the UI thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceEvent {
    /// Replace the visible toast.
    Notify {
        kind: NotificationKind,
        message: &'static str,
    },

    /// An action was accepted and is now in flight.
    ActionStarted(Action),

    /// An action resolved, successfully or not.
    ActionFinished(Action),

    /// The bridge's connected account changed.
    AccountChanged(Option<Address>),

    /// Fresh contract balance in wei.
    BalanceUpdated(U256),
}
