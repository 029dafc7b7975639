//! Application state: plain data, no async, no Arc.
//!
//! `AppState` holds everything the UI needs to render. The service task sends
//! `ServiceEvent`s which are applied via `AppState::apply()`. The UI reads
//! fields directly.

use std::collections::HashSet;
use std::time::Instant;

use dapp::{format_ether, Action, Address, NotificationSlot, U256};

use crate::config::Config;
use crate::events::ServiceEvent;

/// All application state needed for rendering.
#[derive(Debug, Default)]
pub struct AppState {
    /// Contents of the amount field. Never cleared by the app.
    pub amount_input: String,

    /// Last balance successfully read, in wei.
    pub balance: Option<U256>,

    pub account: Option<Address>,

    /// Actions whose buttons are disabled until they resolve.
    pub in_flight: HashSet<Action>,

    pub notification: NotificationSlot,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        Self {
            notification: NotificationSlot::new(config.success_toast(), config.error_toast()),
            ..Default::default()
        }
    }

    pub fn apply(&mut self, event: ServiceEvent) {
        self.apply_at(event, Instant::now());
    }

    pub fn apply_at(&mut self, event: ServiceEvent, now: Instant) {
        match event {
            ServiceEvent::Notify { kind, message } => {
                self.notification.show(kind, message, now);
            }

            ServiceEvent::ActionStarted(action) => {
                self.in_flight.insert(action);
            }

            ServiceEvent::ActionFinished(action) => {
                self.in_flight.remove(&action);
            }

            ServiceEvent::AccountChanged(account) => {
                self.account = account;
            }

            ServiceEvent::BalanceUpdated(wei) => {
                self.balance = Some(wei);
            }
        }
    }

    /// Balance in ether for display; "0" until the first successful read.
    pub fn balance_display(&self) -> String {
        self.balance.map(format_ether).unwrap_or_else(|| "0".to_string())
    }

    pub fn is_busy(&self, action: Action) -> bool {
        self.in_flight.contains(&action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dapp::NotificationKind;
    use std::time::Duration;

    #[test]
    fn test_default_state() {
        let state = AppState::default();
        assert_eq!(state.balance_display(), "0");
        assert!(state.amount_input.is_empty());
        assert!(state.account.is_none());
        assert!(state.notification.current().is_none());
    }

    #[test]
    fn test_apply_balance_updated() {
        let mut state = AppState::default();
        state.apply(ServiceEvent::BalanceUpdated(U256::from(
            2_000_000_000_000_000_000u64,
        )));
        assert_eq!(state.balance_display(), "2");
    }

    #[test]
    fn test_balance_failure_keeps_previous_value() {
        let mut state = AppState::default();
        state.apply(ServiceEvent::BalanceUpdated(U256::from(
            250_000_000_000_000_000u64,
        )));

        state.apply(ServiceEvent::ActionStarted(Action::CheckBalance));
        state.apply(ServiceEvent::Notify {
            kind: NotificationKind::Loading,
            message: "Fetching balance...",
        });
        state.apply(ServiceEvent::Notify {
            kind: NotificationKind::Error,
            message: "Failed to fetch balance.",
        });
        state.apply(ServiceEvent::ActionFinished(Action::CheckBalance));

        assert_eq!(state.balance_display(), "0.25");
        assert!(!state.is_busy(Action::CheckBalance));
    }

    #[test]
    fn test_new_notification_replaces_prior() {
        let mut state = AppState::default();
        let now = Instant::now();
        state.apply_at(
            ServiceEvent::Notify {
                kind: NotificationKind::Loading,
                message: "Processing donation...",
            },
            now,
        );
        state.apply_at(
            ServiceEvent::Notify {
                kind: NotificationKind::Loading,
                message: "Fetching balance...",
            },
            now,
        );

        let current = state.notification.current().unwrap();
        assert_eq!(current.message, "Fetching balance...");

        state.apply_at(
            ServiceEvent::Notify {
                kind: NotificationKind::Success,
                message: "Balance updated!",
            },
            now,
        );
        assert!(state.notification.expire(now + Duration::from_secs(2)));
        assert!(state.notification.current().is_none());
    }

    #[test]
    fn test_in_flight_tracking() {
        let mut state = AppState::default();
        state.apply(ServiceEvent::ActionStarted(Action::Donate));
        state.apply(ServiceEvent::ActionStarted(Action::Withdraw));
        assert!(state.is_busy(Action::Donate));
        assert!(state.is_busy(Action::Withdraw));
        assert!(!state.is_busy(Action::Connect));

        state.apply(ServiceEvent::ActionFinished(Action::Donate));
        assert!(!state.is_busy(Action::Donate));
        assert!(state.is_busy(Action::Withdraw));
    }

    #[test]
    fn test_account_changes() {
        let mut state = AppState::default();
        let alice = Address::repeat_byte(0xa1);
        state.apply(ServiceEvent::AccountChanged(Some(alice)));
        assert_eq!(state.account, Some(alice));
        state.apply(ServiceEvent::AccountChanged(None));
        assert_eq!(state.account, None);
    }

    #[test]
    fn test_toast_durations_follow_config() {
        let config = Config {
            success_toast_ms: 500,
            ..Config::default()
        };
        let mut state = AppState::new(&config);
        let now = Instant::now();
        state.apply_at(
            ServiceEvent::Notify {
                kind: NotificationKind::Success,
                message: "Wallet connected!",
            },
            now,
        );
        assert!(state.notification.expire(now + Duration::from_millis(500)));
    }
}
