//! Notification lifecycle around a user action.

use std::fmt;
use std::future::Future;

use crate::error::DappError;
use crate::notification::NotificationKind;

/// The four things a user can ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Connect,
    Donate,
    Withdraw,
    CheckBalance,
}

impl Action {
    pub const ALL: [Action; 4] = [
        Action::Connect,
        Action::Donate,
        Action::Withdraw,
        Action::CheckBalance,
    ];

    /// Button caption.
    pub fn label(self) -> &'static str {
        match self {
            Action::Connect => "Connect Wallet",
            Action::Donate => "Donate",
            Action::Withdraw => "Withdraw",
            Action::CheckBalance => "Check Balance",
        }
    }

    pub fn pending_message(self) -> &'static str {
        match self {
            Action::Connect => "Connecting wallet...",
            Action::Donate => "Processing donation...",
            Action::Withdraw => "Processing withdrawal...",
            Action::CheckBalance => "Fetching balance...",
        }
    }

    pub fn success_message(self) -> &'static str {
        match self {
            Action::Connect => "Wallet connected!",
            Action::Donate => "Donation successful!",
            Action::Withdraw => "Withdrawal successful!",
            Action::CheckBalance => "Balance updated!",
        }
    }

    pub fn failure_message(self) -> &'static str {
        match self {
            Action::Connect => "Failed to connect wallet.",
            Action::Donate => "Donation failed!",
            Action::Withdraw => "Withdrawal failed!",
            Action::CheckBalance => "Failed to fetch balance.",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Message shown to the user when `action` fails with `err`.
///
/// Only amount validation gets its own wording; every other failure is
/// reported generically and the detail goes to the log.
pub fn failure_message(action: Action, err: &DappError) -> &'static str {
    match err {
        DappError::InvalidAmount(_) => "Enter a valid donation amount.",
        _ => action.failure_message(),
    }
}

/// Run `fut`, surrounding it with a loading, success or failure notification.
///
/// The error is returned to the caller after it has been logged and reported.
pub async fn run_action<T, F, N>(action: Action, notify: N, fut: F) -> Result<T, DappError>
where
    F: Future<Output = Result<T, DappError>>,
    N: Fn(NotificationKind, &'static str),
{
    notify(NotificationKind::Loading, action.pending_message());

    match fut.await {
        Ok(value) => {
            log::debug!("{} succeeded", action);
            notify(NotificationKind::Success, action.success_message());
            Ok(value)
        }
        Err(e) => {
            if e.is_connection_error() {
                log::warn!("⚠️ {} failed: {}", action, e);
            } else {
                log::error!("❌ {} failed: {}", action, e);
            }
            notify(NotificationKind::Error, failure_message(action, &e));
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::ProviderError;
    use crate::units::AmountError;
    use std::sync::Mutex;

    #[tokio::test]
    async fn test_success_lifecycle() {
        let seen = Mutex::new(Vec::new());
        let result = run_action(
            Action::CheckBalance,
            |kind, msg| seen.lock().unwrap().push((kind, msg)),
            async { Ok::<_, DappError>(42u32) },
        )
        .await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(
            seen.into_inner().unwrap(),
            vec![
                (NotificationKind::Loading, "Fetching balance..."),
                (NotificationKind::Success, "Balance updated!"),
            ]
        );
    }

    #[tokio::test]
    async fn test_failure_lifecycle() {
        let seen = Mutex::new(Vec::new());
        let result = run_action(
            Action::Withdraw,
            |kind, msg| seen.lock().unwrap().push((kind, msg)),
            async {
                Err::<(), _>(DappError::TransactionFailure(ProviderError::from_rpc(
                    3,
                    "execution reverted: not owner".into(),
                )))
            },
        )
        .await;

        assert!(result.is_err());
        assert_eq!(
            seen.into_inner().unwrap().last(),
            Some(&(NotificationKind::Error, "Withdrawal failed!"))
        );
    }

    #[test]
    fn test_invalid_amount_message() {
        let err = DappError::InvalidAmount(AmountError::Empty);
        assert_eq!(
            failure_message(Action::Donate, &err),
            "Enter a valid donation amount."
        );
        let err = DappError::UserRejected;
        assert_eq!(failure_message(Action::Donate, &err), "Donation failed!");
        assert_eq!(
            failure_message(Action::Connect, &err),
            "Failed to connect wallet."
        );
    }
}
